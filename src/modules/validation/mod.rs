pub mod cart_validator;
pub mod order_validator;

use crate::core::Result;
use crate::modules::rates::Nexus;
use crate::modules::requests::TaxRequestBody;

pub use cart_validator::CartValidator;
pub use order_validator::OrderValidator;

/// Hook allowing integrations to veto a calculation. Returning `true`
/// interrupts with an expected stop.
pub type InterruptHook<H> = Box<dyn Fn(&H) -> bool + Send + Sync>;

/// Pre-flight checks run before any rate lookup. Every failure is an
/// expected stop except genuinely malformed input.
pub trait CalculationValidator<H>: Send + Sync {
    fn validate(&self, host: &H, body: &TaxRequestBody, nexus: &Nexus) -> Result<()>;
}
