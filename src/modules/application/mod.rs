pub mod cart_applicator;
pub mod order_applicator;
pub mod tax_builder;

use crate::core::Result;
use crate::modules::rates::TaxDetails;

pub use cart_applicator::CartApplicator;
pub use order_applicator::OrderApplicator;
pub use tax_builder::SYNTHETIC_RATE_ID;

/// Writes fetched tax details back onto the host object.
pub trait TaxApplicator<H>: Send + Sync {
    fn apply(&mut self, host: &mut H, details: &TaxDetails) -> Result<()>;
}
