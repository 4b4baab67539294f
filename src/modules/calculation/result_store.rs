use super::result::TaxCalculationResult;
use crate::core::Result;
use crate::modules::commerce::{Cart, Order};

/// Order meta key holding the persisted result JSON.
pub const ORDER_RESULT_META_KEY: &str = "_tax_calculation_results";

/// Persists the latest calculation result onto the host.
pub trait ResultStore<H>: Send + Sync {
    fn store(&self, host: &mut H, result: &TaxCalculationResult) -> Result<()>;
}

fn persistable_json(result: &TaxCalculationResult) -> Result<String> {
    let mut sanitized = result.clone();
    sanitized.clear_raw_payloads();
    sanitized.to_json()
}

/// Stores the result on the cart session.
#[derive(Debug, Default)]
pub struct CartResultStore;

impl ResultStore<Cart> for CartResultStore {
    fn store(&self, cart: &mut Cart, result: &TaxCalculationResult) -> Result<()> {
        cart.tax_calculation_results = Some(persistable_json(result)?);
        Ok(())
    }
}

/// Stores the result in order meta.
#[derive(Debug, Default)]
pub struct OrderResultStore;

impl ResultStore<Order> for OrderResultStore {
    fn store(&self, order: &mut Order, result: &TaxCalculationResult) -> Result<()> {
        order
            .meta
            .insert(ORDER_RESULT_META_KEY.to_string(), persistable_json(result)?);
        Ok(())
    }
}
