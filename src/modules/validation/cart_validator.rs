use super::{CalculationValidator, InterruptHook};
use crate::core::error::{CalculationError, Result, StopReason};
use crate::modules::commerce::Cart;
use crate::modules::rates::Nexus;
use crate::modules::requests::TaxRequestBody;

/// Pre-flight checks for cart calculations.
#[derive(Default)]
pub struct CartValidator {
    interrupt_hook: Option<InterruptHook<Cart>>,
}

impl CartValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interrupt_hook(mut self, hook: InterruptHook<Cart>) -> Self {
        self.interrupt_hook = Some(hook);
        self
    }
}

impl CalculationValidator<Cart> for CartValidator {
    fn validate(&self, cart: &Cart, body: &TaxRequestBody, nexus: &Nexus) -> Result<()> {
        body.validate()?;

        let subtotal = cart.subtotal() + cart.fee_total() + cart.shipping_total();
        if subtotal.is_zero() {
            return Err(CalculationError::stop(
                StopReason::CartSubtotalZero,
                "Cart subtotal is zero.",
            ));
        }

        if cart.customer.is_vat_exempt {
            return Err(CalculationError::stop(
                StopReason::IsVatExempt,
                "Customer is VAT exempt.",
            ));
        }

        if !nexus.has_nexus_check(&body.to.country, &body.to.state) {
            return Err(CalculationError::stop(
                StopReason::NoNexus,
                "No nexus in customer region.",
            ));
        }

        if let Some(hook) = &self.interrupt_hook {
            if hook(cart) {
                return Err(CalculationError::stop(
                    StopReason::FilterInterrupt,
                    "Calculation interrupted by filter.",
                ));
            }
        }

        Ok(())
    }
}
