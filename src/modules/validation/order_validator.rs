use super::{CalculationValidator, InterruptHook};
use crate::core::error::{CalculationError, Result, StopReason};
use crate::modules::commerce::{Customer, Order};
use crate::modules::rates::Nexus;
use crate::modules::requests::TaxRequestBody;

/// Pre-flight checks for order calculations.
///
/// Orders record their own exemption flag at checkout time; a session
/// customer, when one is attached, can also carry the exemption.
#[derive(Default)]
pub struct OrderValidator {
    customer: Option<Customer>,
    interrupt_hook: Option<InterruptHook<Order>>,
}

impl OrderValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn with_interrupt_hook(mut self, hook: InterruptHook<Order>) -> Self {
        self.interrupt_hook = Some(hook);
        self
    }

    fn is_vat_exempt(&self, order: &Order) -> bool {
        order.vat_exempt
            || self
                .customer
                .as_ref()
                .map(|customer| customer.is_vat_exempt)
                .unwrap_or(false)
    }
}

impl CalculationValidator<Order> for OrderValidator {
    fn validate(&self, order: &Order, body: &TaxRequestBody, nexus: &Nexus) -> Result<()> {
        body.validate()?;

        let subtotal = order.subtotal() + order.total_fees() + order.shipping_total();
        if subtotal.is_zero() {
            return Err(CalculationError::stop(
                StopReason::OrderSubtotalZero,
                "Order subtotal is zero.",
            ));
        }

        if self.is_vat_exempt(order) {
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
            if hook(order) {
                return Err(CalculationError::stop(
                    StopReason::FilterInterrupt,
                    "Calculation interrupted by filter.",
                ));
            }
        }

        Ok(())
    }
}
