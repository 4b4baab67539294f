use super::tax_builder::{line_tax_from_rate, rate_bucket, SYNTHETIC_RATE_ID};
use super::TaxApplicator;
use crate::core::error::{CalculationError, Result, StopReason};
use crate::modules::commerce::{Address, Order, RateId};
use crate::modules::rates::{RateRegistry, TaxDetails};
use rust_decimal::Decimal;

/// Writes fetched tax details onto a persisted order.
///
/// Unlike carts, orders can record which persisted rate produced each tax
/// amount: with rate saving enabled every line gets a rate row from the
/// registry and its taxes keyed by that row's id, otherwise the synthetic
/// id is used. Existing tax rows are removed before the fresh application.
#[derive(Debug)]
pub struct OrderApplicator {
    registry: RateRegistry,
    save_rates: bool,
}

impl OrderApplicator {
    pub fn new(save_rates: bool) -> Self {
        Self {
            registry: RateRegistry::new(),
            save_rates,
        }
    }

    pub fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    fn rate_id_for(
        &mut self,
        rate: Decimal,
        tax_class: &str,
        shipping_taxable: bool,
        location: &Address,
    ) -> RateId {
        if !self.save_rates {
            return SYNTHETIC_RATE_ID;
        }
        self.registry.add_rate(
            rate * Decimal::ONE_HUNDRED,
            tax_class,
            shipping_taxable,
            location,
        )
    }
}

impl TaxApplicator<Order> for OrderApplicator {
    fn apply(&mut self, order: &mut Order, details: &TaxDetails) -> Result<()> {
        if !details.has_nexus() {
            return Err(CalculationError::stop(
                StopReason::NoNexus,
                "Order does not have nexus.",
            ));
        }

        let currency = order.currency;
        order.remove_tax_items();

        for item in &mut order.items {
            let detail = details.line_item(&item.request_id())?;
            let rate = detail.tax_rate();
            let rate_id = self.rate_id_for(
                rate,
                &item.tax_class,
                details.is_shipping_taxable(),
                details.location(),
            );
            item.total_taxes = rate_bucket(rate_id, line_tax_from_rate(item.total, rate, currency));
            item.subtotal_taxes =
                rate_bucket(rate_id, line_tax_from_rate(item.subtotal, rate, currency));
        }

        for fee in &mut order.fees {
            let detail = details.line_item(&fee.request_id())?;
            let rate = detail.tax_rate();
            let rate_id = self.rate_id_for(
                rate,
                &fee.tax_class,
                details.is_shipping_taxable(),
                details.location(),
            );
            fee.total_taxes = rate_bucket(rate_id, line_tax_from_rate(fee.total, rate, currency));
        }

        // Non-taxable freight leaves shipping lines with the tax rows that
        // remove_tax_items already stripped.
        if details.is_shipping_taxable() {
            let shipping_rate = details.shipping_tax_rate();
            let rate_id = self.rate_id_for(shipping_rate, "", true, details.location());
            for line in &mut order.shipping_lines {
                line.total_taxes = rate_bucket(
                    rate_id,
                    line_tax_from_rate(line.total, shipping_rate, currency),
                );
            }
        }

        order.update_taxes();

        let discount_tax: Decimal = order
            .items
            .iter()
            .map(|item| item.subtotal_tax() - item.total_tax())
            .sum();
        order.discount_tax = currency.round(discount_tax);

        order.total = currency.round(
            order.rounded_items_total()
                + order.cart_tax
                + order.shipping_tax
                + order.total_fees()
                + order.shipping_total(),
        );

        Ok(())
    }
}
