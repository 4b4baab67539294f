use super::tax_builder::{line_tax_from_rate, merge_tax_buckets, synthetic_bucket};
use super::TaxApplicator;
use crate::core::error::{CalculationError, Result, StopReason};
use crate::modules::commerce::{Cart, TaxBucket};
use crate::modules::rates::TaxDetails;
use rust_decimal::Decimal;

/// Writes fetched tax details onto a live cart.
///
/// Line taxes come straight from the fetched collectable amounts; the
/// pre-coupon subtotal tax is recovered by applying each line's effective
/// rate to its pre-coupon subtotal. Every line amount is rounded to the
/// currency minor unit before totals accumulate.
#[derive(Debug, Default)]
pub struct CartApplicator;

impl CartApplicator {
    pub fn new() -> Self {
        Self
    }
}

impl TaxApplicator<Cart> for CartApplicator {
    fn apply(&mut self, cart: &mut Cart, details: &TaxDetails) -> Result<()> {
        if !details.has_nexus() {
            return Err(CalculationError::stop(
                StopReason::NoNexus,
                "Order does not have nexus.",
            ));
        }

        let currency = cart.currency;

        let mut cart_contents_tax = Decimal::ZERO;
        let mut subtotal_tax = Decimal::ZERO;
        let mut cart_contents_taxes = TaxBucket::new();

        for item in &mut cart.items {
            let detail = details.line_item(&item.request_id())?;

            let total_tax = detail.tax_collectable();
            // A fully discounted line collects nothing, so nothing is
            // inferred back onto its subtotal either.
            let applied_rate = if item.line_total.is_zero() {
                Decimal::ZERO
            } else {
                total_tax / item.line_total
            };

            item.line_tax = currency.round(total_tax);
            item.line_subtotal_tax = currency.round(item.line_subtotal * applied_rate);
            item.total_taxes = synthetic_bucket(item.line_tax);
            item.subtotal_taxes = synthetic_bucket(item.line_subtotal_tax);

            cart_contents_tax += item.line_tax;
            subtotal_tax += item.line_subtotal_tax;
            merge_tax_buckets(&mut cart_contents_taxes, &item.total_taxes);
        }

        let shipping_rate = details.shipping_tax_rate();
        let mut shipping_tax = Decimal::ZERO;
        for package in &mut cart.shipping_packages {
            if let Some(rate) = package.chosen_rate_mut() {
                let tax = line_tax_from_rate(rate.cost, shipping_rate, currency);
                rate.taxes = synthetic_bucket(tax);
                shipping_tax += tax;
            }
        }

        // Negative fees go last so the clamp sees the full accumulated tax.
        let mut fee_order: Vec<usize> = (0..cart.fees.len()).collect();
        fee_order.sort_by_key(|&idx| cart.fees[idx].total.is_sign_negative());

        let mut fee_tax = Decimal::ZERO;
        let mut fee_taxes = TaxBucket::new();
        for idx in fee_order {
            let accumulated = cart_contents_tax + shipping_tax + fee_tax;
            let fee = &mut cart.fees[idx];

            let tax = if fee.total.is_sign_negative() {
                // Discount fees are taxed at the transaction average rate and
                // may reduce accumulated tax, never below zero.
                let rate = if fee.taxable {
                    details.rate()
                } else {
                    Decimal::ZERO
                };
                currency.round((fee.total * rate).max(-accumulated))
            } else {
                let detail = details.line_item(&fee.request_id())?;
                currency.round(detail.tax_collectable())
            };

            fee.tax = tax;
            fee.tax_data = synthetic_bucket(tax);
            fee_tax += tax;
            merge_tax_buckets(&mut fee_taxes, &fee.tax_data);
        }

        cart.subtotal_tax = subtotal_tax;
        cart.cart_contents_tax = cart_contents_tax;
        cart.cart_contents_taxes = cart_contents_taxes;
        cart.shipping_tax = shipping_tax;
        cart.shipping_taxes = synthetic_bucket(shipping_tax);
        cart.fee_tax = fee_tax;
        cart.fee_taxes = fee_taxes;
        cart.total_tax = cart_contents_tax + shipping_tax + fee_tax;

        let total = cart.cart_contents_total()
            + cart.fee_total()
            + cart.shipping_total()
            + cart.total_tax;
        cart.total = total.max(Decimal::ZERO);

        Ok(())
    }
}
