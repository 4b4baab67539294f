use super::builder::{sanitize_tax_class, tax_code_from_class, RequestSource};
use super::request_body::{RequestLineItem, NON_TAXABLE_TAX_CODE};
use super::ExemptionType;
use crate::config::Config;
use crate::modules::commerce::{Address, Order};
use rust_decimal::Decimal;

/// Reads request body fields from a persisted order.
pub struct OrderSource<'a> {
    order: &'a Order,
}

impl<'a> OrderSource<'a> {
    pub fn new(order: &'a Order) -> Self {
        Self { order }
    }

    fn line_item_tax_code(&self, taxable: bool, tax_class: &str) -> String {
        if !taxable || sanitize_tax_class(tax_class) == "zero-rate" {
            return NON_TAXABLE_TAX_CODE.to_string();
        }
        tax_code_from_class(tax_class)
    }
}

impl RequestSource for OrderSource<'_> {
    /// Orders ship to their shipping address, falling back to billing when
    /// no shipping country was captured. Local pickup uses the store base
    /// address.
    fn resolve_ship_to(&self, config: &Config) -> Address {
        if self.order.has_local_pickup() {
            return Address::new(
                config.store.country.clone(),
                config.store.state.clone(),
                config.store.postcode.clone(),
                config.store.city.clone(),
                config.store.street.clone(),
            );
        }

        if self.order.shipping_address.country.is_empty() {
            self.order.billing_address.clone()
        } else {
            self.order.shipping_address.clone()
        }
    }

    fn resolve_shipping_amount(&self) -> Decimal {
        self.order.shipping_total()
    }

    fn resolve_customer_id(&self) -> u64 {
        self.order.customer_id
    }

    fn resolve_exemption_type(&self) -> Option<ExemptionType> {
        self.order.exemption_type
    }

    fn resolve_product_lines(&self) -> Vec<RequestLineItem> {
        self.order
            .items
            .iter()
            .map(|item| {
                let quantity = Decimal::from(item.quantity.max(1));
                RequestLineItem {
                    id: item.request_id(),
                    quantity: item.quantity,
                    product_tax_code: self.line_item_tax_code(item.taxable, &item.tax_class),
                    unit_price: item.subtotal / quantity,
                    discount: item.subtotal - item.total,
                }
            })
            .collect()
    }

    fn resolve_fee_lines(&self) -> Vec<RequestLineItem> {
        self.order
            .fees
            .iter()
            .map(|fee| RequestLineItem {
                id: fee.request_id(),
                quantity: 1,
                product_tax_code: self.line_item_tax_code(fee.taxable, &fee.tax_class),
                unit_price: fee.total,
                discount: Decimal::ZERO,
            })
            .collect()
    }
}
