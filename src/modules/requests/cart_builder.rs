use super::builder::{sanitize_tax_class, tax_code_from_class, RequestSource};
use super::request_body::{RequestLineItem, NON_TAXABLE_TAX_CODE};
use super::ExemptionType;
use crate::config::{Config, TaxBasis};
use crate::modules::commerce::{Address, Cart};
use rust_decimal::Decimal;

/// Reads request body fields from a live cart session.
pub struct CartSource<'a> {
    cart: &'a Cart,
}

impl<'a> CartSource<'a> {
    pub fn new(cart: &'a Cart) -> Self {
        Self { cart }
    }

    fn line_item_tax_code(&self, taxable: bool, tax_class: &str) -> String {
        if !taxable || sanitize_tax_class(tax_class) == "zero-rate" {
            return NON_TAXABLE_TAX_CODE.to_string();
        }
        tax_code_from_class(tax_class)
    }
}

impl RequestSource for CartSource<'_> {
    /// Resolves the taxable address per the configured basis, with a local
    /// pickup override that forces the store base address.
    fn resolve_ship_to(&self, config: &Config) -> Address {
        let mut basis = config.tax_based_on;
        if self.cart.has_local_pickup() {
            basis = TaxBasis::Base;
        }

        match basis {
            TaxBasis::Base => Address::new(
                config.store.country.clone(),
                config.store.state.clone(),
                config.store.postcode.clone(),
                config.store.city.clone(),
                config.store.street.clone(),
            ),
            TaxBasis::Billing => self.cart.customer.billing_address.clone(),
            TaxBasis::Shipping => self.cart.customer.shipping_address.clone(),
        }
    }

    fn resolve_shipping_amount(&self) -> Decimal {
        self.cart.shipping_total()
    }

    fn resolve_customer_id(&self) -> u64 {
        self.cart.customer.id
    }

    fn resolve_exemption_type(&self) -> Option<ExemptionType> {
        self.cart.customer.exemption_type
    }

    fn resolve_product_lines(&self) -> Vec<RequestLineItem> {
        self.cart
            .items
            .iter()
            .map(|item| {
                let quantity = Decimal::from(item.quantity.max(1));
                RequestLineItem {
                    id: item.request_id(),
                    quantity: item.quantity,
                    product_tax_code: self.line_item_tax_code(item.taxable, &item.tax_class),
                    unit_price: item.line_subtotal / quantity,
                    discount: item.line_subtotal - item.line_total,
                }
            })
            .collect()
    }

    fn resolve_fee_lines(&self) -> Vec<RequestLineItem> {
        self.cart
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
