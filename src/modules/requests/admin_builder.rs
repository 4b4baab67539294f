use super::builder::RequestSource;
use super::order_builder::OrderSource;
use super::request_body::RequestLineItem;
use super::ExemptionType;
use crate::config::Config;
use crate::modules::commerce::{Address, Order};
use rust_decimal::Decimal;

/// Raw address form input captured in the admin order editor.
#[derive(Debug, Clone, Default)]
pub struct AdminOrderForm {
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub street: String,
    pub customer_user: String,
}

/// Reads request body fields from an order being created or edited in the
/// admin dashboard, where the address comes from unsanitized form input
/// rather than the persisted order.
pub struct AdminOrderSource<'a> {
    order_source: OrderSource<'a>,
    form: AdminOrderForm,
}

impl<'a> AdminOrderSource<'a> {
    pub fn new(order: &'a Order, form: AdminOrderForm) -> Self {
        Self {
            order_source: OrderSource::new(order),
            form,
        }
    }
}

/// Free-text form fields are uppercased and stripped of `+` placeholders.
fn normalize_field(value: &str) -> String {
    value.replace('+', " ").trim().to_uppercase()
}

impl RequestSource for AdminOrderSource<'_> {
    fn resolve_ship_to(&self, _config: &Config) -> Address {
        Address::new(
            normalize_field(&self.form.country),
            normalize_field(&self.form.state),
            normalize_field(&self.form.postcode),
            normalize_field(&self.form.city),
            normalize_field(&self.form.street),
        )
    }

    fn resolve_shipping_amount(&self) -> Decimal {
        self.order_source.resolve_shipping_amount()
    }

    fn resolve_customer_id(&self) -> u64 {
        self.form.customer_user.trim().parse().unwrap_or(0)
    }

    fn resolve_exemption_type(&self) -> Option<ExemptionType> {
        self.order_source.resolve_exemption_type()
    }

    fn resolve_product_lines(&self) -> Vec<RequestLineItem> {
        self.order_source.resolve_product_lines()
    }

    fn resolve_fee_lines(&self) -> Vec<RequestLineItem> {
        self.order_source.resolve_fee_lines()
    }
}
