use super::request_body::{RequestLineItem, TaxRequestBody};
use super::ExemptionType;
use crate::config::Config;
use crate::modules::commerce::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// Where each request body field is read from.
///
/// Implemented per host type (cart, order, admin-entered order); the
/// assembly order itself is fixed by [`build_request_body`].
pub trait RequestSource {
    fn resolve_ship_to(&self, config: &Config) -> Address;
    fn resolve_shipping_amount(&self) -> Decimal;
    fn resolve_customer_id(&self) -> u64;
    fn resolve_exemption_type(&self) -> Option<ExemptionType>;
    fn resolve_product_lines(&self) -> Vec<RequestLineItem>;
    fn resolve_fee_lines(&self) -> Vec<RequestLineItem>;
}

/// Assembles a canonical rate request from a source.
///
/// Field resolution order is fixed: ship-to, ship-from (store settings),
/// product lines, fee lines, shipping amount, customer id, exemption type.
pub fn build_request_body<S: RequestSource>(source: &S, config: &Config) -> TaxRequestBody {
    let mut to = source.resolve_ship_to(config);
    to.postcode = normalize_zip(&to.postcode);

    let from = Address::new(
        config.store.country.clone(),
        config.store.state.clone(),
        config.store.postcode.clone(),
        config.store.city.clone(),
        config.store.street.clone(),
    );

    let mut line_items = source.resolve_product_lines();
    line_items.extend(source.resolve_fee_lines());

    TaxRequestBody {
        from,
        to,
        line_items,
        shipping_amount: source.resolve_shipping_amount(),
        customer_id: source.resolve_customer_id(),
        exemption_type: source.resolve_exemption_type(),
    }
}

/// Only the first segment of a multi-part zip is sent to the rate API.
fn normalize_zip(zip: &str) -> String {
    zip.split(',').next().unwrap_or_default().trim().to_string()
}

/// Product tax codes are 5 digits or digits+letter+digits.
static TAX_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{5}|\d+[A-Z]\d+)$").expect("tax code regex is valid"));

/// Extracts the product tax code suffix from a tax class slug.
///
/// The code is the last `-`-separated segment, uppercased; slugs without a
/// recognizable code yield an empty string.
pub fn tax_code_from_class(tax_class: &str) -> String {
    let code = tax_class
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .to_uppercase();

    if TAX_CODE_PATTERN.is_match(&code) {
        code
    } else {
        String::new()
    }
}

/// Slug form of a tax class, for comparing against reserved class names.
pub fn sanitize_tax_class(tax_class: &str) -> String {
    tax_class.trim().to_lowercase().replace(' ', "-")
}
