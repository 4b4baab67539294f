// Request body validation and canonical payload tests.
//
// Validation failures are expected stops with machine-readable codes; the
// payload doubles as the cache fingerprint so its shape must stay stable.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use taxflow::core::error::StopReason;
use taxflow::modules::requests::{is_postal_code_valid, RequestLineItem};
use taxflow::{Address, TaxRequestBody};

fn line_item(id: &str, unit_price: Decimal) -> RequestLineItem {
    RequestLineItem {
        id: id.to_string(),
        quantity: 1,
        product_tax_code: String::new(),
        unit_price,
        discount: Decimal::ZERO,
    }
}

fn valid_body() -> TaxRequestBody {
    TaxRequestBody {
        from: Address::new("US", "CO", "80111", "Greenwood Village", ""),
        to: Address::new("US", "CO", "80202", "Denver", ""),
        line_items: vec![line_item("7-item1", dec!(100))],
        shipping_amount: Decimal::ZERO,
        customer_id: 0,
        exemption_type: None,
    }
}

#[test]
fn test_valid_body_passes() {
    assert!(valid_body().validate().is_ok());
}

#[test]
fn test_missing_country_stops() {
    let mut body = valid_body();
    body.to.country.clear();
    let err = body.validate().unwrap_err();
    assert_eq!(
        err.stop_reason(),
        Some(StopReason::MissingRequiredFieldCountry)
    );
}

#[test]
fn test_missing_zip_stops() {
    let mut body = valid_body();
    body.to.postcode.clear();
    let err = body.validate().unwrap_err();
    assert_eq!(err.stop_reason(), Some(StopReason::MissingRequiredFieldZip));
}

#[test]
fn test_missing_lines_and_shipping_stops() {
    let mut body = valid_body();
    body.line_items.clear();
    body.shipping_amount = Decimal::ZERO;
    let err = body.validate().unwrap_err();
    assert_eq!(
        err.stop_reason(),
        Some(StopReason::MissingRequiredFieldLineItemOrShipping)
    );
}

#[test]
fn test_shipping_only_body_passes() {
    let mut body = valid_body();
    body.line_items.clear();
    body.shipping_amount = dec!(10);
    assert!(body.validate().is_ok());
}

#[test]
fn test_invalid_us_zip_stops() {
    let mut body = valid_body();
    body.to.postcode = "8020".to_string();
    let err = body.validate().unwrap_err();
    assert_eq!(err.stop_reason(), Some(StopReason::InvalidFieldZip));
}

#[test]
fn test_country_checked_before_zip() {
    let mut body = valid_body();
    body.to.country.clear();
    body.to.postcode.clear();
    let err = body.validate().unwrap_err();
    assert_eq!(
        err.stop_reason(),
        Some(StopReason::MissingRequiredFieldCountry)
    );
}

#[test]
fn test_payload_carries_plugin_tag_and_addresses() {
    let payload = valid_body().to_payload();
    assert_eq!(payload["plugin"], "taxflow");
    assert_eq!(payload["from_country"], "US");
    assert_eq!(payload["to_zip"], "80202");
    assert_eq!(payload["to_city"], "Denver");
}

#[test]
fn test_payload_is_stable_for_equal_bodies() {
    // The payload string is the cache fingerprint input.
    let a = valid_body().to_json().unwrap();
    let b = valid_body().to_json().unwrap();
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn test_five_digit_us_zips_are_valid(zip in "[0-9]{5}") {
        prop_assert!(is_postal_code_valid("US", &zip));
    }

    #[test]
    fn test_us_zip_plus_four_is_valid(zip in "[0-9]{5}-[0-9]{4}") {
        prop_assert!(is_postal_code_valid("US", &zip));
    }

    #[test]
    fn test_alphabetic_us_zips_are_invalid(zip in "[a-zA-Z]{5}") {
        prop_assert!(!is_postal_code_valid("US", &zip));
    }

    #[test]
    fn test_unknown_countries_accept_any_zip(zip in ".{0,12}") {
        prop_assert!(is_postal_code_valid("BR", &zip));
    }
}
