// Calculation results survive persistence as JSON: serialize, store,
// deserialize, and the result reads back identically.

use proptest::prelude::*;

use taxflow::{CalculationContext, TaxCalculationResult};

proptest! {
    #[test]
    fn test_failure_round_trips_through_json(
        request in ".{0,200}",
        message in ".{0,200}"
    ) {
        let result = TaxCalculationResult::failure(
            CalculationContext::Order,
            request,
            String::new(),
            message,
        );
        let json = result.to_json().unwrap();
        let restored = TaxCalculationResult::from_json(&json).unwrap();
        prop_assert_eq!(restored, result);
    }

    #[test]
    fn test_success_round_trips_through_json(
        request in ".{0,200}",
        response in ".{0,200}"
    ) {
        let result = TaxCalculationResult::success(
            CalculationContext::Cart,
            request,
            response,
        );
        let json = result.to_json().unwrap();
        let restored = TaxCalculationResult::from_json(&json).unwrap();
        prop_assert_eq!(restored, result);
    }
}

#[test]
fn test_persisted_form_drops_raw_payloads_only() {
    let mut result = TaxCalculationResult::failure(
        CalculationContext::AdminOrder,
        "raw request".to_string(),
        "raw response".to_string(),
        "Order subtotal is zero.".to_string(),
    );
    result.clear_raw_payloads();

    assert!(result.raw_request.is_empty());
    assert!(result.raw_response.is_empty());
    assert_eq!(result.error_message, "Order subtotal is zero.");
    assert_eq!(result.context, CalculationContext::AdminOrder);
}

#[test]
fn test_missing_payload_fields_default_on_read() {
    // Persisted results written with payloads cleared may omit the fields
    // entirely.
    let json = r#"{"success":true,"context":"cart"}"#;
    let result = TaxCalculationResult::from_json(json).unwrap();
    assert!(result.success);
    assert!(result.raw_request.is_empty());
    assert!(result.error_message.is_empty());
}
