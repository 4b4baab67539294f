// End-to-end order calculation: persisted rate rows, discount tax, order
// totals, and the admin-editor flow with raw form input.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use taxflow::modules::calculation::ORDER_RESULT_META_KEY;
use taxflow::modules::commerce::OrderFee;
use taxflow::modules::requests::AdminOrderForm;
use taxflow::{CalculationContext, RateCache, TaxCalculationResult, TaxCalculator};

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::*;

fn cache() -> Arc<RateCache> {
    init_tracing();
    Arc::new(RateCache::new(Duration::from_secs(3600), "tf_tax_"))
}

#[tokio::test]
async fn test_successful_calculation_updates_order() {
    let mut order = order_with_discounted_item();
    order.fees.push(OrderFee::new("handling", dec!(5)));

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("7-item1", 9.0), ("fee-handling", 0.5)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client, cache());

    let result = calculator.calculate(&mut order).await;

    assert!(result.success);
    assert_eq!(order.items[0].total_tax(), dec!(9.00));
    assert_eq!(order.items[0].subtotal_tax(), dec!(10.00));
    assert_eq!(order.cart_tax, dec!(9.50));
    assert_eq!(order.shipping_tax, dec!(1.00));
    assert_eq!(order.discount_tax, dec!(1.00));
    // 90 items + 9.50 cart tax + 1.00 shipping tax + 5 fees + 10 shipping
    assert_eq!(order.total, dec!(115.50));
}

#[tokio::test]
async fn test_result_persisted_in_order_meta() {
    let mut order = order_with_discounted_item();
    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("7-item1", 9.0)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client, cache());

    calculator.calculate(&mut order).await;

    let stored =
        TaxCalculationResult::from_json(order.meta.get(ORDER_RESULT_META_KEY).unwrap()).unwrap();
    assert!(stored.success);
    assert_eq!(stored.context, CalculationContext::Order);
    assert!(stored.raw_request.is_empty());
    assert!(stored.raw_response.is_empty());
}

#[tokio::test]
async fn test_zero_subtotal_order_stops() {
    let mut order = order_with_discounted_item();
    order.items[0].subtotal = dec!(0);
    order.items[0].total = dec!(0);
    order.shipping_lines.clear();

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("7-item1", 0.0)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client.clone(), cache());

    let result = calculator.calculate(&mut order).await;

    assert!(!result.success);
    assert_eq!(result.error_message, "Order subtotal is zero.");
    assert_eq!(client.tax_call_count(), 0);
}

#[tokio::test]
async fn test_order_level_exemption_stops() {
    let mut order = order_with_discounted_item();
    order.vat_exempt = true;

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("7-item1", 9.0)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client.clone(), cache());

    let result = calculator.calculate(&mut order).await;

    assert!(!result.success);
    assert_eq!(client.tax_call_count(), 0);
}

#[tokio::test]
async fn test_non_taxable_freight_strips_shipping_tax() {
    let mut order = order_with_discounted_item();

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        false,
        &[("7-item1", 9.0)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client, cache());

    let result = calculator.calculate(&mut order).await;

    assert!(result.success);
    assert_eq!(order.shipping_tax, dec!(0));
    assert!(order.shipping_lines[0].total_taxes.is_empty());
    // 90 items + 9.00 cart tax + 10 shipping, untaxed
    assert_eq!(order.total, dec!(109.00));
}

#[tokio::test]
async fn test_admin_order_uses_normalized_form_address() {
    let mut order = order_with_discounted_item();
    // The persisted shipping address would fail validation; the form input
    // must win.
    order.shipping_address = taxflow::Address::default();

    let form = AdminOrderForm {
        country: "us".to_string(),
        state: "co".to_string(),
        postcode: " 80202 ".to_string(),
        city: "denver".to_string(),
        street: "100+main+st".to_string(),
        customer_user: "12".to_string(),
    };

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("7-item1", 9.0)],
    )));
    let mut calculator =
        TaxCalculator::for_admin_order(test_config(), client, cache(), form);

    let result = calculator.calculate(&mut order).await;

    assert!(result.success);
    assert_eq!(result.context, CalculationContext::AdminOrder);
    assert!(result.raw_request.contains("\"to_zip\":\"80202\""));
    assert!(result.raw_request.contains("\"to_city\":\"DENVER\""));
    assert!(result.raw_request.contains("\"customer_id\":12"));
}

#[tokio::test]
async fn test_missing_line_detail_is_unexpected_failure() {
    let mut order = order_with_discounted_item();

    let client = Arc::new(MockTaxClient::new(rate_response(
        0.1,
        true,
        &[("9-other", 9.0)],
    )));
    let mut calculator = TaxCalculator::for_order(test_config(), client, cache());

    let result = calculator.calculate(&mut order).await;

    assert!(!result.success);
    assert!(result.error_message.contains("7-item1"));
}
