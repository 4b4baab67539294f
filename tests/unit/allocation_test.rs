// Property-based tests for the tax allocation and rounding core:
// - Per-line rounding to the currency minor unit before accumulation
// - Bucket merging preserves totals
// - Negative fee taxes are clamped so accumulated tax never goes negative

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

use taxflow::modules::application::tax_builder::{
    bucket_total, line_tax_from_rate, merge_tax_buckets, rate_bucket,
};
use taxflow::modules::application::{CartApplicator, TaxApplicator};
use taxflow::modules::commerce::{Cart, CartFee, CartItem};
use taxflow::modules::rates::TaxDetails;
use taxflow::{Currency, Customer};

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

fn rate_from_bp(basis_points: u32) -> Decimal {
    Decimal::new(basis_points as i64, 4)
}

proptest! {
    #[test]
    fn test_line_tax_rounds_to_minor_unit(
        amount_cents in 0u64..100_000_000u64,
        rate_bp in 0u32..=3000u32
    ) {
        let tax = line_tax_from_rate(cents(amount_cents), rate_from_bp(rate_bp), Currency::USD);

        prop_assert!(tax.scale() <= 2, "tax {} has sub-cent precision", tax);

        let exact = cents(amount_cents) * rate_from_bp(rate_bp);
        let drift = (tax - exact).abs();
        prop_assert!(
            drift <= Decimal::new(5, 3),
            "tax {} drifted {} from exact {}",
            tax, drift, exact
        );
    }

    #[test]
    fn test_zero_decimal_currency_rounds_to_whole_units(
        amount_cents in 0u64..100_000_000u64,
        rate_bp in 0u32..=3000u32
    ) {
        let tax = line_tax_from_rate(cents(amount_cents), rate_from_bp(rate_bp), Currency::JPY);
        prop_assert!(tax.scale() == 0, "JPY tax {} carries fractional units", tax);
    }

    #[test]
    fn test_merge_preserves_bucket_totals(
        a in 0u64..1_000_000u64,
        b in 0u64..1_000_000u64,
        c in 0u64..1_000_000u64
    ) {
        let mut into = rate_bucket(1, cents(a));
        let mut from = rate_bucket(1, cents(b));
        from.insert(2, cents(c));

        let expected = bucket_total(&into) + bucket_total(&from);
        merge_tax_buckets(&mut into, &from);

        prop_assert_eq!(bucket_total(&into), expected);
    }

    #[test]
    fn test_line_taxes_sum_exactly_to_cart_contents_tax(
        prices in prop::collection::vec(1u64..10_000_000u64, 1..6),
        rate_bp in 0u32..=3000u32
    ) {
        let rate = rate_from_bp(rate_bp);
        let mut cart = Cart::new(Currency::USD, Customer::guest());
        let mut lines = Vec::new();
        for (idx, price_cents) in prices.iter().enumerate() {
            let key = format!("item{}", idx);
            let price = cents(*price_cents);
            cart.items.push(CartItem::new(&key, idx as u64 + 1, 1, price, price));
            let collectable = price * rate;
            lines.push(json!({
                "id": format!("{}-{}", idx + 1, key),
                "combined_tax_rate": rate,
                "tax_collectable": collectable,
            }));
        }

        let details = TaxDetails::from_response(json!({
            "tax": {
                "has_nexus": true,
                "freight_taxable": false,
                "rate": rate,
                "breakdown": { "line_items": lines }
            }
        })).unwrap();

        CartApplicator::new().apply(&mut cart, &details).unwrap();

        let line_sum: Decimal = cart.items.iter().map(|item| item.line_tax).sum();
        prop_assert_eq!(line_sum, cart.cart_contents_tax);
        for item in &cart.items {
            prop_assert!(item.line_tax.scale() <= 2);
        }
    }

    #[test]
    fn test_negative_fee_never_drives_total_tax_negative(
        price_cents in 1u64..10_000_000u64,
        fee_cents in 1u64..100_000_000u64,
        rate_bp in 0u32..=3000u32
    ) {
        let rate = rate_from_bp(rate_bp);
        let price = cents(price_cents);
        let collectable = price * rate;

        let mut cart = Cart::new(Currency::USD, Customer::guest());
        cart.items.push(CartItem::new("item1", 7, 1, price, price));
        cart.fees.push(CartFee::new("discount", "Discount", -cents(fee_cents)));

        let details = TaxDetails::from_response(json!({
            "tax": {
                "has_nexus": true,
                "freight_taxable": false,
                "rate": rate,
                "breakdown": {
                    "line_items": [{
                        "id": "7-item1",
                        "combined_tax_rate": rate,
                        "tax_collectable": collectable,
                    }]
                }
            }
        })).unwrap();

        CartApplicator::new().apply(&mut cart, &details).unwrap();

        prop_assert!(
            cart.total_tax >= Decimal::ZERO,
            "total tax {} went negative (item tax {}, fee tax {})",
            cart.total_tax, cart.cart_contents_tax, cart.fee_tax
        );
        prop_assert!(cart.total >= Decimal::ZERO, "cart total {} went negative", cart.total);
        prop_assert!(cart.fees[0].tax <= Decimal::ZERO);
    }
}
