// Shared fixtures for the calculation test binaries.
//
// Rate lookups go through a canned client so tests run without a live
// endpoint; everything downstream of the transport is the real engine.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use taxflow::core::error::{CalculationError, Result, StopReason};
use taxflow::modules::commerce::{
    CartItem, OrderItem, ShippingLine, ShippingPackage, ShippingRate, TaxBucket,
};
use taxflow::modules::rates::{NexusRegion, TaxClient, TaxDetails};
use taxflow::modules::requests::TaxRequestBody;
use taxflow::{Address, Cart, Config, Currency, Customer, Order, StoreSettings, TaxBasis};

static TRACING: Once = Once::new();

/// Installs a test subscriber once per binary so calculation logs show up
/// under `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config() -> Config {
    Config {
        api_token: "test-token".to_string(),
        api_base_url: "https://rates.example.com".to_string(),
        store: StoreSettings {
            country: "US".to_string(),
            state: "CO".to_string(),
            postcode: "80111".to_string(),
            city: "Greenwood Village".to_string(),
            street: "6060 S Quebec St".to_string(),
        },
        tax_based_on: TaxBasis::Shipping,
        save_rates: true,
        debug_logging: true,
        cache_ttl_secs: 3600,
        currency: Currency::USD,
    }
}

/// Canned rate client. Returns the configured response for every tax
/// lookup and counts how often the lookup endpoint was hit.
pub struct MockTaxClient {
    response: Value,
    nexus_regions: Vec<NexusRegion>,
    fail_with_status: Option<u16>,
    tax_calls: AtomicUsize,
}

impl MockTaxClient {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            nexus_regions: Vec::new(),
            fail_with_status: None,
            tax_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_nexus_regions(mut self, regions: Vec<NexusRegion>) -> Self {
        self.nexus_regions = regions;
        self
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self {
            response: Value::Null,
            nexus_regions: Vec::new(),
            fail_with_status: Some(status),
            tax_calls: AtomicUsize::new(0),
        }
    }

    pub fn tax_call_count(&self) -> usize {
        self.tax_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaxClient for MockTaxClient {
    async fn get_taxes(&self, _body: &TaxRequestBody) -> Result<TaxDetails> {
        self.tax_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_with_status {
            return Err(CalculationError::stop(
                StopReason::ApiResponseError,
                format!("Tax calculation request failed with code: {}", status),
            ));
        }
        TaxDetails::from_response(self.response.clone())
    }

    async fn get_nexus_regions(&self) -> Result<Vec<NexusRegion>> {
        Ok(self.nexus_regions.clone())
    }
}

/// Rate response with one breakdown entry per `(id, collectable)` pair,
/// all at the same combined rate.
pub fn rate_response(rate: f64, freight_taxable: bool, lines: &[(&str, f64)]) -> Value {
    let line_items: Vec<Value> = lines
        .iter()
        .map(|(id, collectable)| {
            json!({
                "id": id,
                "combined_tax_rate": rate,
                "tax_collectable": collectable,
                "taxable_amount": 0.0
            })
        })
        .collect();

    json!({
        "tax": {
            "has_nexus": true,
            "freight_taxable": freight_taxable,
            "rate": rate,
            "breakdown": {
                "shipping": { "combined_tax_rate": rate },
                "line_items": line_items
            }
        }
    })
}

pub fn no_nexus_response() -> Value {
    json!({
        "tax": { "has_nexus": false, "freight_taxable": false, "rate": 0.0 }
    })
}

pub fn denver_address() -> Address {
    Address::new("US", "CO", "80202", "Denver", "100 Main St")
}

/// Cart shipping to Denver with a single $100 item keyed `item1`.
pub fn cart_with_single_item() -> Cart {
    let mut customer = Customer::guest();
    customer.shipping_address = denver_address();
    let mut cart = Cart::new(Currency::USD, customer);
    cart.items
        .push(CartItem::new("item1", 7, 1, dec!(100), dec!(100)));
    cart
}

pub fn add_flat_rate_shipping(cart: &mut Cart, cost: rust_decimal::Decimal) {
    cart.shipping_packages.push(ShippingPackage {
        rates: vec![ShippingRate {
            id: "flat_rate".to_string(),
            cost,
            taxes: TaxBucket::new(),
        }],
        chosen_rate_id: Some("flat_rate".to_string()),
    });
}

/// Order shipping to Denver with one item: $100 subtotal discounted to $90.
pub fn order_with_discounted_item() -> Order {
    let mut order = Order::new(1001, Currency::USD);
    order.shipping_address = denver_address();
    order
        .items
        .push(OrderItem::new("item1", 7, 1, dec!(100), dec!(90)));
    order
        .shipping_lines
        .push(ShippingLine::new("flat_rate", dec!(10)));
    order
}
