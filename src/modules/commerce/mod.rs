pub mod cart;
pub mod customer;
pub mod order;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use cart::{Cart, CartFee, CartItem, ShippingPackage, ShippingRate};
pub use customer::Customer;
pub use order::{Order, OrderFee, OrderItem, ShippingLine};

/// Bucket key under which an amount of tax is accumulated.
///
/// Synthetic (always [`crate::modules::application::SYNTHETIC_RATE_ID`])
/// for ephemeral cart calculations, persisted for order calculations.
pub type RateId = u64;

/// Ordered mapping from rate id to an accumulated, per-minor-unit-rounded
/// tax amount.
pub type TaxBucket = BTreeMap<RateId, Decimal>;

/// Postal address of a transaction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub street: String,
}

impl Address {
    pub fn new(
        country: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
            postcode: postcode.into(),
            city: city.into(),
            street: street.into(),
        }
    }
}

/// Shipping methods that force the store base address as the tax basis.
pub const LOCAL_PICKUP_METHODS: [&str; 2] = ["local_pickup", "legacy_local_pickup"];
