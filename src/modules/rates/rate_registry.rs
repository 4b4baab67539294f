use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::commerce::{Address, RateId};

/// A persisted tax rate row, looked up by id when order lines record which
/// rate produced their tax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRate {
    pub id: RateId,
    pub rate_percent: Decimal,
    pub tax_class: String,
    pub shipping_taxable: bool,
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub name: String,
}

/// In-memory registry of persisted rates.
///
/// Rate rows are identified by tax class and destination: reusing the same
/// row across calculations keeps order line tax buckets stable, while the
/// stored percentage tracks whatever the latest lookup returned.
#[derive(Debug, Default)]
pub struct RateRegistry {
    rows: Vec<PersistedRate>,
    next_id: RateId,
}

impl RateRegistry {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Find the rate row for this class and destination, updating its
    /// percentage, or create a new row. Returns the row id.
    pub fn add_rate(
        &mut self,
        rate_percent: Decimal,
        tax_class: &str,
        shipping_taxable: bool,
        location: &Address,
    ) -> RateId {
        if let Some(row) = self.rows.iter_mut().find(|row| {
            row.tax_class == tax_class
                && row.country == location.country
                && row.state == location.state
                && row.postcode == location.postcode
                && row.city == location.city
        }) {
            row.rate_percent = rate_percent;
            row.shipping_taxable = shipping_taxable;
            return row.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(PersistedRate {
            id,
            rate_percent,
            tax_class: tax_class.to_string(),
            shipping_taxable,
            country: location.country.clone(),
            state: location.state.clone(),
            postcode: location.postcode.clone(),
            city: location.city.clone(),
            name: format!("{}-{} Tax", location.country, location.state),
        });
        id
    }

    pub fn rate(&self, id: RateId) -> Option<&PersistedRate> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn rates(&self) -> &[PersistedRate] {
        &self.rows
    }
}
