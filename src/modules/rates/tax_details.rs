use crate::core::{CalculationError, Result};
use crate::modules::commerce::Address;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Tax details for a single line of the rate response.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxDetailLineItem {
    pub id: String,
    #[serde(default)]
    pub combined_tax_rate: Decimal,
    #[serde(default)]
    pub tax_collectable: Decimal,
    #[serde(default)]
    pub taxable_amount: Decimal,
}

impl TaxDetailLineItem {
    /// Effective rate for the line, or zero when no tax should be
    /// collected. Guards against phantom tax on amounts that rounded to
    /// zero despite a nonzero combined rate.
    pub fn tax_rate(&self) -> Decimal {
        if self.tax_collectable.is_zero() {
            return Decimal::ZERO;
        }
        self.combined_tax_rate
    }

    pub fn tax_collectable(&self) -> Decimal {
        self.tax_collectable
    }

    pub fn taxable_amount(&self) -> Decimal {
        self.taxable_amount
    }
}

#[derive(Debug, Deserialize)]
struct ShippingBreakdown {
    #[serde(default)]
    combined_tax_rate: Decimal,
}

#[derive(Debug, Default, Deserialize)]
struct Breakdown {
    shipping: Option<ShippingBreakdown>,
    #[serde(default)]
    line_items: Vec<TaxDetailLineItem>,
}

#[derive(Debug, Deserialize)]
struct TaxNode {
    has_nexus: bool,
    freight_taxable: bool,
    #[serde(default)]
    rate: Decimal,
    breakdown: Option<Breakdown>,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    tax: TaxNode,
}

/// Typed view over one rate response.
///
/// Constructed once per fetch (cache or client), read once by an
/// applicator, then discarded. The cached payload is the raw response,
/// not this parsed form.
#[derive(Debug)]
pub struct TaxDetails {
    raw_response: Value,
    has_nexus: bool,
    freight_taxable: bool,
    shipping_tax_rate: Decimal,
    rate: Decimal,
    location: Address,
    line_items: HashMap<String, TaxDetailLineItem>,
}

impl TaxDetails {
    pub fn from_response(raw_response: Value) -> Result<Self> {
        let envelope: ResponseEnvelope = serde_json::from_value(raw_response.clone())?;
        let tax = envelope.tax;

        let breakdown = tax.breakdown.unwrap_or_default();

        let shipping_tax_rate = if tax.freight_taxable {
            breakdown
                .shipping
                .map(|shipping| shipping.combined_tax_rate)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let line_items = breakdown
            .line_items
            .into_iter()
            .map(|line| (line.id.clone(), line))
            .collect();

        Ok(Self {
            raw_response,
            has_nexus: tax.has_nexus,
            freight_taxable: tax.freight_taxable,
            shipping_tax_rate,
            rate: tax.rate,
            location: Address::default(),
            line_items,
        })
    }

    /// A missing line id is a contract violation between the request sent
    /// and the details received, so it is an unexpected error.
    pub fn line_item(&self, id: &str) -> Result<&TaxDetailLineItem> {
        self.line_items.get(id).ok_or_else(|| {
            CalculationError::internal(format!("Line item {} not present in tax details.", id))
        })
    }

    pub fn has_nexus(&self) -> bool {
        self.has_nexus
    }

    pub fn is_shipping_taxable(&self) -> bool {
        self.freight_taxable
    }

    pub fn shipping_tax_rate(&self) -> Decimal {
        self.shipping_tax_rate
    }

    /// Average transaction rate.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// The rate response does not self-describe its destination, so the
    /// calculator copies the ship-to fields from the request body.
    pub fn set_location(&mut self, location: Address) {
        self.location = location;
    }

    pub fn location(&self) -> &Address {
        &self.location
    }

    pub fn raw_response(&self) -> &Value {
        &self.raw_response
    }
}
