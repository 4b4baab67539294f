use crate::core::{CalculationError, Currency, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Address basis used when resolving the ship-to address for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxBasis {
    Shipping,
    Billing,
    Base,
}

impl FromStr for TaxBasis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shipping" => Ok(TaxBasis::Shipping),
            "billing" => Ok(TaxBasis::Billing),
            "base" => Ok(TaxBasis::Base),
            _ => Err(format!("Invalid tax basis: {}", s)),
        }
    }
}

/// Store base address, used as the ship-from address and as an implicit
/// nexus location.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub street: String,
}

/// Main engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Rate lookup API credentials and endpoint
    pub api_token: String,
    pub api_base_url: String,

    /// Store base address
    pub store: StoreSettings,

    /// Which address a cart calculation is based on
    pub tax_based_on: TaxBasis,

    /// Whether order calculations persist per-class rate rows
    pub save_rates: bool,

    /// Gates all calculation logging
    pub debug_logging: bool,

    /// Rate cache expiry in seconds
    pub cache_ttl_secs: u64,

    pub currency: Currency,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file when present, real environment wins.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_token: env::var("TAXFLOW_API_TOKEN").unwrap_or_default(),
            api_base_url: env::var("TAXFLOW_API_URL").unwrap_or_default(),
            store: StoreSettings {
                country: env::var("TAXFLOW_STORE_COUNTRY").unwrap_or_default(),
                state: env::var("TAXFLOW_STORE_STATE").unwrap_or_default(),
                postcode: env::var("TAXFLOW_STORE_POSTCODE").unwrap_or_default(),
                city: env::var("TAXFLOW_STORE_CITY").unwrap_or_default(),
                street: env::var("TAXFLOW_STORE_STREET").unwrap_or_default(),
            },
            tax_based_on: env::var("TAXFLOW_TAX_BASED_ON")
                .unwrap_or_else(|_| "shipping".to_string())
                .parse()
                .map_err(CalculationError::Configuration)?,
            save_rates: env_flag("TAXFLOW_SAVE_RATES"),
            debug_logging: env_flag("TAXFLOW_DEBUG_LOGGING"),
            cache_ttl_secs: env::var("TAXFLOW_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            currency: env::var("TAXFLOW_CURRENCY")
                .unwrap_or_else(|_| "USD".to_string())
                .parse()
                .map_err(CalculationError::Configuration)?,
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(CalculationError::Configuration(
                "TAXFLOW_API_TOKEN is required".to_string(),
            ));
        }

        if self.api_base_url.is_empty() {
            return Err(CalculationError::Configuration(
                "TAXFLOW_API_URL is required".to_string(),
            ));
        }

        if self.store.country.is_empty() {
            return Err(CalculationError::Configuration(
                "store country is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).unwrap_or_default().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Shared fixture for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api_token: "token".to_string(),
        api_base_url: "https://rates.example.com".to_string(),
        store: StoreSettings {
            country: "US".to_string(),
            state: "CO".to_string(),
            postcode: "80111".to_string(),
            city: "Greenwood Village".to_string(),
            street: "6060 S Quebec St".to_string(),
        },
        tax_based_on: TaxBasis::Shipping,
        save_rates: false,
        debug_logging: true,
        cache_ttl_secs: 3600,
        currency: Currency::USD,
    }
}
