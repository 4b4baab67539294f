//! Taxflow Sales Tax Calculation Engine
//!
//! Calculates sales tax for carts and orders against an external rate
//! service: build a request body from the host object, validate it, fetch
//! tax details (cache first), apply them line by line, and record the
//! outcome on the host.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use config::{Config, StoreSettings, TaxBasis};
pub use crate::core::{CalculationError, Currency, RateCache, Result, StopReason};
pub use modules::calculation::{CalculationContext, TaxCalculationResult, TaxCalculator};
pub use modules::commerce::{Address, Cart, Customer, Order};
pub use modules::rates::{HttpTaxClient, TaxClient, TaxDetails};
pub use modules::requests::{ExemptionType, TaxRequestBody};
