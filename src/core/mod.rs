pub mod cache;
pub mod currency;
pub mod error;

pub use cache::RateCache;
pub use currency::Currency;
pub use error::{CalculationError, Result, StopReason};
