pub mod calculator;
pub mod logger;
pub mod result;
pub mod result_store;

pub use calculator::{BodyBuilder, TaxCalculator};
pub use logger::{CalculationLogger, NullLogger, TracingLogger};
pub use result::{CalculationContext, TaxCalculationResult};
pub use result_store::{CartResultStore, OrderResultStore, ResultStore, ORDER_RESULT_META_KEY};
