use super::result::TaxCalculationResult;
use crate::config::Config;
use crate::core::CalculationError;

/// Records the outcome of every calculation attempt.
pub trait CalculationLogger: Send + Sync {
    fn log(&self, result: &TaxCalculationResult, error: Option<&CalculationError>);
}

/// Logger backed by `tracing`, gated by the debug logging setting.
///
/// Expected stops are normal operation and log at info; only unexpected
/// failures log at error.
pub struct TracingLogger {
    enabled: bool,
}

impl TracingLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.debug_logging)
    }

    fn details(result: &TaxCalculationResult, reason: Option<&str>) -> String {
        format!(
            "Context: {}\nReason: {}\nMessage: {}\nRequest: {}\nResponse: {}",
            result.context,
            reason.unwrap_or(""),
            result.error_message,
            result.raw_request,
            result.raw_response
        )
    }
}

impl CalculationLogger for TracingLogger {
    fn log(&self, result: &TaxCalculationResult, error: Option<&CalculationError>) {
        if !self.enabled {
            return;
        }

        let reason = error
            .and_then(CalculationError::stop_reason)
            .map(|reason| reason.as_str());
        let details = Self::details(result, reason);

        match error {
            None => {
                tracing::info!(
                    context = %result.context,
                    "Tax calculation applied.\n{}",
                    details
                );
            }
            Some(err) if err.is_expected() => {
                tracing::info!(
                    context = %result.context,
                    code = reason.unwrap_or(""),
                    "Tax calculation stopped: {}\n{}",
                    err,
                    details
                );
            }
            Some(err) => {
                tracing::error!(
                    context = %result.context,
                    "Tax calculation failed: {}\n{}",
                    err,
                    details
                );
            }
        }
    }
}

/// Logger that drops everything, for hosts that disable calculation logs.
pub struct NullLogger;

impl CalculationLogger for NullLogger {
    fn log(&self, _result: &TaxCalculationResult, _error: Option<&CalculationError>) {}
}
