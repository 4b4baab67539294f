use std::fmt;

/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, CalculationError>;

/// Machine readable code attached to every expected calculation stop.
///
/// These are the domain-expected reasons a calculation attempt ends early.
/// They abort the attempt the same way unexpected errors do, but are logged
/// at a lower severity and their messages are safe to surface to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoNexus,
    CartSubtotalZero,
    OrderSubtotalZero,
    IsVatExempt,
    FilterInterrupt,
    MissingRequiredFieldCountry,
    MissingRequiredFieldZip,
    MissingRequiredFieldLineItemOrShipping,
    InvalidFieldZip,
    ApiResponseError,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::NoNexus => "no_nexus",
            StopReason::CartSubtotalZero => "cart_subtotal_zero",
            StopReason::OrderSubtotalZero => "order_subtotal_zero",
            StopReason::IsVatExempt => "is_vat_exempt",
            StopReason::FilterInterrupt => "filter_interrupt",
            StopReason::MissingRequiredFieldCountry => "missing_required_field_country",
            StopReason::MissingRequiredFieldZip => "missing_required_field_zip",
            StopReason::MissingRequiredFieldLineItemOrShipping => {
                "missing_required_field_line_item_or_shipping"
            }
            StopReason::InvalidFieldZip => "invalid_field_zip",
            StopReason::ApiResponseError => "api_response_error",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main calculation error type
#[derive(thiserror::Error, Debug)]
pub enum CalculationError {
    /// Expected domain stop carrying a machine-readable code and a
    /// user-facing message
    #[error("{message}")]
    Stop { code: StopReason, message: String },

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors (contract violations, programming errors)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalculationError {
    pub fn stop(code: StopReason, message: impl Into<String>) -> Self {
        CalculationError::Stop {
            code,
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        CalculationError::Internal(msg.into())
    }

    /// Expected stops differ from unexpected failures only in logging
    /// severity and message surfacing.
    pub fn is_expected(&self) -> bool {
        matches!(self, CalculationError::Stop { .. })
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            CalculationError::Stop { code, .. } => Some(*code),
            _ => None,
        }
    }
}
