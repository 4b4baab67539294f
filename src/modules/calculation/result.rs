use crate::core::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which calculation flow produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationContext {
    Cart,
    Order,
    AdminOrder,
}

impl CalculationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationContext::Cart => "cart",
            CalculationContext::Order => "order",
            CalculationContext::AdminOrder => "admin_order",
        }
    }
}

impl fmt::Display for CalculationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one calculation attempt.
///
/// Serialized onto the host for later inspection. Raw payloads are kept for
/// logging but cleared before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub success: bool,
    pub context: CalculationContext,
    #[serde(default)]
    pub raw_request: String,
    #[serde(default)]
    pub raw_response: String,
    #[serde(default)]
    pub error_message: String,
}

impl TaxCalculationResult {
    pub fn success(
        context: CalculationContext,
        raw_request: String,
        raw_response: String,
    ) -> Self {
        Self {
            success: true,
            context,
            raw_request,
            raw_response,
            error_message: String::new(),
        }
    }

    pub fn failure(
        context: CalculationContext,
        raw_request: String,
        raw_response: String,
        error_message: String,
    ) -> Self {
        Self {
            success: false,
            context,
            raw_request,
            raw_response,
            error_message,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Raw payloads can hold customer addresses, so persisted copies drop
    /// them.
    pub fn clear_raw_payloads(&mut self) {
        self.raw_request.clear();
        self.raw_response.clear();
    }
}
