use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::nexus::NexusRegion;
use super::tax_details::TaxDetails;
use crate::config::Config;
use crate::core::error::{CalculationError, Result, StopReason};
use crate::modules::requests::TaxRequestBody;

/// Transport seam for rate lookups. Swapped for a canned implementation in
/// tests so calculations run without a live endpoint.
#[async_trait]
pub trait TaxClient: Send + Sync {
    /// Fetch tax details for one request body.
    async fn get_taxes(&self, body: &TaxRequestBody) -> Result<TaxDetails>;

    /// Fetch the regions where the merchant has nexus.
    async fn get_nexus_regions(&self) -> Result<Vec<NexusRegion>>;
}

/// Rate service client over HTTPS.
pub struct HttpTaxClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HttpTaxClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone(), config.api_token.clone())
    }
}

#[async_trait]
impl TaxClient for HttpTaxClient {
    async fn get_taxes(&self, body: &TaxRequestBody) -> Result<TaxDetails> {
        let url = format!("{}/v2/taxes", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body.to_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CalculationError::stop(
                StopReason::ApiResponseError,
                format!("Tax calculation request failed with code: {}", status.as_u16()),
            ));
        }

        let raw: Value = response.json().await?;
        TaxDetails::from_response(raw)
    }

    async fn get_nexus_regions(&self) -> Result<Vec<NexusRegion>> {
        let url = format!("{}/v2/nexus/regions", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CalculationError::stop(
                StopReason::ApiResponseError,
                format!("Nexus region request failed with code: {}", status.as_u16()),
            ));
        }

        #[derive(serde::Deserialize)]
        struct RegionsEnvelope {
            #[serde(default)]
            regions: Vec<NexusRegion>,
        }

        let envelope: RegionsEnvelope = response.json().await?;
        Ok(envelope.regions)
    }
}
