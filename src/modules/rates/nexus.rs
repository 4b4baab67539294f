use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::TaxClient;
use crate::config::StoreSettings;
use crate::core::{RateCache, Result};

/// One region where the merchant holds nexus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NexusRegion {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub region_code: String,
}

impl NexusRegion {
    pub fn new(country_code: impl Into<String>, region_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            region_code: region_code.into(),
        }
    }

    /// US nexus is state-granular; everywhere else the country decides.
    fn matches(&self, country: &str, state: &str) -> bool {
        if !self.country_code.eq_ignore_ascii_case(country) {
            return false;
        }
        if country.eq_ignore_ascii_case("US") {
            return self.region_code.eq_ignore_ascii_case(state);
        }
        true
    }
}

/// Nexus region list plus the store base location, which always counts as
/// a nexus area even when the fetched list omits it.
#[derive(Debug, Clone)]
pub struct Nexus {
    regions: Vec<NexusRegion>,
    base: NexusRegion,
}

impl Nexus {
    pub fn new(regions: Vec<NexusRegion>, store: &StoreSettings) -> Self {
        Self {
            regions,
            base: NexusRegion::new(store.country.clone(), store.state.clone()),
        }
    }

    /// An empty region list means the list could not be determined, so
    /// nexus is presumed everywhere rather than silently skipping tax.
    pub fn has_nexus_check(&self, country: &str, state: &str) -> bool {
        if self.regions.is_empty() {
            return true;
        }

        self.base.matches(country, state)
            || self
                .regions
                .iter()
                .any(|region| region.matches(country, state))
    }
}

/// Fetches the nexus region list, memoized in the rate cache so repeated
/// calculations in one session reuse one fetch. `force_refresh` bypasses a
/// stale entry after the merchant changes their registration.
pub async fn fetch_nexus_regions(
    client: &dyn TaxClient,
    cache: &RateCache,
    force_refresh: bool,
) -> Result<Vec<NexusRegion>> {
    let cache_key = json!("nexus_regions");

    if !force_refresh {
        if let Some(cached) = cache.read_hashed_value(&cache_key) {
            return Ok(serde_json::from_value(cached)?);
        }
    }

    let regions = client.get_nexus_regions().await?;
    cache.set_with_hashed_key(&cache_key, serde_json::to_value(&regions)?);
    Ok(regions)
}
