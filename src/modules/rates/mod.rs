pub mod client;
pub mod nexus;
pub mod rate_registry;
pub mod tax_details;

pub use client::{HttpTaxClient, TaxClient};
pub use nexus::{fetch_nexus_regions, Nexus, NexusRegion};
pub use rate_registry::{PersistedRate, RateRegistry};
pub use tax_details::{TaxDetailLineItem, TaxDetails};
