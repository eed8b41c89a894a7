use crate::error::{DreError, Result};
use crate::gateway::SourceKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Business-rule estimates used while deriving the statement.
///
/// None of these are confirmed accounting policy. They approximate figures the
/// source systems do not record (parts actually sold, their cost, the tax charge)
/// and are kept here so callers can replace them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EstimatePolicy {
    #[schemars(
        description = "Estimated share of the standing parts inventory sold per month (0.0 - 1.0). Parts revenue = stock_quantity * parts_sold_ratio * unit_price."
    )]
    pub parts_sold_ratio: f64,

    #[schemars(
        description = "Estimated cost of a part as a share of its unit price (0.0 - 1.0). Parts cost = parts revenue * parts_cost_ratio."
    )]
    pub parts_cost_ratio: f64,

    #[schemars(
        description = "Flat income tax estimate applied to the pre-tax result (0.0 - 1.0)."
    )]
    pub income_tax_rate: f64,

    #[schemars(
        description = "Proposal statuses counted as accepted revenue. Compared case-insensitively."
    )]
    pub accepted_proposal_statuses: Vec<String>,
}

impl Default for EstimatePolicy {
    fn default() -> Self {
        Self {
            parts_sold_ratio: 0.10,
            parts_cost_ratio: 0.70,
            income_tax_rate: 0.15,
            accepted_proposal_statuses: vec!["aceita".to_string(), "accepted".to_string()],
        }
    }
}

impl EstimatePolicy {
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("parts_sold_ratio", self.parts_sold_ratio),
            ("parts_cost_ratio", self.parts_cost_ratio),
            ("income_tax_rate", self.income_tax_rate),
        ];

        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(DreError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// REST table name for each source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceTables {
    pub sales: String,
    pub ledger: String,
    pub service_orders: String,
    pub parts: String,
    pub proposals: String,
}

impl Default for SourceTables {
    fn default() -> Self {
        Self {
            sales: "vehicle_sales".to_string(),
            ledger: "transactions".to_string(),
            service_orders: "service_orders".to_string(),
            parts: "parts".to_string(),
            proposals: "proposals".to_string(),
        }
    }
}

impl SourceTables {
    pub fn table_for(&self, source: SourceKind) -> &str {
        match source {
            SourceKind::Sales => &self.sales,
            SourceKind::Ledger => &self.ledger,
            SourceKind::ServiceOrders => &self.service_orders,
            SourceKind::Parts => &self.parts,
            SourceKind::Proposals => &self.proposals,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GatewayConfig {
    #[schemars(description = "Base URL of the hosted database, e.g. https://project.supabase.co")]
    pub base_url: String,

    #[schemars(description = "Public API key sent in the `apikey` header")]
    pub api_key: String,

    #[serde(default = "default_timeout_secs")]
    #[schemars(description = "Per-request timeout in seconds. Defaults to 30.")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub tables: SourceTables,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DreConfig {
    #[serde(default)]
    pub estimates: EstimatePolicy,

    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
}

impl DreConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DreConfig = serde_json::from_str(json)?;
        config.estimates.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DreConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
