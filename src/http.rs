use crate::config::{GatewayConfig, SourceTables};
use crate::error::{DreError, Result};
use crate::gateway::{SourceGateway, SourceKind};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Reads source tables from a PostgREST-style hosted database.
///
/// The bearer token is handed in by the caller; this type never looks up
/// session state on its own.
#[derive(Clone)]
pub struct RestSourceGateway {
    client: Client,
    base_url: String,
    api_key: String,
    bearer_token: Option<String>,
    tables: SourceTables,
}

impl RestSourceGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            bearer_token: None,
            tables: config.tables.clone(),
        })
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn table_url(&self, source: SourceKind) -> String {
        format!(
            "{}/rest/v1/{}?select=*",
            self.base_url,
            self.tables.table_for(source)
        )
    }
}

#[async_trait]
impl SourceGateway for RestSourceGateway {
    async fn fetch(&self, source: SourceKind) -> Result<Vec<Value>> {
        let url = self.table_url(source);
        debug!("GET {}", url);

        let token = self.bearer_token.as_deref().unwrap_or(&self.api_key);
        let res = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let error_text = res.text().await.unwrap_or_default();
            return Err(DreError::SourceUnavailable {
                kind: source,
                reason: format!("status {}: {}", status, error_text),
            });
        }

        let body: Value = res.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(DreError::SourceUnavailable {
                kind: source,
                reason: format!("expected a JSON array, got {}", json_type(&other)),
            }),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
