use crate::error::{DreError, Result};
use crate::records::{
    decode_rows, LedgerRecord, PartRecord, ProposalRecord, SaleRecord, ServiceOrderRecord,
};
use async_trait::async_trait;
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The five independent business sources a statement is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Sales,
    Ledger,
    ServiceOrders,
    Parts,
    Proposals,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Sales,
        SourceKind::Ledger,
        SourceKind::ServiceOrders,
        SourceKind::Parts,
        SourceKind::Proposals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Sales => "sales",
            SourceKind::Ledger => "ledger",
            SourceKind::ServiceOrders => "service_orders",
            SourceKind::Parts => "parts",
            SourceKind::Proposals => "proposals",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the raw rows of each source.
///
/// Implementations own transport, authentication and timeouts. The engine only
/// relies on each call being independent of the others.
#[async_trait]
pub trait SourceGateway: Send + Sync {
    async fn fetch(&self, source: SourceKind) -> Result<Vec<Value>>;
}

/// Decoded rows of every source, captured once per computation.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub sales: Vec<SaleRecord>,
    pub ledger: Vec<LedgerRecord>,
    pub service_orders: Vec<ServiceOrderRecord>,
    pub parts: Vec<PartRecord>,
    pub proposals: Vec<ProposalRecord>,
    /// Sources whose fetch failed and were treated as empty.
    pub unavailable: Vec<SourceKind>,
}

/// Issues all five fetches concurrently and waits for every one of them to settle.
///
/// A failed source is logged and contributes no rows; it never aborts the others.
pub async fn fetch_all<G>(gateway: &G) -> SourceSnapshot
where
    G: SourceGateway + ?Sized,
{
    let (sales, ledger, service_orders, parts, proposals) = futures::join!(
        gateway.fetch(SourceKind::Sales),
        gateway.fetch(SourceKind::Ledger),
        gateway.fetch(SourceKind::ServiceOrders),
        gateway.fetch(SourceKind::Parts),
        gateway.fetch(SourceKind::Proposals),
    );

    let mut unavailable = Vec::new();

    SourceSnapshot {
        sales: decode_rows(settle(SourceKind::Sales, sales, &mut unavailable)),
        ledger: decode_rows(settle(SourceKind::Ledger, ledger, &mut unavailable)),
        service_orders: decode_rows(settle(
            SourceKind::ServiceOrders,
            service_orders,
            &mut unavailable,
        )),
        parts: decode_rows(settle(SourceKind::Parts, parts, &mut unavailable)),
        proposals: decode_rows(settle(SourceKind::Proposals, proposals, &mut unavailable)),
        unavailable,
    }
}

fn settle(
    source: SourceKind,
    outcome: Result<Vec<Value>>,
    unavailable: &mut Vec<SourceKind>,
) -> Vec<Value> {
    match outcome {
        Ok(rows) => {
            debug!("Fetched {} rows from {}", rows.len(), source);
            rows
        }
        Err(e) => {
            warn!("Source {} failed, continuing without it: {}", source, e);
            unavailable.push(source);
            Vec::new()
        }
    }
}

/// In-memory gateway holding fixed rows per source, or a forced failure.
#[derive(Debug, Clone, Default)]
pub struct StaticGateway {
    rows: HashMap<SourceKind, Vec<Value>>,
    failures: HashMap<SourceKind, String>,
}

impl StaticGateway {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(mut self, source: SourceKind, rows: Vec<Value>) -> Self {
        self.failures.remove(&source);
        self.rows.insert(source, rows);
        self
    }

    #[must_use]
    pub fn with_failure(mut self, source: SourceKind, reason: impl Into<String>) -> Self {
        self.rows.remove(&source);
        self.failures.insert(source, reason.into());
        self
    }

    /// Builds a gateway from a JSON object keyed by source name
    /// (`sales`, `ledger`, `service_orders`, `parts`, `proposals`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: HashMap<SourceKind, Vec<Value>> = serde_json::from_str(json)?;
        Ok(Self {
            rows: parsed,
            failures: HashMap::new(),
        })
    }
}

#[async_trait]
impl SourceGateway for StaticGateway {
    async fn fetch(&self, source: SourceKind) -> Result<Vec<Value>> {
        if let Some(reason) = self.failures.get(&source) {
            return Err(DreError::SourceUnavailable {
                kind: source,
                reason: reason.clone(),
            });
        }

        Ok(self.rows.get(&source).cloned().unwrap_or_default())
    }
}
