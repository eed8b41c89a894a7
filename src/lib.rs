//! # DRE Statement Builder
//!
//! Derives the monthly income statement (DRE, *Demonstração do Resultado do
//! Exercício*) of a vehicle dealership from five unrelated business sources:
//! vehicle sales, ledger transactions, workshop service orders, parts inventory
//! and proposals.
//!
//! ## Pipeline
//!
//! - **Period**: a `YYYY-MM` token becomes a half-open [`PeriodWindow`]
//! - **Sources**: the five sources are fetched concurrently through a [`SourceGateway`];
//!   a failing source counts as empty instead of aborting the statement
//! - **Filter**: each record is kept when its date falls inside the window
//! - **Aggregate**: revenue categories, individual ledger expenses and estimated parts cost
//! - **Statement**: the fixed ten-row cascade from gross revenue to net result, plus margins
//! - **Export**: a sectioned CSV document
//!
//! ## Example
//!
//! ```rust,ignore
//! use dre_statement_builder::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let gateway = StaticGateway::new().with_rows(
//!     SourceKind::Sales,
//!     vec![json!({ "sale_price": 1000, "commission": 0, "sale_date": "2025-09-12" })],
//! );
//!
//! let engine = StatementEngine::new(Arc::new(gateway), EstimatePolicy::default())?;
//! let statement = engine.compute("2025-09").await?;
//! assert_eq!(statement.net_result, 850.0);
//!
//! let csv = to_csv_string(&statement)?;
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod gateway;
pub mod period;
pub mod records;
pub mod schema;
pub mod session;
pub mod statement;

#[cfg(feature = "http")]
pub mod http;

pub use aggregate::{aggregate_expenses, aggregate_revenue, ExpenseBreakdown, RevenueBreakdown};
pub use config::{DreConfig, EstimatePolicy, GatewayConfig, SourceTables};
pub use engine::{statement_from_snapshot, StatementEngine};
pub use error::{DreError, Result};
pub use export::{export_file_name, export_to_dir, to_csv_string, write_csv};
pub use filter::{filter_to_period, parse_record_date};
pub use gateway::{fetch_all, SourceGateway, SourceKind, SourceSnapshot, StaticGateway};
pub use period::{resolve_period, resolve_year, PeriodWindow};
pub use records::*;
pub use schema::*;
pub use session::{RequestOutcome, StatementSession};
pub use statement::{build_statement, Margins, ResultCascade};

#[cfg(feature = "http")]
pub use http::RestSourceGateway;

use std::sync::Arc;

/// One-shot computation with the default estimate policy.
pub async fn compute_statement(
    gateway: Arc<dyn SourceGateway>,
    period: &str,
) -> Result<StatementResult> {
    StatementEngine::new(gateway, EstimatePolicy::default())?
        .compute(period)
        .await
}
