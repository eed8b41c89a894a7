use crate::aggregate::{aggregate_expenses, aggregate_revenue};
use crate::config::{DreConfig, EstimatePolicy};
use crate::error::Result;
use crate::gateway::{fetch_all, SourceGateway, SourceSnapshot};
use crate::period::{resolve_period, resolve_year, PeriodWindow};
use crate::schema::{MonthlyEvolution, StatementResult};
use crate::statement::build_statement;
use log::{debug, info};
use std::sync::Arc;

/// Derives the statement for one window from already-fetched records. No I/O.
pub fn statement_from_snapshot(
    snapshot: &SourceSnapshot,
    window: &PeriodWindow,
    policy: &EstimatePolicy,
) -> StatementResult {
    let revenue = aggregate_revenue(snapshot, window, policy);
    let expenses = aggregate_expenses(snapshot, window, policy);

    debug!(
        "{}: revenue {:?}, {} manual expenses, parts cost {:.2}",
        window.token(),
        revenue,
        expenses.manual.len(),
        expenses.parts_cost
    );

    build_statement(
        window,
        &revenue,
        &expenses,
        policy,
        snapshot.unavailable.clone(),
    )
}

/// Fetches the five sources through the injected gateway and derives statements.
#[derive(Clone)]
pub struct StatementEngine {
    gateway: Arc<dyn SourceGateway>,
    policy: EstimatePolicy,
}

impl StatementEngine {
    pub fn new(gateway: Arc<dyn SourceGateway>, policy: EstimatePolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { gateway, policy })
    }

    pub fn from_config(gateway: Arc<dyn SourceGateway>, config: &DreConfig) -> Result<Self> {
        Self::new(gateway, config.estimates.clone())
    }

    pub fn policy(&self) -> &EstimatePolicy {
        &self.policy
    }

    /// Computes the statement of a `YYYY-MM` month.
    ///
    /// Fails only on an invalid period; unavailable sources count as empty.
    pub async fn compute(&self, period: &str) -> Result<StatementResult> {
        let window = resolve_period(period)?;
        info!("Computing statement for {}", window.label());

        let snapshot = fetch_all(self.gateway.as_ref()).await;
        let statement = statement_from_snapshot(&snapshot, &window, &self.policy);

        info!(
            "Statement for {} ready: revenue {:.2}, expense {:.2}, net {:.2}{}",
            statement.period,
            statement.total_revenue,
            statement.total_expense,
            statement.net_result,
            if statement.is_partial() {
                " (partial)"
            } else {
                ""
            }
        );

        Ok(statement)
    }

    /// Month-by-month totals of a 4-digit year, fetched once and split per month.
    pub async fn compute_evolution(&self, year: &str) -> Result<Vec<MonthlyEvolution>> {
        let windows = resolve_year(year)?;
        info!("Computing monthly evolution for {}", year.trim());

        let snapshot = fetch_all(self.gateway.as_ref()).await;

        Ok(windows
            .iter()
            .map(|window| {
                MonthlyEvolution::from(&statement_from_snapshot(&snapshot, window, &self.policy))
            })
            .collect())
    }
}
