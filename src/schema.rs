use crate::gateway::SourceKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Revenue,
    Expense,
    Result,
}

/// One labelled row of the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    pub description: String,
    pub value: f64,
    #[schemars(description = "Share of total revenue, in percent. Zero when there is no revenue.")]
    pub percentage: f64,
    pub kind: LineKind,
}

impl LineItem {
    pub fn new(description: impl Into<String>, value: f64, kind: LineKind, total_revenue: f64) -> Self {
        Self {
            description: description.into(),
            value: positive_zero(value),
            percentage: positive_zero(percent_of(value, total_revenue)),
            kind,
        }
    }
}

/// `value / total * 100`, or `0.0` when there is nothing to compare against.
pub fn percent_of(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Maps `-0.0` to `0.0` so empty sums never render as "-0.00".
pub fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

pub fn round_currency(value: f64) -> f64 {
    positive_zero((value * 100.0).round() / 100.0)
}

/// A finished income statement for one month.
///
/// Built fresh for every request and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatementResult {
    /// `YYYY-MM` token of the month.
    pub period: String,
    /// Human readable month label, e.g. "Setembro de 2025".
    pub period_label: String,
    pub revenue_lines: Vec<LineItem>,
    pub expense_lines: Vec<LineItem>,
    pub result_lines: Vec<LineItem>,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub parts_cost: f64,
    pub income_tax: f64,
    pub net_result: f64,
    pub gross_margin: f64,
    pub net_margin: f64,
    /// Sources that failed to load; their contribution is zero.
    #[serde(default)]
    pub unavailable_sources: Vec<SourceKind>,
}

impl StatementResult {
    pub fn gross_profit(&self) -> f64 {
        round_currency(self.total_revenue - self.parts_cost)
    }

    pub fn operating_result(&self) -> f64 {
        round_currency(self.total_revenue - self.total_expense)
    }

    pub fn is_partial(&self) -> bool {
        !self.unavailable_sources.is_empty()
    }

    pub fn all_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.revenue_lines
            .iter()
            .chain(self.expense_lines.iter())
            .chain(self.result_lines.iter())
    }
}

/// One month of the yearly evolution rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyEvolution {
    pub period: String,
    pub label: String,
    pub total_revenue: f64,
    pub total_expense: f64,
    pub net_result: f64,
}

impl From<&StatementResult> for MonthlyEvolution {
    fn from(statement: &StatementResult) -> Self {
        Self {
            period: statement.period.clone(),
            label: statement.period_label.clone(),
            total_revenue: statement.total_revenue,
            total_expense: statement.total_expense,
            net_result: statement.net_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_never_divides_by_zero() {
        assert_eq!(percent_of(500.0, 0.0), 0.0);
        assert_eq!(percent_of(-500.0, 0.0), 0.0);
        assert_eq!(percent_of(250.0, 1000.0), 25.0);
    }

    #[test]
    fn test_empty_sum_renders_as_zero() {
        let empty: f64 = Vec::<f64>::new().iter().sum();
        let line = LineItem::new("Outras Receitas", empty, LineKind::Revenue, 100.0);
        assert_eq!(format!("{:.2}", line.value), "0.00");
        assert_eq!(format!("{:.2}", line.percentage), "0.00");
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(849.999), 850.0);
        assert_eq!(round_currency(12.344), 12.34);
        assert_eq!(round_currency(-0.001), 0.0);
        assert!(round_currency(-0.001).is_sign_positive());
    }

    #[test]
    fn test_serialization() {
        let statement = StatementResult {
            period: "2025-09".to_string(),
            period_label: "Setembro de 2025".to_string(),
            revenue_lines: vec![LineItem::new("Vendas de Veículos", 1000.0, LineKind::Revenue, 1000.0)],
            expense_lines: vec![],
            result_lines: vec![],
            total_revenue: 1000.0,
            total_expense: 0.0,
            parts_cost: 0.0,
            income_tax: 150.0,
            net_result: 850.0,
            gross_margin: 100.0,
            net_margin: 85.0,
            unavailable_sources: vec![SourceKind::Parts],
        };

        let json = serde_json::to_string_pretty(&statement).unwrap();
        assert!(json.contains("Setembro de 2025"));
        assert!(json.contains("\"parts\""));

        let deserialized: StatementResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, statement);
        assert!(deserialized.is_partial());
    }
}
