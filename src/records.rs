//! Typed views of the rows returned by each business source.
//!
//! Only the fields the statement depends on are decoded. Hosted databases are
//! loose about numeric columns (numbers arrive as JSON numbers, numeric strings
//! or null), so amounts are decoded leniently and default to zero. Date columns
//! are kept as raw strings and parsed once, by the period filter.

use crate::gateway::SourceKind;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A record that carries exactly one date used for period filtering.
pub trait DatedRecord {
    const SOURCE: SourceKind;

    fn date_field(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub sale_price: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub commission: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sale_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Revenue,
    Expense,
    #[default]
    Unknown,
}

impl LedgerKind {
    fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "receita" | "revenue" => LedgerKind::Revenue,
            "despesa" | "expense" => LedgerKind::Expense,
            _ => LedgerKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "type", default, deserialize_with = "lenient_ledger_kind")]
    pub kind: LedgerKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub transaction_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub stock_quantity: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub vehicle_price: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub proposal_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

impl ProposalRecord {
    pub fn has_status_in(&self, accepted: &[String]) -> bool {
        match self.status.as_deref() {
            Some(status) => accepted
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(status.trim())),
            None => false,
        }
    }
}

impl DatedRecord for SaleRecord {
    const SOURCE: SourceKind = SourceKind::Sales;

    fn date_field(&self) -> Option<&str> {
        self.sale_date.as_deref()
    }
}

impl DatedRecord for LedgerRecord {
    const SOURCE: SourceKind = SourceKind::Ledger;

    fn date_field(&self) -> Option<&str> {
        self.transaction_date.as_deref()
    }
}

impl DatedRecord for ServiceOrderRecord {
    const SOURCE: SourceKind = SourceKind::ServiceOrders;

    fn date_field(&self) -> Option<&str> {
        self.start_date.as_deref()
    }
}

impl DatedRecord for PartRecord {
    const SOURCE: SourceKind = SourceKind::Parts;

    fn date_field(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl DatedRecord for ProposalRecord {
    const SOURCE: SourceKind = SourceKind::Proposals;

    fn date_field(&self) -> Option<&str> {
        self.proposal_date.as_deref()
    }
}

/// Decodes raw rows one by one; a row that does not decode is dropped, the rest survive.
pub fn decode_rows<T>(rows: Vec<Value>) -> Vec<T>
where
    T: DatedRecord + DeserializeOwned,
{
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Dropping undecodable {} row: {}", T::SOURCE, e);
                None
            }
        })
        .collect();

    if decoded.len() != total {
        debug!(
            "Decoded {} of {} {} rows",
            decoded.len(),
            total,
            T::SOURCE
        );
    }

    decoded
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    Ok(if amount.is_finite() { amount } else { 0.0 })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_ledger_kind<'de, D>(deserializer: D) -> std::result::Result<LedgerKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?
        .map(|raw| LedgerKind::from_raw(&raw))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amounts_accept_numbers_strings_and_null() {
        let sale: SaleRecord = serde_json::from_value(json!({
            "sale_price": "45000.50",
            "commission": null,
            "sale_date": "2025-09-10"
        }))
        .unwrap();

        assert!((sale.sale_price - 45000.5).abs() < 1e-9);
        assert_eq!(sale.commission, 0.0);
        assert_eq!(sale.sale_date.as_deref(), Some("2025-09-10"));

        let part: PartRecord = serde_json::from_value(json!({
            "stock_quantity": 12,
            "unit_price": "abc"
        }))
        .unwrap();
        assert_eq!(part.stock_quantity, 12.0);
        assert_eq!(part.unit_price, 0.0);
        assert!(part.created_at.is_none());
    }

    #[test]
    fn test_ledger_kind_mapping() {
        let revenue: LedgerRecord = serde_json::from_value(json!({
            "amount": 100, "type": "Receita", "transaction_date": "2025-01-02"
        }))
        .unwrap();
        let expense: LedgerRecord = serde_json::from_value(json!({
            "amount": 50, "type": "despesa", "description": "Aluguel"
        }))
        .unwrap();
        let other: LedgerRecord =
            serde_json::from_value(json!({ "amount": 5, "type": "transferencia" })).unwrap();
        let missing: LedgerRecord = serde_json::from_value(json!({ "amount": 5 })).unwrap();

        assert_eq!(revenue.kind, LedgerKind::Revenue);
        assert_eq!(expense.kind, LedgerKind::Expense);
        assert_eq!(expense.description.as_deref(), Some("Aluguel"));
        assert_eq!(other.kind, LedgerKind::Unknown);
        assert_eq!(missing.kind, LedgerKind::Unknown);
    }

    #[test]
    fn test_decode_rows_drops_only_bad_rows() {
        let rows = vec![
            json!({ "total_amount": 300, "start_date": "2025-09-01" }),
            json!("not an object"),
            json!({ "total_amount": "150", "start_date": "2025-09-02" }),
        ];

        let orders: Vec<ServiceOrderRecord> = decode_rows(rows);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].total_amount, 150.0);
    }

    #[test]
    fn test_proposal_status_match_is_case_insensitive() {
        let proposal = ProposalRecord {
            vehicle_price: 10.0,
            proposal_date: None,
            status: Some(" ACEITA ".to_string()),
        };
        let accepted = vec!["aceita".to_string()];
        assert!(proposal.has_status_in(&accepted));

        let pending = ProposalRecord {
            status: Some("pendente".to_string()),
            ..proposal
        };
        assert!(!pending.has_status_in(&accepted));
    }
}
