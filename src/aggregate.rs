//! Revenue and expense aggregation for a single month.
//!
//! Sales, workshop orders, proposals and ledger entries are restricted to the
//! period window. Parts are an exception: the parts figures are estimated from
//! the standing inventory (every part record, whatever its creation date), using
//! the ratios in [`EstimatePolicy`].

use crate::config::EstimatePolicy;
use crate::filter::filter_to_period;
use crate::gateway::SourceSnapshot;
use crate::period::PeriodWindow;
use crate::records::{LedgerKind, PartRecord};
use crate::schema::{LineItem, LineKind};

pub const VEHICLE_SALES: &str = "Vendas de Veículos";
pub const COMMISSIONS: &str = "Comissões";
pub const PARTS_REVENUE: &str = "Venda de Peças";
pub const WORKSHOP_SERVICES: &str = "Serviços de Oficina";
pub const ACCEPTED_PROPOSALS: &str = "Propostas Aceitas";
pub const OTHER_REVENUE: &str = "Outras Receitas";
pub const PARTS_COST: &str = "Custo das Peças Vendidas";
pub const UNDESCRIBED_EXPENSE: &str = "Despesa sem descrição";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueBreakdown {
    pub vehicle_sales: f64,
    pub commissions: f64,
    pub parts: f64,
    pub workshop_services: f64,
    pub accepted_proposals: f64,
    pub other_revenue: f64,
}

impl RevenueBreakdown {
    pub fn total(&self) -> f64 {
        self.categories().iter().map(|(_, value)| value).sum()
    }

    fn categories(&self) -> [(&'static str, f64); 6] {
        [
            (VEHICLE_SALES, self.vehicle_sales),
            (COMMISSIONS, self.commissions),
            (PARTS_REVENUE, self.parts),
            (WORKSHOP_SERVICES, self.workshop_services),
            (ACCEPTED_PROPOSALS, self.accepted_proposals),
            (OTHER_REVENUE, self.other_revenue),
        ]
    }

    /// One line per category, in fixed order, including empty categories.
    pub fn lines(&self) -> Vec<LineItem> {
        let total = self.total();
        self.categories()
            .into_iter()
            .map(|(description, value)| LineItem::new(description, value, LineKind::Revenue, total))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManualExpense {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseBreakdown {
    /// Ledger expenses of the month, one entry per transaction.
    pub manual: Vec<ManualExpense>,
    pub parts_cost: f64,
}

impl ExpenseBreakdown {
    pub fn manual_total(&self) -> f64 {
        self.manual.iter().map(|e| e.amount).sum()
    }

    pub fn total(&self) -> f64 {
        self.manual_total() + self.parts_cost
    }

    /// Manual expenses in ledger order, followed by the parts cost line.
    pub fn lines(&self, total_revenue: f64) -> Vec<LineItem> {
        self.manual
            .iter()
            .map(|e| LineItem::new(e.description.clone(), e.amount, LineKind::Expense, total_revenue))
            .chain(std::iter::once(LineItem::new(
                PARTS_COST,
                self.parts_cost,
                LineKind::Expense,
                total_revenue,
            )))
            .collect()
    }
}

pub fn aggregate_revenue(
    snapshot: &SourceSnapshot,
    window: &PeriodWindow,
    policy: &EstimatePolicy,
) -> RevenueBreakdown {
    let sales = filter_to_period(&snapshot.sales, window);
    let service_orders = filter_to_period(&snapshot.service_orders, window);
    let proposals = filter_to_period(&snapshot.proposals, window);
    let ledger = filter_to_period(&snapshot.ledger, window);

    RevenueBreakdown {
        vehicle_sales: sales.iter().map(|s| s.sale_price).sum(),
        commissions: sales.iter().map(|s| s.commission).sum(),
        parts: estimated_parts_revenue(&snapshot.parts, policy),
        workshop_services: service_orders.iter().map(|o| o.total_amount).sum(),
        accepted_proposals: proposals
            .iter()
            .filter(|p| p.has_status_in(&policy.accepted_proposal_statuses))
            .map(|p| p.vehicle_price)
            .sum(),
        other_revenue: ledger
            .iter()
            .filter(|t| t.kind == LedgerKind::Revenue)
            .map(|t| t.amount)
            .sum(),
    }
}

pub fn aggregate_expenses(
    snapshot: &SourceSnapshot,
    window: &PeriodWindow,
    policy: &EstimatePolicy,
) -> ExpenseBreakdown {
    let manual = filter_to_period(&snapshot.ledger, window)
        .into_iter()
        .filter(|t| t.kind == LedgerKind::Expense)
        .map(|t| ManualExpense {
            description: t
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(UNDESCRIBED_EXPENSE)
                .to_string(),
            amount: t.amount,
        })
        .collect();

    ExpenseBreakdown {
        manual,
        parts_cost: estimated_parts_revenue(&snapshot.parts, policy) * policy.parts_cost_ratio,
    }
}

fn estimated_parts_revenue(parts: &[PartRecord], policy: &EstimatePolicy) -> f64 {
    parts
        .iter()
        .map(|p| p.stock_quantity * policy.parts_sold_ratio * p.unit_price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::resolve_period;
    use crate::records::{LedgerRecord, ProposalRecord, SaleRecord, ServiceOrderRecord};

    fn snapshot() -> SourceSnapshot {
        SourceSnapshot {
            sales: vec![
                SaleRecord {
                    sale_price: 80_000.0,
                    commission: 2_000.0,
                    sale_date: Some("2025-09-10".to_string()),
                },
                SaleRecord {
                    sale_price: 50_000.0,
                    commission: 1_000.0,
                    sale_date: Some("2025-10-01".to_string()),
                },
            ],
            ledger: vec![
                LedgerRecord {
                    amount: 500.0,
                    kind: LedgerKind::Revenue,
                    transaction_date: Some("2025-09-03".to_string()),
                    description: Some("Rendimento".to_string()),
                },
                LedgerRecord {
                    amount: 3_000.0,
                    kind: LedgerKind::Expense,
                    transaction_date: Some("2025-09-05".to_string()),
                    description: Some("Aluguel".to_string()),
                },
                LedgerRecord {
                    amount: 3_000.0,
                    kind: LedgerKind::Expense,
                    transaction_date: Some("2025-09-20".to_string()),
                    description: Some("Aluguel".to_string()),
                },
                LedgerRecord {
                    amount: 200.0,
                    kind: LedgerKind::Expense,
                    transaction_date: Some("2025-09-21".to_string()),
                    description: None,
                },
                LedgerRecord {
                    amount: 999.0,
                    kind: LedgerKind::Expense,
                    transaction_date: Some("2025-08-31".to_string()),
                    description: Some("Mês anterior".to_string()),
                },
            ],
            service_orders: vec![ServiceOrderRecord {
                total_amount: 1_200.0,
                start_date: Some("2025-09-12T09:00:00".to_string()),
            }],
            parts: vec![PartRecord {
                stock_quantity: 10.0,
                unit_price: 100.0,
                created_at: Some("2020-01-01".to_string()),
            }],
            proposals: vec![
                ProposalRecord {
                    vehicle_price: 70_000.0,
                    proposal_date: Some("2025-09-15".to_string()),
                    status: Some("aceita".to_string()),
                },
                ProposalRecord {
                    vehicle_price: 90_000.0,
                    proposal_date: Some("2025-09-16".to_string()),
                    status: Some("pendente".to_string()),
                },
            ],
            unavailable: vec![],
        }
    }

    #[test]
    fn test_revenue_categories() {
        let window = resolve_period("2025-09").unwrap();
        let revenue = aggregate_revenue(&snapshot(), &window, &EstimatePolicy::default());

        assert_eq!(revenue.vehicle_sales, 80_000.0);
        assert_eq!(revenue.commissions, 2_000.0);
        assert!((revenue.parts - 100.0).abs() < 1e-9);
        assert_eq!(revenue.workshop_services, 1_200.0);
        assert_eq!(revenue.accepted_proposals, 70_000.0);
        assert_eq!(revenue.other_revenue, 500.0);
        assert!((revenue.total() - 153_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_revenue_lines_sum_to_total_and_hundred_percent() {
        let window = resolve_period("2025-09").unwrap();
        let revenue = aggregate_revenue(&snapshot(), &window, &EstimatePolicy::default());
        let lines = revenue.lines();

        assert_eq!(lines.len(), 6);
        let value_sum: f64 = lines.iter().map(|l| l.value).sum();
        let pct_sum: f64 = lines.iter().map(|l| l.percentage).sum();
        assert!((value_sum - revenue.total()).abs() < 1e-6);
        assert!((pct_sum - 100.0).abs() < 1e-9);
        assert!(lines.iter().all(|l| l.kind == LineKind::Revenue));
    }

    #[test]
    fn test_expenses_keep_each_transaction() {
        let window = resolve_period("2025-09").unwrap();
        let expenses = aggregate_expenses(&snapshot(), &window, &EstimatePolicy::default());

        assert_eq!(expenses.manual.len(), 3);
        assert_eq!(expenses.manual[0].description, "Aluguel");
        assert_eq!(expenses.manual[1].description, "Aluguel");
        assert_eq!(expenses.manual[2].description, UNDESCRIBED_EXPENSE);
        assert!((expenses.parts_cost - 70.0).abs() < 1e-9);
        assert!((expenses.total() - 6_270.0).abs() < 1e-9);

        let lines = expenses.lines(0.0);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].description, PARTS_COST);
        assert!(lines.iter().all(|l| l.percentage == 0.0));
    }

    #[test]
    fn test_parts_ignore_period() {
        let window = resolve_period("1999-01").unwrap();
        let revenue = aggregate_revenue(&snapshot(), &window, &EstimatePolicy::default());

        assert_eq!(revenue.vehicle_sales, 0.0);
        assert!((revenue.parts - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_policy() {
        let window = resolve_period("2025-09").unwrap();
        let policy = EstimatePolicy {
            parts_sold_ratio: 0.5,
            parts_cost_ratio: 0.5,
            accepted_proposal_statuses: vec!["pendente".to_string()],
            ..EstimatePolicy::default()
        };

        let revenue = aggregate_revenue(&snapshot(), &window, &policy);
        let expenses = aggregate_expenses(&snapshot(), &window, &policy);

        assert!((revenue.parts - 500.0).abs() < 1e-9);
        assert_eq!(revenue.accepted_proposals, 90_000.0);
        assert!((expenses.parts_cost - 250.0).abs() < 1e-9);
    }
}
