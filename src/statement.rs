use crate::aggregate::{ExpenseBreakdown, RevenueBreakdown};
use crate::config::EstimatePolicy;
use crate::gateway::SourceKind;
use crate::period::PeriodWindow;
use crate::schema::{
    percent_of, positive_zero, round_currency, LineItem, LineKind, StatementResult,
};

pub const GROSS_REVENUE: &str = "Receita Bruta";
pub const COST_OF_GOODS: &str = "(-) Custo dos Produtos/Serviços";
pub const GROSS_PROFIT: &str = "(=) Lucro Bruto";
pub const OPERATING_EXPENSES: &str = "(-) Despesas Operacionais";
pub const OPERATING_RESULT: &str = "(=) Resultado Operacional";
pub const FINANCIAL_EXPENSES: &str = "(-) Despesas Financeiras";
pub const FINANCIAL_REVENUE: &str = "(+) Receitas Financeiras";
pub const PRE_TAX_RESULT: &str = "(=) Resultado Antes do IR";
pub const INCOME_TAX: &str = "(-) Imposto de Renda";
pub const NET_RESULT: &str = "(=) Resultado Líquido";

/// The cascade from gross revenue down to net result, derived from totals only.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCascade {
    pub gross_revenue: f64,
    pub cost_of_goods: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub operating_result: f64,
    pub financial_expenses: f64,
    pub financial_revenue: f64,
    pub pre_tax_result: f64,
    pub income_tax: f64,
    pub net_result: f64,
}

impl ResultCascade {
    pub fn compute(
        total_revenue: f64,
        total_expense: f64,
        parts_cost: f64,
        policy: &EstimatePolicy,
    ) -> Self {
        let operating_result = total_revenue - total_expense;
        // no financial income/expense source exists yet
        let financial_expenses = 0.0;
        let financial_revenue = 0.0;
        let pre_tax_result = operating_result - financial_expenses + financial_revenue;

        Self {
            gross_revenue: total_revenue,
            cost_of_goods: parts_cost,
            gross_profit: total_revenue - parts_cost,
            operating_expenses: total_expense - parts_cost,
            operating_result,
            financial_expenses,
            financial_revenue,
            pre_tax_result,
            income_tax: pre_tax_result * policy.income_tax_rate,
            net_result: pre_tax_result * (1.0 - policy.income_tax_rate),
        }
    }

    /// Rounds to cents so every subtotal equals the rows above it.
    ///
    /// Inputs and the net result are rounded directly; subtotals and the income
    /// tax are derived from the rounded values.
    pub fn footed(&self) -> Self {
        let gross_revenue = round_currency(self.gross_revenue);
        let cost_of_goods = round_currency(self.cost_of_goods);
        let gross_profit = round_currency(gross_revenue - cost_of_goods);
        let operating_expenses = round_currency(self.operating_expenses);
        let operating_result = round_currency(gross_profit - operating_expenses);
        let financial_expenses = round_currency(self.financial_expenses);
        let financial_revenue = round_currency(self.financial_revenue);
        let pre_tax_result =
            round_currency(operating_result - financial_expenses + financial_revenue);
        let net_result = round_currency(self.net_result);

        Self {
            gross_revenue,
            cost_of_goods,
            gross_profit,
            operating_expenses,
            operating_result,
            financial_expenses,
            financial_revenue,
            pre_tax_result,
            income_tax: round_currency(pre_tax_result - net_result),
            net_result,
        }
    }

    /// The ten result rows in their fixed presentation order, footed to cents.
    pub fn lines(&self) -> Vec<LineItem> {
        let shown = self.footed();
        let total = self.gross_revenue;
        [
            (GROSS_REVENUE, shown.gross_revenue),
            (COST_OF_GOODS, shown.cost_of_goods),
            (GROSS_PROFIT, shown.gross_profit),
            (OPERATING_EXPENSES, shown.operating_expenses),
            (OPERATING_RESULT, shown.operating_result),
            (FINANCIAL_EXPENSES, shown.financial_expenses),
            (FINANCIAL_REVENUE, shown.financial_revenue),
            (PRE_TAX_RESULT, shown.pre_tax_result),
            (INCOME_TAX, shown.income_tax),
            (NET_RESULT, shown.net_result),
        ]
        .into_iter()
        .map(|(description, value)| LineItem::new(description, value, LineKind::Result, total))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub gross: f64,
    pub net: f64,
}

impl Margins {
    pub fn compute(total_revenue: f64, parts_cost: f64, net_result: f64) -> Self {
        Self {
            gross: round_currency(percent_of(total_revenue - parts_cost, total_revenue)),
            net: round_currency(percent_of(net_result, total_revenue)),
        }
    }
}

/// Composes aggregated revenue and expenses into a finished statement.
pub fn build_statement(
    window: &PeriodWindow,
    revenue: &RevenueBreakdown,
    expenses: &ExpenseBreakdown,
    policy: &EstimatePolicy,
    unavailable_sources: Vec<SourceKind>,
) -> StatementResult {
    let total_revenue = positive_zero(revenue.total());
    let total_expense = positive_zero(expenses.total());
    let parts_cost = positive_zero(expenses.parts_cost);
    let cascade = ResultCascade::compute(total_revenue, total_expense, parts_cost, policy);
    let shown = cascade.footed();
    let net_result = shown.net_result;
    let margins = Margins::compute(total_revenue, parts_cost, net_result);

    StatementResult {
        period: window.token(),
        period_label: window.label().to_string(),
        revenue_lines: revenue.lines(),
        expense_lines: expenses.lines(total_revenue),
        result_lines: cascade.lines(),
        total_revenue,
        total_expense,
        parts_cost,
        income_tax: shown.income_tax,
        net_result,
        gross_margin: margins.gross,
        net_margin: margins.net,
        unavailable_sources,
    }
}
