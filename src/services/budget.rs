use crate::date_utils::MonthKey;
use crate::models::{Budget, Category, Transaction};
use crate::services::analytics::format_cents;
use serde::{Deserialize, Serialize};

/// Budgeted against actual spend for one category in the viewed month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetComparison {
    pub category: Category,
    pub budget_cents: i64,
    pub actual_cents: i64,
}

impl BudgetComparison {
    pub fn budget_display(&self) -> String {
        format_cents(self.budget_cents)
    }

    pub fn actual_display(&self) -> String {
        format_cents(self.actual_cents)
    }
}

/// Join the budgets of `month` with the spending recorded in that month.
///
/// One row per budget, in budget order. Spending in categories without a
/// budget is not reported here. Rows where both sides are zero are dropped.
pub fn build_comparison(
    transactions: &[Transaction],
    budgets: &[Budget],
    month: MonthKey,
) -> Vec<BudgetComparison> {
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .collect();

    budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|budget| BudgetComparison {
            category: budget.category,
            budget_cents: budget.amount_cents,
            actual_cents: in_month
                .iter()
                .filter(|t| t.category == budget.category)
                .map(|t| t.amount_cents)
                .sum(),
        })
        .filter(|row| row.budget_cents > 0 || row.actual_cents > 0)
        .collect()
}
