use crate::models::Category;
use crate::services::analytics::format_cents;
use crate::services::budget::BudgetComparison;
use serde::Serialize;

/// Share of a budget (in tenths) at which a category counts as nearing its limit.
const NEARING_LIMIT_TENTHS: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Spend exceeds the budget.
    OverBudget,
    /// Spend is at or above 90% of the budget without exceeding it.
    NearingLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: Category,
    /// Overage for `OverBudget`, remaining budget for `NearingLimit`.
    pub amount_cents: i64,
}

impl Insight {
    pub fn amount_display(&self) -> String {
        format_cents(self.amount_cents)
    }

    pub fn title(&self) -> String {
        match self.kind {
            InsightKind::OverBudget => format!("Over Budget in {}", self.category),
            InsightKind::NearingLimit => format!("Nearing Budget in {}", self.category),
        }
    }

    pub fn description(&self) -> String {
        match self.kind {
            InsightKind::OverBudget => format!(
                "You have spent ${} more than your budget.",
                self.amount_display()
            ),
            InsightKind::NearingLimit => format!(
                "You have spent over 90% of your budget. ${} remaining.",
                self.amount_display()
            ),
        }
    }
}

/// Classify one comparison row. Rows that are neither over budget nor near
/// the limit produce nothing, and neither does a row without a budget: a zero
/// budget means no limit was set, so there is nothing to compare against.
pub fn classify(row: &BudgetComparison) -> Option<Insight> {
    let (budget, actual) = (row.budget_cents, row.actual_cents);

    if budget <= 0 {
        return None;
    }

    if actual > budget {
        return Some(Insight {
            kind: InsightKind::OverBudget,
            category: row.category,
            amount_cents: actual - budget,
        });
    }

    // actual / budget >= 0.9, without dividing.
    if actual * 10 >= budget * NEARING_LIMIT_TENTHS {
        return Some(Insight {
            kind: InsightKind::NearingLimit,
            category: row.category,
            amount_cents: budget - actual,
        });
    }

    None
}

pub fn derive_insights(rows: &[BudgetComparison]) -> Vec<Insight> {
    rows.iter().filter_map(classify).collect()
}

/// What the insights panel shows: either the alerts, or one all-clear message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "insights", rename_all = "snake_case")]
pub enum InsightReport {
    AllGood,
    Alerts(Vec<Insight>),
}

impl InsightReport {
    pub const ALL_GOOD_TITLE: &'static str = "All Good!";
    pub const ALL_GOOD_DESCRIPTION: &'static str =
        "You are staying within your budget limits for all categories.";

    pub fn from_rows(rows: &[BudgetComparison]) -> Self {
        let insights = derive_insights(rows);
        if insights.is_empty() {
            Self::AllGood
        } else {
            Self::Alerts(insights)
        }
    }

    pub fn insights(&self) -> &[Insight] {
        match self {
            Self::AllGood => &[],
            Self::Alerts(insights) => insights,
        }
    }
}
