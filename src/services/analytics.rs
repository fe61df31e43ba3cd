use crate::date_utils::{DateRange, MonthKey};
use crate::models::{Category, Transaction};
use serde::Serialize;
use std::collections::HashMap;

/// Lifetime figures over every transaction, independent of any date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_cents: i64,
    pub transaction_count: usize,
    pub average_cents: i64,
    pub max_transaction_cents: i64,
    pub min_transaction_cents: i64,
}

impl SpendingSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return Self::default();
        }

        let total_cents: i64 = transactions.iter().map(|t| t.amount_cents).sum();
        let transaction_count = transactions.len();

        Self {
            total_cents,
            transaction_count,
            average_cents: total_cents / transaction_count as i64,
            max_transaction_cents: transactions
                .iter()
                .map(|t| t.amount_cents)
                .max()
                .unwrap_or(0),
            min_transaction_cents: transactions
                .iter()
                .map(|t| t.amount_cents)
                .min()
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total_cents: i64,
}

impl CategoryTotal {
    pub fn total_display(&self) -> String {
        format_cents(self.total_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub label: String,
    pub total_cents: i64,
}

impl MonthlyTotal {
    pub fn total_display(&self) -> String {
        format_cents(self.total_cents)
    }
}

pub fn filter_by_range<'a>(transactions: &'a [Transaction], range: &DateRange) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| range.contains(t.date)).collect()
}

/// Sum transaction amounts per category inside `range`.
///
/// Categories without a matching transaction are absent rather than zero.
/// Results are ordered by total, largest first.
pub fn category_totals(transactions: &[Transaction], range: &DateRange) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, i64> = HashMap::new();

    for transaction in filter_by_range(transactions, range) {
        *totals.entry(transaction.category).or_insert(0) += transaction.amount_cents;
    }

    let mut result: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_cents)| CategoryTotal {
            category,
            total_cents,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

/// Sum transaction amounts per calendar month inside `range`, oldest month first.
///
/// Grouping is keyed by year and month, and the output is sorted by that key,
/// so the result does not depend on the order of `transactions`.
pub fn monthly_totals(transactions: &[Transaction], range: &DateRange) -> Vec<MonthlyTotal> {
    let mut totals: HashMap<MonthKey, i64> = HashMap::new();

    for transaction in filter_by_range(transactions, range) {
        *totals.entry(MonthKey::of(transaction.date)).or_insert(0) += transaction.amount_cents;
    }

    let mut result: Vec<MonthlyTotal> = totals
        .into_iter()
        .map(|(month, total_cents)| MonthlyTotal {
            month,
            label: month.label(),
            total_cents,
        })
        .collect();

    result.sort_by_key(|m| m.month);
    result
}

pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let dollars = abs_cents / 100;
    let remainder = abs_cents % 100;

    if is_negative {
        format!("-{}.{:02}", dollars, remainder)
    } else {
        format!("{}.{:02}", dollars, remainder)
    }
}
