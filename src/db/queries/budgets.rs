use crate::date_utils::MonthKey;
use crate::models::{Budget, NewBudget};
use rusqlite::{params, Connection, Row};
use tracing::debug;

const COLUMNS: &str = "id, category, amount_cents, month, created_at, updated_at";

fn row_to_budget(row: &Row) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount_cents: row.get(2)?,
        month: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn list_budgets(conn: &Connection, month: MonthKey) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets WHERE month = ? ORDER BY category",
        COLUMNS
    ))?;
    let budgets = stmt
        .query_map([month], row_to_budget)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(month = %month, count = budgets.len(), "Listed budgets");
    Ok(budgets)
}

/// Insert a budget, or replace the amount of the one already stored for the
/// same `(category, month)`. The unique index decides which happens, so two
/// concurrent upserts for one key can never both insert.
pub fn upsert_budget(conn: &Connection, budget: &NewBudget) -> rusqlite::Result<Budget> {
    let id = uuid::Uuid::new_v4().to_string();
    let stored = conn.query_row(
        &format!(
            "INSERT INTO budgets (id, category, amount_cents, month)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (category, month) DO UPDATE SET
                amount_cents = excluded.amount_cents,
                updated_at = datetime('now')
             RETURNING {}",
            COLUMNS
        ),
        params![id, budget.category, budget.amount_cents, budget.month],
        row_to_budget,
    )?;

    debug!(
        budget_id = %stored.id,
        category = %stored.category,
        month = %stored.month,
        amount_cents = stored.amount_cents,
        "Upserted budget"
    );
    Ok(stored)
}
