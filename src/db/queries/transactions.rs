use crate::models::{Category, NewTransaction, Transaction, TransactionChanges};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

const COLUMNS: &str = "id, date, amount_cents, description, category, created_at, updated_at";

#[derive(Debug, Default)]
pub struct TransactionFilter {
    pub category: Option<Category>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount_cents: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// List transactions newest first. Same-day entries keep reverse insertion order.
pub fn list_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> rusqlite::Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", COLUMNS);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(category) = filter.category {
        sql.push_str(" AND category = ?");
        params_vec.push(Box::new(category));
    }
    if let Some(from_date) = filter.from_date {
        sql.push_str(" AND date >= ?");
        params_vec.push(Box::new(from_date));
    }
    if let Some(to_date) = filter.to_date {
        sql.push_str(" AND date <= ?");
        params_vec.push(Box::new(to_date));
    }

    sql.push_str(" ORDER BY date DESC, rowid DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let transactions = stmt
        .query_map(params_refs.as_slice(), row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = transactions.len(), "Listed transactions");
    Ok(transactions)
}

pub fn get_transaction(conn: &Connection, id: &str) -> rusqlite::Result<Option<Transaction>> {
    trace!(transaction_id = id, "Fetching transaction");
    conn.query_row(
        &format!("SELECT {} FROM transactions WHERE id = ?", COLUMNS),
        [id],
        row_to_transaction,
    )
    .optional()
}

pub fn create_transaction(
    conn: &Connection,
    transaction: &NewTransaction,
) -> rusqlite::Result<Transaction> {
    let id = uuid::Uuid::new_v4().to_string();
    let created = conn.query_row(
        &format!(
            "INSERT INTO transactions (id, date, amount_cents, description, category)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {}",
            COLUMNS
        ),
        params![
            id,
            transaction.date,
            transaction.amount_cents,
            transaction.description,
            transaction.category,
        ],
        row_to_transaction,
    )?;

    debug!(
        transaction_id = %created.id,
        amount_cents = created.amount_cents,
        category = %created.category,
        "Created transaction"
    );
    Ok(created)
}

/// Replace the supplied fields of a transaction in a single statement.
/// Returns `None` when no transaction has the given id.
pub fn update_transaction(
    conn: &Connection,
    id: &str,
    changes: &TransactionChanges,
) -> rusqlite::Result<Option<Transaction>> {
    let updated = conn
        .query_row(
            &format!(
                "UPDATE transactions SET
                    date = COALESCE(?, date),
                    amount_cents = COALESCE(?, amount_cents),
                    description = COALESCE(?, description),
                    category = COALESCE(?, category),
                    updated_at = datetime('now')
                 WHERE id = ?
                 RETURNING {}",
                COLUMNS
            ),
            params![
                changes.date,
                changes.amount_cents,
                changes.description,
                changes.category,
                id,
            ],
            row_to_transaction,
        )
        .optional()?;

    if updated.is_some() {
        debug!(transaction_id = id, "Updated transaction");
    }
    Ok(updated)
}

pub fn delete_transaction(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM transactions WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(transaction_id = id, "Deleted transaction");
    }
    Ok(rows > 0)
}
