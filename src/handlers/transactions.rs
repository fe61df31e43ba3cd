use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::date_utils::parse_input_date;
use crate::db::queries::transactions::{self, TransactionFilter};
use crate::error::{AppError, AppResult};
use crate::handlers::api::{created, ok, ApiResponse};
use crate::models::transaction::parse_category;
use crate::models::{Transaction, TransactionInput, TransactionPatch};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub category: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> AppResult<TransactionFilter> {
        let date = |value: Option<String>, name: &str| -> AppResult<_> {
            match value.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(v) => parse_input_date(v)
                    .map(Some)
                    .ok_or_else(|| AppError::Validation(format!("Invalid {}: '{}'", name, v))),
            }
        };

        Ok(TransactionFilter {
            from_date: date(self.from_date, "from_date")?,
            to_date: date(self.to_date, "to_date")?,
            category: match self.category.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(c) => Some(parse_category(c)?),
            },
        })
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Transaction not found: {}", id))
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResponse<Vec<Transaction>> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    let conn = state.db.get()?;
    ok(transactions::list_transactions(&conn, &filter)?)
}

pub async fn show(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResponse<Transaction> {
    let Path(id) = id?;
    let conn = state.db.get()?;
    let transaction = transactions::get_transaction(&conn, &id)?.ok_or_else(|| not_found(&id))?;
    ok(transaction)
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResponse<Transaction> {
    let Json(input) = payload?;
    let new_transaction = input.into_new()?;
    let conn = state.db.get()?;
    created(transactions::create_transaction(&conn, &new_transaction)?)
}

/// The id comes from the path only; a query-string id is never consulted.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<TransactionPatch>, JsonRejection>,
) -> ApiResponse<Transaction> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let changes = patch.into_changes()?;
    let conn = state.db.get()?;
    let updated = if changes.is_empty() {
        transactions::get_transaction(&conn, &id)?
    } else {
        transactions::update_transaction(&conn, &id, &changes)?
    };
    ok(updated.ok_or_else(|| not_found(&id))?)
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResponse<serde_json::Value> {
    let Path(id) = id?;
    let conn = state.db.get()?;
    if !transactions::delete_transaction(&conn, &id)? {
        return Err(not_found(&id));
    }
    ok(serde_json::json!({}))
}
