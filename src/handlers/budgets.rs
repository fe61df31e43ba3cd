use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::queries::budgets;
use crate::error::AppError;
use crate::handlers::api::{created, ok, ApiResponse};
use crate::models::budget::parse_month;
use crate::models::{Budget, BudgetInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BudgetParams {
    pub month: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<BudgetParams>, QueryRejection>,
) -> ApiResponse<Vec<Budget>> {
    let Query(params) = params?;
    let month = match params.month.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(AppError::Validation(
                "Month query parameter is required".into(),
            ))
        }
        Some(m) => parse_month(m)?,
    };

    let conn = state.db.get()?;
    ok(budgets::list_budgets(&conn, month)?)
}

pub async fn upsert(
    State(state): State<AppState>,
    payload: Result<Json<BudgetInput>, JsonRejection>,
) -> ApiResponse<Budget> {
    let Json(input) = payload?;
    let new_budget = input.into_new()?;
    let conn = state.db.get()?;
    created(budgets::upsert_budget(&conn, &new_budget)?)
}
