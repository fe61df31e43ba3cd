pub mod api;
pub mod budgets;
pub mod transactions;

use axum::http::{Method, Uri};
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Transactions
        .route(
            "/api/transactions",
            get(transactions::list)
                .post(transactions::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/transactions/:id",
            get(transactions::show)
                .put(transactions::update)
                .delete(transactions::delete)
                .fallback(method_not_allowed),
        )
        // Budgets
        .route(
            "/api/budgets",
            get(budgets::list)
                .post(budgets::upsert)
                .fallback(method_not_allowed),
        )
        // Reference data
        .route(
            "/api/categories",
            get(api::categories).fallback(method_not_allowed),
        )
        // Health check
        .route("/health", get(health))
        .fallback(unknown_route)
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{} is not allowed on {}", method, uri.path()))
}

async fn health() -> &'static str {
    "OK"
}
