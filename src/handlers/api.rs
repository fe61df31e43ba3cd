use axum::http::StatusCode;
use axum::response::Json;

use crate::error::AppResult;
use crate::models::{Category, Envelope};

/// Every JSON handler answers with a status code and an envelope.
pub type ApiResponse<T> = AppResult<(StatusCode, Json<Envelope<T>>)>;

pub fn ok<T>(data: T) -> ApiResponse<T> {
    Ok((StatusCode::OK, Json(Envelope::ok(data))))
}

pub fn created<T>(data: T) -> ApiResponse<T> {
    Ok((StatusCode::CREATED, Json(Envelope::ok(data))))
}

pub async fn categories() -> ApiResponse<&'static [Category]> {
    ok(Category::all())
}
