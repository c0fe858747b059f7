use axum::{Json, extract::State};

use crate::catalog::load_brands;
use crate::error::AppResult;
use crate::models::AppState;

/// GET /brands -> distinct brands of the catalog CSV, first-seen order.
///
/// # Errors
///
/// Err if the catalog can't be read or has no `brand` column
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let path = state.config.catalog_path.clone();
    let brands = tokio::task::spawn_blocking(move || load_brands(&path)).await??;
    tracing::debug!(count = brands.len(), "catalog brands loaded");
    Ok(Json(brands))
}
