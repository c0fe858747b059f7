use axum::extract::rejection::JsonRejection;
use axum::{Json, http::StatusCode};
use serde_json::Value as JsonValue;

use crate::models::BrandUpdateAck;

/// `null`, `false`, `0`, `""`, `[]` and `{}` don't count as a brand.
fn is_truthy(v: &JsonValue) -> bool {
    match v {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

/// POST /update_brand with `{ "brand": ... }`.
///
/// Acknowledges a corrected brand without storing it. A missing or falsy
/// `brand`, or a body that isn't JSON, is a 400.
pub async fn update(
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> (StatusCode, Json<BrandUpdateAck>) {
    let brand = payload
        .ok()
        .and_then(|Json(mut body)| body.get_mut("brand").map(JsonValue::take))
        .filter(is_truthy);

    match brand {
        Some(brand) => {
            tracing::info!(%brand, "brand update acknowledged");
            (
                StatusCode::OK,
                Json(BrandUpdateAck {
                    success: true,
                    message: "Brand updated successfully".into(),
                }),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(BrandUpdateAck {
                success: false,
                message: "Invalid brand data".into(),
            }),
        ),
    }
}
