use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, Response, StatusCode, header},
    response::IntoResponse,
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "static/"]
struct WebAssets;

/// GET / -> the upload page.
pub async fn index() -> Response<Body> {
    asset_or_404("index.html")
}

/// GET /static/{*path}
pub async fn static_asset(Path(path): Path<String>) -> Response<Body> {
    asset_or_404(path.trim_start_matches('/'))
}

fn asset_or_404(path: &str) -> Response<Body> {
    match WebAssets::get(path) {
        Some(content) => serve_asset(path, content.data.into_owned()),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn serve_asset(path: &str, content: Vec<u8>) -> Response<Body> {
    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let content_type = HeaderValue::from_str(&mime)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    ([(header::CONTENT_TYPE, content_type)], content).into_response()
}
