use crate::config::Config;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::http::{HeaderMap, Request, Response, header};
use axum::middleware::Next;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOGGED_BODY: u64 = 64 * 1024;
const PREVIEW_BYTES: usize = 16 * 1024;

/// Keep guards alive for the lifetime of the app.
pub struct LogGuards {
    _file_guard: WorkerGuard,
}

fn split_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let file = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("applens.logs"))
        .to_string_lossy()
        .to_string();
    (dir, file)
}

pub fn init_logging(config: &Config) -> LogGuards {
    let filter = EnvFilter::new(config.log_filter());

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .compact()
        .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()));

    let (dir, file) = split_path(&config.log_file);
    let appender = tracing_appender::rolling::never(dir, file);
    let (nb, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_writer(nb);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    LogGuards { _file_guard: guard }
}

fn request_id<B>(req: &Request<B>) -> String {
    req.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn preview(bytes: &[u8]) -> String {
    if bytes.len() > PREVIEW_BYTES {
        format!(
            "{}… [truncated]",
            String::from_utf8_lossy(&bytes[..PREVIEW_BYTES])
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

/// Body size if it is known up front and small enough to buffer for logging.
fn loggable_len(body: &Body) -> Option<u64> {
    body.size_hint().exact().filter(|n| *n <= MAX_LOGGED_BODY)
}

/// One line per request: method, uri, status, latency.
pub async fn access_log(req: Request<Body>, next: Next) -> Response<Body> {
    let req_id = request_id(&req);
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let res = next.run(req).await;

    let latency_ms = started.elapsed().as_millis();
    let status = res.status();
    if status.is_server_error() {
        tracing::error!(request_id=%req_id, %method, %uri, %status, latency_ms=%latency_ms, "request failed");
    } else {
        tracing::info!(request_id=%req_id, %method, %uri, %status, latency_ms=%latency_ms, "response completed");
    }
    res
}

/// Logs request & response bodies (dev-friendly).
/// Skips multipart requests, binary responses and bodies whose size is
/// unknown or large (upload responses carry the whole image).
pub async fn log_payloads(req: Request<Body>, next: Next) -> Response<Body> {
    let req_id = request_id(&req);

    let (req_parts, req_body) = req.into_parts();
    let req_ct = content_type(&req_parts.headers);
    let req = if req_ct.starts_with("multipart/") || loggable_len(&req_body).is_none() {
        Request::from_parts(req_parts, req_body)
    } else {
        match axum::body::to_bytes(req_body, usize::MAX).await {
            Ok(bytes) => {
                if !bytes.is_empty() {
                    tracing::debug!(request_id=%req_id, request_body=%preview(&bytes), "request body");
                }
                Request::from_parts(req_parts, Body::from(bytes))
            }
            Err(e) => {
                tracing::warn!(request_id=%req_id, error=%e, "failed reading request body");
                Request::from_parts(req_parts, Body::empty())
            }
        }
    };

    let res = next.run(req).await;

    let (res_parts, res_body) = res.into_parts();
    let res_ct = content_type(&res_parts.headers);
    let binary = res_ct.starts_with("image/")
        || res_ct.starts_with("application/octet-stream")
        || res_ct.starts_with("text/html")
        || res_ct.starts_with("text/javascript")
        || res_ct.starts_with("text/css");
    if binary || loggable_len(&res_body).is_none() {
        tracing::debug!(request_id=%req_id, content_type=%res_ct, size=?res_body.size_hint().exact(), "response body not logged");
        return Response::from_parts(res_parts, res_body);
    }

    match axum::body::to_bytes(res_body, usize::MAX).await {
        Ok(bytes) => {
            tracing::debug!(request_id=%req_id, response_body=%preview(&bytes), "response body");
            Response::from_parts(res_parts, Body::from(bytes))
        }
        Err(e) => {
            tracing::warn!(request_id=%req_id, error=%e, "failed reading response body");
            Response::from_parts(res_parts, Body::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_path_defaults_to_cwd() {
        let (dir, file) = split_path(Path::new("applens.logs"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, "applens.logs");

        let (dir, file) = split_path(Path::new("/var/log/applens/server.log"));
        assert_eq!(dir, PathBuf::from("/var/log/applens"));
        assert_eq!(file, "server.log");
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = vec![b'a'; PREVIEW_BYTES + 10];
        let p = preview(&long);
        assert!(p.ends_with("… [truncated]"));
        assert_eq!(preview(b"{\"ok\":true}"), "{\"ok\":true}");
    }

    #[test]
    fn only_small_known_bodies_are_buffered() {
        assert_eq!(loggable_len(&Body::from("abc")), Some(3));
        let big = vec![0u8; usize::try_from(MAX_LOGGED_BODY).unwrap() + 1];
        assert_eq!(loggable_len(&Body::from(big)), None);
    }
}
