use std::time::Instant;

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::BodyExt;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies smaller than this are logged at `debug`.
const MAX_LOGGED_BODY: u64 = 1024;

/// Tag every request with an `x-trace-id` (reusing a valid incoming one),
/// run it inside an `http_request` span and log status and latency.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let body = log_small_json("request", &parts.headers, body).await;
        let mut req = Request::from_parts(parts, body);
        if let Some(v) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, v.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let body = log_small_json("response", &parts.headers, body).await;
        let mut response = Response::from_parts(parts, body);
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Buffer and log `body` when it is JSON of known small size; otherwise hand
/// it back untouched so large or streaming bodies are never collected here.
async fn log_small_json(direction: &'static str, headers: &HeaderMap, body: Body) -> Body {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    let small = body.size_hint().exact().is_some_and(|n| n < MAX_LOGGED_BODY);
    if !is_json || !small || !tracing::enabled!(tracing::Level::DEBUG) {
        return body;
    }

    match body.collect().await {
        Ok(collected) => {
            let bytes: Bytes = collected.to_bytes();
            debug!(direction, body = %String::from_utf8_lossy(&bytes), "json body");
            Body::from(bytes)
        }
        Err(e) => {
            warn!(direction, error = %e, "failed to buffer body for logging");
            Body::empty()
        }
    }
}
