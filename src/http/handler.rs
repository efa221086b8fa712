//! The echo request handler.
//!
//! # Responsibilities
//! - Read the request body and parse it as JSON when one is declared
//! - Build the diagnostic document
//! - Mirror request headers onto the response
//! - Resolve the response status (override header, else method default)
//!
//! Nothing here rejects a request: body and serialization failures are
//! logged and the handler answers with whatever it has.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri},
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::http::document;
use crate::net::TlsConnectionInfo;

/// Header that lets the caller pick the response status code.
pub const X_REQUESTED_STATUS: &str = "x-requested-status";

/// Answer any request with its own diagnostic document.
pub async fn echo_handler(
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    let request_id = Uuid::new_v4();
    let tls = request.extensions().get::<TlsConnectionInfo>().cloned();
    let (parts, body) = request.into_parts();

    let host = host_of(&parts.headers, &parts.uri);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %parts.uri.path(),
        peer_addr = %remote_addr,
        tls = tls.is_some(),
        "Echoing request"
    );

    let body_map = read_body(&parts.headers, body, request_id).await;

    let doc = document::build_document(
        &parts.method,
        &parts.uri,
        parts.version,
        &parts.headers,
        &host,
        remote_addr,
        tls.as_ref(),
        body_map,
    );

    let payload = match serde_json::to_vec(&doc) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Failed to serialize diagnostic document"
            );
            Vec::new()
        }
    };

    let status =
        requested_status(&parts.headers).unwrap_or_else(|| default_status(&parts.method));

    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    mirror_headers(&parts.headers, response.headers_mut());
    response
}

/// The declared host: Host header first, URI authority as the HTTP/2
/// fallback, empty when neither is present.
fn host_of(headers: &HeaderMap, uri: &Uri) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

/// Read and JSON-parse the body when `Content-Length > 0`.
///
/// Read and parse failures are non-fatal: they are logged and an empty
/// object stands in.
async fn read_body(headers: &HeaderMap, body: Body, request_id: Uuid) -> Map<String, Value> {
    if content_length(headers) <= 0 {
        return Map::new();
    }

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return Map::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Request body is not a JSON object"
            );
            Map::new()
        }
    }
}

fn content_length(headers: &HeaderMap) -> i64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Mirror request headers onto the response.
///
/// The incoming `Content-Length` is dropped (it would conflict with the
/// freshly computed body length) and `Content-Type` is set last so a
/// mirrored header can never override it.
fn mirror_headers(request_headers: &HeaderMap, response_headers: &mut HeaderMap) {
    for (name, value) in request_headers {
        if *name == header::CONTENT_LENGTH {
            continue;
        }
        response_headers.insert(name.clone(), value.clone());
    }
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
}

/// Status requested via `X-Requested-Status`, when present and parseable
/// as a representable status code.
fn requested_status(headers: &HeaderMap) -> Option<StatusCode> {
    let raw = headers.get(X_REQUESTED_STATUS)?.to_str().ok()?;
    let code: u16 = raw.trim().parse().ok()?;
    StatusCode::from_u16(code).ok()
}

/// Method-based default status.
fn default_status(method: &Method) -> StatusCode {
    match method.as_str() {
        "POST" => StatusCode::CREATED,
        "DELETE" => StatusCode::NO_CONTENT,
        _ => StatusCode::OK,
    }
}
