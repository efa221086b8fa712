//! Diagnostic document construction.
//!
//! # Responsibilities
//! - Describe the inbound request as a fixed-shape JSON document
//! - Flatten multi-valued headers (last value wins)
//! - Parse cookies from the `Cookie` header
//! - Derive scheme and ports from the connection and address strings
//!
//! # Design Decisions
//! - The document is a statically-typed record; only `requestHeaders` and
//!   `body` are open-ended maps
//! - Header names are rendered in canonical `Title-Case` form
//! - `statusCode` in the payload stays 200 regardless of the transport
//!   status actually returned

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::{header, HeaderMap, Method, Uri, Version};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::net::TlsConnectionInfo;

/// Fixed health payload reported in `statusBody`.
const STATUS_BODY: &str = "Healthy";

/// The JSON document returned for every request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticDocument {
    pub status_body: String,
    pub status_reason: String,
    pub hostname: String,
    pub uri: UriInfo,
    pub network: NetworkInfo,
    pub ssl: SslInfo,
    pub request_headers: BTreeMap<String, String>,
    pub session: SessionInfo,
    pub body: Map<String, Value>,
    pub status_code: u16,
}

/// Request-line details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UriInfo {
    pub http_version: String,
    pub method: String,
    pub scheme: String,
    pub full_path: String,
    pub query_string: String,
}

/// Addresses and ports on both ends of the connection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub client_port: String,
    pub server_port: String,
    pub server_address: String,
    pub client_address: String,
}

/// Negotiated TLS parameters; all fields absent on plaintext connections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiated_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher_suite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SslInfo {
    fn from_tls(tls: Option<&TlsConnectionInfo>) -> Self {
        match tls {
            Some(info) => Self {
                negotiated_protocol: Some(info.negotiated_protocol.clone()),
                cipher_suite: Some(info.cipher_suite.clone()),
                server_name: Some(info.server_name.clone()),
                version: Some(info.version.clone()),
            },
            None => Self {
                negotiated_protocol: None,
                cipher_suite: None,
                server_name: None,
                version: None,
            },
        }
    }
}

/// Cookies parsed from the request.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub cookie: Vec<Cookie>,
}

/// A single parsed cookie.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Build the diagnostic document for one request.
#[allow(clippy::too_many_arguments)]
pub fn build_document(
    method: &Method,
    uri: &Uri,
    version: Version,
    headers: &HeaderMap,
    host: &str,
    remote_addr: SocketAddr,
    tls: Option<&TlsConnectionInfo>,
    body: Map<String, Value>,
) -> DiagnosticDocument {
    let client_address = remote_addr.to_string();
    let server_port = get_port(host, tls.is_some());

    DiagnosticDocument {
        status_body: STATUS_BODY.to_string(),
        status_reason: format!("Incoming request was on port {}", server_port),
        hostname: host.to_string(),
        uri: UriInfo {
            http_version: format!("{:?}", version),
            method: method.to_string(),
            scheme: scheme(tls.is_some()).to_string(),
            full_path: uri.path().to_string(),
            query_string: encode_query(uri.query().unwrap_or("")),
        },
        network: NetworkInfo {
            client_port: get_port(&client_address, false),
            server_port,
            server_address: host.to_string(),
            client_address,
        },
        ssl: SslInfo::from_tls(tls),
        request_headers: flatten_headers(headers),
        session: SessionInfo {
            cookie: parse_cookies(headers),
        },
        body,
        status_code: 200,
    }
}

/// Scheme as seen by the client: "https" iff the connection carried TLS.
pub fn scheme(tls_present: bool) -> &'static str {
    if tls_present {
        "https"
    } else {
        "http"
    }
}

/// Extract the port from an address string.
///
/// An explicit `host:port` (or `[v6]:port`) wins; otherwise the scheme
/// default applies: 443 when `tls_present`, 80 when not.
pub fn get_port(addr: &str, tls_present: bool) -> String {
    let port = split_port(addr).unwrap_or("");
    if port.is_empty() {
        if tls_present { "443" } else { "80" }.to_string()
    } else {
        port.to_string()
    }
}

fn split_port(addr: &str) -> Option<&str> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (_, after) = rest.split_once(']')?;
        after.strip_prefix(':')
    } else if addr.bytes().filter(|b| *b == b':').count() == 1 {
        addr.split_once(':').map(|(_, port)| port)
    } else {
        // Bare IPv6 or otherwise unparseable; fall back to defaults.
        None
    }
}

/// Flatten the header map into single values, last value wins.
///
/// This is deliberately lossy: callers probing multi-value propagation see
/// only the final value a hop delivered.
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for (name, value) in headers {
        flat.insert(
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    flat
}

/// Render a header name in canonical `Title-Case` form
/// (`x-forwarded-for` → `X-Forwarded-For`).
fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Parse all `Cookie` headers into name/value pairs.
///
/// Malformed segments are skipped; an absent header yields an empty list.
fn parse_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies.push(Cookie {
                name: name.to_string(),
                value: value.trim().trim_matches('"').to_string(),
            });
        }
    }
    cookies
}

/// Re-encode a query string with pairs sorted by key.
fn encode_query(raw: &str) -> String {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut encoded = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        encoded.append_pair(key, value);
    }
    encoded.finish()
}
