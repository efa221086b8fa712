//! Diagnostic HTTP Echo Service
//!
//! Answers every request with a JSON document describing that request:
//! method, URL, headers, host, peer address, TLS handshake parameters,
//! cookies, and parsed body. Request headers are mirrored back onto the
//! response, and the caller can override the response status with the
//! `X-Requested-Status` header.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request            ┌───────────────────────────────────────┐
//!     ──────────────────────────┼─▶ lifecycle (single or dual listener)  │
//!                               │        │                               │
//!                               │        ▼                               │
//!                               │   net (plaintext accept / TLS accept)  │
//!                               │        │                               │
//!                               │        ▼                               │
//!                               │   http::server (axum router)           │
//!                               │        │                               │
//!                               │        ▼                               │
//!     Client Response           │   http::handler ──▶ http::document     │
//!     ◀─────────────────────────┼── JSON body, mirrored headers          │
//!                               └───────────────────────────────────────┘
//! ```
//!
//! The TLS listener only starts when a certificate is present at the
//! configured path; both listeners dispatch to the same router.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;

pub use config::schema::EchoConfig;
pub use http::HttpServer;
