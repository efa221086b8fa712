//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plaintext: handed straight to axum::serve
//!     → TLS: tls.rs (rustls handshake, capture negotiated parameters)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is terminated with tokio-rustls rather than a higher-level
//!   binding so the negotiated protocol, cipher suite, SNI, and version
//!   remain observable per connection for the diagnostic document

pub mod tls;

pub use tls::TlsConnectionInfo;
