//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, TLS accept loop)
//!     → handler.rs (read body, resolve status, mirror headers)
//!     → document.rs (build the diagnostic document)
//!     → JSON response to client
//! ```

pub mod document;
pub mod handler;
pub mod server;

pub use document::DiagnosticDocument;
pub use handler::X_REQUESTED_STATUS;
pub use server::HttpServer;
