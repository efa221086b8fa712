//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Check certificate presence → bind listener(s) → serve
//!
//! Interrupt (dual mode only):
//!     Ctrl+C → bounded graceful shutdown of the plaintext listener;
//!     the TLS listener keeps serving
//! ```
//!
//! # Design Decisions
//! - Fail fast: any bind or serve error is fatal, no retry or fallback
//! - Dual mode is selected purely by certificate presence on disk

pub mod startup;

pub use startup::StartupError;
