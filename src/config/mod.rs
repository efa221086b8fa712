//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → EchoConfig (immutable for the process lifetime)
//!     → consumed by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults, so running with no config file reproduces
//!   the fixed ports and certificate paths of the original service
//! - Config is immutable once loaded; there is no reload

pub mod loader;
pub mod schema;

pub use schema::EchoConfig;
pub use schema::ListenerConfig;
pub use schema::TlsConfig;
