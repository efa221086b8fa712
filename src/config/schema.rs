//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the echo
//! service. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the echo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EchoConfig {
    /// Plaintext listener configuration.
    pub listener: ListenerConfig,

    /// TLS listener configuration (active only when the certificate file
    /// exists).
    pub tls: TlsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Plaintext listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Grace period for draining in-flight requests on interrupt, in
    /// seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            shutdown_grace_secs: 5,
        }
    }
}

/// TLS listener configuration.
///
/// The certificate path doubles as the dual-listener switch: when no file
/// exists there, only the plaintext listener starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Bind address (e.g., "0.0.0.0:8443").
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8443".to_string(),
            cert_path: "./ssl/certs/server.crt".to_string(),
            key_path: "./ssl/certs/server.key".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
