//! TLS configuration, certificate loading, and handshake introspection.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ProtocolVersion, ServerConnection};
use thiserror::Error;

/// Error type for TLS setup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {0}")]
    NoCerts(String),

    #[error("no private key found in {0}")]
    NoKey(String),

    #[error("invalid certificate or key: {0}")]
    Config(#[from] rustls::Error),
}

/// Check whether a certificate is present at `path`.
///
/// A directory at the certificate path does not count.
pub fn cert_present(path: impl AsRef<Path>) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

/// Build a rustls server config from PEM certificate and key files.
///
/// ALPN offers HTTP/2 and HTTP/1.1; the negotiated protocol is reported
/// back to callers in the diagnostic document.
pub fn load_server_config(
    cert_path: &str,
    key_path: &str,
) -> Result<Arc<rustls::ServerConfig>, TlsError> {
    let certs = load_certs(cert_path)?;
    let key = load_private_key(key_path)?;

    let mut config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

fn load_certs(path: &str) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Read {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: path.to_string(),
            source,
        })?;

    if certs.is_empty() {
        return Err(TlsError::NoCerts(path.to_string()));
    }

    Ok(certs)
}

fn load_private_key(path: &str) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Read {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| TlsError::Read {
            path: path.to_string(),
            source,
        })?
        .ok_or_else(|| TlsError::NoKey(path.to_string()))
}

/// Parameters negotiated during a TLS handshake, captured per connection
/// and reported in the diagnostic document's `ssl` section.
///
/// Fields are empty strings when the handshake did not produce a value
/// (no ALPN offered, no SNI sent).
#[derive(Debug, Clone)]
pub struct TlsConnectionInfo {
    pub negotiated_protocol: String,
    pub cipher_suite: String,
    pub server_name: String,
    pub version: String,
}

impl TlsConnectionInfo {
    /// Capture the negotiated parameters from a completed handshake.
    pub fn from_connection(conn: &ServerConnection) -> Self {
        Self {
            negotiated_protocol: conn
                .alpn_protocol()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default(),
            cipher_suite: conn
                .negotiated_cipher_suite()
                .map(|s| format!("{:?}", s.suite()))
                .unwrap_or_default(),
            server_name: conn.server_name().unwrap_or_default().to_string(),
            version: conn
                .protocol_version()
                .map(version_string)
                .unwrap_or_default(),
        }
    }
}

fn version_string(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        other => format!("{:?}", other),
    }
}
