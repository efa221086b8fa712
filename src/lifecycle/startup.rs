//! Startup orchestration.
//!
//! # Responsibilities
//! - Decide single- vs. dual-listener mode from certificate presence
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners are bound before any serving starts, so a port conflict
//!   surfaces immediately

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::EchoConfig;
use crate::http::HttpServer;
use crate::net::tls;

/// Error type for listener startup and operation.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] tls::TlsError),

    #[error("listener failed: {0}")]
    Serve(#[from] std::io::Error),

    #[error("listener task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run the service until a listener fails.
///
/// A certificate at the configured path selects dual mode; otherwise only
/// the plaintext listener starts.
pub async fn run(config: EchoConfig) -> Result<(), StartupError> {
    let server = HttpServer::new();

    if tls::cert_present(&config.tls.cert_path) {
        run_dual(server, &config).await
    } else {
        tracing::info!(
            cert_path = %config.tls.cert_path,
            "No certificate found; starting plaintext listener only"
        );
        let listener = bind(&config.listener.bind_address).await?;
        server.run(listener).await.map_err(StartupError::Serve)
    }
}

/// Plaintext and TLS listeners running concurrently over the same router.
///
/// An interrupt drains the plaintext listener within the configured grace
/// period; the TLS listener keeps serving. Either listener failing is
/// fatal.
async fn run_dual(server: HttpServer, config: &EchoConfig) -> Result<(), StartupError> {
    tracing::info!(
        cert_path = %config.tls.cert_path,
        "Certificate found; starting plaintext and TLS listeners"
    );

    let tls_config = tls::load_server_config(&config.tls.cert_path, &config.tls.key_path)?;
    let plain_listener = bind(&config.listener.bind_address).await?;
    let tls_listener = bind(&config.tls.bind_address).await?;

    let grace = Duration::from_secs(config.listener.shutdown_grace_secs);
    let mut plain = tokio::spawn(server.clone().run_graceful(plain_listener, grace));
    let mut secure = tokio::spawn(server.run_tls(tls_listener, tls_config));

    tokio::select! {
        res = &mut plain => match res? {
            // Drained after an interrupt; the TLS listener keeps serving.
            Ok(()) => {
                (&mut secure).await??;
                Ok(())
            }
            Err(e) => Err(StartupError::Serve(e)),
        },
        res = &mut secure => {
            res??;
            Ok(())
        }
    }
}

async fn bind(addr: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        })
}
