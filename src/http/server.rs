//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the axum router: every method, every path → echo handler
//! - Serve plaintext connections via `axum::serve`, optionally with a
//!   bounded graceful shutdown on interrupt
//! - Serve TLS connections through a tokio-rustls accept loop so each
//!   connection's negotiated handshake parameters reach the handler

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, extract::ConnectInfo, http::Request, routing::any, Router};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use crate::http::handler::echo_handler;
use crate::net::TlsConnectionInfo;

/// HTTP server hosting the echo responder.
#[derive(Clone)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new() -> Self {
        Self {
            router: Self::build_router(),
        }
    }

    /// Build the axum router. One handler answers everything.
    fn build_router() -> Router {
        Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve plaintext HTTP until the listener fails.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await
    }

    /// Serve plaintext HTTP with a bounded graceful shutdown on Ctrl+C.
    ///
    /// After the interrupt, in-flight requests get `grace` to finish;
    /// overrunning the grace period is logged and treated as a clean stop.
    pub async fn run_graceful(
        self,
        listener: TcpListener,
        grace: Duration,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let (interrupted_tx, interrupted_rx) = tokio::sync::oneshot::channel();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = interrupted_tx.send(());
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            res = &mut serve => return res,
            _ = interrupted_rx => {}
        }

        match tokio::time::timeout(grace, serve).await {
            Ok(res) => {
                tracing::info!("HTTP server stopped");
                res
            }
            Err(_) => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Graceful shutdown timed out; abandoning open connections"
                );
                Ok(())
            }
        }
    }

    /// Serve TLS connections, dispatching to the same router.
    ///
    /// Handshake failures drop the connection and the loop continues; an
    /// accept failure is fatal and propagates to the caller.
    pub async fn run_tls(
        self,
        listener: TcpListener,
        tls_config: Arc<rustls::ServerConfig>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let acceptor = TlsAcceptor::from(tls_config);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let acceptor = acceptor.clone();
            let router = self.router.clone();

            tokio::spawn(async move {
                let tls_stream = match acceptor.accept(stream).await {
                    Ok(stream) => stream,
                    Err(e) => {
                        tracing::debug!(
                            peer_addr = %remote_addr,
                            error = %e,
                            "TLS handshake failed"
                        );
                        return;
                    }
                };

                let info = TlsConnectionInfo::from_connection(tls_stream.get_ref().1);

                let service =
                    hyper::service::service_fn(move |mut req: Request<hyper::body::Incoming>| {
                        req.extensions_mut().insert(ConnectInfo(remote_addr));
                        req.extensions_mut().insert(info.clone());
                        router.clone().oneshot(req.map(Body::new))
                    });

                if let Err(e) = auto::Builder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(tls_stream), service)
                    .await
                {
                    tracing::debug!(
                        peer_addr = %remote_addr,
                        error = %e,
                        "HTTPS connection error"
                    );
                }
            });
        }
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
