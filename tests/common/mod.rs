//! Shared utilities for integration testing.

use std::net::SocketAddr;

use echo_diag::HttpServer;
use tokio::net::TcpListener;

/// Start an echo server on an ephemeral port and return its address.
#[allow(dead_code)]
pub async fn start_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// A client that neither pools nor proxies, so every test request rides a
/// fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
