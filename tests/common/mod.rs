//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;

use route_registry::config::RegistryConfig;
use route_registry::{HttpServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A registry server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub routes: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the server and hand back its routes directory.
    pub async fn stop(self) -> TempDir {
        self.shutdown.trigger();
        let _ = self.handle.await;
        self.routes
    }
}

/// Start a server whose routes live in `routes` (a fresh dir if `None`).
pub async fn start_server(routes: Option<TempDir>) -> TestServer {
    let routes = routes.unwrap_or_else(|| TempDir::new().unwrap());

    let mut config = RegistryConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.storage.routes_dir = routes.path().to_path_buf();

    let server = HttpServer::bootstrap(config).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        routes,
        shutdown,
        handle,
    }
}

/// Write a raw record file, bypassing the store.
#[allow(dead_code)]
pub fn write_record(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
