//! Shared utilities for integration tests.

use emporium::config::EmporiumConfig;
use emporium::http::HttpServer;
use emporium::lifecycle::Shutdown;
use emporium_sdk::EmporiumClient;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running service bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(EmporiumConfig::default()).await
    }

    pub async fn spawn_with(mut config: EmporiumConfig) -> Self {
        config.listener.bind_address = "127.0.0.1:0".into();
        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let shutdown = Shutdown::new();
        let server = HttpServer::new(config);
        let server_shutdown = shutdown.subscribe();
        let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

        Self {
            base_url,
            shutdown,
            handle,
        }
    }

    pub fn client(&self) -> EmporiumClient {
        EmporiumClient::new(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
