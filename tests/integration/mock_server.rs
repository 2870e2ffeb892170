//! Mock HTTP server setup for integration tests

use indicoio::{Client, ServiceConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::io;
use std::sync::{Arc, Mutex};

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub fn new() -> Self {
        let server = Server::new();
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Create a test client that sends every request to the mock server.
    ///
    /// Starts from an empty config so local files and `INDICO_*` variables do not leak in.
    pub fn client(&self, config: ServiceConfig) -> Client {
        Client::builder()
            .config(config)
            .api_key("test-key")
            .base_url_override(&self.base_url)
            .build()
            .expect("client builds")
    }

    pub fn public_client(&self) -> Client {
        self.client(ServiceConfig::default())
    }

    pub fn private_client(&self, cloud: &str) -> Client {
        self.client(ServiceConfig::default().with_cloud(cloud))
    }

    /// Prepare a mock for a JSON response on `path`, any query string.
    ///
    /// Not registered yet: call `.create()` after adding expectations.
    pub fn json_mock(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Create a mock for a JSON response on `path`, any query string.
    pub fn mock_json_response(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.json_mock(path, status, body).create()
    }
}

/// Shared buffer that captures formatted log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with a subscriber that writes WARN and above into this buffer.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> R {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
