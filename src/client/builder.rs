use crate::client::core::Client;
use crate::client::dispatch::Dispatcher;
use crate::config::ServiceConfig;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Setters override whatever the loaded config says.
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ServiceConfig>,
    api_key: Option<String>,
    cloud: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this config instead of loading files and environment variables.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Default private cloud for every call.
    pub fn cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Send every request to this base URL instead of the resolved host.
    ///
    /// This is primarily for testing with mock servers. Private-cloud checks still
    /// run against the configured cloud.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let mut config = match self.config {
            Some(config) => config,
            None => ServiceConfig::load()?,
        };
        if let Some(key) = self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(cloud) = self.cloud {
            config = config.with_cloud(cloud);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(base) = self.base_url_override {
            config = config.with_base_url_override(base);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(config.timeout)?),
        };

        Ok(Client {
            dispatcher: Dispatcher::new(config, transport),
        })
    }
}
