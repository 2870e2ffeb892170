//! Service configuration.
//!
//! [`ServiceConfig`] is an immutable value handed to [`crate::ClientBuilder`]. It is
//! assembled once from, in increasing precedence:
//!
//! 1. built-in defaults (public host, `https`, 30s timeout)
//! 2. `.indicorc.yaml` in `$HOME`, then in the current directory
//!    (or the single file named by `INDICO_CONFIG`)
//! 3. environment variables: `INDICO_API_KEY`, `INDICO_CLOUD`, `INDICO_TIMEOUT_SECS`
//!
//! Individual calls can still override the API key and cloud through
//! [`crate::CallOptions`].
//!
//! ```yaml
//! auth:
//!   api_key: "0123456789abcdef"
//! private_cloud:
//!   cloud: "mycompany"
//! service:
//!   timeout_secs: 10
//! ```

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "apiv2.indico.io";
pub const DEFAULT_CLOUD_SUFFIX: &str = "indico.domains";
pub const DEFAULT_URL_PROTOCOL: &str = "https";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE_NAME: &str = ".indicorc.yaml";

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    /// Private cloud name; requests go to `{cloud}.{cloud_suffix}` when set.
    pub cloud: Option<String>,
    pub host: String,
    pub cloud_suffix: String,
    pub url_protocol: String,
    /// Replaces scheme and host resolution entirely (mock servers, proxies).
    pub base_url_override: Option<String>,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cloud: None,
            host: DEFAULT_HOST.to_string(),
            cloud_suffix: DEFAULT_CLOUD_SUFFIX.to_string(),
            url_protocol: DEFAULT_URL_PROTOCOL.to_string(),
            base_url_override: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    auth: Option<AuthSection>,
    #[serde(default)]
    private_cloud: Option<PrivateCloudSection>,
    #[serde(default)]
    service: Option<ServiceSection>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PrivateCloudSection {
    cloud: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    host: Option<String>,
    url_protocol: Option<String>,
    timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Load defaults, config files and environment variables.
    ///
    /// A file named by `INDICO_CONFIG` must exist; the default locations are optional.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        match std::env::var_os("INDICO_CONFIG") {
            Some(explicit) => config = config.merge_required_file(PathBuf::from(explicit))?,
            None => {
                for path in default_config_paths() {
                    if path.is_file() {
                        config = config.merge_file(&path)?;
                    }
                }
            }
        }
        Ok(config.merge_env_with(|key| std::env::var(key).ok()))
    }

    /// Overlay a config file the caller asked for by name.
    pub fn merge_required_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::configuration_with_context(
                format!("Config file '{}' does not exist", path.display()),
                ErrorContext::new()
                    .with_field_path("INDICO_CONFIG")
                    .with_source("config"),
            ));
        }
        self.merge_file(path)
    }

    /// Overlay one YAML config file. Missing keys leave current values untouched.
    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        self.merge_yaml(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Overlay YAML config text.
    pub fn merge_yaml(mut self, raw: &str) -> Result<Self> {
        let file: ConfigFile = if raw.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(raw).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid config file: {}", e),
                    ErrorContext::new().with_source("config"),
                )
            })?
        };

        if let Some(key) = file.auth.and_then(|a| a.api_key) {
            self.api_key = non_empty(key);
        }
        if let Some(cloud) = file.private_cloud.and_then(|p| p.cloud) {
            self.cloud = non_empty(cloud);
        }
        if let Some(service) = file.service {
            if let Some(host) = service.host {
                self.host = host;
            }
            if let Some(proto) = service.url_protocol {
                self.url_protocol = proto.trim_end_matches(':').to_string();
            }
            if let Some(secs) = service.timeout_secs {
                self.timeout = Duration::from_secs(secs.max(1));
            }
        }
        Ok(self)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Taking a lookup function keeps tests away from the process environment.
    pub fn merge_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("INDICO_API_KEY").and_then(non_empty) {
            self.api_key = Some(key);
        }
        if let Some(cloud) = lookup("INDICO_CLOUD").and_then(non_empty) {
            self.cloud = Some(cloud);
        }
        if let Some(secs) = lookup("INDICO_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    pub fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL (scheme + host, no trailing slash) for a resolved cloud.
    pub(crate) fn base_url(&self, cloud: Option<&str>) -> String {
        if let Some(base) = &self.base_url_override {
            return base.trim_end_matches('/').to_string();
        }
        let host = match cloud {
            Some(cloud) => format!("{}.{}", cloud, self.cloud_suffix),
            None => self.host.clone(),
        };
        format!("{}://{}", self.url_protocol, host)
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }
    paths
}
