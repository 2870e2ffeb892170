use serde_json::{Map, Value};

/// Per-call overrides and endpoint-specific parameters.
///
/// ```
/// use indicoio::CallOptions;
///
/// let opts = CallOptions::new()
///     .cloud("mycompany")
///     .version(2)
///     .param("threshold", 0.1);
/// assert_eq!(opts.params["threshold"], 0.1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Overrides the configured API key.
    pub api_key: Option<String>,
    /// Overrides the configured private cloud.
    pub cloud: Option<String>,
    /// Pins the service model version.
    pub version: Option<String>,
    /// Extra named parameters merged into the request body.
    pub params: Map<String, Value>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    pub fn version(mut self, version: impl ToString) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
