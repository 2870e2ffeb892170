//! Request dispatch: one normalized payload in, one HTTP POST out, one decoded
//! response (or typed error) back.

use crate::config::ServiceConfig;
use crate::input::Normalized;
use crate::registry::{Api, EndpointSpec};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::types::EndpointResponse;
use crate::{CallOptions, Error, ErrorContext, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Protocol version sent in the `version-number` header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CLIENT_LIB: &str = "rust";
pub const API_KEY_HEADER: &str = "X-ApiKey";
pub const WARNING_HEADER: &str = "x-warning";

/// A fully specified call, built fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub api: Api,
    /// `None` for operations without a payload.
    pub data: Option<Value>,
    pub batch: bool,
    pub options: CallOptions,
    /// Extra query parameters (e.g. the multi-API `apis` list).
    pub query: Vec<(String, String)>,
}

impl EndpointRequest {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            data: None,
            batch: false,
            options: CallOptions::default(),
            query: Vec::new(),
        }
    }

    pub fn with_payload(mut self, normalized: Normalized) -> Self {
        self.data = Some(normalized.data);
        self.batch = normalized.batch;
        self
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.params.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn spec(&self) -> EndpointSpec {
        self.api.spec()
    }
}

/// Resolves hosts, enforces the private-cloud rule, sends the request and interprets
/// the response. Stateless apart from the immutable config.
pub struct Dispatcher {
    config: ServiceConfig,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Cloud for this call: the per-call override, else the configured one.
    fn resolve_cloud<'a>(&'a self, request: &'a EndpointRequest) -> Option<&'a str> {
        request
            .options
            .cloud
            .as_deref()
            .or(self.config.cloud.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    fn resolve_api_key<'a>(&'a self, request: &'a EndpointRequest) -> Option<&'a str> {
        request
            .options
            .api_key
            .as_deref()
            .or(self.config.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Checks that need no network: batch support and the private-cloud rule.
    fn preflight(&self, request: &EndpointRequest) -> Result<()> {
        let spec = request.spec();
        if request.batch && !spec.batch_capable {
            return Err(Error::validation_with_context(
                format!("Api '{}' does not accept batches", request.api),
                ErrorContext::new()
                    .with_field_path("data")
                    .with_source("dispatcher"),
            ));
        }
        if spec.private_only && self.resolve_cloud(request).is_none() {
            return Err(Error::configuration_with_context(
                format!("Api '{}' is only available on private cloud", request.api),
                ErrorContext::new()
                    .with_field_path("cloud")
                    .with_details("set a cloud in ServiceConfig, INDICO_CLOUD or CallOptions")
                    .with_source("dispatcher"),
            ));
        }
        if request.options.params.contains_key("data") {
            return Err(Error::validation_with_context(
                "'data' is reserved for the payload",
                ErrorContext::new()
                    .with_field_path("params.data")
                    .with_source("dispatcher"),
            ));
        }
        Ok(())
    }

    /// `{base}/{api}[/batch][/{method}]?version=..&...`
    pub fn build_url(&self, request: &EndpointRequest) -> Result<String> {
        let spec = request.spec();
        let base = self.config.base_url(self.resolve_cloud(request));
        let mut url = Url::parse(&base).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid service URL '{}': {}", base, e),
                ErrorContext::new().with_source("dispatcher"),
            )
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration_with_context(
                    format!("Service URL '{}' cannot carry a path", base),
                    ErrorContext::new().with_source("dispatcher"),
                )
            })?;
            segments.pop_if_empty();
            segments.extend(spec.path.split('/'));
            if request.batch {
                segments.push("batch");
            }
            if let Some(method) = spec.method {
                segments.push(method);
            }
        }

        let version = request
            .options
            .version
            .as_deref()
            .filter(|v| !v.is_empty());
        if version.is_some() || !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &request.query {
                pairs.append_pair(k, v);
            }
            if let Some(v) = version {
                pairs.append_pair("version", v);
            }
        }

        Ok(url.into())
    }

    fn build_body(&self, request: &EndpointRequest) -> Value {
        let mut body = Map::new();
        for (k, v) in &request.options.params {
            body.insert(k.clone(), v.clone());
        }
        if let Some(data) = &request.data {
            body.insert("data".to_string(), data.clone());
        }
        Value::Object(body)
    }

    fn build_headers(&self, request: &EndpointRequest, request_id: &str) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("client-lib".to_string(), CLIENT_LIB.to_string()),
            ("version-number".to_string(), CLIENT_VERSION.to_string()),
            ("x-request-id".to_string(), request_id.to_string()),
        ];
        if let Some(key) = self.resolve_api_key(request) {
            headers.push((API_KEY_HEADER.to_string(), key.to_string()));
        }
        headers
    }

    /// Send one request. Exactly one network call on success or service error, none
    /// when a local check fails.
    pub fn dispatch(&self, request: &EndpointRequest) -> Result<EndpointResponse> {
        self.preflight(request)?;

        let request_id = Uuid::new_v4().to_string();
        let http_request = HttpRequest {
            url: self.build_url(request)?,
            headers: self.build_headers(request, &request_id),
            body: self.build_body(request),
        };

        debug!(
            api = request.api.name(),
            batch = request.batch,
            url = http_request.url.as_str(),
            request_id = request_id.as_str(),
            "indicoio dispatching request"
        );

        let start = std::time::Instant::now();
        let response = self.transport.post_json(&http_request).map_err(|e| {
            info!(
                api = request.api.name(),
                duration_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "indicoio request did not reach the service"
            );
            Error::Transport(e)
        })?;

        debug!(
            api = request.api.name(),
            http_status = response.status,
            duration_ms = start.elapsed().as_millis() as u64,
            "indicoio response received"
        );

        self.interpret(request, response, request_id)
    }

    fn interpret(
        &self,
        request: &EndpointRequest,
        response: HttpResponse,
        request_id: String,
    ) -> Result<EndpointResponse> {
        let status = response.status;

        if !response.is_success() {
            let err = match self.resolve_cloud(request) {
                Some(cloud) if status == 503 => Error::service(
                    status,
                    format!(
                        "Private cloud '{}' does not include api '{}'",
                        cloud,
                        request.spec().path
                    ),
                ),
                _ => Error::service(status, error_message_from_body(status, &response.body)),
            };
            info!(
                api = request.api.name(),
                http_status = status,
                request_id = request_id.as_str(),
                "indicoio request failed"
            );
            return Err(err);
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| {
            Error::malformed(status, format!("response body is not JSON: {}", e))
        })?;

        let warnings: Vec<String> = response
            .header(WARNING_HEADER)
            .map(|w| vec![w.to_string()])
            .unwrap_or_default();
        for warning in &warnings {
            warn!(api = request.api.name(), "{}", warning);
        }

        let results = match body {
            Value::Object(mut obj) => {
                if let Some(results) = obj.remove("results") {
                    results
                } else if let Some(error) = obj.get("error") {
                    return Err(Error::service(status, error_text(error)));
                } else {
                    Value::Object(obj)
                }
            }
            other => other,
        };

        Ok(EndpointResponse {
            status,
            results,
            warnings,
            request_id,
        })
    }
}

fn error_text(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

/// Server-supplied message of an error response, or the raw status and text.
fn error_message_from_body(status: u16, body: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        if let Some(error) = obj.get("error") {
            return error_text(error);
        }
        if let Some(message) = obj.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    let text = body.trim();
    if text.is_empty() {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown status")
            .to_string()
    } else {
        text.to_string()
    }
}
