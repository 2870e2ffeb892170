use crate::client::dispatch::{Dispatcher, EndpointRequest};
use crate::client::options::CallOptions;
use crate::config::ServiceConfig;
use crate::input::{normalize, normalize_value, Input, Payload};
use crate::registry::Api;
use crate::types::{EndpointResponse, Output};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Blocking client for the prediction service.
///
/// Cheap to share: it holds an immutable config and a thread-safe transport. Every
/// method issues at most one HTTP request.
pub struct Client {
    pub(crate) dispatcher: Dispatcher,
}

impl Client {
    /// Create a client from `.indicorc.yaml` files and `INDICO_*` environment variables.
    pub fn new() -> Result<Self> {
        crate::client::builder::ClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::ClientBuilder {
        crate::client::builder::ClientBuilder::new()
    }

    pub fn config(&self) -> &ServiceConfig {
        self.dispatcher.config()
    }

    /// Send a prepared request as-is.
    ///
    /// This is the lowest-level entry point; it exposes advisory warnings through
    /// [`EndpointResponse::warnings`].
    pub fn dispatch(&self, request: &EndpointRequest) -> Result<EndpointResponse> {
        self.dispatcher.dispatch(request)
    }

    /// Normalize, send, and decode one payload-carrying call.
    pub(crate) fn predict<T, R>(
        &self,
        api: Api,
        input: &Input<T>,
        options: &CallOptions,
    ) -> Result<Output<R>>
    where
        T: Payload,
        R: DeserializeOwned,
    {
        let normalized = normalize(input, api.spec().item)?;
        if normalized.batch && normalized.len == 0 {
            return Ok(Output::Batch(Vec::new()));
        }
        let batch = normalized.batch;
        let request = EndpointRequest::new(api)
            .with_payload(normalized)
            .with_options(options.clone());
        self.dispatch(&request)?.decode(batch)
    }

    /// Call any single-endpoint operation with loosely typed JSON input.
    ///
    /// Batch-ness is inferred from the endpoint's item shape (see
    /// [`crate::input::infer_batch`]). Multi-API operations need an API list and are
    /// not accepted here; use [`Client::predict_text`] or [`Client::predict_image`].
    pub fn predict_value(
        &self,
        api: Api,
        input: &Value,
        options: &CallOptions,
    ) -> Result<Output<Value>> {
        if matches!(api, Api::MultiText | Api::MultiImage) {
            return Err(Error::validation_with_context(
                format!("Api '{}' needs a list of apis", api),
                ErrorContext::new().with_source("client"),
            ));
        }
        let request = EndpointRequest::new(api).with_options(options.clone());
        match normalize_value(input, api.spec().item)? {
            Some(n) if n.batch && n.len == 0 => Ok(Output::Batch(Vec::new())),
            Some(n) => {
                let batch = n.batch;
                self.dispatch(&request.with_payload(n))?.decode(batch)
            }
            None => self.dispatch(&request)?.decode(false),
        }
    }
}
