//! Custom collections: caller-trained models on a private cloud.

use super::core::Client;
use super::dispatch::EndpointRequest;
use super::options::CallOptions;
use crate::input::{normalize, Input, Item, LabeledExample, Payload};
use crate::registry::Api;
use crate::types::{CollectionInfo, Output};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A handle bound to one named collection.
///
/// Holds no remote state; every method is one request (or, for [`Collection::wait`],
/// a sequence of `collections` lookups).
pub struct Collection<'a> {
    client: &'a Client,
    name: String,
}

impl Client {
    pub fn collection(&self, name: impl Into<String>) -> Collection<'_> {
        Collection {
            client: self,
            name: name.into(),
        }
    }

    /// Status of every collection on the resolved private cloud, keyed by name.
    pub fn collections(&self, options: &CallOptions) -> Result<HashMap<String, CollectionInfo>> {
        let request = EndpointRequest::new(Api::Collections).with_options(options.clone());
        let response = self.dispatch(&request)?;
        let status = response.status;
        serde_json::from_value(response.results).map_err(|e| {
            Error::malformed(status, format!("unexpected collections listing: {}", e))
        })
    }

    /// Legacy self-train endpoint: upload labeled examples to the account's default model.
    pub fn train_example(
        &self,
        examples: impl Into<Input<LabeledExample>>,
        options: &CallOptions,
    ) -> Result<Value> {
        self.send_items(Api::TrainExample, &examples.into(), options, None)
    }

    /// Legacy listing of labels known to the account's default model.
    pub fn labels(&self, options: &CallOptions) -> Result<Value> {
        let request = EndpointRequest::new(Api::Labels).with_options(options.clone());
        Ok(self.dispatch(&request)?.results)
    }

    /// Normalize and send `input`, returning the raw results. An empty batch answers
    /// `[]` locally.
    fn send_items<T: Payload>(
        &self,
        api: Api,
        input: &Input<T>,
        options: &CallOptions,
        collection: Option<&str>,
    ) -> Result<Value> {
        let normalized = normalize(input, api.spec().item)?;
        if normalized.batch && normalized.len == 0 {
            return Ok(Value::Array(Vec::new()));
        }
        let mut request = EndpointRequest::new(api)
            .with_payload(normalized)
            .with_options(options.clone());
        if let Some(name) = collection {
            request = request.with_param("collection", name);
        }
        Ok(self.dispatch(&request)?.results)
    }
}

impl<'a> Collection<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn request(&self, api: Api, options: &CallOptions) -> EndpointRequest {
        EndpointRequest::new(api)
            .with_options(options.clone())
            .with_param("collection", self.name.as_str())
    }

    /// Upload `[item, target]` training examples.
    pub fn add_data(
        &self,
        examples: impl Into<Input<LabeledExample>>,
        options: &CallOptions,
    ) -> Result<Value> {
        self.client
            .send_items(Api::AddData, &examples.into(), options, Some(&self.name))
    }

    /// Start training on the examples uploaded so far.
    ///
    /// The service expects the collection name as the payload as well.
    pub fn train(&self, options: &CallOptions) -> Result<Value> {
        let mut request = self.request(Api::TrainCollection, options);
        request.data = Some(Value::String(self.name.clone()));
        Ok(self.client.dispatch(&request)?.results)
    }

    /// Predict with the trained model. Text and images are both accepted.
    pub fn predict(
        &self,
        input: impl Into<Input<Item>>,
        options: &CallOptions,
    ) -> Result<Output<Value>> {
        let normalized = normalize(&input.into(), Api::PredictCollection.spec().item)?;
        if normalized.batch && normalized.len == 0 {
            return Ok(Output::Batch(Vec::new()));
        }
        let batch = normalized.batch;
        let request = self
            .request(Api::PredictCollection, options)
            .with_payload(normalized);
        self.client.dispatch(&request)?.decode(batch)
    }

    /// Drop every example and the trained model. Not reversible.
    pub fn clear(&self, options: &CallOptions) -> Result<Value> {
        Ok(self
            .client
            .dispatch(&self.request(Api::ClearCollection, options))?
            .results)
    }

    pub fn remove_example(
        &self,
        input: impl Into<Input<Item>>,
        options: &CallOptions,
    ) -> Result<Value> {
        self.client
            .send_items(Api::RemoveExample, &input.into(), options, Some(&self.name))
    }

    /// This collection's entry in [`Client::collections`], if it exists yet.
    pub fn info(&self, options: &CallOptions) -> Result<Option<CollectionInfo>> {
        Ok(self.client.collections(options)?.remove(&self.name))
    }

    /// Poll [`Collection::info`] every `interval` until the status is `ready`.
    ///
    /// Fails with a runtime error once `timeout` has elapsed. `Duration::MAX` waits
    /// without a deadline.
    pub fn wait(
        &self,
        interval: Duration,
        timeout: Duration,
        options: &CallOptions,
    ) -> Result<CollectionInfo> {
        // `None` when the timeout is too large to represent: poll until ready.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let info = self.info(options)?;
            let status = info.as_ref().and_then(|i| i.status.clone());
            if let Some(info) = info.filter(CollectionInfo::is_ready) {
                return Ok(info);
            }
            debug!(
                collection = self.name.as_str(),
                status = status.as_deref().unwrap_or("missing"),
                "collection not ready"
            );

            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            if remaining.is_some_and(|r| r.is_zero()) {
                return Err(Error::runtime_with_context(
                    format!("collection '{}' was not ready within {:?}", self.name, timeout),
                    ErrorContext::new()
                        .with_details(format!(
                            "last status: {}",
                            status.as_deref().unwrap_or("missing")
                        ))
                        .with_source("collection"),
                ));
            }
            std::thread::sleep(remaining.map_or(interval, |r| interval.min(r)));
        }
    }
}
