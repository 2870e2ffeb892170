//! Decoded responses.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the dispatcher returns for a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    /// The `results` envelope content, or the whole body when there is no envelope.
    pub results: Value,
    /// Advisory `x-warning` messages. Never fatal.
    pub warnings: Vec<String>,
    /// Correlation id sent as `x-request-id`.
    pub request_id: String,
}

impl EndpointResponse {
    /// Decode the results into the typed shape matching the request.
    pub fn decode<T: DeserializeOwned>(self, batch: bool) -> Result<Output<T>> {
        let status = self.status;
        let mismatch = |e: serde_json::Error| {
            Error::malformed(status, format!("unexpected result shape: {}", e))
        };
        if batch {
            serde_json::from_value::<Vec<T>>(self.results)
                .map(Output::Batch)
                .map_err(mismatch)
        } else {
            serde_json::from_value::<T>(self.results)
                .map(Output::Single)
                .map_err(mismatch)
        }
    }
}

/// A typed result: one value, or one value per batch item in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Output<T> {
    Batch(Vec<T>),
    Single(T),
}

impl<T> Output<T> {
    pub fn is_batch(&self) -> bool {
        matches!(self, Output::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Output::Single(_) => 1,
            Output::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single value, or `None` for a batch.
    pub fn into_single(self) -> Option<T> {
        match self {
            Output::Single(v) => Some(v),
            Output::Batch(_) => None,
        }
    }

    /// All values; a single result becomes a one-element vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Output::Single(v) => vec![v],
            Output::Batch(items) => items,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Output<U> {
        match self {
            Output::Single(v) => Output::Single(f(v)),
            Output::Batch(items) => Output::Batch(items.into_iter().map(f).collect()),
        }
    }
}
