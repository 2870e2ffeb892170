//! Text endpoints.

use super::core::Client;
use super::options::CallOptions;
use crate::input::Input;
use crate::registry::Api;
use crate::types::Output;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;

impl Client {
    /// Positive-sentiment probability in `[0, 1]`.
    pub fn sentiment(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<f64>> {
        self.predict(Api::Sentiment, &input.into(), options)
    }

    /// Higher-accuracy (slower) sentiment model.
    pub fn sentiment_hq(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<f64>> {
        self.predict(Api::SentimentHq, &input.into(), options)
    }

    /// Political leaning probabilities keyed by party.
    pub fn political(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, f64>>> {
        self.predict(Api::Political, &input.into(), options)
    }

    /// Language probabilities keyed by language name.
    pub fn language(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, f64>>> {
        self.predict(Api::Language, &input.into(), options)
    }

    /// Topic tag probabilities. Accepts `top_n` and `threshold` params.
    pub fn text_tags(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, f64>>> {
        self.predict(Api::TextTags, &input.into(), options)
    }

    /// Keyword relevance scores. Accepts `top_n` and `threshold` params.
    pub fn keywords(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, f64>>> {
        self.predict(Api::Keywords, &input.into(), options)
    }

    pub fn named_entities(
        &self,
        input: impl Into<Input<String>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, Value>>> {
        self.predict(Api::NamedEntities, &input.into(), options)
    }
}
