//! Image endpoints.
//!
//! Every method accepts URLs, inline base64, encoded bytes, file paths or raw pixel
//! arrays through [`ImageInput`]. A batch must be all URLs or all inline content.

use super::core::Client;
use super::options::CallOptions;
use crate::input::{ImageInput, Input};
use crate::registry::Api;
use crate::types::Output;
use crate::Result;
use std::collections::HashMap;

impl Client {
    /// Facial emotion probabilities for a 48×48 face crop.
    pub fn fer(
        &self,
        input: impl Into<Input<ImageInput>>,
        options: &CallOptions,
    ) -> Result<Output<HashMap<String, f64>>> {
        self.predict(Api::Fer, &input.into(), options)
    }

    /// Feature vector for a 48×48 face crop.
    pub fn facial_features(
        &self,
        input: impl Into<Input<ImageInput>>,
        options: &CallOptions,
    ) -> Result<Output<Vec<f64>>> {
        self.predict(Api::FacialFeatures, &input.into(), options)
    }

    /// General-purpose image feature vector.
    pub fn image_features(
        &self,
        input: impl Into<Input<ImageInput>>,
        options: &CallOptions,
    ) -> Result<Output<Vec<f64>>> {
        self.predict(Api::ImageFeatures, &input.into(), options)
    }

    /// Probability that an image is not safe for work.
    pub fn content_filtering(
        &self,
        input: impl Into<Input<ImageInput>>,
        options: &CallOptions,
    ) -> Result<Output<f64>> {
        self.predict(Api::ContentFiltering, &input.into(), options)
    }
}
