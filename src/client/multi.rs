//! Several analyses of the same input in one request.

use super::core::Client;
use super::dispatch::EndpointRequest;
use super::options::CallOptions;
use crate::input::{normalize, ImageInput, Input, Payload};
use crate::registry::Api;
use crate::types::Output;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::collections::HashMap;

impl Client {
    /// Run several text analyses at once. Results are keyed by [`Api::name`].
    pub fn predict_text(
        &self,
        input: impl Into<Input<String>>,
        apis: &[Api],
        options: &CallOptions,
    ) -> Result<HashMap<String, Output<Value>>> {
        self.predict_multi(Api::MultiText, &input.into(), apis, Api::is_multi_text_member, options)
    }

    /// Run several image analyses at once. Results are keyed by [`Api::name`].
    pub fn predict_image(
        &self,
        input: impl Into<Input<ImageInput>>,
        apis: &[Api],
        options: &CallOptions,
    ) -> Result<HashMap<String, Output<Value>>> {
        self.predict_multi(Api::MultiImage, &input.into(), apis, Api::is_multi_image_member, options)
    }

    fn predict_multi<T: Payload>(
        &self,
        api: Api,
        input: &Input<T>,
        apis: &[Api],
        member: fn(Api) -> bool,
        options: &CallOptions,
    ) -> Result<HashMap<String, Output<Value>>> {
        if apis.is_empty() {
            return Err(Error::validation_with_context(
                "at least one api is required",
                ErrorContext::new()
                    .with_field_path("apis")
                    .with_source("multi"),
            ));
        }
        if let Some(bad) = apis.iter().find(|a| !member(**a)) {
            return Err(Error::validation_with_context(
                format!("Api '{}' cannot be combined in {}", bad, api),
                ErrorContext::new()
                    .with_field_path("apis")
                    .with_source("multi"),
            ));
        }

        let normalized = normalize(input, api.spec().item)?;
        let batch = normalized.batch;
        if batch && normalized.len == 0 {
            return Ok(apis
                .iter()
                .map(|a| (a.name().to_string(), Output::Batch(Vec::new())))
                .collect());
        }

        let names: Vec<&str> = apis.iter().map(|a| a.name()).collect();
        let request = EndpointRequest::new(api)
            .with_payload(normalized)
            .with_options(options.clone())
            .with_query("apis", names.join(","));
        let response = self.dispatch(&request)?;
        split_results(response.status, response.results, &names, batch)
    }
}

/// Unwrap each api's own `results`/`error` envelope.
fn split_results(
    status: u16,
    results: Value,
    names: &[&str],
    batch: bool,
) -> Result<HashMap<String, Output<Value>>> {
    let Value::Object(mut by_api) = results else {
        return Err(Error::malformed(status, "multi-api results must be an object"));
    };

    let mut out = HashMap::with_capacity(names.len());
    for name in names {
        let entry = by_api.remove(*name).ok_or_else(|| {
            Error::malformed(status, format!("multi-api results are missing '{}'", name))
        })?;
        let value = match entry {
            Value::Object(mut obj) if obj.contains_key("results") || obj.contains_key("error") => {
                if let Some(error) = obj.remove("error").filter(|e| !e.is_null()) {
                    let message = error
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string());
                    return Err(Error::service(status, format!("{}: {}", name, message)));
                }
                obj.remove("results").unwrap_or(Value::Null)
            }
            other => other,
        };
        let output = if batch {
            match value {
                Value::Array(items) => Output::Batch(items),
                _ => {
                    return Err(Error::malformed(
                        status,
                        format!("batch results for '{}' must be a list", name),
                    ))
                }
            }
        } else {
            Output::Single(value)
        };
        out.insert(name.to_string(), output);
    }
    Ok(out)
}
