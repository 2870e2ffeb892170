//! Turns caller input into the `data` value of a request.
//!
//! Two entry points:
//! - [`normalize`] for typed [`Input`] values, where the caller already said whether
//!   it is a batch.
//! - [`normalize_value`] for loosely typed JSON (the CLI), where batch-ness is
//!   inferred once by [`infer_batch`] from the endpoint's declared [`ItemShape`].

use super::types::{ImageInput, Input, Item, LabeledExample, Target};
use crate::registry::ItemShape;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("URL pattern is valid")
});

/// Whether `s` looks like an HTTP(S) URL. Anything else is treated as inline content.
pub fn is_url(s: &str) -> bool {
    URL_PATTERN.is_match(s.trim())
}

/// How an image item reaches the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// The service downloads it.
    Reference,
    /// The bytes travel in the request.
    Content,
}

/// A request payload ready for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub data: Value,
    pub batch: bool,
    pub len: usize,
    /// Set when every image item shares one mode.
    pub image_mode: Option<ImageMode>,
}

/// An item type that can be placed in a request body.
pub trait Payload {
    /// Serialize one item, validating it against the endpoint's item shape.
    fn to_data(&self, shape: ItemShape, field: &str) -> Result<Value>;

    /// Image mode for image-like items, `None` for text.
    fn image_mode(&self) -> Option<ImageMode> {
        None
    }
}

impl Payload for String {
    fn to_data(&self, _shape: ItemShape, _field: &str) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Payload for ImageInput {
    fn to_data(&self, shape: ItemShape, field: &str) -> Result<Value> {
        let expected = match shape {
            ItemShape::Image { pixels } => pixels,
            _ => None,
        };
        match self {
            ImageInput::Url(url) => Ok(Value::String(url.trim().to_string())),
            ImageInput::Inline(content) => Ok(Value::String(content.clone())),
            ImageInput::Bytes(bytes) => Ok(Value::String(ImageInput::encode_bytes(bytes))),
            ImageInput::Path(path) => {
                let bytes = std::fs::read(path)?;
                Ok(Value::String(ImageInput::encode_bytes(&bytes)))
            }
            ImageInput::Pixels(values) => pixels_to_data(values, expected, field),
        }
    }

    fn image_mode(&self) -> Option<ImageMode> {
        Some(if self.is_url() {
            ImageMode::Reference
        } else {
            ImageMode::Content
        })
    }
}

impl Payload for Item {
    fn to_data(&self, shape: ItemShape, field: &str) -> Result<Value> {
        match self {
            Item::Text(text) => Ok(Value::String(text.clone())),
            Item::Image(image) => image.to_data(shape, field),
        }
    }

    fn image_mode(&self) -> Option<ImageMode> {
        match self {
            Item::Text(_) => None,
            Item::Image(image) => image.image_mode(),
        }
    }
}

impl Payload for LabeledExample {
    fn to_data(&self, shape: ItemShape, field: &str) -> Result<Value> {
        let item = self.item.to_data(shape, &format!("{}[0]", field))?;
        let target = match &self.target {
            Target::Label(label) => Value::String(label.clone()),
            Target::Score(score) => finite_number(*score, &format!("{}[1]", field))?,
        };
        Ok(Value::Array(vec![item, target]))
    }

    fn image_mode(&self) -> Option<ImageMode> {
        self.item.image_mode()
    }
}

fn finite_number(v: f64, field: &str) -> Result<Value> {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| {
            Error::validation_with_context(
                "non-finite number cannot be sent",
                ErrorContext::new()
                    .with_field_path(field)
                    .with_source("normalizer"),
            )
        })
}

fn pixels_to_data(values: &[f64], expected: Option<usize>, field: &str) -> Result<Value> {
    if values.is_empty() {
        return Err(Error::validation_with_context(
            "pixel array is empty",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("normalizer"),
        ));
    }
    if let Some(n) = expected {
        if values.len() != n {
            return Err(Error::validation_with_context(
                format!("expected {} pixel values, got {}", n, values.len()),
                ErrorContext::new()
                    .with_field_path(field)
                    .with_source("normalizer"),
            ));
        }
    }
    let mut out = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        out.push(finite_number(*v, &format!("{}[{}]", field, i))?);
    }
    Ok(Value::Array(out))
}

/// Reject batches that mix URL references with inline content.
fn common_mode<I>(modes: I) -> Result<Option<ImageMode>>
where
    I: IntoIterator<Item = (usize, Option<ImageMode>)>,
{
    let mut seen: Option<ImageMode> = None;
    for (idx, mode) in modes {
        let Some(mode) = mode else { continue };
        match seen {
            None => seen = Some(mode),
            Some(prev) if prev != mode => {
                return Err(Error::validation_with_context(
                    "batch mixes image URLs with inline image content",
                    ErrorContext::new()
                        .with_field_path(format!("data[{}]", idx))
                        .with_details("send URLs and inline images in separate batches")
                        .with_source("normalizer"),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(seen)
}

/// Normalize typed input for an endpoint with the given item shape.
pub fn normalize<T: Payload>(input: &Input<T>, shape: ItemShape) -> Result<Normalized> {
    match input {
        Input::Single(item) => Ok(Normalized {
            data: item.to_data(shape, "data")?,
            batch: false,
            len: 1,
            image_mode: item.image_mode(),
        }),
        Input::Batch(items) => {
            let image_mode =
                common_mode(items.iter().enumerate().map(|(i, it)| (i, it.image_mode())))?;
            let data = items
                .iter()
                .enumerate()
                .map(|(i, it)| it.to_data(shape, &format!("data[{}]", i)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Normalized {
                data: Value::Array(data),
                batch: true,
                len: items.len(),
                image_mode,
            })
        }
    }
}

/// Decide whether a loosely typed JSON payload is a batch for the given item shape.
///
/// - text: a string is one item, an array of strings is a batch
/// - image: a string is one item, an array starting with a number is one raw pixel
///   image, an array starting with a string or array is a batch
/// - labeled: an array starting with an array is a batch of `[item, target]` pairs,
///   any other array is one pair
///
/// Empty arrays are empty batches.
pub fn infer_batch(value: &Value, shape: ItemShape) -> Result<bool> {
    let shape_error = |what: &str| {
        Error::validation_with_context(
            format!("cannot use {} as input here", what),
            ErrorContext::new()
                .with_field_path("data")
                .with_details(format!("expected item shape {:?}", shape))
                .with_source("normalizer"),
        )
    };
    match (shape, value) {
        (ItemShape::None, Value::Null) => Ok(false),
        (ItemShape::None, _) => Err(shape_error("a payload")),
        (_, Value::Array(items)) if items.is_empty() => Ok(true),
        (ItemShape::Text, Value::String(_)) => Ok(false),
        (ItemShape::Text, Value::Array(items)) => {
            if items.iter().all(Value::is_string) {
                Ok(true)
            } else {
                Err(shape_error("a non-string list"))
            }
        }
        (ItemShape::Image { .. } | ItemShape::TextOrImage, Value::String(_)) => Ok(false),
        (ItemShape::Image { .. } | ItemShape::TextOrImage, Value::Array(items)) => {
            match &items[0] {
                Value::Number(_) => Ok(false),
                Value::String(_) | Value::Array(_) => Ok(true),
                _ => Err(shape_error("a list of this kind")),
            }
        }
        (ItemShape::Labeled, Value::Array(items)) => Ok(items[0].is_array()),
        (_, Value::Null) => Err(shape_error("null")),
        (_, Value::Bool(_)) => Err(shape_error("a boolean")),
        (_, Value::Number(_)) => Err(shape_error("a number")),
        (_, Value::Object(_)) => Err(shape_error("an object")),
        (ItemShape::Labeled, Value::String(_)) => Err(shape_error("a bare string")),
    }
}

fn image_from_value(value: &Value, field: &str) -> Result<ImageInput> {
    match value {
        Value::String(s) => Ok(ImageInput::from_string(s.as_str())),
        Value::Array(values) => values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    Error::validation_with_context(
                        "pixel values must be numbers",
                        ErrorContext::new()
                            .with_field_path(format!("{}[{}]", field, i))
                            .with_source("normalizer"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(ImageInput::Pixels),
        _ => Err(Error::validation_with_context(
            "image must be a string or a pixel array",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("normalizer"),
        )),
    }
}

fn text_from_value(value: &Value, field: &str) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        Error::validation_with_context(
            "text must be a string",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("normalizer"),
        )
    })
}

fn item_from_value(value: &Value, field: &str) -> Result<Item> {
    match value {
        Value::String(s) if is_url(s) => Ok(Item::Image(ImageInput::Url(s.clone()))),
        Value::String(s) => Ok(Item::Text(s.clone())),
        other => image_from_value(other, field).map(Item::Image),
    }
}

fn labeled_from_value(value: &Value, field: &str) -> Result<LabeledExample> {
    let pair = value.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
        Error::validation_with_context(
            "training example must be an [item, target] pair",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("normalizer"),
        )
    })?;
    let item = item_from_value(&pair[0], &format!("{}[0]", field))?;
    let target = match &pair[1] {
        Value::String(s) => Target::Label(s.clone()),
        Value::Number(n) => Target::Score(n.as_f64().unwrap_or_default()),
        _ => {
            return Err(Error::validation_with_context(
                "target must be a string or a number",
                ErrorContext::new()
                    .with_field_path(format!("{}[1]", field))
                    .with_source("normalizer"),
            ))
        }
    };
    Ok(LabeledExample { item, target })
}

fn typed_input<T, F>(value: &Value, batch: bool, convert: F) -> Result<Input<T>>
where
    F: Fn(&Value, &str) -> Result<T>,
{
    if batch {
        let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
        items
            .iter()
            .enumerate()
            .map(|(i, v)| convert(v, &format!("data[{}]", i)))
            .collect::<Result<Vec<_>>>()
            .map(Input::Batch)
    } else {
        convert(value, "data").map(Input::Single)
    }
}

/// Normalize untyped JSON input, inferring batch-ness from `shape`.
///
/// Returns `None` for shapes that take no payload.
pub fn normalize_value(value: &Value, shape: ItemShape) -> Result<Option<Normalized>> {
    let batch = infer_batch(value, shape)?;
    let normalized = match shape {
        ItemShape::None => return Ok(None),
        ItemShape::Text => normalize(&typed_input(value, batch, text_from_value)?, shape)?,
        ItemShape::Image { .. } => {
            normalize(&typed_input(value, batch, image_from_value)?, shape)?
        }
        ItemShape::TextOrImage => normalize(&typed_input(value, batch, item_from_value)?, shape)?,
        ItemShape::Labeled => normalize(&typed_input(value, batch, labeled_from_value)?, shape)?,
    };
    Ok(Some(normalized))
}
