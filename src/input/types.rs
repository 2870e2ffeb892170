//! Caller-facing input types.

use base64::Engine as _;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One item or a batch of items.
///
/// The caller states the intent; nothing downstream re-guesses it from the shape of
/// the data. `&str`/`String` convert to [`Input::Single`], vectors, slices and arrays
/// convert to [`Input::Batch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> Input<T> {
    pub fn is_batch(&self) -> bool {
        matches!(self, Input::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Input::Single(_) => 1,
            Input::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> &[T] {
        match self {
            Input::Single(item) => std::slice::from_ref(item),
            Input::Batch(items) => items,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Input<U> {
        match self {
            Input::Single(item) => Input::Single(f(item)),
            Input::Batch(items) => Input::Batch(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<Vec<T>> for Input<T> {
    fn from(items: Vec<T>) -> Self {
        Input::Batch(items)
    }
}

impl From<&str> for Input<String> {
    fn from(text: &str) -> Self {
        Input::Single(text.to_string())
    }
}

impl From<String> for Input<String> {
    fn from(text: String) -> Self {
        Input::Single(text)
    }
}

impl From<&String> for Input<String> {
    fn from(text: &String) -> Self {
        Input::Single(text.clone())
    }
}

impl From<Vec<&str>> for Input<String> {
    fn from(texts: Vec<&str>) -> Self {
        Input::Batch(texts.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Input<String> {
    fn from(texts: &[&str]) -> Self {
        Input::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

impl From<&[String]> for Input<String> {
    fn from(texts: &[String]) -> Self {
        Input::Batch(texts.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Input<String> {
    fn from(texts: [&str; N]) -> Self {
        Input::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

/// An image, by reference or by content.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    /// Fetched by the service.
    Url(String),
    /// Base64 (or data-URI) text, sent as-is.
    Inline(String),
    /// Encoded image bytes; base64-encoded before sending.
    Bytes(Vec<u8>),
    /// Image file read at request time.
    Path(PathBuf),
    /// Raw grayscale pixel values, row-major.
    Pixels(Vec<f64>),
}

impl ImageInput {
    /// Classify a string: URLs become [`ImageInput::Url`], anything else is inline content.
    pub fn from_string(s: impl Into<String>) -> Self {
        let s = s.into();
        if super::normalize::is_url(&s) {
            ImageInput::Url(s)
        } else {
            ImageInput::Inline(s)
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        ImageInput::Url(url.into())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        ImageInput::Path(path.as_ref().to_path_buf())
    }

    pub fn is_url(&self) -> bool {
        matches!(self, ImageInput::Url(_))
    }

    pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }
}

impl From<&str> for ImageInput {
    fn from(s: &str) -> Self {
        ImageInput::from_string(s)
    }
}

impl From<String> for ImageInput {
    fn from(s: String) -> Self {
        ImageInput::from_string(s)
    }
}

impl From<Vec<f64>> for ImageInput {
    fn from(pixels: Vec<f64>) -> Self {
        ImageInput::Pixels(pixels)
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        ImageInput::Path(path)
    }
}

impl From<ImageInput> for Input<ImageInput> {
    fn from(image: ImageInput) -> Self {
        Input::Single(image)
    }
}

impl From<&str> for Input<ImageInput> {
    fn from(s: &str) -> Self {
        Input::Single(ImageInput::from_string(s))
    }
}

impl From<Vec<&str>> for Input<ImageInput> {
    fn from(items: Vec<&str>) -> Self {
        Input::Batch(items.into_iter().map(ImageInput::from_string).collect())
    }
}

impl From<Vec<Vec<f64>>> for Input<ImageInput> {
    fn from(images: Vec<Vec<f64>>) -> Self {
        Input::Batch(images.into_iter().map(ImageInput::Pixels).collect())
    }
}

/// Collection input: text or an image.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(String),
    Image(ImageInput),
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_string())
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

impl From<ImageInput> for Item {
    fn from(image: ImageInput) -> Self {
        Item::Image(image)
    }
}

impl From<&str> for Input<Item> {
    fn from(text: &str) -> Self {
        Input::Single(Item::from(text))
    }
}

impl From<Item> for Input<Item> {
    fn from(item: Item) -> Self {
        Input::Single(item)
    }
}

impl From<ImageInput> for Input<Item> {
    fn from(image: ImageInput) -> Self {
        Input::Single(Item::Image(image))
    }
}

impl From<Vec<&str>> for Input<Item> {
    fn from(texts: Vec<&str>) -> Self {
        Input::Batch(texts.into_iter().map(Item::from).collect())
    }
}

/// Training target: a category or a numeric score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Target {
    Label(String),
    Score(f64),
}

impl From<&str> for Target {
    fn from(label: &str) -> Self {
        Target::Label(label.to_string())
    }
}

impl From<String> for Target {
    fn from(label: String) -> Self {
        Target::Label(label)
    }
}

impl From<f64> for Target {
    fn from(score: f64) -> Self {
        Target::Score(score)
    }
}

/// One training example, serialized as `[item, target]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub item: Item,
    pub target: Target,
}

impl LabeledExample {
    pub fn new(item: impl Into<Item>, target: impl Into<Target>) -> Self {
        Self {
            item: item.into(),
            target: target.into(),
        }
    }
}

impl From<LabeledExample> for Input<LabeledExample> {
    fn from(example: LabeledExample) -> Self {
        Input::Single(example)
    }
}

impl<T: Into<Target>> From<(&str, T)> for LabeledExample {
    fn from((text, target): (&str, T)) -> Self {
        LabeledExample::new(text, target)
    }
}

impl<T: Into<Target>> From<(&str, T)> for Input<LabeledExample> {
    fn from(pair: (&str, T)) -> Self {
        Input::Single(pair.into())
    }
}
