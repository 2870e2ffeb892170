//! Input normalization: batch detection and image URL/content classification.

pub mod normalize;
mod types;

pub use normalize::{infer_batch, is_url, normalize, normalize_value, ImageMode, Normalized, Payload};
pub use types::{ImageInput, Input, Item, LabeledExample, Target};
