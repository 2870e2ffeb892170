//! # indicoio
//!
//! Blocking client for the indico prediction service: text and image analysis,
//! multi-API requests, and custom collections trained on a private cloud.
//!
//! ## Overview
//!
//! Every remote operation is a single JSON POST. The client normalizes the caller's
//! input (single item or batch, image URL or inline content), routes it to the public
//! host or the caller's private cloud, and unwraps the service's `results` envelope
//! into a typed [`Output`]. Failures are reported as one [`Error`] taxonomy, never
//! retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use indicoio::{CallOptions, Client};
//!
//! fn main() -> indicoio::Result<()> {
//!     let client = Client::builder().api_key("your-api-key").build()?;
//!
//!     let score = client.sentiment("what a great day", &CallOptions::new())?;
//!     println!("{:?}", score.into_single());
//!
//!     let scores = client.sentiment(vec!["good", "bad"], &CallOptions::new())?;
//!     println!("{:?}", scores.into_vec());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The [`Client`], its builder, per-call options and the request dispatcher |
//! | [`config`] | API key, private cloud and host resolution from files and environment |
//! | [`input`] | Input normalization: batch detection and image classification |
//! | [`registry`] | Static endpoint table: paths, item shapes, private-only flags |
//! | [`transport`] | Blocking HTTP transport behind a swappable trait |
//! | [`types`] | Decoded responses and collection status |

pub mod client;
pub mod config;
pub mod input;
pub mod registry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{CallOptions, Client, ClientBuilder, Collection, Dispatcher, EndpointRequest};
pub use config::ServiceConfig;
pub use input::{ImageInput, Input, Item, LabeledExample, Target};
pub use registry::{Api, EndpointSpec, ItemShape};
pub use types::{CollectionInfo, EndpointResponse, Output};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
