//! Client for the prediction service.
//!
//! Keep the public surface small and predictable: one [`Client`], per-call
//! [`CallOptions`], and one method per remote operation. Implementation details are
//! split into submodules under `src/client/`.

pub mod builder;
mod collection;
pub mod core;
pub mod dispatch;
mod image;
mod multi;
pub mod options;
mod text;

pub use builder::ClientBuilder;
pub use collection::Collection;
pub use core::Client;
pub use dispatch::{Dispatcher, EndpointRequest};
pub use options::CallOptions;
