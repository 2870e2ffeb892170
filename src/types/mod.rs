//! Result types returned by the client.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EndpointResponse`] | Raw dispatcher result: unwrapped `results` plus advisory warnings |
//! | [`Output`] | Typed result mirroring the single/batch shape of the input |
//! | [`CollectionInfo`] | Status of a trained collection |

pub mod collection;
pub mod response;

pub use collection::CollectionInfo;
pub use response::{EndpointResponse, Output};
