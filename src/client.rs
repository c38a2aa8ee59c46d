//! Client entry point for the request pipeline.
//!
//! Keep the public surface small: build a [`WsdotClient`] once, then call
//! [`WsdotClient::execute`] or [`WsdotClient::fetch`] with an endpoint descriptor.
//! Stage implementations live in the submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;
mod execution;

pub use builder::{ClientConfig, ConfigError, WsdotClientBuilder};
pub use core::WsdotClient;
pub use error_classification::{normalize, Failure};
