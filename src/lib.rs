//! # wsdot-client
//!
//! Typed request pipeline for the Washington State Department of Transportation
//! REST APIs (ferries and highway conditions).
//!
//! ## Overview
//!
//! Every call goes through the same fixed sequence: validate the caller's parameters,
//! build the URL (path templates, wire dates, access credential), fetch through a
//! transport strategy, interpret the body, validate the result. Any failure along the
//! way surfaces as exactly one [`ApiError`] carrying an [`ErrorCode`] and the context
//! of the call.
//!
//! ## Key Features
//!
//! - **Endpoint descriptors**: [`Endpoint`] pairs a path template with optional JSON Schemas
//! - **Wire dates**: [`protocol::date`] decodes `/Date(ms±zzzz)/` and encodes `YYYY-MM-DD`
//! - **Two transports**: direct HTTP or cross-origin script injection, picked per runtime
//! - **One error shape**: [`ApiError`] with a stable code, message, and context
//! - **Built-in catalog**: [`registry`] ships descriptors for common ferries/highway operations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wsdot_client::{registry, Params, WsdotClient};
//!
//! #[tokio::main]
//! async fn main() -> wsdot_client::Result<()> {
//!     let client = WsdotClient::builder()
//!         .access_code("your-access-code")
//!         .build()
//!         .expect("client configuration");
//!
//!     let vessel = registry::find("vessels.vesselBasicsById").expect("built-in endpoint");
//!     let value = client.execute(vessel, Params::new().with("vesselId", 32)).await?;
//!     println!("{}", value);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, pipeline execution, error normalization |
//! | [`protocol`] | Endpoint descriptors, schemas, URL building, date codec |
//! | [`pipeline`] | Stage overview and response interpretation |
//! | [`transport`] | Strategy selection, direct HTTP, cross-origin injection |
//! | [`registry`] | Built-in endpoint catalog |
//! | [`models`] | Typed payloads for catalog endpoints |

pub mod client;
pub mod context;
pub mod error_code;
pub mod models;
pub mod pipeline;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use client::{ClientConfig, ConfigError, WsdotClient, WsdotClientBuilder};
pub use context::{CallStage, LogMode};
pub use error_code::ErrorCode;
pub use protocol::{ApiFamily, Endpoint, ParamValue, Params};
pub use transport::{RuntimeEnvironment, TransportKind};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error type for the library
pub mod error;
pub use error::{ApiError, ErrorContext};
