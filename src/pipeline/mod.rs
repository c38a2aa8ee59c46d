//! # Request Pipeline
//!
//! Every call runs through the same fixed sequence of stages. Only the transport stage
//! suspends; the rest is synchronous computation over the call's inputs.
//!
//! ```text
//! Params ─▶ validate input ─▶ build URL ─▶ transport ─▶ interpret ─▶ validate output ─▶ Value
//!             │                 │            │             │              │
//!          JSON Schema      templates,    Direct or     JSON parse,    JSON Schema
//!                           wire dates,   CrossOrigin   error envelope
//!                           credential
//! ```
//!
//! A failure at any stage is normalized into a single [`crate::ApiError`] before it
//! reaches the caller (see [`crate::client::error_classification`]).
//!
//! | Stage | Module |
//! |-------|--------|
//! | input/output validation | [`crate::protocol::validator`] |
//! | URL construction | [`crate::protocol::request`] |
//! | transport | [`crate::transport`] |
//! | response interpretation | [`decode`] |

pub mod decode;

pub use decode::{envelope_message, interpret_response};
