//! # Endpoint Description Layer
//!
//! Everything the pipeline needs to know about an API operation before touching the
//! network: the descriptor itself, its schemas, how parameters become a URL, and how
//! dates travel on the wire.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`endpoint`] | Endpoint descriptors and API families |
//! | [`schema`] | Lazily compiled JSON Schemas |
//! | [`validator`] | Input/output validation gate |
//! | [`request`] | Parameters, template interpolation, credential handling |
//! | [`date`] | Wire date codec and serde adapters |
//!
//! ## Example
//!
//! ```rust
//! use wsdot_client::protocol::{finalize, interpolate, ApiFamily, Params};
//!
//! let params = Params::new().with("vesselId", 32);
//! let path = interpolate("/vesselbasics/{vesselId}", &params, ApiFamily::Ferries).unwrap();
//! let url = finalize(&path, "https://www.wsdot.wa.gov/ferries/api/vessels/rest", ApiFamily::Ferries, "KEY");
//! assert_eq!(url, "https://www.wsdot.wa.gov/ferries/api/vessels/rest/vesselbasics/32?apiaccesscode=KEY");
//! ```

pub mod date;
pub mod endpoint;
pub mod request;
pub mod schema;
pub mod validator;

pub use date::{decode_from_wire, encode_for_wire};
pub use endpoint::{ApiFamily, Endpoint};
pub use request::{finalize, interpolate, ParamValue, Params, TemplateError};
pub use schema::Schema;
pub use validator::{validate_input, validate_output};
