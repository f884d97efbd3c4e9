//! Request-input disinfection for web services.
//!
//! This crate sanitizes the untrusted, arbitrarily nested values of a request
//! (query parameters, route parameters and body) before application code sees
//! them. Each input runs through an ordered pipeline:
//!
//! 1. **Markup stripping** of every string leaf (`disinfectQuery`/`Params`/`Payload`)
//! 2. **Generic hook** shared by all inputs
//! 3. **Class hook** for query, params or payload
//! 4. **Whitespace elision** of top-level whitespace-only strings (`deleteWhitespace`)
//! 5. **Empty elision** of top-level `""` and `null` entries (`deleteEmpty`)
//!
//! Arrays stay arrays and objects stay objects at every depth; only string
//! leaves are rewritten.
//!
//! # Core Types
//!
//! - [`Config`]: Registration-time settings, immutable once built
//! - [`RouteOverride`]: Per-route overlay, or the disabled sentinel
//! - [`Disinfect`]: The registered filter, applied once per request
//! - [`MarkupSanitizer`]: Seam for the HTML-stripping primitive
//!
//! # Examples
//!
//! ```
//! use disinfect::{Config, Disinfect, RequestInputs, RouteOverride};
//! use serde_json::json;
//!
//! let filter = Disinfect::new(
//!     Config::builder()
//!         .disinfect_payload(true)
//!         .delete_empty(true)
//!         .build(),
//! );
//!
//! let inputs = RequestInputs::new(json!({}), json!({}))
//!     .with_payload(json!({"array": [{"text": "<script>x</script>hi"}], "gone": ""}));
//!
//! let result = filter.apply(inputs, &RouteOverride::Inherit);
//! assert_eq!(result.inputs.payload, Some(json!({"array": [{"text": "hi"}]})));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod filter;
mod pipeline;
mod request;
mod sanitizer;
mod walk;
mod whitespace;

pub mod web;

pub use config::{identity, Config, ConfigBuilder, Flags, Hook, RouteConfig, RouteOverride};
pub use engine::Disinfect;
pub use error::{ConfigError, ConfigErrorKind, Error};
pub use filter::{filter_out, is_empty, is_whitespace};
pub use pipeline::{process, should_process, ClassStages, Disposition, InputClass, Stage};
pub use request::{Disinfected, RequestInputs};
pub use sanitizer::{AmmoniaSanitizer, MarkupSanitizer};
pub use walk::{walk, walk_markup};
pub use whitespace::{is_all_whitespace, is_whitespace_char};
