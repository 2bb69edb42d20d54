//! Error and diagnostic system for the diagram parsers.
//!
//! Both the DSL parser and the JSON parser report problems as
//! [`Diagnostic`]s. The DSL parser keeps going after most problems so that a
//! single run reports everything it can; the JSON parser stops at the first.
//! Either way the diagnostics reach the caller wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use cloudsketch_parser::error::{Diagnostic, ErrorCode};
//! # use cloudsketch_parser::Span;
//!
//! let diag = Diagnostic::error("id=\"web\" is used in multiple elements")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..43), "duplicate id")
//!     .with_secondary_label(Span::new(10..13), "first declared here")
//!     .with_help("assign a unique id with the `as` keyword");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
