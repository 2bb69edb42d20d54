//! # Cloudsketch Parser
//!
//! Front ends that turn diagram source into a validated
//! [`Diagram`](cloudsketch_core::semantic::Diagram). Two input forms are
//! supported: the line-oriented DSL ([`parse_dsl`]) and a JSON document
//! ([`parse_json`]). Both resolve card types against an
//! [`IconCatalog`](cloudsketch_core::catalog::IconCatalog) and report
//! problems as a [`ParseError`](error::ParseError).
//!
//! ## Usage
//!
//! ```
//! # use cloudsketch_core::catalog::IconCatalog;
//! # use cloudsketch_parser::{parse_dsl, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! elements {
//!   card user
//!   gcp {
//!     card compute_engine as web
//!   }
//! }
//! paths {
//!   user --> web
//! }
//! "#;
//!
//!     let diagram = parse_dsl(source, &IconCatalog::builtin())?;
//!     assert_eq!(diagram.paths().len(), 1);
//!     Ok(())
//! }
//! ```

mod dsl;
mod elaborate;
pub mod error;
mod icon_url;
mod json;
mod lexer;
mod span;
mod tokens;

pub use dsl::parse_dsl;
pub use elaborate::ElementError;
pub use icon_url::{IconUrlError, normalize_icon_url};
pub use json::{parse_json, to_json};
pub use lexer::{Lexer, tokenize};
pub use span::Span;
pub use tokens::{PositionedToken, Token};
