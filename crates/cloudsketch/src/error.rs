//! Error types for cloudsketch operations.
//!
//! [`CloudsketchError`] wraps every failure of the parse, layout and render
//! pipeline so callers only have to handle one type.

use std::io;

use thiserror::Error;

use cloudsketch_parser::error::ParseError;

use crate::{layout::LayoutError, render};

/// The main error type for cloudsketch operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the diagram source next to the structured
/// diagnostics so a front end can show labelled snippets.
#[derive(Debug, Error)]
pub enum CloudsketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Render error: {0}")]
    Render(#[from] render::Error),
}

impl CloudsketchError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
