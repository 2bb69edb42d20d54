//! Collector for accumulating diagnostics during parsing.

use crate::error::{Diagnostic, ParseError};

/// Accumulates errors and warnings so a parse can report every problem it
/// finds instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Whether any error-severity diagnostic was emitted so far.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// Returns the warnings when no error was emitted, otherwise every
    /// diagnostic wrapped in a [`ParseError`].
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
