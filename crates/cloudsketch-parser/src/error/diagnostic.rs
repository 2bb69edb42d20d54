//! A single error or warning.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// Each diagnostic carries a severity, an optional [`ErrorCode`], the
/// message, any number of labeled spans and an optional help text. The
/// message is what the user sees in plain output; labels and help are used
/// by rich reporters.
///
/// ```text
/// error[E200]: id="web" is used in multiple elements. Please assign unique id with `as` keyword
///   --> diagram.csk:6:14
///    |
///  6 |     card gce as web
///    |                 ^^^ duplicate id
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("id=\"web\" is used in multiple elements")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(100..103), "duplicate id")
            .with_secondary_label(Span::new(50..53), "first declared here")
            .with_help("assign a unique id with the `as` keyword");

        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(!diag.labels()[1].is_primary());
        assert_eq!(diag.help(), Some("assign a unique id with the `as` keyword"));
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("invalid icon_url: x").with_code(ErrorCode::E301);
        let without_code = Diagnostic::warning("ignored color");

        assert_eq!(with_code.to_string(), "error[E301]: invalid icon_url: x");
        assert_eq!(without_code.to_string(), "warning: ignored color");
    }
}
