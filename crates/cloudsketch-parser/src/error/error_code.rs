//! Error codes for diagram diagnostics.
//!
//! Error codes are organized by phase:
//! - `E1xx` - DSL syntax errors
//! - `E2xx` - Structural validation errors
//! - `E3xx` - Element construction errors
//! - `E4xx` - JSON document errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// A construct such as a card, group or path was cut short by a token
    /// that cannot appear at that position. The construct is skipped.
    E100,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Duplicate element id.
    ///
    /// Two elements anywhere in the tree share an id. Cards default to their
    /// card type as id, so two cards of the same type need `as <id>`.
    E200,

    /// Group without cards.
    ///
    /// A group must contain at least one card, directly or in a subgroup.
    E201,

    /// Unknown path endpoint.
    ///
    /// A path names an element id that does not exist.
    E202,

    /// Empty group name.
    ///
    /// A group was given an explicit `name ""`.
    E203,

    // =========================================================================
    // Element Errors (E3xx)
    // =========================================================================
    /// Unsupported card type.
    ///
    /// The card type is not in the catalog and no `icon_url` was given.
    E300,

    /// Malformed icon URL.
    ///
    /// Custom icons must be Google Drive file links of the form
    /// `https://drive.google.com/file/d/<FILE_ID>/view`.
    E301,

    /// Icon URL outside Google Drive.
    E302,

    /// Invalid background color.
    ///
    /// Colors must be written as `#RRGGBB`.
    E303,

    // =========================================================================
    // JSON Errors (E4xx)
    // =========================================================================
    /// The document is not valid JSON or does not match the schema.
    E400,

    /// Unsupported document version.
    E401,

    /// Unknown element type.
    E402,

    /// Invalid path attribute.
    ///
    /// A path direction, arrow or dash value is not one of the known names.
    E403,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
            ErrorCode::E402 => "E402",
            ErrorCode::E403 => "E403",
        }
    }

    /// Returns a short label describing the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E200 => "duplicate element id",
            ErrorCode::E201 => "group without cards",
            ErrorCode::E202 => "unknown element",
            ErrorCode::E203 => "empty group name",
            ErrorCode::E300 => "unsupported card type",
            ErrorCode::E301 => "invalid icon url",
            ErrorCode::E302 => "icon url not on google drive",
            ErrorCode::E303 => "invalid color",
            ErrorCode::E400 => "invalid json",
            ErrorCode::E401 => "unsupported version",
            ErrorCode::E402 => "invalid element type",
            ErrorCode::E403 => "invalid path attribute",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
