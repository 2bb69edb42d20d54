//! Token definitions for the diagram DSL.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types for the diagram DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Zone,
    Card,
    StackedCard,
    Group,
    Meta,
    Title,
    DisplayName,
    Elements,
    Gcp,
    Paths,
    As,
    Name,
    Description,
    BackgroundColor,
    IconUrl,

    // Values
    Identifier(&'src str),
    /// Contents of a `"..."` literal, without the quotes.
    StringLiteral(&'src str),

    // Punctuation
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Minus,      // -
    Greater,    // >
    Less,       // <
    Dot,        // .
    Colon,      // :

    /// `\n` or `\r`
    Eol,

    /// Any character the language does not use
    Invalid(char),
}

impl<'src> Token<'src> {
    /// Returns the text carried by identifier and string tokens.
    ///
    /// Field values and element ids may be written either way.
    pub fn value(&self) -> Option<&'src str> {
        match *self {
            Token::Identifier(text) | Token::StringLiteral(text) => Some(text),
            _ => None,
        }
    }
}

/// A token together with its source span and 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub line: usize,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, line: usize) -> Self {
        Self { token, span, line }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Zone => write!(f, "zone"),
            Token::Card => write!(f, "card"),
            Token::StackedCard => write!(f, "stacked_card"),
            Token::Group => write!(f, "group"),
            Token::Meta => write!(f, "meta"),
            Token::Title => write!(f, "title"),
            Token::DisplayName => write!(f, "display_name"),
            Token::Elements => write!(f, "elements"),
            Token::Gcp => write!(f, "gcp"),
            Token::Paths => write!(f, "paths"),
            Token::As => write!(f, "as"),
            Token::Name => write!(f, "name"),
            Token::Description => write!(f, "description"),
            Token::BackgroundColor => write!(f, "background_color"),
            Token::IconUrl => write!(f, "icon_url"),

            Token::Identifier(name) => write!(f, "{name}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Minus => write!(f, "-"),
            Token::Greater => write!(f, ">"),
            Token::Less => write!(f, "<"),
            Token::Dot => write!(f, "."),
            Token::Colon => write!(f, ":"),

            Token::Eol => write!(f, "\\n"),
            Token::Invalid(c) => write!(f, "{c}"),
        }
    }
}
