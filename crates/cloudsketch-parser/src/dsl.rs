//! Parser for the diagram DSL.
//!
//! The grammar is line oriented. A block opener (`{`) must sit on the same
//! line as its keyword and a path must fit on one line; inside blocks,
//! tokens that start nothing are skipped. Errors do not stop the parse:
//! the offending construct is dropped, the token that broke it is left in
//! place for the enclosing block to look at, and every problem is reported
//! together at the end.
//!
//! ```text
//! meta { title "Checkout" }
//! elements {
//!   card user
//!   gcp {
//!     card gce as web { name "frontend" }
//!     group backend {
//!       background_color "#e8f5e9"
//!       stacked_card cloud_sql as db
//!     }
//!   }
//! }
//! paths {
//!   user --> web
//!   web -down-> db : "SQL"
//! }
//! ```

use log::{debug, trace, warn};
use winnow::{
    Parser as _,
    error::ModalResult,
    stream::{Stream, TokenSlice},
    token::any,
};

use cloudsketch_core::{
    catalog::IconCatalog,
    color::Color,
    semantic::{Arrow, Container, Dash, Diagram, Direction, Element, Meta, Path, ValidationError},
};

use crate::{
    elaborate::{CardFields, ElementBuilder, ElementError},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::Lexer,
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = TokenSlice<'a, PositionedToken<'a>>;

/// Match a token exactly. Nothing is consumed on failure.
fn punct<'a>(input: &mut Input<'a>, kind: Token<'_>) -> ModalResult<PositionedToken<'a>> {
    any.verify(|token: &PositionedToken<'_>| token.token == kind)
        .map(|token: &PositionedToken<'a>| *token)
        .parse_next(input)
}

/// Consume `kind` if it is the next token.
fn accept(input: &mut Input<'_>, kind: Token<'_>) -> bool {
    punct(input, kind).is_ok()
}

/// An identifier or a string literal.
fn value_token<'a>(input: &mut Input<'a>) -> ModalResult<(&'a str, Span)> {
    any.verify_map(|token: &PositionedToken<'a>| token.token.value().map(|value| (value, token.span)))
        .parse_next(input)
}

/// An element id inside `paths`. The cloud container is referenced by its
/// keyword.
fn element_ref<'a>(input: &mut Input<'a>) -> ModalResult<(&'a str, Span)> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::Gcp => Some((Container::ID, token.span)),
        other => other.value().map(|value| (value, token.span)),
    })
    .parse_next(input)
}

/// Parses DSL source into a validated [`Diagram`].
///
/// Card types are resolved against `catalog`. Warnings, such as an ignored
/// background color, are logged; any error fails the parse.
pub fn parse_dsl(source: &str, catalog: &IconCatalog) -> Result<Diagram, ParseError> {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<_> = lexer.by_ref().collect();
    debug!(tokens = tokens.len(); "Tokenized diagram source");

    let eof = Eof {
        span: Span::new(source.len()..source.len()),
        line: lexer.line(),
    };
    let mut input = TokenSlice::new(&tokens);
    DslParser::new(catalog, eof).parse(&mut input, source)
}

/// Where a missing token is reported when the input runs out.
#[derive(Debug, Clone, Copy)]
struct Eof {
    span: Span,
    line: usize,
}

struct DslParser<'c> {
    builder: ElementBuilder<'c>,
    diagnostics: DiagnosticCollector,
    eof: Eof,
    /// Every element id declared, with the span of the declaring token.
    declarations: Vec<(String, Span)>,
    /// Spans of the start and end ids, one entry per parsed path.
    references: Vec<(Span, Span)>,
}

impl<'c> DslParser<'c> {
    fn new(catalog: &'c IconCatalog, eof: Eof) -> Self {
        Self {
            builder: ElementBuilder::new(catalog),
            diagnostics: DiagnosticCollector::new(),
            eof,
            declarations: Vec::new(),
            references: Vec::new(),
        }
    }

    fn parse<'a>(mut self, input: &mut Input<'a>, source: &str) -> Result<Diagram, ParseError> {
        let mut meta = None;
        let mut elements = Vec::new();
        let mut paths = Vec::new();

        while let Some(token) = input.next_token() {
            match token.token {
                Token::Meta => {
                    if let Some(parsed) = self.meta_block(input) {
                        meta = Some(parsed);
                    }
                }
                Token::Elements => elements.extend(self.elements_block(input)),
                Token::Paths => paths.extend(self.paths_block(input)),
                _ => {}
            }
        }

        let DslParser {
            diagnostics,
            declarations,
            references,
            ..
        } = self;

        for warning in diagnostics.finish()? {
            warn!("{warning}");
        }

        let diagram = Diagram::new(meta.unwrap_or_default(), elements, paths, source);
        if let Err(err) = diagram.validate() {
            debug!(err:%; "Diagram failed validation");
            return Err(validation_diagnostic(&err, &diagram, &declarations, &references).into());
        }

        trace!(elements = diagram.elements().len(), paths = diagram.paths().len(); "Parsed diagram");
        Ok(diagram)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn unexpected(&mut self, input: &Input<'_>) {
        let (text, span, line) = match input.peek_token() {
            Some(token) => (token.token.to_string(), token.span, token.line),
            None => ("end of file".to_string(), self.eof.span, self.eof.line),
        };
        self.diagnostics.emit(
            Diagnostic::error(format!("unexpected token: {text}, line: {line}"))
                .with_code(ErrorCode::E100)
                .with_label(span, ErrorCode::E100.description()),
        );
    }

    /// Run `parser`, reporting the next token as unexpected if it fails.
    fn expect<'a, O>(
        &mut self,
        input: &mut Input<'a>,
        parser: impl FnOnce(&mut Input<'a>) -> ModalResult<O>,
    ) -> Option<O> {
        match parser(input) {
            Ok(output) => Some(output),
            Err(_) => {
                self.unexpected(input);
                None
            }
        }
    }

    fn expect_value<'a>(&mut self, input: &mut Input<'a>) -> Option<(&'a str, Span)> {
        self.expect(input, value_token)
    }

    fn expect_punct(&mut self, input: &mut Input<'_>, kind: Token<'_>) -> Option<()> {
        self.expect(input, |input| punct(input, kind).map(|_| ()))
    }

    fn element_error(&mut self, err: ElementError, span: Span) {
        let diagnostic = Diagnostic::error(err.to_string())
            .with_code(err.code())
            .with_label(span, err.code().description());
        let diagnostic = match err {
            ElementError::IconUrl(_) => diagnostic
                .with_help("use a Google Drive link like https://drive.google.com/file/d/<FILE_ID>/view"),
            ElementError::UnsupportedCard(_) => diagnostic,
        };
        self.diagnostics.emit(diagnostic);
    }

    fn declare(&mut self, id: &str, span: Span) {
        self.declarations.push((id.to_string(), span));
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Feed every token up to the closing brace to `f`. The brace is consumed.
    fn block<'a, F>(&mut self, input: &mut Input<'a>, mut f: F)
    where
        F: FnMut(&mut Self, &mut Input<'a>, PositionedToken<'a>),
    {
        while let Some(token) = input.next_token() {
            if token.token == Token::RightBrace {
                break;
            }
            f(self, input, *token);
        }
    }

    fn meta_block(&mut self, input: &mut Input<'_>) -> Option<Meta> {
        self.expect_punct(input, Token::LeftBrace)?;

        let mut title = String::new();
        self.block(input, |parser, input, token| {
            if token.token == Token::Title {
                if let Some((value, _)) = parser.expect_value(input) {
                    title = value.to_string();
                }
            }
        });
        Some(Meta::new(title))
    }

    fn elements_block(&mut self, input: &mut Input<'_>) -> Vec<Element> {
        let mut elements = Vec::new();
        if self.expect_punct(input, Token::LeftBrace).is_none() {
            return elements;
        }

        self.block(input, |parser, input, token| match token.token {
            Token::Card => elements.extend(parser.card(input, false)),
            Token::StackedCard => elements.extend(parser.card(input, true)),
            Token::Group => elements.extend(parser.group(input, 0)),
            Token::Gcp => elements.extend(parser.container(input, token.span)),
            _ => {}
        });
        elements
    }

    fn paths_block(&mut self, input: &mut Input<'_>) -> Vec<Path> {
        let mut paths = Vec::new();
        if self.expect_punct(input, Token::LeftBrace).is_none() {
            return paths;
        }

        self.block(input, |parser, input, token| {
            let start = match token.token {
                Token::Gcp => Some((Container::ID, token.span)),
                other => other.value().map(|value| (value, token.span)),
            };
            if let Some(start) = start {
                paths.extend(parser.path(input, start));
            }
        });
        paths
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// `card <type> [as <id>] [{ <field> <value> ... }]`
    fn card(&mut self, input: &mut Input<'_>, stacked: bool) -> Option<Element> {
        let (card_type, type_span) = self.expect_value(input)?;
        let (id, id_span) = if accept(input, Token::As) {
            self.expect_value(input)?
        } else {
            (card_type, type_span)
        };

        let mut fields = CardFields::default();
        let mut icon_span = None;
        if accept(input, Token::LeftBrace) {
            self.block(input, |parser, input, token| {
                let field = match token.token {
                    Token::Name => &mut fields.name,
                    Token::Description => &mut fields.description,
                    Token::DisplayName => &mut fields.display_name,
                    Token::IconUrl => &mut fields.icon_url,
                    _ => return,
                };
                if let Some((value, span)) = parser.expect_value(input) {
                    *field = value.to_string();
                    if token.token == Token::IconUrl {
                        icon_span = Some(span);
                    }
                }
            });
        }

        match self.builder.card(id, card_type, fields, stacked) {
            Ok(card) => {
                trace!(id, card_type; "Parsed card");
                self.declare(id, id_span);
                Some(card.into())
            }
            Err(err) => {
                let span = match err {
                    ElementError::IconUrl(_) => icon_span.unwrap_or(type_span),
                    ElementError::UnsupportedCard(_) => type_span,
                };
                self.element_error(err, span);
                None
            }
        }
    }

    /// `group <id> { ... }` nested `depth` groups deep.
    fn group(&mut self, input: &mut Input<'_>, depth: usize) -> Option<Element> {
        let (id, id_span) = self.expect_value(input)?;
        self.expect_punct(input, Token::LeftBrace)?;

        let mut name = id.to_string();
        let mut background_color = Color::group_default(depth);
        let mut icon = None;
        let mut children = Vec::new();

        self.block(input, |parser, input, token| match token.token {
            Token::Name => {
                if let Some((value, span)) = parser.expect_value(input) {
                    if value.is_empty() {
                        parser.diagnostics.emit(
                            Diagnostic::error(format!("group id=\"{id}\" must have non-empty name"))
                                .with_code(ErrorCode::E203)
                                .with_label(span, ErrorCode::E203.description()),
                        );
                    }
                    name = value.to_string();
                }
            }
            Token::BackgroundColor => {
                if let Some((value, span)) = parser.expect_value(input) {
                    match Color::from_hex(value) {
                        Ok(color) => background_color = color,
                        Err(err) => {
                            parser.diagnostics.emit(
                                Diagnostic::warning(err.to_string())
                                    .with_code(ErrorCode::E303)
                                    .with_label(span, "color ignored")
                                    .with_help("write colors as `#RRGGBB`"),
                            );
                        }
                    }
                }
            }
            Token::IconUrl => {
                if let Some(value) = parser.expect_value(input) {
                    icon = Some(value);
                }
            }
            Token::Group => children.extend(parser.group(input, depth + 1)),
            Token::Card => children.extend(parser.card(input, false)),
            Token::StackedCard => children.extend(parser.card(input, true)),
            _ => {}
        });

        let (icon_url, icon_span) = icon.unwrap_or(("", id_span));
        match self
            .builder
            .group(id, &name, icon_url, background_color, children)
        {
            Ok(group) => {
                trace!(id, depth; "Parsed group");
                self.declare(id, id_span);
                Some(group.into())
            }
            Err(err) => {
                self.element_error(err, icon_span);
                None
            }
        }
    }

    /// `gcp { ... }`. Groups directly inside restart the color palette.
    fn container(&mut self, input: &mut Input<'_>, keyword: Span) -> Option<Element> {
        self.expect_punct(input, Token::LeftBrace)?;

        let mut children = Vec::new();
        self.block(input, |parser, input, token| match token.token {
            Token::Card => children.extend(parser.card(input, false)),
            Token::StackedCard => children.extend(parser.card(input, true)),
            Token::Group => children.extend(parser.group(input, 0)),
            _ => {}
        });

        self.declare(Container::ID, keyword);
        Some(Container::new(children).into())
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// `<start> [<][(] -[dir]- | .[dir]. [>][)] <end> [: <annotation>]`
    ///
    /// A line that does not continue with `-` or `.` after the start id is
    /// not a path and is dropped silently.
    fn path(&mut self, input: &mut Input<'_>, start: (&str, Span)) -> Option<Path> {
        let (start, start_span) = start;

        let start_arrow = if accept(input, Token::Less) {
            Arrow::Fill
        } else {
            Arrow::None
        };
        let hidden = accept(input, Token::LeftParen);

        let (dash, stroke) = if accept(input, Token::Minus) {
            (Dash::Solid, Token::Minus)
        } else if accept(input, Token::Dot) {
            (Dash::Dot, Token::Dot)
        } else {
            return None;
        };

        let direction = match value_token(input) {
            Ok(("left", _)) => Direction::Left,
            Ok(("down", _)) => Direction::Down,
            Ok(("up", _)) => Direction::Up,
            _ => Direction::Right,
        };
        self.expect_punct(input, stroke)?;

        let end_arrow = if accept(input, Token::Greater) {
            Arrow::Fill
        } else {
            Arrow::None
        };
        if hidden {
            self.expect_punct(input, Token::RightParen)?;
        }

        let (end, end_span) = self.expect(input, element_ref)?;

        let mut path = Path::new(start, end)
            .with_arrows(start_arrow, end_arrow)
            .with_dash(dash)
            .with_direction(direction)
            .with_hidden(hidden);
        if accept(input, Token::Colon) {
            if let Some((annotation, _)) = self.expect_value(input) {
                path = path.with_annotation(annotation);
            }
        }

        trace!(path:%; "Parsed path");
        self.references.push((start_span, end_span));
        Some(path)
    }
}

/// Turns a validation failure into a diagnostic pointing at the source.
fn validation_diagnostic(
    err: &ValidationError,
    diagram: &Diagram,
    declarations: &[(String, Span)],
    references: &[(Span, Span)],
) -> Diagnostic {
    let mut declared: Vec<Span> = declarations
        .iter()
        .filter(|(id, _)| id == err.id())
        .map(|(_, span)| *span)
        .collect();
    declared.sort_by_key(Span::start);

    let diagnostic = Diagnostic::error(err.to_string());
    match err {
        ValidationError::DuplicateId(_) => {
            let diagnostic = diagnostic
                .with_code(ErrorCode::E200)
                .with_help("assign a unique id with the `as` keyword");
            match declared.as_slice() {
                [first, second, ..] => diagnostic
                    .with_label(*second, "duplicate id")
                    .with_secondary_label(*first, "first declared here"),
                _ => diagnostic,
            }
        }
        ValidationError::EmptyGroup(_) => {
            let diagnostic = diagnostic.with_code(ErrorCode::E201);
            match declared.first() {
                Some(span) => diagnostic.with_label(*span, "group has no cards"),
                None => diagnostic,
            }
        }
        ValidationError::UnknownPathElement(_) => {
            let id = err.id();
            let diagnostic = diagnostic.with_code(ErrorCode::E202);
            let span = diagram
                .paths()
                .iter()
                .zip(references)
                .find_map(|(path, (start, end))| {
                    if path.start() == id {
                        Some(*start)
                    } else if path.end() == id {
                        Some(*end)
                    } else {
                        None
                    }
                });
            match span {
                Some(span) => diagnostic.with_label(span, "no element with this id"),
                None => diagnostic,
            }
        }
    }
}
