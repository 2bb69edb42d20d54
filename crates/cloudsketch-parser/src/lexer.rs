//! Lexical analyzer for the diagram DSL.
//!
//! The lexer never fails. Characters the language does not use become
//! [`Token::Invalid`] and are reported by the parser when it meets them.
//! Spaces, tabs and `#` comments are skipped; line breaks are significant
//! and come out as [`Token::Eol`].

use winnow::{
    Parser as _,
    combinator::{alt, not, opt, peek, preceded, repeat, terminated},
    error::ModalResult,
    stream::{LocatingSlice, Location},
    token::{any, literal, one_of, take_while},
};

use crate::{
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string literal.
///
/// The literal runs to the closing quote or to the end of the line,
/// whichever comes first. A closing quote is consumed; a missing one is
/// tolerated.
fn string_literal<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    terminated(
        preceded('"', take_while(0.., |c| !matches!(c, '"' | '\n' | '\r'))),
        opt('"'),
    )
    .map(Token::StringLiteral)
    .parse_next(input)
}

/// Skip a `#` comment up to, but not including, the line break.
fn comment(input: &mut Input<'_>) -> ModalResult<()> {
    ('#', take_while(0.., |c| !matches!(c, '\n' | '\r')))
        .void()
        .parse_next(input)
}

/// Skip spaces and tabs.
fn whitespace(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(1.., [' ', '\t']).void().parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    terminated(
        alt((
            literal("zone"),
            literal("card"),
            literal("stacked_card"),
            literal("group"),
            literal("meta"),
            literal("title"),
            literal("display_name"),
            literal("elements"),
            alt((
                literal("gcp"),
                literal("paths"),
                literal("as"),
                literal("name"),
                literal("description"),
                literal("background_color"),
                literal("icon_url"),
            )),
        )),
        peek(not(one_of(is_identifier_char))),
    )
    .map(|keyword: &str| match keyword {
        "zone" => Token::Zone,
        "card" => Token::Card,
        "stacked_card" => Token::StackedCard,
        "group" => Token::Group,
        "meta" => Token::Meta,
        "title" => Token::Title,
        "display_name" => Token::DisplayName,
        "elements" => Token::Elements,
        "gcp" => Token::Gcp,
        "paths" => Token::Paths,
        "as" => Token::As,
        "name" => Token::Name,
        "description" => Token::Description,
        "background_color" => Token::BackgroundColor,
        "icon_url" => Token::IconUrl,
        _ => unreachable!(),
    })
    .parse_next(input)
}

/// Parse identifiers. Unlike most languages, an identifier may start with a
/// digit, so `2nd_db` is a valid id.
fn identifier<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    take_while(1.., is_identifier_char)
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '-'.value(Token::Minus),
        '>'.value(Token::Greater),
        '<'.value(Token::Less),
        '.'.value(Token::Dot),
        ':'.value(Token::Colon),
    ))
    .parse_next(input)
}

/// Parse a line break. `\r` and `\n` are separate breaks, so `\r\n`
/// yields two tokens.
fn eol<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    one_of(['\n', '\r']).value(Token::Eol).parse_next(input)
}

/// Any other character.
fn invalid<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    any.map(Token::Invalid).parse_next(input)
}

/// Skip everything that does not produce a token.
fn trivia(input: &mut Input<'_>) -> ModalResult<()> {
    repeat(0.., alt((whitespace, comment))).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>, line: usize) -> ModalResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        string_literal,    // Must come before any single char
        keyword,           // Must come before identifier
        identifier,        // Must come before single chars
        single_char_token, // Single character tokens
        eol,               // Line breaks
        invalid,           // Must be last
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos), line))
}

/// A lazy token stream over DSL source.
///
/// Tokens are produced on demand, each tagged with its byte span and the
/// 1-based line it starts on.
///
/// ```
/// # use cloudsketch_parser::{Lexer, Token};
/// let tokens: Vec<_> = Lexer::new("card gce # web tier\n").map(|t| t.token).collect();
/// assert_eq!(tokens, [Token::Card, Token::Identifier("gce"), Token::Eol]);
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: Input<'a>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            input: LocatingSlice::new(source),
            line: 1,
        }
    }

    /// The line the next token will be reported on.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = PositionedToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        trivia(&mut self.input).ok()?;
        if self.input.is_empty() {
            return None;
        }

        let token = positioned_token(&mut self.input, self.line).ok()?;
        if token.token == Token::Eol {
            self.line += 1;
        }
        Some(token)
    }
}

/// Tokenize a whole source text.
pub fn tokenize(input: &str) -> Vec<PositionedToken<'_>> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let tokens = tokenize(input);
        assert_eq!(tokens.len(), 1, "expected one token for {input:?}: {tokens:?}");
        assert_eq!(tokens[0].token, expected);
    }

    fn kinds(input: &str) -> Vec<Token<'_>> {
        tokenize(input).into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_keywords() {
        test_single_token("zone", Token::Zone);
        test_single_token("card", Token::Card);
        test_single_token("stacked_card", Token::StackedCard);
        test_single_token("group", Token::Group);
        test_single_token("meta", Token::Meta);
        test_single_token("title", Token::Title);
        test_single_token("display_name", Token::DisplayName);
        test_single_token("elements", Token::Elements);
        test_single_token("gcp", Token::Gcp);
        test_single_token("paths", Token::Paths);
        test_single_token("as", Token::As);
        test_single_token("name", Token::Name);
        test_single_token("description", Token::Description);
        test_single_token("background_color", Token::BackgroundColor);
        test_single_token("icon_url", Token::IconUrl);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        test_single_token("cards", Token::Identifier("cards"));
        test_single_token("card_1", Token::Identifier("card_1"));
        test_single_token("gcp2", Token::Identifier("gcp2"));
        test_single_token("names", Token::Identifier("names"));
        test_single_token("assets", Token::Identifier("assets"));

        assert_eq!(kinds("card-"), [Token::Card, Token::Minus]);
    }

    #[test]
    fn test_identifiers() {
        test_single_token("web", Token::Identifier("web"));
        test_single_token("_private", Token::Identifier("_private"));
        test_single_token("2nd_db", Token::Identifier("2nd_db"));
        test_single_token("CamelCase", Token::Identifier("CamelCase"));
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("{}()-><.:"),
            [
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftParen,
                Token::RightParen,
                Token::Minus,
                Token::Greater,
                Token::Less,
                Token::Dot,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        test_single_token("\"hello world\"", Token::StringLiteral("hello world"));
        test_single_token("\"\"", Token::StringLiteral(""));
        test_single_token("\"# not a comment\"", Token::StringLiteral("# not a comment"));
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        assert_eq!(
            kinds("\"open\nnext"),
            [
                Token::StringLiteral("open"),
                Token::Eol,
                Token::Identifier("next"),
            ]
        );
    }

    #[test]
    fn test_string_span_includes_quotes() {
        let tokens = tokenize("name \"Web\"");

        assert_eq!(tokens[1].span, Span::new(5..10));
    }

    #[test]
    fn test_comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("  card\tgce # a comment { }\n# whole line\n"),
            [
                Token::Card,
                Token::Identifier("gce"),
                Token::Eol,
                Token::Eol,
            ]
        );
    }

    #[test]
    fn test_carriage_return_is_a_line_break() {
        let tokens = tokenize("a\r\nb");

        assert_eq!(
            tokens.iter().map(|t| t.token).collect::<Vec<_>>(),
            [
                Token::Identifier("a"),
                Token::Eol,
                Token::Eol,
                Token::Identifier("b"),
            ]
        );
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            kinds("a = b;"),
            [
                Token::Identifier("a"),
                Token::Invalid('='),
                Token::Identifier("b"),
                Token::Invalid(';'),
            ]
        );
        test_single_token("é", Token::Invalid('é'));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("meta {\n  title \"T\"\n}\n");
        let lines: Vec<_> = tokens.iter().map(|t| (t.token, t.line)).collect();

        assert_eq!(
            lines,
            [
                (Token::Meta, 1),
                (Token::LeftBrace, 1),
                (Token::Eol, 1),
                (Token::Title, 2),
                (Token::StringLiteral("T"), 2),
                (Token::Eol, 2),
                (Token::RightBrace, 3),
                (Token::Eol, 3),
            ]
        );
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            kinds("a <(-down->) b : \"HTTPS\""),
            [
                Token::Identifier("a"),
                Token::Less,
                Token::LeftParen,
                Token::Minus,
                Token::Identifier("down"),
                Token::Minus,
                Token::Greater,
                Token::RightParen,
                Token::Identifier("b"),
                Token::Colon,
                Token::StringLiteral("HTTPS"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("card gce");

        assert_eq!(tokens[0].span, Span::new(0..4));
        assert_eq!(tokens[1].span, Span::new(5..8));
    }

    #[test]
    fn test_lexer_is_lazy() {
        let mut lexer = Lexer::new("a\nb");

        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Identifier("a")));
        assert_eq!(lexer.line(), 1);
        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Eol));
        assert_eq!(lexer.line(), 2);
        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Identifier("b")));
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   # only a comment").is_empty());
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    const KEYWORDS: &[&str] = &[
        "zone",
        "card",
        "stacked_card",
        "group",
        "meta",
        "title",
        "display_name",
        "elements",
        "gcp",
        "paths",
        "as",
        "name",
        "description",
        "background_color",
        "icon_url",
    ];

    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[a-z0-9_]{1,20}".prop_filter("avoid keywords", |s| !KEYWORDS.contains(&s.as_str()))
    }

    fn check_identifier_tokenizes(id: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(id);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].token, Token::Identifier(id));
        Ok(())
    }

    fn check_lexer_never_panics(input: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(input);
        let breaks = input.chars().filter(|c| matches!(c, '\n' | '\r')).count();

        // Every line break outside a comment or string is a token, and
        // strings and comments stop at line breaks.
        let eols = tokens.iter().filter(|t| t.token == Token::Eol).count();
        prop_assert_eq!(eols, breaks);

        for token in &tokens {
            prop_assert!(token.span.end() <= input.len());
            prop_assert!(!token.span.is_empty());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn identifiers_tokenize(id in identifier_strategy()) {
            check_identifier_tokenizes(&id)?;
        }

        #[test]
        fn lexer_never_panics(input in "[ -~\t\n\ré]{0,64}") {
            check_lexer_never_panics(&input)?;
        }
    }
}
