//! Data types representing tokens available in the cali language.
use core::fmt::{self, Display, Formatter};
use std::collections::HashMap;
use std::sync::LazyLock;

use itertools::Itertools;

use crate::util::map;

/// An enum covering all possible kinds a token can take on.
///
/// This is the contract between the lexer and the parser, so the set of
/// variants and their [`Display`] names are fixed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[expect(
    clippy::exhaustive_enums,
    reason = "adding a new variant MUST be handled and is a breaking change."
)]
pub enum TokenKind {
    /// A character the language does not know about.
    Illegal,
    /// End of input. Returned forever once the source is exhausted.
    Eof,

    // Identifiers and Literals
    /// `add`, `foobar`, `x`, ...
    Ident,
    /// `1343456`
    Int,

    // Operators
    /// `"="`
    Assign,
    /// `"+"`
    Plus,
    /// `"-"`
    Minus,
    /// `"!"`
    Bang,
    /// `"*"`
    Asterisk,
    /// `"/"`
    Slash,
    /// `"<"`
    Lt,
    /// `">"`
    Gt,
    /// `"=="`
    Eq,
    /// `"!="`
    NotEq,

    // Delimiters
    /// `","`
    Comma,
    /// `";"`
    Semicolon,
    /// `"("`
    LParen,
    /// `")"`
    RParen,
    /// `"{"`
    LBrace,
    /// `"}"`
    RBrace,

    // Keywords
    /// `"fn"`
    Function,
    /// `"let"`
    Let,
    /// `"true"`
    True,
    /// `"false"`
    False,
    /// `"if"`
    If,
    /// `"else"`
    Else,
    /// `"return"`
    Return,
}

impl TokenKind {
    /// The stable name of this kind, as used in error messages.
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lookup table for keywords to distinguish them from identifiers.
pub static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    map! {
        "fn"     => TokenKind::Function,
        "let"    => TokenKind::Let,
        "true"   => TokenKind::True,
        "false"  => TokenKind::False,
        "if"     => TokenKind::If,
        "else"   => TokenKind::Else,
        "return" => TokenKind::Return,
    }
});

/// Classifies a run of identifier characters as either a keyword
/// or a plain [`TokenKind::Ident`].
#[inline]
#[must_use]
pub fn lookup_ident(ident: &str) -> TokenKind {
    KEYWORDS.get(ident).copied().unwrap_or(TokenKind::Ident)
}

/// A single lexeme, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "a token is its kind and its text.")]
pub struct Token {
    /// Kind of this token.
    pub kind: TokenKind,
    /// The raw text of the token as it appeared in the source.
    /// Empty for [`TokenKind::Eof`].
    pub text: String,
}

impl Token {
    /// Builds a token from its kind and lexeme.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(kind: TokenKind, text: T) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Is this the end-of-input token?
    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.text)
    }
}

/// Renders a token stream back into an approximation of its source,
/// separating every lexeme by a single space.
#[inline]
#[must_use]
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|token| !token.is_eof())
        .map(|token| token.text.as_str())
        .join(" ")
}
