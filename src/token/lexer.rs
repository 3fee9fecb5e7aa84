//! Encapsulates all behaviour necessary to properly lex cali code.
//!
//! The [`Lexer`] is a pull-based scanner: every call to [`Lexer::next_token`]
//! yields exactly one [`Token`]. Lexing never fails, unknown characters turn
//! into [`TokenKind::Illegal`] tokens and it is left to the parser to complain.
//!
//! ```rust
//! use cali::token::lexer::Lexer;
//! use cali::token::tokens::TokenKind;
//!
//! let mut lexer = Lexer::new("let five = 5;");
//! assert_eq!(lexer.next_token().kind, TokenKind::Let);
//! ```
#![allow(
    clippy::min_ident_chars,
    reason = "short names do not decrease readability here."
)]

use core::iter::FusedIterator;

use tracing::trace;

use crate::token::tokens::{lookup_ident, Token, TokenKind};

/// Scanner over an immutable source buffer.
///
/// `position` points at the byte currently held in `ch`, `read_position` at
/// the byte after it. Once the input is exhausted `ch` is `None` and both
/// cursors sit past the end of the buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    /// The whole source text.
    input: &'src str,
    /// Offset of the character under examination.
    position: usize,
    /// Offset of the next character to read.
    read_position: usize,
    /// The character under examination, `None` at end of input.
    ch: Option<u8>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the first character of `input`.
    #[inline]
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        let mut lexer = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: None,
        };
        lexer.read_char();
        lexer
    }

    /// Lexes the next token and advances past it.
    ///
    /// After the end of input has been reached, this keeps returning
    /// [`TokenKind::Eof`] tokens.
    #[inline]
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        trace!(kind = %token.kind, text = %token.text, "lexed token");
        token
    }

    /// The actual state machine behind [`Self::next_token`].
    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.ch else {
            return Token::new(TokenKind::Eof, "");
        };

        let token = match c {
            // Operators, with one character of lookahead for `==` and `!=`
            b'=' if self.peek_char() == Some(b'=') => {
                self.read_char();
                Token::new(TokenKind::Eq, "==")
            }
            b'=' => Self::single(TokenKind::Assign, c),
            b'!' if self.peek_char() == Some(b'=') => {
                self.read_char();
                Token::new(TokenKind::NotEq, "!=")
            }
            b'!' => Self::single(TokenKind::Bang, c),
            b'+' => Self::single(TokenKind::Plus, c),
            b'-' => Self::single(TokenKind::Minus, c),
            b'*' => Self::single(TokenKind::Asterisk, c),
            b'/' => Self::single(TokenKind::Slash, c),
            b'<' => Self::single(TokenKind::Lt, c),
            b'>' => Self::single(TokenKind::Gt, c),

            // Delimiters
            b',' => Self::single(TokenKind::Comma, c),
            b';' => Self::single(TokenKind::Semicolon, c),
            b'(' => Self::single(TokenKind::LParen, c),
            b')' => Self::single(TokenKind::RParen, c),
            b'{' => Self::single(TokenKind::LBrace, c),
            b'}' => Self::single(TokenKind::RBrace, c),

            // Identifiers, keywords and literals consume greedily and
            // are already positioned on the following character.
            c if is_letter(c) => {
                let ident = self.read_identifier();
                return Token::new(lookup_ident(ident), ident);
            }
            c if is_digit(c) => {
                return Token::new(TokenKind::Int, self.read_number());
            }

            // ERROR
            _ => return self.read_illegal(),
        };

        self.read_char();
        token
    }

    /// Moves both cursors one byte forward, saturating past the end of input.
    fn read_char(&mut self) {
        self.ch = self.input.as_bytes().get(self.read_position).copied();
        self.position = self.read_position.min(self.input.len());
        self.read_position = self.position.saturating_add(1);
    }

    /// Looks at the next byte without consuming anything.
    fn peek_char(&self) -> Option<u8> {
        self.input.as_bytes().get(self.read_position).copied()
    }

    /// Whitespace carries no meaning in cali.
    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.read_char();
        }
    }

    /// Consumes characters while `accept` holds, returning the consumed slice.
    fn read_while(&mut self, accept: fn(u8) -> bool) -> &'src str {
        let start = self.position;
        while self.ch.is_some_and(accept) {
            self.read_char();
        }
        // Only ASCII bytes were consumed, so both ends lie on char boundaries.
        self.input.get(start..self.position).unwrap_or_default()
    }

    /// Identifiers and keywords alike.
    fn read_identifier(&mut self) -> &'src str {
        self.read_while(is_alpha_num)
    }

    /// Only decimal digits, without sign.
    fn read_number(&mut self) -> &'src str {
        self.read_while(is_digit)
    }

    /// Emits the unknown character as a whole, even if it is not ASCII.
    fn read_illegal(&mut self) -> Token {
        let illegal = self
            .input
            .get(self.position..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        for _ in 0..illegal.len_utf8() {
            self.read_char();
        }
        Token::new(TokenKind::Illegal, illegal)
    }

    /// A token made of exactly the current character.
    fn single(kind: TokenKind, c: u8) -> Token {
        Token::new(kind, char::from(c))
    }
}

#[expect(
    clippy::missing_trait_methods,
    reason = "the provided methods are fine for a pull-based scanner."
)]
impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to, but excluding, the end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenizes the whole source at once. The returned [`Vec`] always ends with
/// a single [`TokenKind::Eof`] token.
#[inline]
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens: Vec<Token> = lexer.by_ref().collect();
    tokens.push(lexer.next_token());
    tokens
}

/// Is the character allowed to start an identifier?
#[inline]
fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || (c == b'_')
}

/// Is the character an ASCII digit?
#[inline]
fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Is the character allowed inside an identifier?
#[inline]
fn is_alpha_num(c: u8) -> bool {
    c.is_ascii_alphanumeric() || (c == b'_')
}
