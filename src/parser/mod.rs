//! Turning tokens into a [`Program`].
//!
//! The actual work happens in [`pratt`], this module holds the knobs the
//! parser can be configured with and a convenience entry point going straight
//! from source text to a tree.
pub mod pratt;

pub use pratt::{Parser, MAX_NESTING_DEPTH};

use crate::ast::Program;
use crate::errors::ParseError;
use crate::token::lexer::Lexer;

/// Whether a bare expression statement must be terminated by a `;`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "there are only two ways to treat a terminator."
)]
pub enum SemicolonPolicy {
    /// `5 + 5` is an error, only `5 + 5;` is accepted.
    #[default]
    Required,
    /// Both `5 + 5` and `5 + 5;` are accepted.
    Optional,
}

/// Options influencing the accepted grammar.
///
/// `let` and `return` statements require their terminator under every policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_structs,
    clippy::module_name_repetitions,
    reason = "built field by field by the CLI, and `Config` alone reads too vague."
)]
pub struct ParserConfig {
    /// Treatment of the `;` after expression statements.
    pub semicolons: SemicolonPolicy,
}

/// The outcome of parsing a whole source text: the tree of every statement
/// that parsed successfully, along with every error found on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "a parse yields a tree and its errors.")]
pub struct Parsed {
    /// Successfully parsed statements.
    pub program: Program,
    /// Errors, in the order they were found.
    pub errors: Vec<ParseError>,
}

impl Parsed {
    /// The program, but only if no errors were found at all.
    ///
    /// # Errors
    ///
    /// Returns every recorded [`ParseError`] if there was at least one.
    #[inline]
    pub fn into_result(self) -> Result<Program, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            Err(self.errors)
        }
    }
}

/// Parses `source` with the default configuration.
#[inline]
#[must_use]
pub fn parse(source: &str) -> Parsed {
    parse_with(source, ParserConfig::default())
}

/// Parses `source` with the given configuration.
#[inline]
#[must_use]
pub fn parse_with(source: &str, config: ParserConfig) -> Parsed {
    let mut parser = Parser::with_config(Lexer::new(source), config);
    let program = parser.parse_program();
    Parsed {
        program,
        errors: parser.finish(),
    }
}

#[cfg(test)]
mod test {
    use super::{parse, parse_with, ParserConfig, SemicolonPolicy};
    use crate::ast::{Identifier, Node, Statement};
    use crate::errors::{ParseError, UnterminatedError};
    use crate::token::tokens::TokenKind;

    #[test]
    fn single_let_statement() {
        let program = parse("let x = 5;")
            .into_result()
            .expect("let statement parses");
        assert_eq!(program.statements.len(), 1);
        let Some(Statement::LetStatement { name, .. }) = program.statements.first() else {
            panic!("expected a let statement");
        };
        assert_eq!(*name, Identifier("x".to_owned()));
        assert_eq!(program.token_literal(), "let");
        assert_eq!(program.to_string(), "let x = 5;");
    }

    #[test]
    fn errors_are_returned_alongside_the_tree() {
        let parsed = parse("let = 5; let y = 6;");
        assert!(!parsed.errors.is_empty());
        assert!(parsed.program.statements.contains(&Statement::LetStatement {
            name: Identifier("y".to_owned()),
            value: crate::ast::test::int(6),
        }));
        assert_eq!(
            parsed.into_result(),
            Err(vec![ParseError::UnexpectedToken {
                expected: TokenKind::Ident,
                found: TokenKind::Assign,
            }])
        );
    }

    #[test]
    fn policy_only_affects_expression_statements() {
        let lenient = ParserConfig {
            semicolons: SemicolonPolicy::Optional,
        };
        assert!(parse_with("1 + 2", lenient).errors.is_empty());
        assert!(!parse("1 + 2").errors.is_empty());
        assert!(!parse_with("return 1", lenient).errors.is_empty());
    }

    #[test]
    fn incomplete_input_is_unterminated() {
        assert!(parse("let f = fn(x) {").errors.is_unterminated());
        assert!(parse("if (x").errors.is_unterminated());
        assert!(parse("add(1,").errors.is_unterminated());
        assert!(!parse("let = 5;").errors.is_unterminated());
        assert!(!parse("5;").errors.is_unterminated());
    }
}
