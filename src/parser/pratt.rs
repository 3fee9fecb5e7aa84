//! A Pratt parser, pulling tokens from a [`Lexer`] on demand.
//!
//! Every token kind may be associated with up to two handlers: one for when it
//! is found in prefix position (it starts an expression) and one for infix
//! position (it continues an expression whose left-hand side has already been
//! parsed). Infix handlers are paired with a [`Precedence`], which decides how
//! tightly they bind.
//!
//! All handlers share one protocol: they start with `current` being the token
//! they are associated with, and return with `current` being the last token
//! that is part of their expression. They never advance further than that.
#![expect(
    clippy::wildcard_enum_match_arm,
    reason = "most token kinds share the same default case"
)]

use core::mem;

use tracing::{debug, trace};

use crate::ast::{
    BlockStatement, Expr, Identifier, InfixOp, IntegerLiteral, PrefixOp, Program, Statement,
};
use crate::errors::ParseError;
use crate::parser::{ParserConfig, SemicolonPolicy};
use crate::token::lexer::Lexer;
use crate::token::tokens::{Token, TokenKind};

/// Binding strength of operators, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Anything binds tighter than this.
    Lowest,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// `-x`, `!x`
    Prefix,
    /// `f(x)`
    Call,
}

impl Precedence {
    /// The precedence a token has in infix position.
    #[inline]
    #[must_use]
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// How deep expressions may nest before parsing gives up on them.
///
/// Every prefix operator, group, call, block and chained infix operator adds
/// one level. Bounding this keeps both the parser and the recursive walks
/// over the finished tree within a small stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses an expression starting at the current token.
type PrefixHandler<'src> = fn(&mut Parser<'src>) -> Option<Expr>;

/// Parses the rest of an expression, given its already parsed left-hand side.
type InfixHandler<'src> = fn(&mut Parser<'src>, Expr) -> Option<Expr>;

/// Turns the tokens of one [`Lexer`] into a [`Program`].
///
/// The parser keeps exactly two tokens in view, `current` and `peek`.
/// Grammar violations never abort parsing, they are collected and can be
/// inspected through [`Parser::errors`] once [`Parser::parse_program`] returns.
#[derive(Debug)]
pub struct Parser<'src> {
    /// Source of all tokens.
    lexer: Lexer<'src>,
    /// The token under examination.
    current: Token,
    /// The token after `current`.
    peek: Token,
    /// Everything that went wrong so far.
    errors: Vec<ParseError>,
    /// Grammar knobs.
    config: ParserConfig,
    /// Current expression nesting, see [`MAX_NESTING_DEPTH`].
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Creates a parser with the default configuration.
    #[inline]
    #[must_use]
    pub fn new(lexer: Lexer<'src>) -> Self {
        Self::with_config(lexer, ParserConfig::default())
    }

    /// Creates a parser, priming both `current` and `peek`.
    #[inline]
    #[must_use]
    pub fn with_config(lexer: Lexer<'src>, config: ParserConfig) -> Self {
        let mut parser = Parser {
            lexer,
            current: Token::new(TokenKind::Eof, ""),
            peek: Token::new(TokenKind::Eof, ""),
            errors: Vec::new(),
            config,
            depth: 0,
        };
        parser.advance();
        parser.advance();
        parser
    }

    /// Errors recorded so far, in the order they were found.
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consumes the parser, handing out the recorded errors.
    #[inline]
    #[must_use]
    pub fn finish(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parses statements until the end of input.
    ///
    /// Statements that fail to parse are left out of the [`Program`]; parsing
    /// then resumes at the token following the one the failure happened on.
    #[inline]
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.advance();
        }
        program
    }

    // Token management

    /// Shifts `peek` into `current` and pulls a fresh `peek` from the lexer.
    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = mem::replace(&mut self.peek, next);
    }

    /// Is `current` of the given kind?
    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Is `peek` of the given kind?
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances only if `peek` is of the given kind, recording an error otherwise.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.advance();
            Some(())
        } else {
            self.record(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek.kind,
            });
            None
        }
    }

    /// Logs and keeps an error.
    fn record(&mut self, error: ParseError) {
        debug!(%error, "parse error");
        self.errors.push(error);
    }

    // Statements

    /// Dispatches on the keyword starting a statement.
    fn parse_statement(&mut self) -> Option<Statement> {
        trace!(token = %self.current, "parsing statement");
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `let <ident> = <expr>;`
    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier(self.current.text.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.advance();

        let value = self.parse_required_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Some(Statement::LetStatement { name, value })
    }

    /// `return <expr>;` or `return;`
    fn parse_return_statement(&mut self) -> Option<Statement> {
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
            return Some(Statement::ReturnStatement(None));
        }
        self.advance();

        let value = self.parse_required_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Some(Statement::ReturnStatement(Some(value)))
    }

    /// `<expr>;`, the terminator depending on [`SemicolonPolicy`].
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        if self.current_is(TokenKind::Illegal) {
            self.record(ParseError::MissingPrefix {
                found: TokenKind::Illegal,
            });
            return None;
        }

        let expr = self.parse_expression(Precedence::Lowest)?;
        match self.config.semicolons {
            SemicolonPolicy::Required => self.expect_peek(TokenKind::Semicolon)?,
            SemicolonPolicy::Optional => {
                if self.peek_is(TokenKind::Semicolon) {
                    self.advance();
                }
            }
        }

        Some(Statement::ExpressionStatement(expr))
    }

    /// Parses `{ ... }`, starting on the opening brace and ending on the closing one.
    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let mut block = BlockStatement::default();
        self.advance();

        while !self.current_is(TokenKind::RBrace) {
            if self.current_is(TokenKind::Eof) {
                self.record(ParseError::UnexpectedToken {
                    expected: TokenKind::RBrace,
                    found: TokenKind::Eof,
                });
                return None;
            }
            if let Some(statement) = self.parse_statement() {
                block.statements.push(statement);
            }
            self.advance();
        }

        Some(block)
    }

    // Expressions

    /// Parses an expression binding tighter than `precedence`.
    ///
    /// A token without a prefix handler yields no expression and records
    /// nothing, see [`Self::parse_required_expression`] for contexts that
    /// cannot do without one. The nesting depth is the same afterwards as it
    /// was before, wherever parsing stopped.
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let depth = self.depth;
        let expr = self.parse_nested_expression(precedence);
        self.depth = depth;
        expr
    }

    /// The heart of the Pratt parser.
    fn parse_nested_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = Self::prefix_handler(self.current.kind)?;
        self.descend()?;
        let mut lhs = prefix(self)?;

        while precedence < Precedence::of(self.peek.kind) {
            let Some(infix) = Self::infix_handler(self.peek.kind) else {
                return Some(lhs);
            };
            self.descend()?;
            self.advance();
            lhs = infix(self, lhs)?;
        }

        Some(lhs)
    }

    /// Enters one more level of nesting, recording an error past the limit.
    fn descend(&mut self) -> Option<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.record(ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
            });
            return None;
        }
        self.depth = self.depth.saturating_add(1);
        Some(())
    }

    /// Like [`Self::parse_expression`], but a missing expression is an error.
    fn parse_required_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        if Self::prefix_handler(self.current.kind).is_none() {
            self.record(ParseError::MissingPrefix {
                found: self.current.kind,
            });
            return None;
        }
        self.parse_expression(precedence)
    }

    /// Handler for `kind` in prefix position, if it can start an expression.
    fn prefix_handler(kind: TokenKind) -> Option<PrefixHandler<'src>> {
        let handler: PrefixHandler<'src> = match kind {
            TokenKind::Ident => Self::parse_identifier,
            TokenKind::Int => Self::parse_integer_literal,
            TokenKind::True | TokenKind::False => Self::parse_boolean,
            TokenKind::Bang | TokenKind::Minus => Self::parse_prefix_expression,
            TokenKind::LParen => Self::parse_grouped_expression,
            TokenKind::If => Self::parse_if_expression,
            TokenKind::Function => Self::parse_function_literal,

            TokenKind::Illegal
            | TokenKind::Eof
            | TokenKind::Assign
            | TokenKind::Plus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Let
            | TokenKind::Else
            | TokenKind::Return => return None,
        };
        Some(handler)
    }

    /// Handler for `kind` in infix position, if it can continue an expression.
    fn infix_handler(kind: TokenKind) -> Option<InfixHandler<'src>> {
        let handler: InfixHandler<'src> = match kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Eq
            | TokenKind::NotEq => Self::parse_infix_expression,
            TokenKind::LParen => Self::parse_call_expression,

            TokenKind::Illegal
            | TokenKind::Eof
            | TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Assign
            | TokenKind::Bang
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Function
            | TokenKind::Let
            | TokenKind::True
            | TokenKind::False
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::Return => return None,
        };
        Some(handler)
    }

    // Prefix handlers

    /// `foo`
    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Identifier(Identifier(self.current.text.clone())))
    }

    /// `123`, which has to fit into an `i64`.
    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let literal = self.current.text.clone();
        match literal.parse::<i64>() {
            Ok(value) => Some(Expr::IntegerLiteral(IntegerLiteral { value, literal })),
            Err(_) => {
                self.record(ParseError::InvalidInteger { literal });
                None
            }
        }
    }

    /// `true` or `false`
    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(Expr::Boolean(self.current_is(TokenKind::True)))
    }

    /// `!<expr>` or `-<expr>`
    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let operator = PrefixOp::from_token(self.current.kind)?;
        self.advance();

        let expr = self.parse_required_expression(Precedence::Prefix)?;
        Some(Expr::PrefixExpression {
            operator,
            expr: Box::new(expr),
        })
    }

    /// `(<expr>)`
    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.advance();

        let expr = self.parse_required_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        Some(Expr::Parenthesized(Box::new(expr)))
    }

    /// `if (<expr>) { ... }` with an optional `else { ... }`
    fn parse_if_expression(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        self.advance();

        let condition = self.parse_required_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expr::IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// `fn(<params>) { ... }`
    fn parse_function_literal(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;

        Some(Expr::FunctionLiteral { parameters, body })
    }

    /// Parses `a, b, c)`, starting on the opening parenthesis.
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(parameters);
        }

        self.expect_peek(TokenKind::Ident)?;
        parameters.push(Identifier(self.current.text.clone()));
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(Identifier(self.current.text.clone()));
        }
        self.expect_peek(TokenKind::RParen)?;

        Some(parameters)
    }

    // Infix handlers

    /// `<lhs> <op> <rhs>`, with `current` on the operator.
    fn parse_infix_expression(&mut self, lhs: Expr) -> Option<Expr> {
        let operator = InfixOp::from_token(self.current.kind)?;
        let precedence = Precedence::of(self.current.kind);
        self.advance();

        let rhs = self.parse_required_expression(precedence)?;
        Some(Expr::InfixOperation {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// `<callee>(<args>)`, with `current` on the opening parenthesis.
    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::CallExpression {
            callee: Box::new(callee),
            arguments,
        })
    }

    /// Parses comma-separated expressions up to and including `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_required_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_required_expression(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;

        Some(list)
    }
}

#[cfg(test)]
mod test {
    use expect_test::{expect, Expect};

    use super::{Parser, Precedence, MAX_NESTING_DEPTH};
    use crate::ast::lispy_printer::PrettyPrint;
    use crate::ast::test::{ident, int};
    use crate::ast::{BlockStatement, Expr, Identifier, InfixOp, PrefixOp, Program, Statement};
    use crate::errors::ParseError;
    use crate::parser::{ParserConfig, SemicolonPolicy};
    use crate::token::lexer::Lexer;
    use crate::token::tokens::TokenKind;

    fn parse_ok(source: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(
            parser.errors().is_empty(),
            "unexpected errors for {source:?}: {:?}",
            parser.errors()
        );
        program
    }

    fn parse_errors(source: &str) -> (Program, Vec<ParseError>) {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        (program, parser.finish())
    }

    fn single_expression(source: &str) -> Expr {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1, "statements of {source:?}");
        match program.statements.into_iter().next() {
            Some(Statement::ExpressionStatement(expr)) => expr,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn check(source: &str, expect: Expect) {
        expect.assert_eq(&parse_ok(source).pretty_print());
    }

    #[test]
    fn let_statements() {
        let program = parse_ok("let x = 5; let y = true; let foobar = y;");
        assert_eq!(
            program.statements,
            vec![
                Statement::LetStatement {
                    name: Identifier("x".to_owned()),
                    value: int(5),
                },
                Statement::LetStatement {
                    name: Identifier("y".to_owned()),
                    value: Expr::Boolean(true),
                },
                Statement::LetStatement {
                    name: Identifier("foobar".to_owned()),
                    value: ident("y"),
                },
            ]
        );
    }

    #[test]
    fn let_without_identifier_records_an_error() {
        let (program, errors) = parse_errors("let = 5;");
        assert_eq!(
            errors.first(),
            Some(&ParseError::UnexpectedToken {
                expected: TokenKind::Ident,
                found: TokenKind::Assign,
            })
        );
        assert!(
            !program
                .statements
                .iter()
                .any(|statement| matches!(statement, Statement::LetStatement { .. }))
        );
    }

    #[test]
    fn every_malformed_statement_is_reported() {
        let (program, errors) = parse_errors("let x 5; let = 10; let 838383;");
        assert_eq!(
            errors,
            vec![
                ParseError::UnexpectedToken {
                    expected: TokenKind::Assign,
                    found: TokenKind::Int,
                },
                ParseError::UnexpectedToken {
                    expected: TokenKind::Ident,
                    found: TokenKind::Assign,
                },
                ParseError::UnexpectedToken {
                    expected: TokenKind::Ident,
                    found: TokenKind::Int,
                },
            ]
        );
        // Parsing resumes right after the failing token, picking up the literals.
        assert_eq!(
            program.statements,
            vec![
                Statement::ExpressionStatement(int(5)),
                Statement::ExpressionStatement(int(10)),
                Statement::ExpressionStatement(int(838_383)),
            ]
        );
    }

    #[test]
    fn return_statements() {
        let program = parse_ok("return 5; return 10; return add(15); return;");
        assert_eq!(
            program.statements,
            vec![
                Statement::ReturnStatement(Some(int(5))),
                Statement::ReturnStatement(Some(int(10))),
                Statement::ReturnStatement(Some(Expr::CallExpression {
                    callee: Box::new(ident("add")),
                    arguments: vec![int(15)],
                })),
                Statement::ReturnStatement(None),
            ]
        );
    }

    #[test]
    fn identifier_expression() {
        assert_eq!(single_expression("foobar;"), ident("foobar"));
    }

    #[test]
    fn integer_literal_expression() {
        assert_eq!(single_expression("5;"), int(5));
        assert_eq!(single_expression("9223372036854775807;"), int(i64::MAX));
    }

    #[test]
    fn leading_zeros_are_kept_in_the_literal() {
        let Expr::IntegerLiteral(literal) = single_expression("007;") else {
            panic!("expected an integer literal");
        };
        assert_eq!(literal.value, 7);
        assert_eq!(literal.literal, "007");
        assert_eq!(literal.to_string(), "7");
    }

    #[test]
    fn integer_literals_render_without_leading_zeros() {
        for (literal, rendered) in [
            ("0", "0"),
            ("00", "0"),
            ("1", "1"),
            ("10", "10"),
            ("9223372036854775807", "9223372036854775807"),
            ("0009223372036854775807", "9223372036854775807"),
        ] {
            let Expr::IntegerLiteral(parsed) = single_expression(&format!("{literal};")) else {
                panic!("expected an integer literal for {literal}");
            };
            assert_eq!(parsed.literal, literal);
            assert_eq!(parsed.to_string(), rendered, "{literal}");
        }
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let (program, errors) = parse_errors("9223372036854775808;");
        assert_eq!(
            errors,
            vec![ParseError::InvalidInteger {
                literal: "9223372036854775808".to_owned()
            }]
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn boolean_expressions() {
        assert_eq!(single_expression("true;"), Expr::Boolean(true));
        assert_eq!(single_expression("false;"), Expr::Boolean(false));
    }

    #[test]
    fn prefix_expressions() {
        for (source, operator, operand) in [
            ("!5;", PrefixOp::Not, int(5)),
            ("-15;", PrefixOp::Negate, int(15)),
            ("!true;", PrefixOp::Not, Expr::Boolean(true)),
            ("-a;", PrefixOp::Negate, ident("a")),
        ] {
            assert_eq!(
                single_expression(source),
                Expr::PrefixExpression {
                    operator,
                    expr: Box::new(operand),
                },
                "{source}"
            );
        }
    }

    #[test]
    fn infix_expressions() {
        for (source, operator) in [
            ("5 + 5;", InfixOp::Plus),
            ("5 - 5;", InfixOp::Minus),
            ("5 * 5;", InfixOp::Multiply),
            ("5 / 5;", InfixOp::Divide),
            ("5 > 5;", InfixOp::GreaterThan),
            ("5 < 5;", InfixOp::LessThan),
            ("5 == 5;", InfixOp::Equals),
            ("5 != 5;", InfixOp::NotEquals),
        ] {
            assert_eq!(
                single_expression(source),
                Expr::InfixOperation {
                    operator,
                    lhs: Box::new(int(5)),
                    rhs: Box::new(int(5)),
                },
                "{source}"
            );
        }
    }

    #[test]
    fn operator_precedence() {
        check("-a * b;", expect!["(* (- a) b)"]);
        check("!-a;", expect!["(! (- a))"]);
        check("a + b + c;", expect!["(+ (+ a b) c)"]);
        check("a + b - c;", expect!["(- (+ a b) c)"]);
        check("a * b * c;", expect!["(* (* a b) c)"]);
        check("a * b / c;", expect!["(/ (* a b) c)"]);
        check("a + b / c;", expect!["(+ a (/ b c))"]);
        check(
            "a + b * c + d / e - f;",
            expect!["(- (+ (+ a (* b c)) (/ d e)) f)"],
        );
        check("3 + 4; -5 * 5;", expect!["(+ 3 4) (* (- 5) 5)"]);
        check("5 > 4 == 3 < 4;", expect!["(== (> 5 4) (< 3 4))"]);
        check("5 < 4 != 3 > 4;", expect!["(!= (< 5 4) (> 3 4))"]);
        check(
            "3 + 4 * 5 == 3 * 1 + 4 * 5;",
            expect!["(== (+ 3 (* 4 5)) (+ (* 3 1) (* 4 5)))"],
        );
        check("3 > 5 == false;", expect!["(== (> 3 5) false)"]);
        check("!true == false;", expect!["(== (! true) false)"]);
    }

    #[test]
    fn grouping_overrides_precedence() {
        check("1 + (2 + 3) + 4;", expect!["(+ (+ 1 (group (+ 2 3))) 4)"]);
        check("(5 + 5) * 2;", expect!["(* (group (+ 5 5)) 2)"]);
        check("-(5 + 5);", expect!["(- (group (+ 5 5)))"]);
        check("!(true == true);", expect!["(! (group (== true true)))"]);
    }

    #[test]
    fn calls_bind_tightest() {
        check("a + add(b * c) + d;", expect!["(+ (+ a (call add (* b c))) d)"]);
        check(
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8));",
            expect!["(call add a b 1 (* 2 3) (+ 4 5) (call add 6 (* 7 8)))"],
        );
        check(
            "add(a + b + c * d / f + g);",
            expect!["(call add (+ (+ (+ a b) (/ (* c d) f)) g))"],
        );
        check("-f(x);", expect!["(- (call f x))"]);
        check("f(x)(y);", expect!["(call (call f x) y)"]);
        check("f();", expect!["(call f)"]);
    }

    #[test]
    fn if_expressions() {
        assert_eq!(
            single_expression("if (x < y) { x; };"),
            Expr::IfExpression {
                condition: Box::new(Expr::InfixOperation {
                    operator: InfixOp::LessThan,
                    lhs: Box::new(ident("x")),
                    rhs: Box::new(ident("y")),
                }),
                consequence: BlockStatement {
                    statements: vec![Statement::ExpressionStatement(ident("x"))],
                },
                alternative: None,
            }
        );
        check(
            "if (x < y) { x; } else { return y; };",
            expect!["(if (< x y) (block x) (block (return y)))"],
        );
        check("if (x) {};", expect!["(if x (block))"]);
    }

    #[test]
    fn function_literals() {
        assert_eq!(
            single_expression("fn(x, y) { x + y; };"),
            Expr::FunctionLiteral {
                parameters: vec![Identifier("x".to_owned()), Identifier("y".to_owned())],
                body: BlockStatement {
                    statements: vec![Statement::ExpressionStatement(Expr::InfixOperation {
                        operator: InfixOp::Plus,
                        lhs: Box::new(ident("x")),
                        rhs: Box::new(ident("y")),
                    })],
                },
            }
        );
        check("fn() {};", expect!["(fn () (block))"]);
        check("fn(x) {};", expect!["(fn (x) (block))"]);
        check("fn(x, y, z) {};", expect!["(fn (x y z) (block))"]);
        check(
            "let apply = fn(f, x) { return f(x); }; apply(fn(a) { a * 2; }, 21);",
            expect![
                "(let apply (fn (f x) (block (return (call f x))))) (call apply (fn (a) (block (* a 2))) 21)"
            ],
        );
    }

    #[test]
    fn missing_semicolon_is_an_error_by_default() {
        let (program, errors) = parse_errors("5");
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::Semicolon,
                found: TokenKind::Eof,
            }]
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn optional_semicolons() {
        let config = ParserConfig {
            semicolons: SemicolonPolicy::Optional,
        };
        let source = "let add = fn(x, y) { x + y }; add(1, 2)";
        let mut parser = Parser::with_config(Lexer::new(source), config);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty());
        assert_eq!(
            program.to_string(),
            "let add = fn(x, y) { x + y; }; add(1, 2);"
        );

        // `let` keeps its terminator regardless.
        let mut parser = Parser::with_config(Lexer::new("let x = 1"), config);
        let program = parser.parse_program();
        assert!(program.statements.is_empty());
        assert_eq!(
            parser.errors(),
            &[ParseError::UnexpectedToken {
                expected: TokenKind::Semicolon,
                found: TokenKind::Eof,
            }]
        );
    }

    #[test]
    fn missing_operand_is_an_error() {
        let (program, errors) = parse_errors("5 + ;");
        assert_eq!(
            errors,
            vec![ParseError::MissingPrefix {
                found: TokenKind::Semicolon
            }]
        );
        assert!(program.statements.is_empty());

        let (_, errors) = parse_errors("let x = ;");
        assert_eq!(
            errors,
            vec![ParseError::MissingPrefix {
                found: TokenKind::Semicolon
            }]
        );
    }

    #[test]
    fn stray_tokens_without_prefix_are_skipped() {
        let (program, errors) = parse_errors(";; ) 5;");
        assert!(errors.is_empty());
        assert_eq!(
            program.statements,
            vec![Statement::ExpressionStatement(int(5))]
        );
    }

    #[test]
    fn illegal_characters_are_reported() {
        let (program, errors) = parse_errors("@; x;");
        assert_eq!(
            errors,
            vec![ParseError::MissingPrefix {
                found: TokenKind::Illegal
            }]
        );
        assert_eq!(
            program.statements,
            vec![Statement::ExpressionStatement(ident("x"))]
        );
    }

    #[test]
    fn unterminated_block() {
        let (program, errors) = parse_errors("fn(x) { x;");
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::RBrace,
                found: TokenKind::Eof,
            }]
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn unclosed_call_arguments() {
        let (_, errors) = parse_errors("add(1, 2;");
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::RParen,
                found: TokenKind::Semicolon,
            }]
        );
    }

    #[test]
    fn canonical_source_is_a_fixed_point() {
        let source = "let x = 5 * (2 + y); return -x; \
                      if (a < b) { a; } else { b; }; \
                      let f = fn(a, b) { return a + b; }; f(1, 2)(3); !true == false;";
        let program = parse_ok(source);
        let rendered = program.to_string();
        assert_eq!(rendered, source);
        assert_eq!(parse_ok(&rendered), program);
    }

    #[test]
    fn nesting_up_to_the_limit_is_accepted() {
        let source = format!("{}1;", "-".repeat(MAX_NESTING_DEPTH - 1));
        let program = parse_ok(&source);
        assert_eq!(program.to_string(), source);
    }

    #[test]
    fn nesting_past_the_limit_is_an_error() {
        let source = format!("{}1;", "-".repeat(MAX_NESTING_DEPTH));
        let (program, errors) = parse_errors(&source);
        assert_eq!(
            errors,
            vec![ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH
            }]
        );
        assert!(program.statements.is_empty());
    }

    #[test]
    fn very_deep_input_does_not_exhaust_the_stack() {
        let too_deep = |errors: &[ParseError]| {
            !errors.is_empty()
                && errors
                    .iter()
                    .all(|error| matches!(error, ParseError::TooDeep { .. }))
        };

        let (_, errors) = parse_errors(&format!("{}1; x;", "-".repeat(100_000)));
        assert!(too_deep(errors.as_slice()), "{:?}", errors.first());

        let (_, errors) = parse_errors(&format!("1{};", " + 1".repeat(100_000)));
        assert!(too_deep(errors.as_slice()), "{:?}", errors.first());

        let calls = format!("{}x{};", "f(".repeat(100_000), ")".repeat(100_000));
        let (_, errors) = parse_errors(&calls);
        assert!(errors.contains(&ParseError::TooDeep {
            limit: MAX_NESTING_DEPTH
        }));

        let groups = format!("{}1{};", "(".repeat(100_000), ")".repeat(100_000));
        let (_, errors) = parse_errors(&groups);
        assert_eq!(
            errors.first(),
            Some(&ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn precedence_ladder_is_ordered() {
        assert!(Precedence::Lowest < Precedence::Equals);
        assert!(Precedence::Equals < Precedence::LessGreater);
        assert!(Precedence::LessGreater < Precedence::Sum);
        assert!(Precedence::Sum < Precedence::Product);
        assert!(Precedence::Product < Precedence::Prefix);
        assert!(Precedence::Prefix < Precedence::Call);
        assert_eq!(Precedence::of(TokenKind::Semicolon), Precedence::Lowest);
    }
}
