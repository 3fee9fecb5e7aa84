//! The Abstract Syntax Tree representing the cali language.
//!
//! Every node owns its children, there is no sharing between subtrees.
//! All nodes implement [`Node`], which pairs a debugging accessor with
//! [`Display`], the latter rendering the node back into canonical source
//! text. Re-parsing that text yields an equal tree.
//!
//! For a structural view of a tree, see the [lispy_printer].
#![expect(
    clippy::wildcard_enum_match_arm,
    reason = "most token kinds share the same default case"
)]

pub mod lispy_printer;

use core::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::token::tokens::TokenKind;

/// Capabilities shared by every node of the tree.
pub trait Node: Display {
    /// The lexeme of the token this node starts with. Only used for debugging.
    fn token_literal(&self) -> &str;
}

/// The root of every tree produced by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "a program is only its statements.")]
pub struct Program {
    /// Top-level statements, in source order.
    pub statements: Vec<Statement>,
}

/// Statements in the cali language.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "adding a new variant MUST be handled and is a breaking change."
)]
pub enum Statement {
    /// `let <name> = <value>;`
    LetStatement {
        /// The name being bound.
        name: Identifier,
        /// The bound value.
        value: Expr,
    },
    /// `return <value>;` or a bare `return;`
    ReturnStatement(Option<Expr>),
    /// A bare expression used as a statement, `<expr>;`
    ExpressionStatement(Expr),
}

/// A braces-delimited list of statements, as used by `if` and `fn`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "a block is only its statements.")]
pub struct BlockStatement {
    /// Statements inside the braces.
    pub statements: Vec<Statement>,
}

/// Identifiers inside the cali language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Identifiers stay as Strings.")]
pub struct Identifier(pub String);

/// An integer literal, carrying the raw source text alongside its value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "literals stay value and text.")]
pub struct IntegerLiteral {
    /// The parsed and converted value, used for any computations.
    pub value: i64,
    /// The raw value as it appeared in source code.
    pub literal: String,
}

/// Expressions in the cali language.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "adding a new variant MUST be handled and is a breaking change."
)]
pub enum Expr {
    /// An identifier
    Identifier(Identifier),
    /// A decimal integer literal
    IntegerLiteral(IntegerLiteral),
    /// `true` or `false`
    Boolean(bool),
    /// Application of a prefix operator.
    PrefixExpression {
        /// The operator in front.
        operator: PrefixOp,
        /// The operand.
        expr: Box<Expr>,
    },
    /// Application of an infix operator.
    InfixOperation {
        /// The operator in between.
        operator: InfixOp,
        /// The left operand.
        lhs: Box<Expr>,
        /// The right operand.
        rhs: Box<Expr>,
    },
    /// Parenthesized expression, kept so the source can be reconstructed.
    Parenthesized(Box<Expr>),
    /// `if (<condition>) { ... } else { ... }`, the else branch being optional.
    IfExpression {
        /// The parenthesized condition.
        condition: Box<Expr>,
        /// Block taken if the condition holds.
        consequence: BlockStatement,
        /// Block after `else`, if there is one.
        alternative: Option<BlockStatement>,
    },
    /// `fn(<parameters>) { ... }`
    FunctionLiteral {
        /// Parameter names, in order.
        parameters: Vec<Identifier>,
        /// The function body.
        body: BlockStatement,
    },
    /// A Function call: `expr(expr, expr, ...)`
    CallExpression {
        /// The expression being called, usually an identifier.
        callee: Box<Expr>,
        /// Arguments, in order.
        arguments: Vec<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "adding a new variant MUST be handled and is a breaking change."
)]
pub enum PrefixOp {
    /// `!`
    Not,
    /// `-`
    Negate,
}

impl PrefixOp {
    /// The operator belonging to a token in prefix position, if any.
    #[inline]
    #[must_use]
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Negate),
            _ => None,
        }
    }

    /// The operator as written in source code.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "adding a new variant MUST be handled and is a breaking change."
)]
pub enum InfixOp {
    // Arithmetic
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,

    // Comparison
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
}

impl InfixOp {
    /// The operator belonging to a token in infix position, if any.
    #[inline]
    #[must_use]
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(InfixOp::Plus),
            TokenKind::Minus => Some(InfixOp::Minus),
            TokenKind::Asterisk => Some(InfixOp::Multiply),
            TokenKind::Slash => Some(InfixOp::Divide),
            TokenKind::Eq => Some(InfixOp::Equals),
            TokenKind::NotEq => Some(InfixOp::NotEquals),
            TokenKind::Lt => Some(InfixOp::LessThan),
            TokenKind::Gt => Some(InfixOp::GreaterThan),
            _ => None,
        }
    }

    /// The operator as written in source code.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Plus => "+",
            InfixOp::Minus => "-",
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Equals => "==",
            InfixOp::NotEquals => "!=",
            InfixOp::LessThan => "<",
            InfixOp::GreaterThan => ">",
        }
    }
}

// Debug accessors.

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match *self {
            Statement::LetStatement { .. } => "let",
            Statement::ReturnStatement(_) => "return",
            Statement::ExpressionStatement(ref expr) => expr.token_literal(),
        }
    }
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        "{"
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.0
    }
}

impl Node for IntegerLiteral {
    fn token_literal(&self) -> &str {
        &self.literal
    }
}

impl Node for Expr {
    fn token_literal(&self) -> &str {
        match *self {
            Expr::Identifier(ref id) => id.token_literal(),
            Expr::IntegerLiteral(ref lit) => lit.token_literal(),
            Expr::Boolean(true) => "true",
            Expr::Boolean(false) => "false",
            Expr::PrefixExpression { operator, .. } => operator.as_str(),
            Expr::InfixOperation { ref lhs, .. } => lhs.token_literal(),
            Expr::Parenthesized(_) => "(",
            Expr::IfExpression { .. } => "if",
            Expr::FunctionLiteral { .. } => "fn",
            Expr::CallExpression { ref callee, .. } => callee.token_literal(),
        }
    }
}

// Canonical source reconstruction.

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statements.iter().format(" "))
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Statement::LetStatement {
                ref name,
                ref value,
            } => write!(f, "let {name} = {value};"),
            Statement::ReturnStatement(Some(ref value)) => write!(f, "return {value};"),
            Statement::ReturnStatement(None) => f.write_str("return;"),
            Statement::ExpressionStatement(ref expr) => write!(f, "{expr};"),
        }
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{ {} }}", self.statements.iter().format(" "))
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for PrefixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for InfixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Expr::Identifier(ref id) => write!(f, "{id}"),
            Expr::IntegerLiteral(ref lit) => write!(f, "{lit}"),
            Expr::Boolean(value) => write!(f, "{value}"),
            Expr::PrefixExpression {
                operator,
                ref expr,
            } => write!(f, "{operator}{expr}"),
            Expr::InfixOperation {
                operator,
                ref lhs,
                ref rhs,
            } => write!(f, "{lhs} {operator} {rhs}"),
            Expr::Parenthesized(ref expr) => write!(f, "({expr})"),
            Expr::IfExpression {
                ref condition,
                ref consequence,
                ref alternative,
            } => {
                write!(f, "if ({condition}) {consequence}")?;
                if let Some(ref alternative) = *alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expr::FunctionLiteral {
                ref parameters,
                ref body,
            } => write!(f, "fn({}) {body}", parameters.iter().format(", ")),
            Expr::CallExpression {
                ref callee,
                ref arguments,
            } => write!(f, "{callee}({})", arguments.iter().format(", ")),
        }
    }
}
