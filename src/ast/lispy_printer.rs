//! A Lisp-like pretty-printer, making the structure of a tree explicit.
//!
//! Where [`Display`](core::fmt::Display) on the tree reconstructs source
//! text, this printer wraps every compound node in its own parentheses, so
//! operator precedence and associativity can be read off directly:
//! `a + b * c` prints as `(+ a (* b c))`.
#![expect(
    clippy::missing_trait_methods,
    reason = "pretty_print only ever allocates and delegates."
)]

use super::{
    BlockStatement, Expr, Identifier, InfixOp, IntegerLiteral, PrefixOp, Program, Statement,
};

/// A Lisp-y pretty print of a syntax tree.
pub trait PrettyPrint {
    /// Generate a Lisp-y prettyprint.
    /// The default implementation simply calls [`Self::pretty_print_into`]
    /// with a newly allocated String.
    fn pretty_print(&self) -> String {
        let mut accumulator = String::new();
        self.pretty_print_into(&mut accumulator);
        accumulator
    }

    /// Generate the pretty-print into the given String buffer.
    fn pretty_print_into(&self, target: &mut String);
}

/// Expand into Tuple Implementations for [`PrettyPrint`].
macro_rules! tuple_impl {
    ($param:ident) => {
        tuple_impl!(@impl $param);
    };
    ($first:ident $($param:ident)+) => {
        tuple_impl!($($param)+);
        tuple_impl!(@impl $first $($param)+);
    };
    (@impl $($param:ident)+) => {
        impl<$($param: PrettyPrint,)+> PrettyPrint for ($($param,)+) {
            #[inline]
            #[expect(
                non_snake_case,
                clippy::min_ident_chars,
                reason = "simpler to do this than to figure out how to get the index numbers"
            )]
            fn pretty_print_into(&self, target: &mut String) {
                let ($(ref $param,)+) = *self;
                $($param.pretty_print_into(target);)*
            }
        }
    }
}

/// Simple wrapper that expands to a tuple of the values,
/// calling [`PrettyPrint::pretty_print_into`] for the target.
macro_rules! pp(($target:expr, $($val:expr),+ $(,)?) => {
    ($($val),+).pretty_print_into($target)
});

tuple_impl!(H G F E D C B A);

impl<T: PrettyPrint + ?Sized> PrettyPrint for &T {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        pp!(target, **self);
    }
}

impl<T: PrettyPrint + ?Sized> PrettyPrint for Box<T> {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        pp!(target, **self);
    }
}

impl PrettyPrint for char {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        target.push(*self);
    }
}

impl PrettyPrint for str {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        target.push_str(self);
    }
}

/// Prints every element preceded by a single space.
fn pp_spaced<T: PrettyPrint>(items: &[T], target: &mut String) {
    for item in items {
        pp!(target, ' ', item);
    }
}

impl PrettyPrint for Program {
    fn pretty_print_into(&self, target: &mut String) {
        let mut statements = self.statements.iter();
        if let Some(first) = statements.next() {
            pp!(target, first);
        }
        for statement in statements {
            pp!(target, ' ', statement);
        }
    }
}

impl PrettyPrint for Statement {
    fn pretty_print_into(&self, target: &mut String) {
        match *self {
            Statement::LetStatement {
                ref name,
                ref value,
            } => pp!(target, "(let ", name, ' ', value, ')'),
            Statement::ReturnStatement(Some(ref value)) => pp!(target, "(return ", value, ')'),
            Statement::ReturnStatement(None) => pp!(target, "(return)"),
            Statement::ExpressionStatement(ref expr) => pp!(target, expr),
        }
    }
}

impl PrettyPrint for BlockStatement {
    fn pretty_print_into(&self, target: &mut String) {
        pp!(target, "(block");
        pp_spaced(&self.statements, target);
        pp!(target, ')');
    }
}

impl PrettyPrint for Expr {
    fn pretty_print_into(&self, target: &mut String) {
        match *self {
            Expr::Identifier(ref id) => pp!(target, id),
            Expr::IntegerLiteral(ref lit) => pp!(target, lit),
            Expr::Boolean(true) => pp!(target, "true"),
            Expr::Boolean(false) => pp!(target, "false"),
            Expr::PrefixExpression {
                ref operator,
                ref expr,
            } => {
                pp!(target, '(', operator, ' ', expr, ')');
            }
            Expr::InfixOperation {
                ref operator,
                ref lhs,
                ref rhs,
            } => {
                pp!(target, '(', operator, ' ', lhs, ' ', rhs, ')');
            }
            Expr::Parenthesized(ref expr) => {
                pp!(target, "(group ", expr, ')');
            }
            Expr::IfExpression {
                ref condition,
                ref consequence,
                ref alternative,
            } => {
                pp!(target, "(if ", condition, ' ', consequence);
                if let Some(ref alternative) = *alternative {
                    pp!(target, ' ', alternative);
                }
                pp!(target, ')');
            }
            Expr::FunctionLiteral {
                ref parameters,
                ref body,
            } => {
                pp!(target, "(fn (");
                let mut parameters = parameters.iter();
                if let Some(first) = parameters.next() {
                    pp!(target, first);
                }
                for parameter in parameters {
                    pp!(target, ' ', parameter);
                }
                pp!(target, ") ", body, ')');
            }
            Expr::CallExpression {
                ref callee,
                ref arguments,
            } => {
                pp!(target, "(call ", callee);
                pp_spaced(arguments, target);
                pp!(target, ')');
            }
        }
    }
}

impl PrettyPrint for Identifier {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        pp!(target, self.0.as_str());
    }
}

impl PrettyPrint for IntegerLiteral {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        target.push_str(&self.value.to_string());
    }
}

impl PrettyPrint for PrefixOp {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        target.push_str(self.as_str());
    }
}

impl PrettyPrint for InfixOp {
    #[inline]
    fn pretty_print_into(&self, target: &mut String) {
        target.push_str(self.as_str());
    }
}
