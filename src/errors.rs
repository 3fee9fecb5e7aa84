//! Errors that can occur during the lifetime of the tool.
//!
//! Lexing cannot fail, unknown characters simply become
//! [`TokenKind::Illegal`] tokens. Parsing never aborts either: every problem is
//! recorded as a [`ParseError`] and collected, so a caller gets to see all of
//! them after a single pass.
use std::io::Error as IOError;
use std::process::ExitCode;

use itertools::Itertools;
use thiserror::Error;

use crate::token::tokens::TokenKind;

/// A recoverable grammar violation found by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The token following the current one was not the one the grammar requires.
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken {
        /// The kind the grammar asked for.
        expected: TokenKind,
        /// The kind that was actually there.
        found: TokenKind,
    },
    /// An expression was required, but the token cannot start one.
    #[error("no prefix parse function for {found} found")]
    MissingPrefix {
        /// The token found where an expression should have started.
        found: TokenKind,
    },
    /// The text of an integer literal does not fit into 64 bits.
    #[error("could not parse {literal:?} as integer")]
    InvalidInteger {
        /// The offending literal, as written.
        literal: String,
    },
    /// Expressions nest deeper than the parser is willing to follow.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit that was hit.
        limit: usize,
    },
}

/// An error that occurred inside the cali engine.
///
/// To support the [`std::process::Termination`] trait, a
/// `From<EngineError> for ExitCode` implementation is provided, using the
/// exit codes of the
/// [`<sysexits.h>`](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+4.3-RELEASE&format=html)
/// header.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// An error in how the tool is called, carrying the program name.
    #[error("Usage: {0} [script]")]
    UsageError(String),
    /// Errors that happened when trying to load the file
    /// or read the REPL line.
    #[error("Error reading source file: {0}")]
    FileError(#[from] IOError),
    /// Errors that happened during the parsing phase.
    #[error("Errors when parsing:\n{}", .0.iter().join("\n"))]
    ParseErrors(Vec<ParseError>),
}

impl From<Vec<ParseError>> for EngineError {
    fn from(value: Vec<ParseError>) -> Self {
        EngineError::ParseErrors(value)
    }
}

impl From<EngineError> for ExitCode {
    fn from(value: EngineError) -> Self {
        ExitCode::from(match value {
            EngineError::UsageError(_) => 64, // EX_USAGE
            // Technically, 66 only specifies missing or unreadable files
            // any other errors during I/O for both the file, and the REPL command,
            // should be presented as 74, EX_IOERR
            EngineError::FileError(_) => 66,   // EX_NOINPUT
            EngineError::ParseErrors(_) => 65, // EX_DATAERR
        })
    }
}

// Continuation helpers for the REPL

/// Whether an error occurred because the input was too short.
/// Such errors can be recoverable by allowing further input on the REPL.
pub trait UnterminatedError {
    /// Was this error caused by sudden end of input?
    fn is_unterminated(&self) -> bool;
}

impl UnterminatedError for ParseError {
    fn is_unterminated(&self) -> bool {
        match *self {
            ParseError::UnexpectedToken { found, .. } | ParseError::MissingPrefix { found } => {
                found == TokenKind::Eof
            }
            ParseError::InvalidInteger { .. } | ParseError::TooDeep { .. } => false,
        }
    }
}

impl UnterminatedError for [ParseError] {
    fn is_unterminated(&self) -> bool {
        !self.is_empty() && self.iter().all(UnterminatedError::is_unterminated)
    }
}

impl UnterminatedError for EngineError {
    fn is_unterminated(&self) -> bool {
        if let EngineError::ParseErrors(ref errs) = *self {
            errs.is_unterminated()
        } else {
            false
        }
    }
}
