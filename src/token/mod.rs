//! This is the Lexing or Tokenization module, split into two submodules.
//!
//! - [tokens] specifies the data types making up the tokens of the cali language,
//!   including the keyword table.
//! - [lexer] contains the scanner turning source text into tokens, one at a time.
pub mod lexer;
pub mod tokens;
