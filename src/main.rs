//! # cali - command line front end
//!
//! Parses cali source files and prints the resulting tree, either as
//! canonical source text or as a lispy S-expression. Without a file, the
//! [`repl`](CaliCommands::Repl) subcommand reads statements line by line,
//! asking for continuation lines while the input is unterminated.
//!
//! Diagnostics are emitted through `tracing` and go to stderr. The filter is
//! taken from `RUST_LOG` if set, otherwise `--verbose` enables debug output.
#![deny(
    warnings,
)]
#![deny(
    future_incompatible,
    keyword_idents,
    let_underscore,
    nonstandard_style,
    refining_impl_trait,
)]
#![deny(
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2024_compatibility,
)]
#![deny(
    clippy::all,
    clippy::pedantic,
)]
#![deny(
    clippy::absolute_paths,
    clippy::alloc_instead_of_core,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::arithmetic_side_effects,
    clippy::as_conversions,
    clippy::as_underscore,
    clippy::assertions_on_result_states,
    clippy::big_endian_bytes,
    clippy::cfg_not_test,
    clippy::clone_on_ref_ptr,
    clippy::create_dir,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::default_numeric_fallback,
    clippy::default_union_representation,
    clippy::deref_by_slicing,
    clippy::disallowed_script_idents,
    clippy::else_if_without_else,
    clippy::empty_drop,
    clippy::empty_enum_variants_with_brackets,
    clippy::empty_structs_with_brackets,
    clippy::error_impl_error,
    clippy::exhaustive_enums,
    clippy::exhaustive_structs,
    clippy::exit,
    clippy::field_scoped_visibility_modifiers,
    clippy::filetype_is_file,
    clippy::float_arithmetic,
    clippy::float_cmp_const,
    clippy::fn_to_numeric_cast_any,
    clippy::get_unwrap,
    clippy::host_endian_bytes,
    clippy::if_then_some_else_none,
    clippy::impl_trait_in_params,
    clippy::indexing_slicing,
    clippy::infinite_loop,
    clippy::inline_asm_x86_att_syntax,
    clippy::inline_asm_x86_intel_syntax,
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    clippy::iter_over_hash_type,
    clippy::large_include_file,
    clippy::let_underscore_must_use,
    clippy::let_underscore_untyped,
    clippy::little_endian_bytes,
    clippy::lossy_float_literal,
    clippy::map_err_ignore,
    clippy::mem_forget,
    clippy::min_ident_chars,
    clippy::missing_assert_message,
    clippy::missing_asserts_for_indexing,
    clippy::missing_docs_in_private_items,
    clippy::missing_inline_in_public_items,
    clippy::missing_trait_methods,
    clippy::mixed_read_write_in_expression,
    clippy::module_name_repetitions,
    clippy::modulo_arithmetic,
    clippy::multiple_inherent_impl,
    clippy::multiple_unsafe_ops_per_block,
    clippy::mutex_atomic,
    clippy::mutex_integer,
    clippy::needless_raw_strings,
    clippy::non_ascii_literal,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::partial_pub_fields,
    clippy::pathbuf_init_then_push,
    clippy::pattern_type_mismatch,
    clippy::pub_with_shorthand,
    clippy::pub_without_shorthand,
    clippy::rc_buffer,
    clippy::rc_mutex,
    clippy::redundant_type_annotations,
    clippy::renamed_function_params,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::self_named_module_files,
    clippy::semicolon_inside_block,
    clippy::semicolon_outside_block,
    clippy::separated_literal_suffix,
    clippy::single_char_lifetime_names,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::str_to_string,
    clippy::string_add,
    clippy::string_lit_chars_any,
    clippy::string_slice,
    clippy::string_to_string,
    clippy::suspicious_xor_used_as_pow,
    clippy::tests_outside_test_module,
    clippy::todo,
    clippy::try_err,
    clippy::undocumented_unsafe_blocks,
    clippy::unimplemented,
    clippy::unnecessary_safety_comment,
    clippy::unnecessary_safety_doc,
    clippy::unnecessary_self_imports,
    clippy::unneeded_field_pattern,
    clippy::unreachable,
    clippy::unused_result_ok,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::verbose_file_reads,
    clippy::wildcard_enum_match_arm
)]
#![warn(unused)]
#![allow(
    edition_2024_expr_fragment_specifier,
    reason = "the macros expect the 2024 edition behaviour."
)]

use std::env;
use std::fs;
use std::io::{stderr, stdin, stdout, BufRead, Error as IOError, Write};
use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cali::ast::lispy_printer::PrettyPrint;
use cali::ast::Program;
use cali::errors::{EngineError, UnterminatedError};
use cali::parser::{parse_with, ParserConfig, SemicolonPolicy};
use cali::token::lexer;

/// How parsed programs are parsed and shown.
#[derive(Debug, Clone, Copy, Default)]
struct Options {
    /// Handed to the parser.
    config: ParserConfig,
    /// Print S-expressions instead of canonical source.
    sexpr: bool,
}

/// Writes every statement of `program` on its own line.
fn write_program<W: Write>(output: &mut W, program: &Program, options: Options) -> Result<(), IOError> {
    for statement in &program.statements {
        if options.sexpr {
            writeln!(output, "{}", statement.pretty_print())?;
        } else {
            writeln!(output, "{statement}")?;
        }
    }
    Ok(())
}

/// Load a file, parse it and print the tree.
fn run_file(file: &str, options: Options) -> Result<(), EngineError> {
    let source = fs::read_to_string(file)?;
    info!(file, bytes = source.len(), "parsing source file");

    let program = parse_with(&source, options.config).into_result()?;
    debug!(statements = program.statements.len(), "parsed source file");
    write_program(&mut stdout().lock(), &program, options)?;
    Ok(())
}

/// Load a file and print its tokens, one per line.
fn tokenize_file(file: &str) -> Result<(), EngineError> {
    let source = fs::read_to_string(file)?;
    info!(file, bytes = source.len(), "tokenizing source file");

    let mut output = stdout().lock();
    for token in lexer::tokenize(&source) {
        writeln!(output, "{token}")?;
    }
    Ok(())
}

/// The REPL loop over arbitrary streams.
///
/// Lines are collected until they form input that is not cut off early, then
/// parsed as a whole. Trees go to `output`, errors to `errors`. Input still
/// pending when `input` runs dry is parsed once more so its errors are shown.
fn repl<R: BufRead, W: Write, E: Write>(
    mut input: R,
    mut output: W,
    mut errors: E,
    options: Options,
) -> Result<(), IOError> {
    let mut buffer = String::new();
    let mut prompt = ">> ";
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let read = input.read_line(&mut buffer)?;
        if read == 0 {
            writeln!(output)?;
            if !buffer.trim().is_empty() {
                debug!("end of input with unfinished statements");
                for err in parse_with(&buffer, options.config).errors {
                    writeln!(errors, "{err}")?;
                }
            }
            return Ok(());
        }

        let parsed = parse_with(&buffer, options.config);
        if parsed.errors.is_unterminated() {
            debug!("input is unterminated, asking for more");
            prompt = ".. ";
            continue;
        }

        for err in &parsed.errors {
            writeln!(errors, "{err}")?;
        }
        if parsed.errors.is_empty() {
            write_program(&mut output, &parsed.program, options)?;
        }

        buffer.clear();
        prompt = ">> ";
    }
}

/// Run the REPL Prompt on the terminal. Nothing is evaluated.
fn run_prompt(options: Options) -> Result<(), IOError> {
    repl(stdin().lock(), stdout(), stderr(), options)
}

/// Isomorphic to `Result<(), EngineError>`,
/// this allows for overriding the [Termination]
/// trait impl and report custom exit codes instead.
#[derive(Debug)]
enum EngineResult {
    /// Ok variant.
    Ok,
    /// Error variant
    Err(EngineError),
}

impl Termination for EngineResult {
    fn report(self) -> ExitCode {
        if let EngineResult::Err(err) = self {
            eprintln!("{err}");
            err.into()
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl<E> From<Result<(), E>> for EngineResult
where
    EngineError: From<E>,
{
    fn from(value: Result<(), E>) -> Self {
        match value {
            Ok(()) => EngineResult::Ok,
            Err(err) => EngineResult::Err(err.into()),
        }
    }
}

/// cali parses programs of a small interpreted language and prints their
/// syntax tree.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct CaliArgs {
    /// Subcommands, either this or `source_file` needs to be specified.
    #[command(subcommand)]
    command: Option<CaliCommands>,

    /// Source File for the program
    #[arg(required = true)]
    source_file: Option<String>,

    /// Accept expression statements without a trailing `;`.
    #[arg(long, global = true)]
    lenient: bool,

    /// Print trees as S-expressions instead of canonical source.
    #[arg(long, global = true)]
    sexpr: bool,

    /// Log debug output to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands in cali
#[derive(Subcommand, Debug)]
enum CaliCommands {
    /// run the cali repl.
    Repl,
    /// tokenize the given file and print one token per line.
    Tokenize {
        /// Source File to tokenize
        source_file: String,
    },
    /// parse the given file and print its tree.
    Parse {
        /// Source File to parse
        source_file: String,
    },
}

/// Installs the stderr subscriber.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .init();
}

fn main() -> EngineResult {
    let CaliArgs {
        command,
        source_file,
        lenient,
        sexpr,
        verbose,
    } = CaliArgs::parse();

    init_logging(verbose);

    let options = Options {
        config: ParserConfig {
            semicolons: if lenient {
                SemicolonPolicy::Optional
            } else {
                SemicolonPolicy::Required
            },
        },
        sexpr,
    };

    match (command, source_file) {
        (None, Some(source_file))
        | (Some(CaliCommands::Parse { source_file }), None) => run_file(&source_file, options).into(),

        (Some(CaliCommands::Tokenize { source_file }), None) => tokenize_file(&source_file).into(),

        (Some(CaliCommands::Repl), None) => run_prompt(options).into(),

        (Some(_), Some(_))
        | (None, None) => EngineResult::Err(EngineError::UsageError(
            env::args().next().unwrap_or_else(|| "cali".to_owned()),
        )),
    }
}

#[cfg(test)]
mod test {
    use super::{repl, Options};

    /// Feeds `input` to the REPL, returning what it wrote to both streams.
    fn session(input: &str, options: Options) -> (String, String) {
        let mut output = Vec::new();
        let mut errors = Vec::new();
        repl(input.as_bytes(), &mut output, &mut errors, options).expect("in-memory streams");
        (
            String::from_utf8(output).expect("utf-8 output"),
            String::from_utf8(errors).expect("utf-8 errors"),
        )
    }

    #[test]
    fn complete_lines_are_printed_back() {
        let (output, errors) = session("let x = 5;\n", Options::default());
        assert_eq!(output, ">> let x = 5;\n>> \n");
        assert_eq!(errors, "");
    }

    #[test]
    fn unterminated_input_asks_for_more() {
        let (output, errors) = session("let f = fn(x) {\nx;\n};\n", Options::default());
        assert_eq!(output, ">> .. .. let f = fn(x) { x; };\n>> \n");
        assert_eq!(errors, "");
    }

    #[test]
    fn errors_go_to_their_own_stream() {
        let (output, errors) = session("let = 5;\n", Options::default());
        assert_eq!(output, ">> >> \n");
        assert_eq!(errors, "expected next token to be IDENT, got = instead\n");
    }

    #[test]
    fn pending_input_is_reported_at_end_of_input() {
        let (output, errors) = session("let f = fn(x) {\n", Options::default());
        assert_eq!(output, ">> .. \n");
        assert_eq!(errors, "expected next token to be }, got EOF instead\n");
    }

    #[test]
    fn sexpr_output() {
        let options = Options {
            sexpr: true,
            ..Options::default()
        };
        let (output, _) = session("1 + 2 * 3;\n", options);
        assert_eq!(output, ">> (+ 1 (* 2 3))\n>> \n");
    }
}
