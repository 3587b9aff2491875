//! The `cythonic` command, which lexes and runs a `.cytho` program and dumps its symbol table and
//! parse tree next to it.

use crate::args::Args;
use clap::Parser;
use cythonic_interpreter::diagnostic::Diagnostic;
use cythonic_interpreter::lexer::LexError;
use cythonic_interpreter::{tokenize, tokenize_recovering, Interpreter};
use cythonic_tokens::symbol_table::{read_symbol_table, write_symbol_table};
use cythonic_tokens::token::Token;
use eyre::{bail, WrapErr};
use owo_colors::OwoColorize;
use owo_colors::Stream;
use std::fs::File;
use std::io;
use std::io::{stderr, stdin, stdout, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, trace, Level};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

mod args;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting cythonic with args: {args:?}");
    debug!("cythonic version: {}", env!("CARGO_PKG_VERSION"));

    if !args.has_source_extension() {
        bail!(
            "invalid file type {:?}, expected a '.{}' file",
            args.source,
            args::SOURCE_EXTENSION
        );
    }

    let Some(Loaded { tokens, lex_errors }) = load_tokens(&args)? else {
        return Ok(ExitCode::FAILURE);
    };

    let input = stdin();
    let mut interpreter = Interpreter::new(tokens, input.lock(), stdout());
    if !args.no_dumps {
        interpreter = interpreter.with_parse_tree();
    }
    let outcome = interpreter.run()?;

    if let Some(tree) = outcome.parse_tree() {
        let path = args.parse_tree_path();
        std::fs::write(&path, tree)
            .wrap_err_with(|| format!("could not write parse tree to {path:?}"))?;
        info!("parse tree written to {path:?}");
    }

    for diagnostic in outcome.diagnostics() {
        report_diagnostic(diagnostic);
    }
    let errors = lex_errors + outcome.diagnostics().len();
    if errors > 0 {
        eprintln!(
            "{}",
            format!("{errors} error(s) found").if_supports_color(Stream::Stderr, |text| text.red())
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// The tokens to run, and how many lexical errors were recovered from while getting them
struct Loaded {
    tokens: Vec<Token>,
    lex_errors: usize,
}

/// Gets the tokens to run, either by lexing the source or from an earlier symbol table. Returns
/// `None` if lexing failed.
fn load_tokens(args: &Args) -> eyre::Result<Option<Loaded>> {
    if let Some(path) = &args.from_symbol_table {
        let file = File::open(path).wrap_err_with(|| format!("could not open {path:?}"))?;
        let tokens = read_symbol_table(BufReader::new(file))
            .wrap_err_with(|| format!("could not read symbol table {path:?}"))?;
        info!("read {} tokens from {path:?}", tokens.len());
        return Ok(Some(Loaded {
            tokens,
            lex_errors: 0,
        }));
    }

    let source = std::fs::read_to_string(&args.source)
        .wrap_err_with(|| format!("could not open file {:?}", args.source))?;
    let (tokens, lex_errors) = if args.lenient {
        let (tokens, errors) = tokenize_recovering(&source);
        errors.iter().for_each(report_lex_error);
        (tokens, errors.len())
    } else {
        match tokenize(&source) {
            Ok(tokens) => (tokens, 0),
            Err(error) => {
                report_lex_error(&error);
                return Ok(None);
            }
        }
    };

    if !args.no_dumps {
        let path = args.symbol_table_path();
        dump_symbol_table(&tokens, &path)
            .wrap_err_with(|| format!("could not write symbol table to {path:?}"))?;
        info!("symbol table written to {path:?}");
    }
    Ok(Some(Loaded { tokens, lex_errors }))
}

fn dump_symbol_table(tokens: &[Token], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_symbol_table(tokens, &mut writer)?;
    writer.flush()
}

fn report_lex_error(error: &LexError) {
    eprintln!(
        "{} {error}",
        "Lexical error:".if_supports_color(Stream::Stderr, |text| text.bright_red())
    );
}

fn report_diagnostic(diagnostic: &Diagnostic) {
    eprintln!(
        "{}",
        diagnostic.if_supports_color(Stream::Stderr, |text| text.bright_red())
    );
}

/// Logs warnings and errors to stderr. Anything more verbose shares stdout with the program.
fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let writer = stderr.with_max_level(Level::WARN).or_else(stdout);
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().without_time())
                .with_writer(writer)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;
    Ok(())
}
