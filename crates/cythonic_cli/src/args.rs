//! the args for running cythonic

use cythonic_cli_common::LoggingArgs;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// The extension every cythonic source file has
pub const SOURCE_EXTENSION: &str = "cytho";

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Runs a cythonic program")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// The program to run, a `.cytho` file
    #[clap(value_name = "SOURCE", value_hint = clap::ValueHint::FilePath)]
    pub source: PathBuf,
    /// Don't write the symbol table and parse tree next to the source
    #[clap(long)]
    pub no_dumps: bool,
    /// Keep going past malformed tokens, passing them to the parser as invalid tokens
    #[clap(long)]
    pub lenient: bool,
    /// Read the tokens from a symbol table written by an earlier run instead of lexing the source
    #[clap(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath, conflicts_with = "lenient")]
    pub from_symbol_table: Option<PathBuf>,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    /// Whether the source file has the `.cytho` extension
    pub fn has_source_extension(&self) -> bool {
        self.source.extension() == Some(OsStr::new(SOURCE_EXTENSION))
    }

    /// Where the symbol table is written, `<SOURCE>.symboltable.txt`
    pub fn symbol_table_path(&self) -> PathBuf {
        with_suffix(&self.source, ".symboltable.txt")
    }

    /// Where the parse tree is written, `<SOURCE>.parsetree.txt`
    pub fn parse_tree_path(&self) -> PathBuf {
        with_suffix(&self.source, ".parsetree.txt")
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut path = path.as_os_str().to_os_string();
    path.push(suffix);
    PathBuf::from(path)
}
