//! The cythonic interpreter.
//!
//! Source text is tokenized by the [lexer] and the token list is handed to the
//! [`Interpreter`](parser::Interpreter), which checks the grammar and runs the program in a single
//! pass.
//!
//! # Examples
//! ```
//! let mut output = vec![];
//! let outcome = cythonic_interpreter::run("int x = 2; print(x * 21);", "".as_bytes(), &mut output)
//!     .unwrap();
//! assert!(!outcome.had_error());
//! assert_eq!(output, b"42\n");
//! ```

use std::io::{BufRead, Write};

pub mod diagnostic;
pub mod environment;
pub mod lexer;
pub mod parser;
pub mod trace;
pub mod value;

pub use lexer::{tokenize, tokenize_recovering};
pub use parser::{InterpretError, Interpreter, RunOutcome};

/// Tokenizes and runs a program, reading `input()` values from `input` and writing printed values
/// to `output`
pub fn run<R: BufRead, W: Write>(
    source: &str,
    input: R,
    output: W,
) -> Result<RunOutcome, InterpretError> {
    let tokens = tokenize(source)?;
    Interpreter::new(tokens, input, output).run()
}
