use cythonic_interpreter::RunOutcome;

/// A finished program run
pub struct Run {
    pub outcome: RunOutcome,
    pub output: String,
}

impl Run {
    /// The messages of every reported diagnostic, rendered
    pub fn diagnostics(&self) -> Vec<String> {
        self.outcome
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Runs a program with the given text as its input stream
pub fn run_with_input(source: &str, input: &str) -> eyre::Result<Run> {
    let mut output = vec![];
    let outcome = cythonic_interpreter::run(source, input.as_bytes(), &mut output)?;
    Ok(Run {
        outcome,
        output: String::from_utf8(output)?,
    })
}

/// Runs a program with no input
pub fn run(source: &str) -> eyre::Result<Run> {
    run_with_input(source, "")
}
