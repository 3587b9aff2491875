use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use test_log::test;

mod common;

#[test]
fn test_missing_semicolon_at_end() -> eyre::Result<()> {
    let run = common::run("print(1)")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:9] Error at end: Expect ';' after print statement."]
    );
    assert_eq!(run.output, "", "a statement with an error has no effect");
    Ok(())
}

#[test]
fn test_valid_statements_still_run() -> eyre::Result<()> {
    let run = common::run("int a = 1;\na = ;\nprint(a);\nint = 5;\nprint(a + 1);")?;
    assert_eq!(
        run.diagnostics(),
        [
            "[line 2:5] Error at ';': Expect expression.",
            "[line 4:5] Error at '=': Expect variable name.",
        ]
    );
    assert_eq!(run.output, "1\n2\n");
    Ok(())
}

#[test]
fn test_replayed_errors_are_reported_once() -> eyre::Result<()> {
    let run = common::run("int i = 0; while (i < 3) { i++; print(i +); } print(i);")?;
    assert_eq!(run.outcome.diagnostics().len(), 1, "{:?}", run.diagnostics());
    assert_eq!(run.outcome.diagnostics()[0].message(), "Expect expression.");
    assert_eq!(run.output, "3\n");
    Ok(())
}

#[test]
fn test_declarations_are_checked_without_effect() -> eyre::Result<()> {
    let run = common::run("struct P { int x; int y; } enum C { RED, GREEN } print(1);")?;
    assert_eq!(run.diagnostics(), Vec::<String>::new());
    assert_eq!(run.output, "1\n");

    let run = common::run("class Shape { int sides; } print(1); use things; print(2);")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:38] Error at 'use': Unexpected keyword at start of statement."]
    );
    assert_eq!(run.output, "1\n2\n");
    assert!(!run.outcome.environment().contains("sides"));
    Ok(())
}

#[test]
fn test_unclosed_block() -> eyre::Result<()> {
    let run = common::run("{ print(1);")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:12] Error at end: Expect '}' after block."]
    );
    assert_eq!(run.output, "1\n");
    Ok(())
}

/// Runs a program on its own thread, so that a program which never finishes fails the test
fn run_to_completion(source: &'static str) -> eyre::Result<common::Run> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || sender.send(common::run(source)));
    receiver
        .recv_timeout(Duration::from_secs(5))
        .map_err(|_| eyre::eyre!("{source:?} did not finish"))?
}

#[test]
fn test_loop_without_body_at_end() -> eyre::Result<()> {
    let run = run_to_completion("int x = 1; while (x > 0)")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:25] Error at end: Expect statement."]
    );

    let run = run_to_completion("for (int i = 0; i < 3; i++)")?;
    assert_eq!(run.outcome.diagnostics().len(), 1, "{:?}", run.diagnostics());
    assert_eq!(run.outcome.diagnostics()[0].message(), "Expect statement.");
    Ok(())
}

#[test]
fn test_branch_without_body_at_end() -> eyre::Result<()> {
    let run = common::run("if (1 > 0)")?;
    assert!(run.outcome.had_error());
    assert_eq!(
        run.diagnostics(),
        ["[line 1:11] Error at end: Expect statement."]
    );

    let run = common::run("if (true) print(1); else")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:25] Error at end: Expect statement."]
    );
    assert_eq!(run.output, "1\n");
    Ok(())
}
