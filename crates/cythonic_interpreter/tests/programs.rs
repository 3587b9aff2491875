use cythonic_interpreter::value::Value;
use cythonic_interpreter::InterpretError;
use test_log::test;

mod common;

#[test]
fn test_countdown() -> eyre::Result<()> {
    let run = common::run("var int x; x = 3; while (x > 0) { print(x); x = x - 1; }")?;
    assert!(!run.outcome.had_error(), "{:?}", run.diagnostics());
    assert_eq!(run.output, "3\n2\n1\n");
    Ok(())
}

#[test]
fn test_only_the_chosen_arm_runs() -> eyre::Result<()> {
    let run = common::run(r#"if (1 > 2) { print("A"); } else { print("B"); }"#)?;
    assert!(!run.outcome.had_error());
    assert_eq!(run.output, "B\n");
    Ok(())
}

#[test]
fn test_skipped_arm_is_still_checked() -> eyre::Result<()> {
    let run = common::run("if (false) { print(1 +); } else { print(2); }")?;
    assert_eq!(
        run.diagnostics(),
        ["[line 1:23] Error at ')': Expect expression."]
    );
    assert_eq!(run.output, "2\n");
    Ok(())
}

#[test]
fn test_else_if_chain() -> eyre::Result<()> {
    let source = r#"
        int g = 75;
        if (g >= 90) print("A");
        else if (g >= 70) print("C");
        else print("F");
    "#;
    assert_eq!(common::run(source)?.output, "C\n");
    Ok(())
}

#[test]
fn test_loop_body_runs_once_per_true_condition() -> eyre::Result<()> {
    let run = common::run(
        "int runs = 0; int i = 0; while (i < 5) { runs++; i++; } print(runs);",
    )?;
    assert_eq!(run.output, "5\n");

    let run = common::run("int runs = 0; for (int i = 10; i > 7; i--) runs++; print(runs);")?;
    assert_eq!(run.output, "3\n");

    let run = common::run("int runs = 0; do { runs++; } while (false); print(runs);")?;
    assert_eq!(run.output, "1\n");
    Ok(())
}

#[test]
fn test_logical_operators_evaluate_both_sides() -> eyre::Result<()> {
    let run = common::run(
        "int n = 0; if (false && (n++ > 0)) print(1); if (true || (n++ > 0)) print(2); print(n);",
    )?;
    assert!(!run.outcome.had_error(), "{:?}", run.diagnostics());
    assert_eq!(run.output, "2\n2\n");
    Ok(())
}

#[test]
fn test_constants_cannot_change() -> eyre::Result<()> {
    let run = common::run("const int k = 5; k = 6; k += 1; set k = 9; print(k);")?;
    assert!(!run.outcome.had_error());
    assert_eq!(run.output, "5\n");
    let binding = run.outcome.environment().binding("k").unwrap();
    assert!(binding.is_constant());
    Ok(())
}

#[test]
fn test_let_and_set() -> eyre::Result<()> {
    let run = common::run("let a = 4; set a = a * 2; print(a); set b = 1; print(b);")?;
    assert!(!run.outcome.had_error());
    assert_eq!(run.output, "8\n0\n");
    assert!(!run.outcome.environment().contains("b"));
    Ok(())
}

#[test]
fn test_switch_runs_first_match_only() -> eyre::Result<()> {
    let source = |d: i32| {
        format!(
            r#"int d = {d};
            switch (d) {{
                case 1: print("one");
                case 2: print("two");
                case 2: print("again");
                default: print("other");
            }}"#
        )
    };
    assert_eq!(common::run(&source(2))?.output, "two\n");
    assert_eq!(common::run(&source(7))?.output, "other\n");
    Ok(())
}

#[test]
fn test_declaration_defaults_and_casts() -> eyre::Result<()> {
    let run = common::run(
        "int i; double d; bool b; str s; var v; double avg = 7 / 2; print(avg); print(d);",
    )?;
    assert_eq!(run.output, "3.000000\n0.000000\n");
    let environment = run.outcome.environment();
    assert_eq!(environment.get("i"), Some(Value::Int(0)));
    assert_eq!(environment.get("b"), Some(Value::Bool(false)));
    assert_eq!(environment.get("s"), Some(Value::String(String::new())));
    assert_eq!(environment.get("v"), Some(Value::Null));
    Ok(())
}

#[test]
fn test_strings_and_chars() -> eyre::Result<()> {
    let run = common::run(
        r#"str s = ""; for (int i = 0; i < 3; i++) s = s + i; print(s); char c = 'a'; print(c + 1);"#,
    )?;
    assert_eq!(run.output, "012\n98\n");
    Ok(())
}

#[test]
fn test_keywords_and_identifiers_ignore_case() -> eyre::Result<()> {
    let run = common::run("INT Total = 2; Print(total * 3); WHILE (TOTAL < 4) total++; print(TOTAL);")?;
    assert!(!run.outcome.had_error(), "{:?}", run.diagnostics());
    assert_eq!(run.output, "6\n4\n");
    Ok(())
}

#[test]
fn test_input_drives_a_loop() -> eyre::Result<()> {
    let run = common::run_with_input(
        "int n; int total = 0; input(n); while (n > 0) { total += n; n--; } print(total);",
        "4\n",
    )?;
    assert_eq!(run.output, "Enter value for n: 10\n");
    Ok(())
}

#[test]
fn test_lex_errors_stop_the_run() {
    let mut output = vec![];
    let error = cythonic_interpreter::run("int x = 1id;", "".as_bytes(), &mut output).unwrap_err();
    assert!(matches!(error, InterpretError::Lex(_)), "{error:?}");
    assert!(error.to_string().contains("invalid numeric literal"));
    assert!(output.is_empty());
}
