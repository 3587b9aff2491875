use cythonic_interpreter::parser::Interpreter;
use cythonic_interpreter::{tokenize, tokenize_recovering};
use cythonic_tokens::symbol_table::{read_symbol_table, write_symbol_table};
use cythonic_tokens::token::TokenKind;
use std::io;
use test_log::test;

const SOURCE: &str = r#"// sums 1 to 3
int total = 0;
for (int i = 1; i <= 3; i++) { total += i; }
print("total: " + total);
"#;

#[test]
fn test_reloaded_symbol_table_runs_the_same() -> eyre::Result<()> {
    let tokens = tokenize(SOURCE)?;
    let mut table = vec![];
    write_symbol_table(&tokens, &mut table)?;
    let reloaded = read_symbol_table(table.as_slice())?;

    let significant = |tokens: &[cythonic_tokens::token::Token]| {
        tokens
            .iter()
            .filter(|t| !matches!(t.kind(), TokenKind::Comment | TokenKind::Eof))
            .map(|t| (t.kind(), t.lexeme().to_string(), t.raw().to_string(), t.position()))
            .collect::<Vec<_>>()
    };
    assert_eq!(significant(&tokens), significant(&reloaded));
    assert_eq!(reloaded.last().map(|t| t.kind()), Some(TokenKind::Eof));

    let mut output = vec![];
    let outcome = Interpreter::new(reloaded, io::empty(), &mut output).run()?;
    assert!(!outcome.had_error(), "{:?}", outcome.diagnostics());
    assert_eq!(String::from_utf8(output)?, "total: 6\n");
    Ok(())
}

#[test]
fn test_recovered_tokens_are_reported_by_the_parser() -> eyre::Result<()> {
    let (tokens, errors) = tokenize_recovering("int x = 1id;\nprint(2);");
    assert_eq!(errors.len(), 1);

    let mut table = vec![];
    write_symbol_table(&tokens, &mut table)?;
    let table = String::from_utf8(table)?;
    assert!(
        table.contains("   1 |   9 | INVALID           | 1id"),
        "{table}"
    );

    let mut output = vec![];
    let outcome = Interpreter::new(tokens, io::empty(), &mut output).run()?;
    assert_eq!(outcome.diagnostics().len(), 1);
    assert_eq!(
        outcome.diagnostics()[0].to_string(),
        "[line 1:9] Error: Expect expression."
    );
    assert_eq!(output, b"2\n");
    Ok(())
}
