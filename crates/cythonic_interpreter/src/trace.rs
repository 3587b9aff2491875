//! The parse tree trace, a log of every grammar rule entered and every token consumed

use cythonic_tokens::token::Token;
use strum::IntoStaticStr;

/// A grammar rule, as named in the trace
#[derive(Debug, Copy, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum Node {
    Program,
    Statement,
    Block,
    DeclarationStatement,
    AssignmentStatement,
    InputStatement,
    OutputStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    DoWhileStatement,
    SwitchStatement,
    CaseClause,
    DefaultClause,
    ReturnStatement,
    IncrementStatement,
    LetStatement,
    SetStatement,
    ForeachStatement,
    StructDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    ClassDeclaration,
    MethodDeclaration,
    PropertyDeclaration,
    Expression,
    LogicalOr,
    LogicalAnd,
    Equality,
    Comparison,
    TypeConversion,
    Term,
    Factor,
    Unary,
    Postfix,
    Primary,
}

impl Node {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Records the parse tree as indented text.
///
/// While suppressed nothing is written, but depth is still tracked so that output resumes at the
/// right indentation.
#[derive(Debug, Default)]
pub struct ParseTrace {
    buffer: Option<String>,
    depth: usize,
    suppressed: bool,
}

impl ParseTrace {
    /// A trace that records nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A trace that records into a buffer
    pub fn enabled() -> Self {
        Self {
            buffer: Some(String::new()),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn enter(&mut self, node: Node) {
        self.line(|| format!("Enter <{}>", node.name()));
        self.depth += 1;
    }

    pub fn exit(&mut self, node: Node) {
        self.depth = self.depth.saturating_sub(1);
        self.line(|| format!("Exit <{}>", node.name()));
    }

    /// Records the token that just became current
    pub fn next_token(&mut self, token: &Token) {
        self.line(|| {
            format!(
                "Next token is: {} Next lexeme is {}",
                token.kind(),
                token.lexeme()
            )
        });
    }

    /// Sets whether output is suppressed, returning the previous setting
    pub fn set_suppressed(&mut self, suppressed: bool) -> bool {
        std::mem::replace(&mut self.suppressed, suppressed)
    }

    /// Takes the recorded text, if this trace was enabled
    pub fn finish(self) -> Option<String> {
        self.buffer
    }

    fn line(&mut self, text: impl FnOnce() -> String) {
        if self.suppressed {
            return;
        }
        if let Some(buffer) = &mut self.buffer {
            buffer.push_str(&"  ".repeat(self.depth));
            buffer.push_str(&text());
            buffer.push('\n');
        }
    }
}
