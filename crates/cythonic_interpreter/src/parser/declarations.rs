//! Type declarations and `foreach`.
//!
//! These are checked against the grammar but never run, since there are no values of user
//! declared types or collections to run them with. Everything inside them is parsed with
//! execution off.

use super::statement::StatementResult;
use super::Interpreter;
use crate::trace::Node;
use cythonic_tokens::keyword::{Keyword, KeywordCategory};
use cythonic_tokens::token::TokenKind;
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// `struct IDENT { (TYPE IDENT ;)* }`
    pub(super) fn struct_declaration(&mut self) -> StatementResult {
        self.node(Node::StructDeclaration, |this| {
            this.advance();
            this.with_executing(false, |this| {
                this.consume_identifier("Expect struct name.");
                this.consume(TokenKind::LeftBrace, "Expect '{' before struct members.");
                this.members(|this| {
                    this.member_type("Expect type in struct member.");
                    this.consume_identifier("Expect member name.");
                    this.consume(TokenKind::Semicolon, "Expect ';' after member.");
                    Ok(())
                })?;
                this.consume(TokenKind::RightBrace, "Expect '}' after struct members.");
                Ok(())
            })
        })
    }

    /// `enum IDENT { [IDENT [= expr] (, IDENT [= expr])* [,]] }`
    pub(super) fn enum_declaration(&mut self) -> StatementResult {
        self.node(Node::EnumDeclaration, |this| {
            this.advance();
            this.with_executing(false, |this| {
                this.consume_identifier("Expect enum name.");
                this.consume(TokenKind::LeftBrace, "Expect '{' before enum members.");
                while !this.check(TokenKind::RightBrace) && !this.check(TokenKind::Eof) {
                    this.consume_identifier("Expect enum member name.");
                    if this.match_kind(TokenKind::Equal) {
                        this.expression();
                    }
                    if !this.match_kind(TokenKind::Comma) {
                        break;
                    }
                }
                this.consume(TokenKind::RightBrace, "Expect '}' after enum members.");
            });
            Ok(())
        })
    }

    /// `[pub | priv] record IDENT { ([req] TYPE IDENT [= expr] ;)* }`
    pub(super) fn record_declaration(&mut self) -> StatementResult {
        self.node(Node::RecordDeclaration, |this| {
            if this.check_keyword(Keyword::Pub) || this.check_keyword(Keyword::Priv) {
                this.advance();
            }
            this.advance();
            this.with_executing(false, |this| {
                this.consume_identifier("Expect record name.");
                this.consume(TokenKind::LeftBrace, "Expect '{' before record members.");
                this.members(|this| {
                    this.match_keyword(Keyword::Req);
                    this.member_type("Expect type in record member.");
                    this.consume_identifier("Expect member name.");
                    if this.match_kind(TokenKind::Equal) {
                        this.expression();
                    }
                    this.consume(TokenKind::Semicolon, "Expect ';' after member.");
                    Ok(())
                })?;
                this.consume(TokenKind::RightBrace, "Expect '}' after record members.");
                Ok(())
            })
        })
    }

    /// `class IDENT { member* }`
    ///
    /// A member is `[pub | priv | prot] [rdo] TYPE IDENT` followed by a method's parameters and
    /// body, a property's accessors, or a field's optional initializer and `;`.
    pub(super) fn class_declaration(&mut self) -> StatementResult {
        self.node(Node::ClassDeclaration, |this| {
            this.advance();
            this.with_executing(false, |this| {
                this.consume_identifier("Expect class name.");
                this.consume(TokenKind::LeftBrace, "Expect '{' before class body.");
                this.members(|this| this.class_member())?;
                this.consume(TokenKind::RightBrace, "Expect '}' after class body.");
                Ok(())
            })
        })
    }

    fn class_member(&mut self) -> StatementResult {
        let _ = self.match_keyword(Keyword::Pub)
            || self.match_keyword(Keyword::Priv)
            || self.match_keyword(Keyword::Prot);
        self.match_keyword(Keyword::Rdo);
        self.member_type("Expect type or void in class member.");
        self.consume_identifier("Expect member name.");

        if self.match_kind(TokenKind::LeftParen) {
            self.method()
        } else if self.match_kind(TokenKind::LeftBrace) {
            self.property()
        } else {
            if self.match_kind(TokenKind::Equal) {
                self.expression();
            }
            self.consume(TokenKind::Semicolon, "Expect ';' after field.");
            Ok(())
        }
    }

    /// The rest of a method after its `(`
    fn method(&mut self) -> StatementResult {
        self.node(Node::MethodDeclaration, |this| {
            if !this.check(TokenKind::RightParen) {
                loop {
                    if this.current().keyword().is_some_and(|k| k.is_type()) {
                        this.advance();
                    }
                    let kind = this.current().kind();
                    if kind == TokenKind::Identifier
                        || kind.category() == Some(KeywordCategory::Contextual)
                    {
                        this.advance();
                    } else {
                        this.error("Expect argument name.");
                    }
                    if !this.match_kind(TokenKind::Comma) {
                        break;
                    }
                }
            }
            this.consume(TokenKind::RightParen, "Expect ')' after arguments.");
            if this.check(TokenKind::LeftBrace) {
                this.block()
            } else {
                this.error("Expect '{' before method body.");
                Ok(())
            }
        })
    }

    /// The accessors of a property after its `{`, each `get`, `set` or `init` followed by a body
    /// or a `;`
    fn property(&mut self) -> StatementResult {
        self.node(Node::PropertyDeclaration, |this| {
            while !this.check(TokenKind::RightBrace) && !this.check(TokenKind::Eof) {
                let accessor = this.match_keyword(Keyword::Get)
                    || this.match_keyword(Keyword::Set)
                    || this.match_keyword(Keyword::Init);
                if !accessor {
                    this.error("Expect get, set, or init.");
                    this.advance();
                } else if this.match_kind(TokenKind::LeftBrace) {
                    while !this.check(TokenKind::RightBrace) && !this.check(TokenKind::Eof) {
                        this.statement()?;
                    }
                    this.consume(TokenKind::RightBrace, "Expect '}' after accessor body.");
                } else {
                    this.consume(
                        TokenKind::Semicolon,
                        "Expect ';' after accessor (auto-implemented).",
                    );
                }
            }
            this.consume(TokenKind::RightBrace, "Expect '}' after property body.");
            Ok(())
        })
    }

    /// `foreach ( (TYPE | var) IDENT in expr ) statement`
    pub(super) fn foreach_statement(&mut self) -> StatementResult {
        self.node(Node::ForeachStatement, |this| {
            this.advance();
            this.with_executing(false, |this| {
                this.consume(TokenKind::LeftParen, "Expect '(' after 'foreach'.");
                match this.current().keyword() {
                    Some(keyword) if keyword.is_type() || keyword == Keyword::Var => {
                        this.advance()
                    }
                    _ => this.error("Expect type or 'var' in foreach."),
                }
                this.consume_identifier("Expect variable name.");
                if !this.match_keyword(Keyword::In) {
                    this.error("Expect 'in' after variable.");
                }
                this.expression();
                this.consume(TokenKind::RightParen, "Expect ')' after collection.");
                this.statement()
            })
        })
    }

    /// Parses members with `member` until the closing `}`. A member that consumes nothing, after
    /// an error, is skipped over a token at a time.
    fn members(&mut self, mut member: impl FnMut(&mut Self) -> StatementResult) -> StatementResult {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            let start = self.pos;
            member(self)?;
            if self.pos == start {
                self.advance();
            }
        }
        Ok(())
    }

    fn member_type(&mut self, message: &str) {
        if self.current().keyword().is_some_and(|k| k.is_type()) {
            self.advance();
        } else {
            self.error(message);
        }
    }
}
