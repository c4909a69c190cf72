// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser over the token stream.
//!
//! ```text
//! compilation_unit := extern_alias* using_directive* member* EOF
//! member           := namespace_declaration | opaque_member
//! namespace        := 'namespace' name ( '{' body '}' ';'? | ';' body )
//! body             := extern_alias* using_directive* member*
//! using_directive  := 'global'? 'using' 'static'? (identifier '=')? name ';'
//! name             := (identifier '::')? simple_name ('.' simple_name)*
//! simple_name      := identifier type_argument_list?
//! ```
//!
//! A directive that does not match this grammar (`using var x = ...;`,
//! `using (...) { }`, an alias to a tuple type) ends the directive section
//! and is parsed as an opaque member instead.

mod errors;

pub use errors::{ParserError, Result};

use fqn_core::types::Span;

use crate::nodes::traits::join_spans;
use crate::nodes::{
    AliasQualifiedName, CompilationUnit, ExternAliasDirective, GenericName, Member, Name,
    NameEquals, NamespaceBody, NamespaceDeclaration, NodeIdGenerator, OpaqueMember,
    QualifiedName, SimpleName, Token, UsingDirective,
};
use crate::tokenizer::{Tok, TokKind};

pub(crate) struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    ids: NodeIdGenerator,
}

impl Parser {
    /// `toks` must end with an end-of-file token.
    pub(crate) fn new(toks: Vec<Tok>) -> Self {
        Parser {
            toks,
            pos: 0,
            ids: NodeIdGenerator::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------------

    fn peek_at(&self, n: usize) -> &Tok {
        let last = self.toks.len() - 1;
        &self.toks[(self.pos + n).min(last)]
    }

    fn peek(&self) -> &Tok {
        self.peek_at(0)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().token.clone();
        if self.peek().kind != TokKind::EndOfFile {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokKind::EndOfFile
    }

    fn is_keyword(tok: &Tok, keyword: &str) -> bool {
        tok.kind == TokKind::Identifier && tok.token.text == keyword
    }

    fn is_punct(tok: &Tok, punct: &str) -> bool {
        tok.kind == TokKind::Punct && tok.token.text == punct
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        Self::is_keyword(self.peek(), keyword)
    }

    fn at_punct(&self, punct: &str) -> bool {
        Self::is_punct(self.peek(), punct)
    }

    fn offset(&self) -> usize {
        self.peek().token.span.map(|s| s.start).unwrap_or(0)
    }

    fn error_here(&self, expected: &str) -> ParserError {
        if self.at_eof() {
            ParserError::UnexpectedEof {
                expected: expected.to_string(),
                offset: self.offset(),
            }
        } else {
            ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.peek().token.text.clone(),
                offset: self.offset(),
            }
        }
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Token> {
        if self.at_punct(punct) {
            Ok(self.bump())
        } else {
            Err(self.error_here(&format!("'{}'", punct)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token> {
        if self.at_keyword(keyword) {
            Ok(self.bump())
        } else {
            Err(self.error_here(&format!("'{}'", keyword)))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token> {
        if self.peek().kind == TokKind::Identifier {
            Ok(self.bump())
        } else {
            Err(self.error_here("identifier"))
        }
    }

    // ------------------------------------------------------------------------
    // Compilation unit and namespaces
    // ------------------------------------------------------------------------

    pub(crate) fn parse_compilation_unit(mut self) -> Result<CompilationUnit> {
        let (externs, usings) = self.parse_directives();
        let members = self.parse_members(false)?;
        if !self.at_eof() {
            return Err(self.error_here("end of file"));
        }
        let end_of_file = self.bump();
        Ok(CompilationUnit {
            externs,
            usings,
            members,
            end_of_file,
        })
    }

    fn parse_directives(&mut self) -> (Vec<ExternAliasDirective>, Vec<UsingDirective>) {
        let mut externs = Vec::new();
        let mut usings = Vec::new();
        loop {
            let checkpoint = self.pos;
            if usings.is_empty()
                && self.at_keyword("extern")
                && Self::is_keyword(self.peek_at(1), "alias")
            {
                match self.parse_extern_alias() {
                    Ok(directive) => externs.push(directive),
                    Err(_) => {
                        self.pos = checkpoint;
                        break;
                    }
                }
            } else if self.at_using_start() {
                match self.parse_using_directive() {
                    Ok(directive) => usings.push(directive),
                    Err(_) => {
                        self.pos = checkpoint;
                        break;
                    }
                }
            } else {
                break;
            }
        }
        (externs, usings)
    }

    fn at_using_start(&self) -> bool {
        self.at_keyword("using")
            || (self.at_keyword("global") && Self::is_keyword(self.peek_at(1), "using"))
    }

    fn parse_extern_alias(&mut self) -> Result<ExternAliasDirective> {
        let extern_keyword = self.expect_keyword("extern")?;
        let alias_keyword = self.expect_keyword("alias")?;
        let identifier = self.expect_identifier()?;
        let semicolon = self.expect_punct(";")?;
        let span = join_spans(extern_keyword.span, semicolon.span);
        Ok(ExternAliasDirective {
            id: self.ids.next_id(),
            extern_keyword,
            alias_keyword,
            identifier,
            semicolon,
            span,
        })
    }

    fn parse_using_directive(&mut self) -> Result<UsingDirective> {
        let global_keyword = if self.at_keyword("global") {
            Some(self.bump())
        } else {
            None
        };
        let using_keyword = self.expect_keyword("using")?;
        let static_keyword = if self.at_keyword("static") {
            Some(self.bump())
        } else {
            None
        };
        let alias = if self.peek().kind == TokKind::Identifier && Self::is_punct(self.peek_at(1), "=")
        {
            Some(NameEquals {
                name: self.bump(),
                equals: self.bump(),
            })
        } else {
            None
        };
        let name = self.parse_name()?;
        let semicolon = self.expect_punct(";")?;

        let first_span = global_keyword.as_ref().unwrap_or(&using_keyword).span;
        let span = join_spans(first_span, semicolon.span);
        Ok(UsingDirective {
            id: self.ids.next_id(),
            global_keyword,
            using_keyword,
            static_keyword,
            alias,
            name,
            semicolon,
            span,
        })
    }

    fn parse_namespace(&mut self) -> Result<NamespaceDeclaration> {
        let id = self.ids.next_id();
        let namespace_keyword = self.expect_keyword("namespace")?;
        let name = self.parse_name()?;

        if self.at_punct(";") {
            let semicolon = self.bump();
            let (externs, usings) = self.parse_directives();
            let members = self.parse_members(false)?;
            let end = self.last_consumed_span().or(semicolon.span);
            let span = join_spans(namespace_keyword.span, end);
            return Ok(NamespaceDeclaration {
                id,
                namespace_keyword,
                name,
                body: NamespaceBody::FileScoped { semicolon },
                externs,
                usings,
                members,
                span,
            });
        }

        let open_brace = self.expect_punct("{")?;
        let (externs, usings) = self.parse_directives();
        let members = self.parse_members(true)?;
        let close_brace = self.expect_punct("}")?;
        let semicolon = if self.at_punct(";") {
            Some(self.bump())
        } else {
            None
        };
        let end = semicolon.as_ref().unwrap_or(&close_brace).span;
        let span = join_spans(namespace_keyword.span, end);
        Ok(NamespaceDeclaration {
            id,
            namespace_keyword,
            name,
            body: NamespaceBody::Block {
                open_brace,
                close_brace,
                semicolon,
            },
            externs,
            usings,
            members,
            span,
        })
    }

    fn last_consumed_span(&self) -> Option<Span> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.toks.get(i))
            .and_then(|t| t.token.span)
    }

    /// Members up to end of file, or up to the closing brace of the
    /// enclosing block when `in_block`.
    fn parse_members(&mut self, in_block: bool) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        loop {
            if self.at_eof() {
                break;
            }
            if self.at_punct("}") {
                if in_block {
                    break;
                }
                return Err(ParserError::UnbalancedDelimiter {
                    delimiter: "}".to_string(),
                    offset: self.offset(),
                });
            }
            if self.at_keyword("namespace") {
                members.push(Member::Namespace(self.parse_namespace()?));
            } else {
                members.push(Member::Other(self.parse_opaque_member()?));
            }
        }
        Ok(members)
    }

    /// A balanced token run ending at a top-level `;`, or at a top-level
    /// `}` that is not followed by an operator continuing the expression.
    fn parse_opaque_member(&mut self) -> Result<OpaqueMember> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut stack: Vec<(&'static str, usize)> = Vec::new();

        loop {
            let tok = self.peek();
            if tok.kind == TokKind::EndOfFile {
                if let Some((open, offset)) = stack.last() {
                    return Err(ParserError::UnbalancedDelimiter {
                        delimiter: open.to_string(),
                        offset: *offset,
                    });
                }
                break;
            }
            if stack.is_empty() && !tokens.is_empty() && Self::is_keyword(tok, "namespace") {
                break;
            }
            if stack.is_empty() && Self::is_punct(tok, "}") {
                break;
            }

            let is_punct = tok.kind == TokKind::Punct;
            let offset = self.offset();
            let token = self.bump();
            if is_punct {
                match token.text.as_str() {
                    "(" => stack.push(("(", offset)),
                    "[" => stack.push(("[", offset)),
                    "{" => stack.push(("{", offset)),
                    close @ (")" | "]" | "}") => {
                        let expected = match close {
                            ")" => "(",
                            "]" => "[",
                            _ => "{",
                        };
                        match stack.pop() {
                            Some((open, _)) if open == expected => {}
                            _ => {
                                return Err(ParserError::UnbalancedDelimiter {
                                    delimiter: close.to_string(),
                                    offset,
                                })
                            }
                        }
                    }
                    _ => {}
                }
            }

            let ends_here = stack.is_empty()
                && is_punct
                && (token.text == ";" || (token.text == "}" && !self.continues_after_block()));
            tokens.push(token);
            if ends_here {
                break;
            }
        }

        let span = join_spans(
            tokens.first().and_then(|t| t.span),
            tokens.last().and_then(|t| t.span),
        );
        Ok(OpaqueMember { tokens, span })
    }

    /// After a top-level `}`: does the next token continue the same member
    /// (`new Foo { }.Bar()`, `x = y switch { ... };`)?
    fn continues_after_block(&self) -> bool {
        let next = self.peek();
        next.kind == TokKind::Punct && !matches!(next.token.text.as_str(), "[" | "{" | "}")
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    pub(crate) fn parse_name(&mut self) -> Result<Name> {
        let mut name = if self.peek().kind == TokKind::Identifier
            && Self::is_punct(self.peek_at(1), "::")
        {
            let alias = self.bump();
            let colon_colon = self.bump();
            let simple = self.parse_simple_name()?;
            Name::AliasQualified(Box::new(AliasQualifiedName {
                alias,
                colon_colon,
                name: simple,
            }))
        } else {
            Name::Simple(self.parse_simple_name()?)
        };

        while self.at_punct(".") && self.peek_at(1).kind == TokKind::Identifier {
            let dot = self.bump();
            let right = self.parse_simple_name()?;
            name = Name::Qualified(Box::new(QualifiedName {
                left: name,
                dot,
                right,
            }));
        }
        Ok(name)
    }

    fn parse_simple_name(&mut self) -> Result<SimpleName> {
        let identifier = self.expect_identifier()?;
        if !self.at_punct("<") {
            return Ok(SimpleName::Identifier(identifier));
        }

        let mut type_arguments = Vec::new();
        let mut depth = 0usize;
        loop {
            if self.at_eof() || self.at_punct(";") || self.at_punct("{") {
                return Err(self.error_here("'>'"));
            }
            let token = self.bump();
            match token.text.as_str() {
                "<" | "(" | "[" => depth += 1,
                ">" | ")" | "]" => depth = depth.saturating_sub(1),
                _ => {}
            }
            type_arguments.push(token);
            if depth == 0 {
                break;
            }
        }
        Ok(SimpleName::Generic(GenericName {
            identifier,
            type_arguments,
        }))
    }

    pub(crate) fn expect_end(&self) -> Result<()> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.error_here("end of input"))
        }
    }
}
