// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Names and directive nodes.

use fqn_core::types::Span;

use super::traits::{Codegen, CodegenState, NodeId, Token};

// ============================================================================
// Names
// ============================================================================

/// A name expression: `A`, `A.B.C`, `global::A.B`, `List<int>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    Simple(SimpleName),
    Qualified(Box<QualifiedName>),
    AliasQualified(Box<AliasQualifiedName>),
}

/// An identifier, optionally with type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleName {
    Identifier(Token),
    Generic(GenericName),
}

/// `Identifier<...>`. The type argument list is kept as raw tokens,
/// angle brackets included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericName {
    pub identifier: Token,
    pub type_arguments: Vec<Token>,
}

/// `left.right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub left: Name,
    pub dot: Token,
    pub right: SimpleName,
}

/// `alias::name`, including `global::name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasQualifiedName {
    pub alias: Token,
    pub colon_colon: Token,
    pub name: SimpleName,
}

impl SimpleName {
    pub fn identifier(&self) -> &Token {
        match self {
            SimpleName::Identifier(token) => token,
            SimpleName::Generic(generic) => &generic.identifier,
        }
    }

    fn identifier_mut(&mut self) -> &mut Token {
        match self {
            SimpleName::Identifier(token) => token,
            SimpleName::Generic(generic) => &mut generic.identifier,
        }
    }

    fn last_token_mut(&mut self) -> &mut Token {
        match self {
            SimpleName::Identifier(token) => token,
            SimpleName::Generic(generic) => match generic.type_arguments.last_mut() {
                Some(token) => token,
                None => &mut generic.identifier,
            },
        }
    }

    fn has_alias_qualifier(&self) -> bool {
        match self {
            SimpleName::Identifier(_) => false,
            SimpleName::Generic(generic) => generic.type_arguments.iter().any(|t| t.text == "::"),
        }
    }

    fn push_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            SimpleName::Identifier(token) => out.push(token),
            SimpleName::Generic(generic) => {
                out.push(&generic.identifier);
                out.extend(generic.type_arguments.iter());
            }
        }
    }
}

impl Name {
    /// The name's tokens in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.push_tokens(&mut out);
        out
    }

    fn push_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            Name::Simple(simple) => simple.push_tokens(out),
            Name::Qualified(qualified) => {
                qualified.left.push_tokens(out);
                out.push(&qualified.dot);
                qualified.right.push_tokens(out);
            }
            Name::AliasQualified(aliased) => {
                out.push(&aliased.alias);
                out.push(&aliased.colon_colon);
                aliased.name.push_tokens(out);
            }
        }
    }

    /// Token text without any trivia, e.g. `System.Collections.Generic`.
    pub fn plain_text(&self) -> String {
        self.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    /// The leftmost identifier, found by descending the qualifier chain.
    pub fn leftmost_identifier(&self) -> &Token {
        match self {
            Name::Simple(simple) => simple.identifier(),
            Name::Qualified(qualified) => qualified.left.leftmost_identifier(),
            Name::AliasQualified(aliased) => &aliased.alias,
        }
    }

    /// True if the name or any of its type arguments use `alias::`.
    pub fn has_alias_qualifier(&self) -> bool {
        match self {
            Name::Simple(simple) => simple.has_alias_qualifier(),
            Name::Qualified(qualified) => {
                qualified.left.has_alias_qualifier() || qualified.right.has_alias_qualifier()
            }
            Name::AliasQualified(_) => true,
        }
    }

    /// True if any segment carries type arguments.
    pub fn is_generic(&self) -> bool {
        match self {
            Name::Simple(simple) => matches!(simple, SimpleName::Generic(_)),
            Name::Qualified(qualified) => {
                matches!(qualified.right, SimpleName::Generic(_)) || qualified.left.is_generic()
            }
            Name::AliasQualified(aliased) => matches!(aliased.name, SimpleName::Generic(_)),
        }
    }

    pub fn first_token_mut(&mut self) -> &mut Token {
        match self {
            Name::Simple(simple) => simple.identifier_mut(),
            Name::Qualified(qualified) => qualified.left.first_token_mut(),
            Name::AliasQualified(aliased) => &mut aliased.alias,
        }
    }

    pub fn last_token_mut(&mut self) -> &mut Token {
        match self {
            Name::Simple(simple) => simple.last_token_mut(),
            Name::Qualified(qualified) => qualified.right.last_token_mut(),
            Name::AliasQualified(aliased) => aliased.name.last_token_mut(),
        }
    }

    pub fn first_token(&self) -> &Token {
        match self {
            Name::Simple(simple) => simple.identifier(),
            Name::Qualified(qualified) => qualified.left.first_token(),
            Name::AliasQualified(aliased) => &aliased.alias,
        }
    }

    pub fn last_token(&self) -> &Token {
        let simple = match self {
            Name::Simple(simple) => simple,
            Name::Qualified(qualified) => &qualified.right,
            Name::AliasQualified(aliased) => &aliased.name,
        };
        match simple {
            SimpleName::Identifier(token) => token,
            SimpleName::Generic(generic) => generic
                .type_arguments
                .last()
                .unwrap_or(&generic.identifier),
        }
    }
}

impl Codegen for SimpleName {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            SimpleName::Identifier(token) => token.codegen(state),
            SimpleName::Generic(generic) => {
                generic.identifier.codegen(state);
                generic.type_arguments.codegen(state);
            }
        }
    }
}

impl Codegen for Name {
    fn codegen(&self, state: &mut CodegenState) {
        for token in self.tokens() {
            token.codegen(state);
        }
    }
}

// ============================================================================
// Directives
// ============================================================================

/// The `Alias =` clause of an aliased using directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEquals {
    pub name: Token,
    pub equals: Token,
}

impl Codegen for NameEquals {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.equals.codegen(state);
    }
}

/// `[global] using [static] [Alias =] Name;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub id: NodeId,
    pub global_keyword: Option<Token>,
    pub using_keyword: Token,
    pub static_keyword: Option<Token>,
    pub alias: Option<NameEquals>,
    pub name: Name,
    pub semicolon: Token,
    /// From the first keyword to the semicolon, trivia excluded.
    pub span: Option<Span>,
}

impl UsingDirective {
    /// The first token: `global` if present, otherwise `using`.
    pub fn first_token(&self) -> &Token {
        self.global_keyword.as_ref().unwrap_or(&self.using_keyword)
    }

    pub fn first_token_mut(&mut self) -> &mut Token {
        self.global_keyword.as_mut().unwrap_or(&mut self.using_keyword)
    }

    /// All tokens in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        out.extend(self.global_keyword.iter());
        out.push(&self.using_keyword);
        out.extend(self.static_keyword.iter());
        if let Some(alias) = &self.alias {
            out.push(&alias.name);
            out.push(&alias.equals);
        }
        out.extend(self.name.tokens());
        out.push(&self.semicolon);
        out
    }

    /// Source text without the first token's leading trivia or the
    /// semicolon's trailing trivia.
    pub fn text_without_trivia(&self) -> String {
        let full = self.to_source();
        let start = self.first_token().leading.len();
        let end = full.len() - self.semicolon.trailing.len();
        full[start..end].to_string()
    }

    /// Ordering key: the directive text with the terminator removed.
    pub fn sort_key(&self) -> String {
        let text = self.text_without_trivia();
        text.trim_end_matches(';').to_string()
    }

    /// True if any token of the directive is preceded by a preprocessor line.
    pub fn has_preprocessor_trivia(&self) -> bool {
        self.tokens().iter().any(|t| t.has_preprocessor_trivia())
    }
}

impl Codegen for UsingDirective {
    fn codegen(&self, state: &mut CodegenState) {
        self.global_keyword.codegen(state);
        self.using_keyword.codegen(state);
        self.static_keyword.codegen(state);
        self.alias.codegen(state);
        self.name.codegen(state);
        self.semicolon.codegen(state);
    }
}

/// `extern alias Identifier;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternAliasDirective {
    pub id: NodeId,
    pub extern_keyword: Token,
    pub alias_keyword: Token,
    pub identifier: Token,
    pub semicolon: Token,
    pub span: Option<Span>,
}

impl Codegen for ExternAliasDirective {
    fn codegen(&self, state: &mut CodegenState) {
        self.extern_keyword.codegen(state);
        self.alias_keyword.codegen(state);
        self.identifier.codegen(state);
        self.semicolon.codegen(state);
    }
}
