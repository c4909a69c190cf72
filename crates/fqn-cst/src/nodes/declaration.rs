// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compilation unit, namespace declarations, and opaque members.

use fqn_core::types::Span;

use super::directive::{ExternAliasDirective, Name, UsingDirective};
use super::traits::{Codegen, CodegenState, NodeId, Token};

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub externs: Vec<ExternAliasDirective>,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Member>,
    /// Empty token carrying the file's final trivia.
    pub end_of_file: Token,
}

impl CompilationUnit {
    /// Outermost namespace declarations, in source order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceDeclaration> {
        self.members.iter().filter_map(Member::as_namespace)
    }

    pub fn has_namespace(&self) -> bool {
        self.namespaces().next().is_some()
    }
}

impl Codegen for CompilationUnit {
    fn codegen(&self, state: &mut CodegenState) {
        self.externs.codegen(state);
        self.usings.codegen(state);
        self.members.codegen(state);
        self.end_of_file.codegen(state);
    }
}

/// `namespace Name { ... }` or `namespace Name;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    pub id: NodeId,
    pub namespace_keyword: Token,
    pub name: Name,
    pub body: NamespaceBody,
    pub externs: Vec<ExternAliasDirective>,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<Member>,
    pub span: Option<Span>,
}

/// Punctuation that delimits a namespace body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceBody {
    Block {
        open_brace: Token,
        close_brace: Token,
        semicolon: Option<Token>,
    },
    FileScoped {
        semicolon: Token,
    },
}

impl NamespaceDeclaration {
    /// Nested namespace declarations, in source order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceDeclaration> {
        self.members.iter().filter_map(Member::as_namespace)
    }

    pub fn is_file_scoped(&self) -> bool {
        matches!(self.body, NamespaceBody::FileScoped { .. })
    }
}

impl Codegen for NamespaceDeclaration {
    fn codegen(&self, state: &mut CodegenState) {
        self.namespace_keyword.codegen(state);
        self.name.codegen(state);
        match &self.body {
            NamespaceBody::Block {
                open_brace,
                close_brace,
                semicolon,
            } => {
                open_brace.codegen(state);
                self.externs.codegen(state);
                self.usings.codegen(state);
                self.members.codegen(state);
                close_brace.codegen(state);
                semicolon.codegen(state);
            }
            NamespaceBody::FileScoped { semicolon } => {
                semicolon.codegen(state);
                self.externs.codegen(state);
                self.usings.codegen(state);
                self.members.codegen(state);
            }
        }
    }
}

/// A member of a compilation unit or namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Namespace(NamespaceDeclaration),
    Other(OpaqueMember),
}

impl Member {
    pub fn as_namespace(&self) -> Option<&NamespaceDeclaration> {
        match self {
            Member::Namespace(ns) => Some(ns),
            Member::Other(_) => None,
        }
    }
}

impl Codegen for Member {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Member::Namespace(ns) => ns.codegen(state),
            Member::Other(other) => other.codegen(state),
        }
    }
}

/// A type declaration, attribute list, or top-level statement, kept as a
/// balanced run of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueMember {
    pub tokens: Vec<Token>,
    pub span: Option<Span>,
}

impl Codegen for OpaqueMember {
    fn codegen(&self, state: &mut CodegenState) {
        self.tokens.codegen(state);
    }
}
