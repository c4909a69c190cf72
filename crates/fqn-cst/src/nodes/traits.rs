// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core traits and types for CST nodes.
//!
//! # Node Identity
//!
//! [`NodeId`] provides stable identity for directive and namespace nodes.
//! Ids are assigned in pre-order while parsing (a namespace before the
//! directives it owns). A synthesized directive keeps the id of the
//! directive it replaces, so a rewrite can be located in the new tree.
//!
//! # Tokens and Trivia
//!
//! Every [`Token`] owns the trivia around it. Trailing trivia run from the
//! token to the end of its line, newline included; everything else
//! (indentation, blank lines, comments, preprocessor lines) is leading trivia
//! of the next token. Generating code from an unedited tree reproduces the
//! input byte for byte.

use std::fmt;

use fqn_core::types::Span;

use crate::tokenizer::contains_preprocessor_directive;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable, unique identifier for a CST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Generator for assigning sequential [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    /// Create a new generator starting from NodeId(0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the current count of generated NodeIds.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Code Generation
// ============================================================================

/// Accumulates generated source text.
#[derive(Debug, Default)]
pub struct CodegenState {
    tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, text: &str) {
        self.tokens.push_str(text);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens)
    }
}

/// Converts a node back to source text.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    /// Generated source for this node alone.
    fn to_source(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.to_string()
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(node) = self {
            node.codegen(state);
        }
    }
}

impl<T: Codegen> Codegen for Vec<T> {
    fn codegen(&self, state: &mut CodegenState) {
        for node in self {
            node.codegen(state);
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// A token with the trivia it owns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub leading: String,
    pub text: String,
    pub trailing: String,
    /// Byte range of `text` in the parsed source. `None` for synthesized tokens.
    pub span: Option<Span>,
}

impl Token {
    /// A synthesized token with no trivia.
    pub fn new(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            ..Default::default()
        }
    }

    /// The token text with any verbatim `@` prefix removed.
    pub fn identifier_text(&self) -> &str {
        self.text.strip_prefix('@').unwrap_or(&self.text)
    }

    /// True if the leading trivia hold a preprocessor line (`#if`, `#region`, ...).
    pub fn has_preprocessor_trivia(&self) -> bool {
        contains_preprocessor_directive(&self.leading)
    }
}

impl Codegen for Token {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.leading);
        state.add_token(&self.text);
        state.add_token(&self.trailing);
    }
}

/// Join two optional spans into one covering both.
pub(crate) fn join_spans(first: Option<Span>, last: Option<Span>) -> Option<Span> {
    match (first, last) {
        (Some(a), Some(b)) if a.start <= b.end => Some(Span::new(a.start, b.end)),
        _ => None,
    }
}
