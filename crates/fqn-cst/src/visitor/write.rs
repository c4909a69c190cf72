// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Canonical block insertion.
//!
//! Runs after [`remove_directives`](super::remove_directives): each outermost
//! namespace receives its own block, in the order
//! [`classify_scopes`](super::classify_scopes) lists them, after whatever
//! `GlobalOrExternal` directives it kept. Nested namespaces are not descended
//! into. Under [`ScopePolicy::File`] a file with no namespace gets its block
//! at compilation-unit level instead; under [`ScopePolicy::Namespace`] such a
//! file is returned unchanged.
//!
//! Directives written into a multi-line namespace body take the body's
//! indentation, so hoisted directives line up with the rest of it.

use fqn_core::config::ScopePolicy;

use crate::nodes::{
    CompilationUnit, Member, NamespaceBody, NamespaceDeclaration, Token, UsingDirective,
};

/// Indentation step assumed for an empty block body.
const INDENT_STEP: &str = "    ";

/// Insert one block per rewrite scope.
pub fn write_directives(
    root: &CompilationUnit,
    policy: ScopePolicy,
    blocks: &[Vec<UsingDirective>],
) -> CompilationUnit {
    let mut unit = root.clone();
    if unit.has_namespace() {
        let namespaces = unit.members.iter_mut().filter_map(|member| match member {
            Member::Namespace(ns) => Some(ns),
            Member::Other(_) => None,
        });
        for (ns, block) in namespaces.zip(blocks) {
            let indent = body_indent(ns);
            ns.usings
                .extend(block.iter().map(|directive| reindent(directive, indent.as_deref())));
        }
    } else if policy == ScopePolicy::File {
        if let Some(block) = blocks.first() {
            unit.usings.extend(block.iter().cloned());
        }
    }
    unit
}

/// The whitespace after the last newline of `leading`, if that is all it holds.
fn line_indent(leading: &str) -> Option<&str> {
    let tail = leading.rsplit_once('\n').map_or(leading, |(_, tail)| tail);
    tail.chars().all(|c| c == ' ' || c == '\t').then_some(tail)
}

fn member_first_token(member: &Member) -> Option<&Token> {
    match member {
        Member::Namespace(ns) => Some(&ns.namespace_keyword),
        Member::Other(other) => other.tokens.first(),
    }
}

/// Indentation of a namespace body. `None` when the body does not start on
/// its own line.
fn body_indent(ns: &NamespaceDeclaration) -> Option<String> {
    let (starts_line, fallback) = match &ns.body {
        NamespaceBody::Block {
            open_brace,
            close_brace,
            ..
        } => (
            open_brace.trailing.ends_with('\n'),
            line_indent(&close_brace.leading).map(|outer| format!("{}{}", outer, INDENT_STEP)),
        ),
        NamespaceBody::FileScoped { semicolon } => {
            (semicolon.trailing.ends_with('\n'), Some(String::new()))
        }
    };
    if !starts_line {
        return None;
    }
    ns.externs
        .iter()
        .map(|directive| &directive.extern_keyword)
        .chain(ns.usings.iter().map(UsingDirective::first_token))
        .chain(ns.members.iter().filter_map(member_first_token))
        .find_map(|token| line_indent(&token.leading))
        .map(str::to_string)
        .or(fallback)
}

/// `directive` with its line indentation replaced by `indent`.
fn reindent(directive: &UsingDirective, indent: Option<&str>) -> UsingDirective {
    let mut directive = directive.clone();
    if let Some(indent) = indent {
        let leading = &mut directive.first_token_mut().leading;
        if line_indent(leading).is_some() {
            let keep = leading.rfind('\n').map_or(0, |newline| newline + 1);
            leading.truncate(keep);
            leading.push_str(indent);
        }
    }
    directive
}

// ============================================================================
// Tests
// ============================================================================
