// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only visitor over a compilation unit.

use crate::nodes::{
    CompilationUnit, ExternAliasDirective, Member, NamespaceDeclaration, OpaqueMember,
    UsingDirective,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    #[default]
    Continue,
    /// Skip children, continue with siblings.
    SkipChildren,
    /// Stop traversal entirely.
    Stop,
}

/// Pre-order visitor. Children are visited in source order; `leave_namespace`
/// runs after a namespace's children.
pub trait Visitor<'a> {
    fn visit_compilation_unit(&mut self, _node: &'a CompilationUnit) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_namespace(&mut self, _node: &'a NamespaceDeclaration) -> VisitResult {
        VisitResult::Continue
    }

    fn leave_namespace(&mut self, _node: &'a NamespaceDeclaration) {}

    fn visit_extern_alias(&mut self, _node: &'a ExternAliasDirective) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_using_directive(&mut self, _node: &'a UsingDirective) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_opaque_member(&mut self, _node: &'a OpaqueMember) -> VisitResult {
        VisitResult::Continue
    }
}

/// Walk a compilation unit. Returns `false` if the visitor stopped early.
pub fn walk_compilation_unit<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a CompilationUnit) -> bool {
    match visitor.visit_compilation_unit(node) {
        VisitResult::Stop => return false,
        VisitResult::SkipChildren => return true,
        VisitResult::Continue => {}
    }
    walk_body(visitor, &node.externs, &node.usings, &node.members)
}

/// Walk a namespace declaration. Returns `false` if the visitor stopped early.
pub fn walk_namespace<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a NamespaceDeclaration) -> bool {
    match visitor.visit_namespace(node) {
        VisitResult::Stop => return false,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if !walk_body(visitor, &node.externs, &node.usings, &node.members) {
                return false;
            }
        }
    }
    visitor.leave_namespace(node);
    true
}

fn walk_body<'a, V: Visitor<'a>>(
    visitor: &mut V,
    externs: &'a [ExternAliasDirective],
    usings: &'a [UsingDirective],
    members: &'a [Member],
) -> bool {
    for directive in externs {
        if visitor.visit_extern_alias(directive) == VisitResult::Stop {
            return false;
        }
    }
    for directive in usings {
        if visitor.visit_using_directive(directive) == VisitResult::Stop {
            return false;
        }
    }
    for member in members {
        let keep_going = match member {
            Member::Namespace(ns) => walk_namespace(visitor, ns),
            Member::Other(other) => visitor.visit_opaque_member(other) != VisitResult::Stop,
        };
        if !keep_going {
            return false;
        }
    }
    true
}
