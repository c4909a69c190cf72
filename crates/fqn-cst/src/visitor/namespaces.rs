// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Collects the fully-qualified names of declared namespaces.

use super::traits::{walk_compilation_unit, VisitResult, Visitor};
use crate::nodes::{CompilationUnit, NamespaceDeclaration, OpaqueMember};

#[derive(Default)]
struct NamespaceCollector {
    stack: Vec<String>,
    names: Vec<String>,
}

impl<'a> Visitor<'a> for NamespaceCollector {
    fn visit_namespace(&mut self, node: &'a NamespaceDeclaration) -> VisitResult {
        let name = node.name.plain_text();
        let full = match self.stack.last() {
            Some(parent) => format!("{}.{}", parent, name),
            None => name,
        };
        self.names.push(full.clone());
        self.stack.push(full);
        VisitResult::Continue
    }

    fn leave_namespace(&mut self, _node: &'a NamespaceDeclaration) {
        self.stack.pop();
    }

    fn visit_opaque_member(&mut self, _node: &'a OpaqueMember) -> VisitResult {
        VisitResult::SkipChildren
    }
}

/// Full names of every namespace declared in the file, nested declarations
/// joined to their parents, in source order.
pub fn declared_namespaces(root: &CompilationUnit) -> Vec<String> {
    let mut collector = NamespaceCollector::default();
    walk_compilation_unit(&mut collector, root);
    collector.names
}
