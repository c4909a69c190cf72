// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Finding directives by position or id.

use super::traits::{walk_compilation_unit, VisitResult, Visitor};
use crate::nodes::{CompilationUnit, NodeId, UsingDirective};

enum Target {
    Offset(usize),
    Id(NodeId),
}

struct DirectiveFinder<'a> {
    target: Target,
    found: Option<&'a UsingDirective>,
}

impl<'a> Visitor<'a> for DirectiveFinder<'a> {
    fn visit_using_directive(&mut self, node: &'a UsingDirective) -> VisitResult {
        let hit = match self.target {
            Target::Offset(offset) => node.span.is_some_and(|span| span.touches(offset)),
            Target::Id(id) => node.id == id,
        };
        if hit {
            self.found = Some(node);
            VisitResult::Stop
        } else {
            VisitResult::Continue
        }
    }
}

/// The using directive whose span covers `offset`, end inclusive.
pub fn find_directive_at(root: &CompilationUnit, offset: usize) -> Option<&UsingDirective> {
    let mut finder = DirectiveFinder {
        target: Target::Offset(offset),
        found: None,
    };
    walk_compilation_unit(&mut finder, root);
    finder.found
}

/// The using directive with the given id.
pub fn find_directive(root: &CompilationUnit, id: NodeId) -> Option<&UsingDirective> {
    let mut finder = DirectiveFinder {
        target: Target::Id(id),
        found: None,
    };
    walk_compilation_unit(&mut finder, root);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_compilation_unit;

    const SOURCE: &str = "using A;\nnamespace N\n{\n    using B.C;\n}\n";

    #[test]
    fn offset_inside_directive() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let offset = SOURCE.find("B.C").unwrap();
        let found = find_directive_at(&unit, offset).unwrap();
        assert_eq!(found.name.plain_text(), "B.C");
    }

    #[test]
    fn offset_after_semicolon_still_hits() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let found = find_directive_at(&unit, "using A;".len()).unwrap();
        assert_eq!(found.name.plain_text(), "A");
    }

    #[test]
    fn offset_in_indentation_misses() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let offset = SOURCE.find("    using B").unwrap() + 1;
        assert!(find_directive_at(&unit, offset).is_none());
    }

    #[test]
    fn find_by_id() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let id = unit.namespaces().next().unwrap().usings[0].id;
        assert_eq!(find_directive(&unit, id).unwrap().name.plain_text(), "B.C");
    }
}
