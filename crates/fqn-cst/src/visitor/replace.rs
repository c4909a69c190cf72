// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Single-directive replacement.

use crate::nodes::{CompilationUnit, Member, NodeId, UsingDirective};

/// A new tree with the directive `id` swapped for `replacement`.
///
/// Returns `None` if no directive has that id.
pub fn replace_directive(
    root: &CompilationUnit,
    id: NodeId,
    replacement: &UsingDirective,
) -> Option<CompilationUnit> {
    let mut unit = root.clone();
    if replace_in(&mut unit.usings, &mut unit.members, id, replacement) {
        Some(unit)
    } else {
        None
    }
}

fn replace_in(
    usings: &mut [UsingDirective],
    members: &mut [Member],
    id: NodeId,
    replacement: &UsingDirective,
) -> bool {
    if let Some(slot) = usings.iter_mut().find(|d| d.id == id) {
        *slot = replacement.clone();
        return true;
    }
    members.iter_mut().any(|member| match member {
        Member::Namespace(ns) => replace_in(&mut ns.usings, &mut ns.members, id, replacement),
        Member::Other(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_compilation_unit, Codegen};

    #[test]
    fn replaces_only_the_target() {
        let unit = parse_compilation_unit(
            "namespace N\n{\n    using B;\n    namespace M\n    {\n        using C;\n    }\n}\n",
        )
        .unwrap();
        let inner = unit.namespaces().next().unwrap().namespaces().next().unwrap();
        let target = inner.usings[0].clone();

        let mut replacement = parse_compilation_unit("using N.M.C;").unwrap().usings[0].clone();
        replacement.id = target.id;
        replacement.using_keyword.leading = target.using_keyword.leading.clone();
        replacement.semicolon.trailing = target.semicolon.trailing.clone();

        let replaced = replace_directive(&unit, target.id, &replacement).unwrap();
        assert_eq!(
            replaced.to_source(),
            "namespace N\n{\n    using B;\n    namespace M\n    {\n        using N.M.C;\n    }\n}\n"
        );
    }

    #[test]
    fn unknown_id_is_none() {
        let unit = parse_compilation_unit("using A;").unwrap();
        let replacement = unit.usings[0].clone();
        assert!(replace_directive(&unit, NodeId(42), &replacement).is_none());
    }
}
