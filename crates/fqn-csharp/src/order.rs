//! Canonical block ordering.
//!
//! The block is `StandardLibrary`, then `Ordinary`, then `Aliased`, each group
//! sorted ordinally by [`UsingDirective::sort_key`]. The sort is stable and
//! duplicates are kept. `GlobalOrExternal` directives never enter the block;
//! they stay where they were written.

use fqn_cst::{classify_directive, DirectiveCategory, UsingDirective};

/// Categories in block order.
pub const BLOCK_ORDER: [DirectiveCategory; 3] = [
    DirectiveCategory::StandardLibrary,
    DirectiveCategory::Ordinary,
    DirectiveCategory::Aliased,
];

/// Order synthesized directives into the canonical block.
///
/// Each directive is grouped by the category of its synthesized form, so a
/// relative name that resolves under `System` joins the standard-library
/// group.
pub fn order_directives(directives: impl IntoIterator<Item = UsingDirective>) -> Vec<UsingDirective> {
    let mut keyed: Vec<(usize, String, UsingDirective)> = directives
        .into_iter()
        .filter_map(|directive| {
            let category = classify_directive(&directive);
            let rank = BLOCK_ORDER.iter().position(|c| *c == category)?;
            Some((rank, directive.sort_key(), directive))
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, directive)| directive).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fqn_cst::parse_compilation_unit;

    fn directives(source: &str) -> Vec<UsingDirective> {
        parse_compilation_unit(source).unwrap().usings
    }

    fn keys(block: &[UsingDirective]) -> Vec<String> {
        block.iter().map(UsingDirective::sort_key).collect()
    }

    #[test]
    fn categories_in_fixed_order() {
        let block = order_directives(directives(
            "using M = Foo.Bar;\nusing Company.Product.Sub;\nusing System.Linq;\n",
        ));
        assert_eq!(
            keys(&block),
            vec!["using System.Linq", "using Company.Product.Sub", "using M = Foo.Bar"]
        );
    }

    #[test]
    fn ordinal_order_within_category() {
        let block = order_directives(directives(
            "using System.Text;\nusing System;\nusing System.Collections.Generic;\nusing system.lower;\nusing Zeta;\nusing Alpha;\n",
        ));
        assert_eq!(
            keys(&block),
            vec![
                "using System",
                "using System.Collections.Generic",
                "using System.Text",
                "using Alpha",
                "using Zeta",
                "using system.lower",
            ]
        );
    }

    #[test]
    fn adjacent_pairs_are_ordered() {
        let block = order_directives(directives(
            "using B.C;\nusing A;\nusing System.IO;\nusing System.Buffers;\nusing Q = X;\nusing P = Y;\n",
        ));
        for pair in block.windows(2) {
            if classify_directive(&pair[0]) == classify_directive(&pair[1]) {
                assert!(pair[0].sort_key() <= pair[1].sort_key());
            }
        }
    }

    #[test]
    fn duplicates_are_kept() {
        let block = order_directives(directives("using A;\nusing A;\n"));
        assert_eq!(keys(&block), vec!["using A", "using A"]);
    }

    #[test]
    fn global_or_external_are_excluded() {
        let block = order_directives(directives("using global::A;\nusing B;\n"));
        assert_eq!(keys(&block), vec!["using B"]);
    }

    #[test]
    fn modifiers_sort_by_full_text() {
        let block = order_directives(directives("using static A.B;\nglobal using C;\nusing D;\n"));
        assert_eq!(
            keys(&block),
            vec!["global using C", "using D", "using static A.B"]
        );
    }
}
