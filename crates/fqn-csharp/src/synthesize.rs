//! Replacement directive synthesis.

use fqn_core::config::RewriteOptions;
use fqn_cst::{classify_directive, parse_name, DirectiveCategory, UsingDirective};
use tracing::debug;

/// Build the replacement for `original` that names `canonical`.
///
/// The `global`, `using`, and `static` keywords, the alias clause, the
/// semicolon, and all of their trivia are kept. The new name inherits the old
/// name's outer trivia. The result keeps the original's [`NodeId`] and has no
/// span.
///
/// `original` is returned unchanged when `canonical` is `None`, when it is
/// `GlobalOrExternal`, when it is `Aliased` and `options.rename_aliased` is
/// off, or when it already spells `canonical`.
///
/// [`NodeId`]: fqn_cst::NodeId
pub fn synthesize_directive(
    original: &UsingDirective,
    canonical: Option<&str>,
    options: RewriteOptions,
) -> UsingDirective {
    let Some(canonical) = canonical else {
        return original.clone();
    };
    match classify_directive(original) {
        DirectiveCategory::GlobalOrExternal => return original.clone(),
        DirectiveCategory::Aliased if !options.rename_aliased => return original.clone(),
        _ => {}
    }
    if original.name.plain_text() == canonical {
        return original.clone();
    }

    let mut name = match parse_name(canonical) {
        Ok(name) => name,
        Err(err) => {
            debug!(canonical, error = %err, "canonical name does not parse; directive kept");
            return original.clone();
        }
    };
    name.first_token_mut().leading = original.name.first_token().leading.clone();
    name.last_token_mut().trailing = original.name.last_token().trailing.clone();

    UsingDirective {
        name,
        span: None,
        ..original.clone()
    }
}

/// True if synthesis would produce a different directive.
pub fn would_rename(original: &UsingDirective, canonical: Option<&str>, options: RewriteOptions) -> bool {
    synthesize_directive(original, canonical, options) != *original
}
