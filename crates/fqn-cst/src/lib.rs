// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A lossless C# concrete syntax tree for using directives.
//!
//! Only the parts of the language that decide where directives live are
//! modelled structurally: extern aliases, using directives, and namespace
//! declarations (block and file-scoped). Everything else in a file is kept as
//! opaque token runs, so any C# source that balances its brackets round-trips
//! byte for byte.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_compilation_unit`] for a file, [`parse_name`] for a
//!   standalone dotted name.
//! - **Code Generation**: Convert a tree back to source with the [`Codegen`]
//!   trait.
//! - **Passes**: classification, removal, insertion, and lookup live in
//!   [`visitor`].
//!
//! # Quick Start
//!
//! ```
//! use fqn_cst::{parse_compilation_unit, Codegen};
//!
//! let source = "using System;\nnamespace App\n{\n    using Models;\n}\n";
//! let unit = parse_compilation_unit(source).expect("parse error");
//! assert_eq!(unit.to_source(), source);
//! ```

use std::cmp::min;

// ============================================================================
// Public modules and re-exports
// ============================================================================

mod nodes;
pub use nodes::*;

mod parser;
pub use parser::{ParserError, Result};
use parser::Parser;

/// Tokenizer for C# source code.
pub mod tokenizer;
pub use tokenizer::TokError;

/// Visitors and tree rewriting passes.
pub mod visitor;
pub use visitor::{
    classify_directive, classify_directives, classify_scopes, declared_namespaces,
    find_directive, find_directive_at, remove_directives, replace_directive, write_directives,
    ClassifiedDirectives, DirectiveCategory, TraversalMode, VisitResult, Visitor,
};

// ============================================================================
// Parsing functions
// ============================================================================

/// Parses a C# source file into a compilation unit.
///
/// Every token records its byte span in `text`, and every declaration and
/// directive receives a [`NodeId`] unique within the returned tree.
///
/// # Errors
///
/// Returns a [`ParserError`] for unterminated literals or comments,
/// unbalanced brackets, or malformed directives and namespace headers.
pub fn parse_compilation_unit(text: &str) -> Result<CompilationUnit> {
    let toks = tokenizer::tokenize(text)?;
    Parser::new(toks).parse_compilation_unit()
}

/// Parses a standalone name such as `System.Collections.Generic`.
///
/// Surrounding whitespace is ignored. The returned tokens carry no trivia and
/// no spans, ready to be spliced into another tree.
///
/// # Example
///
/// ```
/// use fqn_cst::parse_name;
///
/// let name = parse_name("Company.Product.Models").expect("parse error");
/// assert_eq!(name.plain_text(), "Company.Product.Models");
/// ```
pub fn parse_name(text: &str) -> Result<Name> {
    let toks = tokenizer::tokenize(text.trim())?;

    let mut checker = Parser::new(toks.clone());
    checker.parse_name()?;
    checker.expect_end()?;

    let detached = toks
        .into_iter()
        .map(|mut tok| {
            tok.token.span = None;
            tok
        })
        .collect();
    Parser::new(detached).parse_name()
}

// ============================================================================
// Error formatting
// ============================================================================

/// Byte offset of the start of 1-based line `n`.
fn bol_offset(source: &str, n: i32) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth((n - 2) as usize)
        .map(|(index, _)| index + 1)
        .unwrap_or_else(|| source.len())
}

/// 1-based line number containing byte `offset`.
fn line_of(source: &str, offset: usize) -> usize {
    let offset = min(offset, source.len());
    source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Formats a parser error with the surrounding source lines.
///
/// `label` is usually the document path.
///
/// # Example
///
/// ```
/// use fqn_cst::{parse_compilation_unit, prettify_error};
///
/// let source = "namespace N\n{\n    class C { )\n}\n";
/// let err = parse_compilation_unit(source).unwrap_err();
/// let formatted = prettify_error(&err, source, "Broken.cs");
/// assert!(formatted.contains("Broken.cs"));
/// ```
pub fn prettify_error(err: &ParserError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};
    use std::fmt::Write;

    let context = 1;
    let offset = min(err.offset(), source.len());
    let line = line_of(source, offset) as i32;
    let line_start = (line - context).max(1) as usize;
    let start_offset = bol_offset(source, line - context);
    let end_offset = bol_offset(source, line + context + 1);
    let snippet = &source[start_offset..end_offset];

    let start = offset - start_offset;
    let end = min(start + 1, snippet.len().max(start));
    let message = err.to_string();

    let report = Level::Error.title(label).snippet(
        Snippet::source(snippet)
            .line_start(line_start)
            .fold(false)
            .annotations(vec![Level::Error.span(start..end).label(&message)]),
    );
    let mut rendered = String::new();
    let _ = write!(rendered, "{}", Renderer::plain().render(report));
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        use super::*;

        #[test]
        fn name_without_trivia_or_spans() {
            let name = parse_name("  System.Collections.Generic ").unwrap();
            assert_eq!(name.to_source(), "System.Collections.Generic");
            assert!(name.tokens().iter().all(|t| t.span.is_none()));
        }

        #[test]
        fn name_rejects_trailing_input() {
            let err = parse_name("A.B;").unwrap_err();
            assert!(matches!(err, ParserError::UnexpectedToken { .. }));
        }

        #[test]
        fn alias_qualified_name() {
            let name = parse_name("global::System").unwrap();
            assert!(name.has_alias_qualifier());
            assert_eq!(name.leftmost_identifier().text, "global");
        }

        #[test]
        fn node_ids_are_unique() {
            let unit = parse_compilation_unit(
                "using A;\nnamespace N\n{\n    using B;\n    namespace M { using C; }\n}\n",
            )
            .unwrap();
            let ns = unit.namespaces().next().unwrap();
            let inner = ns.namespaces().next().unwrap();
            let mut ids = vec![unit.usings[0].id, ns.id, ns.usings[0].id, inner.id, inner.usings[0].id];
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 5);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn bol_offset_first_line() {
            assert_eq!(0, bol_offset("hello", 1));
            assert_eq!(0, bol_offset("hello", 0));
            assert_eq!(0, bol_offset("hello\nhello", 1));
        }

        #[test]
        fn bol_offset_second_line() {
            assert_eq!(5, bol_offset("hello", 2));
            assert_eq!(6, bol_offset("hello\nhello", 2));
        }

        #[test]
        fn bol_offset_last_line() {
            assert_eq!(11, bol_offset("hello\nhello", 3));
            assert_eq!(12, bol_offset("hello\nhello\nhello", 3));
        }

        #[test]
        fn line_of_offsets() {
            assert_eq!(1, line_of("ab\ncd", 0));
            assert_eq!(2, line_of("ab\ncd", 3));
            assert_eq!(2, line_of("ab\ncd", 99));
        }

        #[test]
        fn prettified_error_names_label_and_line() {
            let source = "using A;\nclass C\n{\n    void M() )\n}\n";
            let err = parse_compilation_unit(source).unwrap_err();
            assert!(matches!(err, ParserError::UnbalancedDelimiter { .. }));
            let formatted = prettify_error(&err, source, "Program.cs");
            assert!(formatted.contains("Program.cs"));
            assert!(formatted.contains("void M() )"));
        }

        #[test]
        fn error_at_end_of_input() {
            let source = "namespace N\n{\n";
            let err = parse_compilation_unit(source).unwrap_err();
            let formatted = prettify_error(&err, source, "Open.cs");
            assert!(formatted.contains("Open.cs"));
        }
    }
}
