// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests: `parse(code).to_source() == code` for every fixture in
//! `tests/fixtures/` and a handful of inline snippets.

use difference::assert_diff;
use fqn_cst::{parse_compilation_unit, prettify_error, Codegen};
use itertools::Itertools;
use std::path::PathBuf;

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn all_fixtures() -> impl Iterator<Item = (PathBuf, String)> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");

    path.read_dir()
        .expect("read_dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "cs"))
        .sorted()
        .map(|path| {
            let contents = std::fs::read_to_string(&path).expect("reading file");
            (path, contents)
        })
}

fn assert_roundtrip(label: &str, input: &str) {
    let unit = match parse_compilation_unit(input) {
        Ok(unit) => unit,
        Err(e) => panic!("{}", prettify_error(&e, input, label)),
    };
    let generated = unit.to_source();
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

#[test]
fn roundtrip_fixtures() {
    let mut count = 0;
    for (path, input) in all_fixtures() {
        assert_roundtrip(&path.display().to_string(), &input);
        count += 1;
    }
    assert!(count >= 9, "expected fixtures, found {}", count);
}

#[test]
fn fixtures_expose_directive_structure() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/directive_forms.cs");
    let input = std::fs::read_to_string(path).expect("reading file");
    let unit = parse_compilation_unit(&input).expect("parse");
    assert_eq!(unit.externs.len(), 1);
    assert_eq!(unit.usings.len(), 6);
    let ns = unit.namespaces().next().expect("namespace");
    assert_eq!(ns.usings.len(), 3);
}

#[test]
fn bom_and_crlf_survive() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bom_crlf.cs");
    let input = std::fs::read_to_string(path).expect("reading file");
    assert!(input.starts_with('\u{feff}'));
    assert!(input.contains("\r\n"));
    let unit = parse_compilation_unit(&input).expect("parse");
    assert_eq!(unit.usings[0].name.plain_text(), "System");
    assert_eq!(unit.to_source(), input);
}

#[test]
fn inline_snippets() {
    let snippets = [
        "",
        "\n",
        "// only a comment\n",
        "using A;",
        "using A;\n// trailing comment without newline",
        "namespace N { }",
        "namespace N { };\n",
        "namespace N;",
        "namespace A.B { namespace C { using D; } }\n",
        "using X = A<B<C>, D[]>;\n",
        "using static  A . B ;\n",
        "global  using  A;\n",
        "class C { int this[int i] => i; }\n",
        "var x = new { A = 1 }.A;\n",
        "[Obsolete]\nclass C { }\n[Serializable]\nclass D { }\n",
        "using var stream = Open();\nstream.Dispose();\n",
    ];
    for snippet in snippets {
        assert_roundtrip(snippet, snippet);
    }
}
