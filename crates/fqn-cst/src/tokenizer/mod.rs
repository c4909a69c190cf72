// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for C# source code.
//!
//! Produces a flat list of tokens, each owning its trivia, ending with an
//! empty end-of-file token that carries whatever trivia remain. Concatenating
//! `leading + text + trailing` over all tokens reproduces the input exactly.
//!
//! Only the lexical structure needed to find directives and balance
//! brackets is modelled: identifiers, numbers, punctuation (with `::` as a
//! single token), and literals. Strings of every flavour (regular, verbatim,
//! interpolated, raw) and character literals are single tokens, so braces and
//! quotes inside them never confuse the parser.


use fqn_core::types::Span;
use thiserror::Error;

use crate::nodes::Token;
use crate::parser::ParserError;

// ============================================================================
// Token Kinds and Errors
// ============================================================================

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// Identifier or keyword, including `@verbatim` identifiers.
    Identifier,
    /// Operator or punctuation.
    Punct,
    /// String or character literal.
    Literal,
    Number,
    EndOfFile,
}

/// A token together with its lexical class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tok {
    pub kind: TokKind,
    pub token: Token,
}

/// Lexical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated interpolation")]
    UnterminatedInterpolation,
}

type LexResult<T> = std::result::Result<T, (TokError, usize)>;

// ============================================================================
// Entry Points
// ============================================================================

/// Split source text into tokens.
pub fn tokenize(src: &str) -> Result<Vec<Tok>, ParserError> {
    tokenize_inner(src).map_err(|(error, offset)| ParserError::TokenizerError { error, offset })
}

/// True if `trivia` contains a preprocessor line.
pub fn contains_preprocessor_directive(trivia: &str) -> bool {
    scan_leading(trivia, 0, true)
        .map(|(_, saw_directive)| saw_directive)
        .unwrap_or(false)
}

fn tokenize_inner(src: &str) -> LexResult<Vec<Tok>> {
    let mut toks = Vec::new();
    let mut pos = 0;
    let mut at_line_start = true;

    loop {
        let leading_start = pos;
        let (token_start, _) = scan_leading(src, pos, at_line_start)?;
        if token_start >= src.len() {
            toks.push(Tok {
                kind: TokKind::EndOfFile,
                token: Token {
                    leading: src[leading_start..].to_string(),
                    text: String::new(),
                    trailing: String::new(),
                    span: Some(Span::new(src.len(), src.len())),
                },
            });
            return Ok(toks);
        }

        let (kind, token_end) = lex_token(src, token_start)?;
        let trailing_end = scan_trailing(src, token_end)?;
        at_line_start = src[token_end..trailing_end].ends_with('\n');

        toks.push(Tok {
            kind,
            token: Token {
                leading: src[leading_start..token_start].to_string(),
                text: src[token_start..token_end].to_string(),
                trailing: src[token_end..trailing_end].to_string(),
                span: Some(Span::new(token_start, token_end)),
            },
        });
        pos = trailing_end;
    }
}

// ============================================================================
// Trivia
// ============================================================================

fn char_at(src: &str, pos: usize) -> Option<char> {
    src.get(pos..).and_then(|rest| rest.chars().next())
}

fn line_end(bytes: &[u8], pos: usize) -> usize {
    memchr::memchr(b'\n', &bytes[pos..])
        .map(|i| pos + i)
        .unwrap_or(bytes.len())
}

fn block_comment_end(bytes: &[u8], pos: usize) -> LexResult<usize> {
    memchr::memmem::find(&bytes[pos + 2..], b"*/")
        .map(|i| pos + 2 + i + 2)
        .ok_or((TokError::UnterminatedComment, pos))
}

/// Skip leading trivia. Returns the end offset and whether a preprocessor
/// line was seen.
fn scan_leading(src: &str, mut pos: usize, mut at_line_start: bool) -> LexResult<(usize, bool)> {
    let bytes = src.as_bytes();
    let mut saw_directive = false;
    while let Some(c) = char_at(src, pos) {
        match c {
            '\u{feff}' if pos == 0 => pos += c.len_utf8(),
            '\n' => {
                pos += 1;
                at_line_start = true;
            }
            '/' if bytes.get(pos + 1) == Some(&b'/') => pos = line_end(bytes, pos),
            '/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = block_comment_end(bytes, pos)?;
                at_line_start = false;
            }
            '#' if at_line_start => {
                pos = line_end(bytes, pos);
                saw_directive = true;
            }
            c if c.is_whitespace() => pos += c.len_utf8(),
            _ => break,
        }
    }
    Ok((pos, saw_directive))
}

/// Skip trailing trivia: same-line whitespace and comments, then at most one
/// newline.
fn scan_trailing(src: &str, mut pos: usize) -> LexResult<usize> {
    let bytes = src.as_bytes();
    while let Some(c) = char_at(src, pos) {
        match c {
            '\n' => return Ok(pos + 1),
            '/' if bytes.get(pos + 1) == Some(&b'/') => pos = line_end(bytes, pos),
            '/' if bytes.get(pos + 1) == Some(&b'*') => pos = block_comment_end(bytes, pos)?,
            c if c.is_whitespace() => pos += c.len_utf8(),
            _ => break,
        }
    }
    Ok(pos)
}

// ============================================================================
// Tokens
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn lex_token(src: &str, pos: usize) -> LexResult<(TokKind, usize)> {
    let bytes = src.as_bytes();
    let Some(c) = char_at(src, pos) else {
        return Ok((TokKind::EndOfFile, pos));
    };
    let next = char_at(src, pos + c.len_utf8());

    let result = match c {
        '"' if src[pos..].starts_with("\"\"\"") => (TokKind::Literal, scan_raw(bytes, pos)?),
        '"' => (TokKind::Literal, scan_quoted(bytes, pos, b'"')?),
        '\'' => (TokKind::Literal, scan_quoted(bytes, pos, b'\'')?),
        '@' => match next {
            Some('"') => (TokKind::Literal, scan_verbatim(bytes, pos + 1)?),
            Some('$') if bytes.get(pos + 2) == Some(&b'"') => {
                (TokKind::Literal, scan_interpolated(src, pos + 2, true)?)
            }
            Some(n) if is_ident_start(n) => (TokKind::Identifier, scan_ident(src, pos + 1)),
            _ => (TokKind::Punct, pos + 1),
        },
        '$' => {
            let mut p = pos;
            while bytes.get(p) == Some(&b'$') {
                p += 1;
            }
            match bytes.get(p) {
                Some(b'@') if bytes.get(p + 1) == Some(&b'"') => {
                    (TokKind::Literal, scan_interpolated(src, p + 1, true)?)
                }
                Some(b'"') if src[p..].starts_with("\"\"\"") => {
                    (TokKind::Literal, scan_raw(bytes, p)?)
                }
                Some(b'"') => (TokKind::Literal, scan_interpolated(src, p, false)?),
                _ => (TokKind::Punct, pos + 1),
            }
        }
        ':' if next == Some(':') => (TokKind::Punct, pos + 2),
        c if is_ident_start(c) => (TokKind::Identifier, scan_ident(src, pos)),
        c if c.is_ascii_digit() => (TokKind::Number, scan_number(src, pos)),
        '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
            (TokKind::Number, scan_number(src, pos))
        }
        c => (TokKind::Punct, pos + c.len_utf8()),
    };
    Ok(result)
}

fn scan_ident(src: &str, mut pos: usize) -> usize {
    while let Some(c) = char_at(src, pos) {
        if !is_ident_continue(c) {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

fn scan_number(src: &str, mut pos: usize) -> usize {
    while let Some(c) = char_at(src, pos) {
        if is_ident_continue(c) {
            pos += c.len_utf8();
        } else if c == '.' && src.as_bytes().get(pos + 1).is_some_and(|b| b.is_ascii_digit()) {
            pos += 1;
        } else {
            break;
        }
    }
    pos
}

/// Regular string or character literal with backslash escapes.
fn scan_quoted(bytes: &[u8], start: usize, quote: u8) -> LexResult<usize> {
    let error = if quote == b'"' {
        TokError::UnterminatedString
    } else {
        TokError::UnterminatedChar
    };
    let mut p = start + 1;
    while p < bytes.len() {
        match bytes[p] {
            b'\\' => p += 2,
            b'\n' => break,
            b if b == quote => return Ok(p + 1),
            _ => p += 1,
        }
    }
    Err((error, start))
}

/// `@"..."` with `""` escapes. `quote` is the offset of the opening quote.
fn scan_verbatim(bytes: &[u8], quote: usize) -> LexResult<usize> {
    let mut p = quote + 1;
    while p < bytes.len() {
        if bytes[p] == b'"' {
            if bytes.get(p + 1) == Some(&b'"') {
                p += 2;
                continue;
            }
            return Ok(p + 1);
        }
        p += 1;
    }
    Err((TokError::UnterminatedString, quote))
}

/// `"""..."""`, closed by a run of at least as many quotes as opened it.
fn scan_raw(bytes: &[u8], start: usize) -> LexResult<usize> {
    let open = bytes[start..].iter().take_while(|b| **b == b'"').count();
    let mut p = start + open;
    while p < bytes.len() {
        if bytes[p] == b'"' {
            let run = bytes[p..].iter().take_while(|b| **b == b'"').count();
            if run >= open {
                return Ok(p + run);
            }
            p += run;
        } else {
            p += 1;
        }
    }
    Err((TokError::UnterminatedString, start))
}

/// `$"..."` or `$@"..."`. `quote` is the offset of the opening quote.
fn scan_interpolated(src: &str, quote: usize, verbatim: bool) -> LexResult<usize> {
    let bytes = src.as_bytes();
    let mut p = quote + 1;
    while p < bytes.len() {
        match bytes[p] {
            b'"' if verbatim && bytes.get(p + 1) == Some(&b'"') => p += 2,
            b'"' => return Ok(p + 1),
            b'\\' if !verbatim => p += 2,
            b'\n' if !verbatim => break,
            b'{' if bytes.get(p + 1) == Some(&b'{') => p += 2,
            b'{' => p = scan_hole(src, p + 1)?,
            _ => p += 1,
        }
    }
    Err((TokError::UnterminatedString, quote))
}

/// An interpolation hole, up to and including its closing brace.
fn scan_hole(src: &str, start: usize) -> LexResult<usize> {
    let mut depth = 0usize;
    let mut p = start;
    loop {
        let (next, _) = scan_leading(src, p, false)?;
        p = next;
        let Some(c) = char_at(src, p) else {
            return Err((TokError::UnterminatedInterpolation, start));
        };
        match c {
            '{' | '(' | '[' => {
                depth += 1;
                p += 1;
            }
            '}' if depth == 0 => return Ok(p + 1),
            '}' | ')' | ']' => {
                depth = depth.saturating_sub(1);
                p += 1;
            }
            _ => p = lex_token(src, p)?.1,
        }
    }
}
