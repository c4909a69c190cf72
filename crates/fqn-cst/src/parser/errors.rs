// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::tokenizer::TokError;

/// Errors from tokenizing or parsing. Offsets are bytes into the input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {error}")]
    TokenizerError { error: TokError, offset: usize },

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, offset: usize },

    #[error("unbalanced '{delimiter}'")]
    UnbalancedDelimiter { delimiter: String, offset: usize },
}

impl ParserError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError { offset, .. }
            | ParserError::UnexpectedToken { offset, .. }
            | ParserError::UnexpectedEof { offset, .. }
            | ParserError::UnbalancedDelimiter { offset, .. } => *offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
