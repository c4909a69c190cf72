//! Core infrastructure for fqn.
//!
//! This crate provides the language-agnostic pieces of the directive rewriter:
//! - Error types and error codes
//! - Layered configuration with precedence tracking
//! - The immutable Solution / Project / Document model and its disk I/O
//! - Text position utilities and locations
//! - JSON output types for CLI responses
//! - Unified diff generation

pub mod config;
pub mod diff;
pub mod error;
pub mod output;
pub mod text;
pub mod types;
pub mod workspace;
