// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis for Minnow: lexing and parsing.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, including
//! the synthetic `Indent`/`Dedent`/`Newline` tokens that model the off-side
//! rule. Each token carries its source location via [`Span`].
//!
//! ```
//! use minnow_core::source_analysis::{lex, TokenKind};
//!
//! let (tokens, errors) = lex("x = 1\n");
//! assert!(errors.is_empty());
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function converts tokens into a
//! [`Program`](crate::ast::Program) AST. Binary operator precedence uses
//! Pratt parsing for correct associativity and easy extensibility.
//!
//! # Error Handling
//!
//! Both stages accumulate diagnostics and keep going: the lexer records
//! [`LexError`]s in a side list and continues at the next character, and the
//! parser records [`Diagnostic`]s while synchronizing at statement
//! boundaries. Neither stage ever fails outright.

mod error;
mod lexer;
mod parser;
mod span;
mod token;

// Property-based tests for the lexer
#[cfg(test)]
mod lexer_property_tests;

pub use error::LexError;
pub use lexer::{lex, lex_with_dialect, Lexer};
pub use parser::{parse, Diagnostic, Severity};
pub use span::{Location, Span};
pub use token::{Dialect, Token, TokenKind};
