// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical diagnostics.
//!
//! Scanning never stops: when the lexer hits something it cannot read, it
//! pushes one of these onto its error list and resumes at the next
//! character. Each variant carries the span a host should underline, and
//! the [`miette`] derive gives tooling labeled, renderable reports.

use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A problem found while tokenizing.
///
/// Message prefixes are stable; hosts match on them
/// (e.g. `"Unterminated string"`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LexError {
    /// A character with no meaning anywhere in the grammar.
    #[error("Unexpected character '{character}'")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Where it appeared.
        #[label("not valid here")]
        span: Span,
    },

    /// A string missing its closing delimiter.
    #[error("Unterminated string literal")]
    UnterminatedString {
        /// The opening delimiter.
        #[label("string opened here")]
        span: Span,
    },

    /// A dedent to a width matching no enclosing indentation level.
    #[error("Inconsistent dedent to width {width}")]
    InconsistentDedent {
        /// The measured indentation width.
        width: usize,
        /// The start of the offending line.
        #[label("this line")]
        span: Span,
    },
}

impl LexError {
    /// The source region a diagnostic should point at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::InconsistentDedent { span, .. } => *span,
        }
    }
}
