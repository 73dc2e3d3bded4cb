// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Minnow source code.
//!
//! This parser builds an AST from the token stream. It is designed for
//! embedding hosts: comprehensive error recovery, batched diagnostics.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - Parser MUST always produce an AST
//! - **Multiple errors** - Report all errors, don't stop at first
//! - **Precise spans** - Every diagnostic points to exact source location
//! - **Synchronization points** - Recover at logical-line boundaries, never
//!   discarding `Indent`/`Dedent` (block structure survives bad statements)
//!
//! # Statement Layout
//!
//! Simple statements end at `Newline` (or `Dedent`/`Eof`); compound
//! statements (`if`/`elif`/`else`, `while`, `for`, `def`, `class`) have a
//! head ending in `:` followed by `Newline Indent <body> Dedent`.
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! Binary and logical operator precedence is handled using Pratt parsing
//! (top-down operator precedence). Binding powers live in a declarative
//! table; see [`binding_power`].
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 10 | `or` | Left |
//! | 20 | `and` | Left |
//! | 30 | `not` | Prefix |
//! | 40 | `==` `!=` `<` `<=` `>` `>=` | Left |
//! | 50 | `+` `-` | Left |
//! | 60 | `*` `/` `%` | Left |
//! | 70 | `**` | Right |
//! | 80 | unary `-` | Prefix |
//!
//! # Usage
//!
//! ```
//! use minnow_core::source_analysis::{lex, parse};
//!
//! let (tokens, _) = lex("x = 3 + 4\n");
//! let (program, diagnostics) = parse(tokens);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.statements.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::Program;
use crate::source_analysis::{Span, Token, TokenKind};

// Submodules with additional impl blocks for Parser
mod expressions;
mod statements;

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ
/// for associativity:
/// - Left-associative: `left == right - 1` (e.g., `+`, `-`)
/// - Right-associative: `left == right + 1` (e.g., `**`)
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// How tightly this operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly this operator binds to its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Prefix `not` binds looser than comparisons, tighter than `and`.
pub(super) const NOT_BP: u8 = 31;

/// Prefix `-` binds tighter than `**`'s left side.
pub(super) const NEG_BP: u8 = 81;

/// Gets the binding power for an infix operator token.
///
/// Returns `None` for non-operators, which ends binary expression parsing;
/// this is also what makes error recovery cheap, because any unexpected
/// token simply terminates the expression.
pub(super) fn binding_power(kind: &TokenKind) -> Option<BindingPower> {
    let bp = match kind {
        TokenKind::Or => BindingPower::left_assoc(10),
        TokenKind::And => BindingPower::left_assoc(20),

        TokenKind::EqualEqual
        | TokenKind::BangEqual
        | TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual => BindingPower::left_assoc(40),

        TokenKind::Plus | TokenKind::Minus => BindingPower::left_assoc(50),

        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => BindingPower::left_assoc(60),

        TokenKind::StarStar => BindingPower::right_assoc(70),

        _ => return None,
    };
    Some(bp)
}

/// Parses a token stream into a [`Program`].
///
/// This is the main entry point for parsing. It always returns a program,
/// even if there are syntax errors. Check the returned diagnostics.
///
/// # Examples
///
/// ```
/// use minnow_core::source_analysis::{lex, parse};
///
/// let (tokens, _) = lex("print(42)\n");
/// let (program, diagnostics) = parse(tokens);
///
/// assert!(diagnostics.is_empty());
/// assert_eq!(program.statements.len(), 1);
/// ```
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

/// A diagnostic message (error or warning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The error message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Attaches a fix hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that prevents compilation.
    Error,
    /// A warning that should be addressed.
    Warning,
}

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// Accumulated diagnostics.
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Span::default()));
        }
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        if self.current < self.tokens.len() {
            &self.tokens[self.current]
        } else {
            // If we've advanced past the end of the token stream, fall back to
            // the last token (Eof in well-formed input) rather than panicking.
            self.tokens
                .last()
                .expect("Parser has no tokens; expected at least an Eof token")
        }
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Returns the current token's span.
    pub(super) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Peeks at the next token kind without consuming.
    pub(super) fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.current + 1).map(Token::kind)
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    /// Checks if the current token matches the given kind (by discriminant).
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            return matches!(kind, TokenKind::Eof);
        }
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind, advancing if it
    /// does. Otherwise reports an error and returns `None`.
    pub(super) fn expect(&mut self, kind: &TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let span = self.current_span();
            self.diagnostics.push(Diagnostic::error(message, span));
            None
        }
    }

    /// Skips layout tokens (`Newline`/`Indent`/`Dedent`). Used inside
    /// bracketed contexts, where line structure is insignificant.
    pub(super) fn skip_layout(&mut self) {
        while matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
        ) {
            self.advance();
        }
    }

    /// Consumes consecutive `Newline` tokens. Returns true if any were seen.
    pub(super) fn skip_newlines(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
            skipped = true;
        }
        skipped
    }

    /// Returns true if the previously-consumed token was a `Dedent`.
    ///
    /// A block-bodied expression (an anonymous `def`) swallows its own
    /// trailing `Dedent`, so a simple statement ending in one has no
    /// `Newline` left to consume.
    pub(super) fn previous_was_dedent(&self) -> bool {
        self.current > 0
            && matches!(self.tokens[self.current - 1].kind(), TokenKind::Dedent)
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error at the current token.
    pub(super) fn error(&mut self, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Synchronizes the parser to a statement boundary.
    ///
    /// Discards tokens up to and including the next `Newline`. `Indent`,
    /// `Dedent`, and `Eof` are never discarded; block structure must survive
    /// a bad statement.
    pub(super) fn synchronize(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
