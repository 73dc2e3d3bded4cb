// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Minnow source code.
//!
//! This module converts source text into a stream of [`Token`]s, including
//! the synthetic `Indent`/`Dedent`/`Newline` tokens that model the off-side
//! rule. The lexer is hand-written for maximum control over error recovery.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never abort on malformed input; record a
//!   [`LexError`] and continue at the next character
//! - **Balanced layout**: Every `Indent` is matched by a `Dedent` before
//!   `Eof`, including at end of input
//! - **Precise spans**: Every token carries its exact source location;
//!   layout tokens carry zero-length spans
//!
//! # Indentation
//!
//! At the start of each logical line the leading whitespace width is measured
//! (spaces and tabs each count one unit) and compared against a stack of open
//! indentation levels. A wider line pushes a level and emits `Indent`; a
//! narrower line pops levels, emitting one `Dedent` each, and reports
//! `Inconsistent dedent` when the width matches no open level. Blank lines
//! and comment-only lines never touch the stack.
//!
//! # Example
//!
//! ```
//! use minnow_core::source_analysis::{lex, TokenKind};
//!
//! let (tokens, errors) = lex("x = 1\n");
//! assert!(errors.is_empty());
//! assert!(matches!(tokens.last().map(minnow_core::source_analysis::Token::kind), Some(TokenKind::Eof)));
//! ```

use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Dialect, LexError, Span, Token, TokenKind};

/// A lexer that tokenizes Minnow source code.
///
/// The lexer never fails: lexical problems are pushed onto an error list and
/// scanning resumes at the next character, so the parser always receives a
/// complete token stream ending in `Eof`.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Keyword table variant (`self` vs `this`).
    dialect: Dialect,
    /// Stack of open indentation widths. Always contains at least `0`.
    indent_stack: Vec<usize>,
    /// Queued layout tokens awaiting emission.
    pending: VecDeque<Token>,
    /// True when the next token starts a logical line.
    at_line_start: bool,
    /// Open `(`/`[`/`{` nesting. While non-zero, line starts never touch the
    /// indent stack (continuation lines inside brackets must not produce
    /// `Indent`/`Dedent`).
    bracket_depth: usize,
    /// Accumulated lexical errors.
    errors: Vec<LexError>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("indent_stack", &self.indent_stack)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text in the default dialect.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_dialect(source, Dialect::default())
    }

    /// Creates a new lexer with an explicit keyword [`Dialect`].
    #[must_use]
    pub fn with_dialect(source: &'src str, dialect: Dialect) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            dialect,
            indent_stack: vec![0],
            pending: VecDeque::new(),
            at_line_start: true,
            bracket_depth: 0,
            errors: Vec::new(),
        }
    }

    /// Consumes the lexer, returning all tokens (ending in `Eof`) and the
    /// accumulated errors.
    #[must_use]
    pub fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind().is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.errors)
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true, returning the count.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "scripts handed to the compiler stay far below u32::MAX bytes"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    // ========================================================================
    // Token production
    // ========================================================================

    /// Produces the next token, draining queued layout tokens first.
    fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }

            if self.at_line_start {
                self.handle_line_start();
                continue;
            }

            self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));

            let start = self.current_position();
            let Some(c) = self.peek_char() else {
                return self.handle_eof();
            };

            match c {
                '\n' => {
                    self.advance();
                    self.at_line_start = true;
                    return Token::new(TokenKind::Newline, Span::empty(start));
                }
                '#' => {
                    self.advance_while(|c| c != '\n');
                }
                '"' | '\'' => return self.lex_string(),
                '0'..='9' => return self.lex_number(),
                c if c.is_alphabetic() || c == '_' => return self.lex_word(),
                _ => {
                    if let Some(token) = self.lex_operator() {
                        return token;
                    }
                    self.advance();
                    self.errors.push(LexError::UnexpectedCharacter {
                        character: c,
                        span: self.span_from(start),
                    });
                }
            }
        }
    }

    /// Measures indentation at the start of a logical line and queues the
    /// resulting `Indent`/`Dedent` tokens.
    fn handle_line_start(&mut self) {
        self.at_line_start = false;

        let width = self.advance_while(|c| matches!(c, ' ' | '\t'));

        // Blank and comment-only lines never affect the indent stack, and
        // neither do continuation lines inside brackets.
        if self.bracket_depth > 0 || matches!(self.peek_char(), None | Some('\n' | '\r' | '#')) {
            return;
        }

        let at = Span::empty(self.current_position());
        let current = self.current_indent();

        if width > current {
            self.indent_stack.push(width);
            self.pending.push_back(Token::new(TokenKind::Indent, at));
            return;
        }

        if width < current {
            while self.current_indent() > width {
                self.indent_stack.pop();
                self.pending.push_back(Token::new(TokenKind::Dedent, at));
            }
            if self.current_indent() != width {
                self.errors
                    .push(LexError::InconsistentDedent { width, span: at });
                // Recover at the nearest open level; Indent/Dedent stay
                // balanced even on malformed input.
            }
        }
    }

    /// Returns the innermost open indentation width.
    fn current_indent(&self) -> usize {
        // INVARIANT: the stack always retains the initial width-0 entry.
        self.indent_stack
            .last()
            .copied()
            .expect("indent stack is never empty")
    }

    /// Queues the dedents still open at end of input, then emits `Eof`.
    fn handle_eof(&mut self) -> Token {
        let at = Span::empty(self.current_position());
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.pending.push_back(Token::new(TokenKind::Dedent, at));
        }
        if let Some(token) = self.pending.pop_front() {
            return token;
        }
        Token::new(TokenKind::Eof, at)
    }

    /// Lexes a number: digits with an optional fractional part.
    fn lex_number(&mut self) -> Token {
        let start = self.current_position();
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        let span = self.span_from(start);
        let text = EcoString::from(&self.source[span.as_range()]);
        Token::new(TokenKind::Number(text), span)
    }

    /// Lexes an identifier or keyword.
    fn lex_word(&mut self) -> Token {
        let start = self.current_position();
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let span = self.span_from(start);
        let word = &self.source[span.as_range()];
        let kind = TokenKind::keyword(word, self.dialect)
            .unwrap_or_else(|| TokenKind::Identifier(EcoString::from(word)));
        Token::new(kind, span)
    }

    /// Lexes a string literal: `"…"`, `'…'`, or `"""…"""`.
    ///
    /// An unterminated string is reported at its opening delimiter; the
    /// characters consumed so far still become a `Str` token so the parser
    /// sees something sensible.
    fn lex_string(&mut self) -> Token {
        let start = self.current_position();
        let quote = self.advance().expect("lex_string called at a quote");
        let triple = quote == '"' && self.peek_char() == Some('"') && self.peek_char_n(1) == Some('"');
        if triple {
            self.advance();
            self.advance();
        }
        let open_span = self.span_from(start);

        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => {
                    self.errors.push(LexError::UnterminatedString { span: open_span });
                    break;
                }
                Some('\n') if !triple => {
                    self.errors.push(LexError::UnterminatedString { span: open_span });
                    break;
                }
                Some('"') if triple => {
                    if self.peek_char_n(1) == Some('"') && self.peek_char_n(2) == Some('"') {
                        self.advance();
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                    value.push('"');
                }
                Some(c) if c == quote && !triple => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some('0') => value.push('\0'),
                        Some('a') => value.push('\x07'),
                        Some('b') => value.push('\x08'),
                        Some('f') => value.push('\x0C'),
                        Some('v') => value.push('\x0B'),
                        // Unknown escapes keep the backslash literally.
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => {
                            self.errors.push(LexError::UnterminatedString { span: open_span });
                            break;
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Token::new(
            TokenKind::Str {
                value: EcoString::from(value),
                triple,
            },
            self.span_from(start),
        )
    }

    /// Lexes punctuation and operators, with one character of lookahead for
    /// the two-character forms.
    fn lex_operator(&mut self) -> Option<Token> {
        let start = self.current_position();
        let c = self.peek_char()?;

        let followed_by_equal = self.peek_char_n(1) == Some('=');
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '=' if followed_by_equal => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '!' if followed_by_equal => TokenKind::BangEqual,
            '!' => return None,
            '<' if followed_by_equal => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if followed_by_equal => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            '+' if followed_by_equal => TokenKind::PlusEqual,
            '+' => TokenKind::Plus,
            '-' if followed_by_equal => TokenKind::MinusEqual,
            '-' => TokenKind::Minus,
            '*' if self.peek_char_n(1) == Some('*') => TokenKind::StarStar,
            '*' if followed_by_equal => TokenKind::StarEqual,
            '*' => TokenKind::Star,
            '/' if followed_by_equal => TokenKind::SlashEqual,
            '/' => TokenKind::Slash,
            '%' if followed_by_equal => TokenKind::PercentEqual,
            '%' => TokenKind::Percent,
            _ => return None,
        };

        match kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                self.bracket_depth += 1;
            }
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }

        self.advance();
        if matches!(
            kind,
            TokenKind::EqualEqual
                | TokenKind::BangEqual
                | TokenKind::LessEqual
                | TokenKind::GreaterEqual
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::StarEqual
                | TokenKind::SlashEqual
                | TokenKind::PercentEqual
                | TokenKind::StarStar
        ) {
            self.advance();
        }
        Some(Token::new(kind, self.span_from(start)))
    }
}

/// Tokenizes `source` in the default dialect.
///
/// Returns every token, ending with `Eof`, plus the accumulated lexical
/// errors. Never fails.
#[must_use]
pub fn lex(source: &str) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source).run()
}

/// Tokenizes `source` with an explicit keyword [`Dialect`].
#[must_use]
pub fn lex_with_dialect(source: &str, dialect: Dialect) -> (Vec<Token>, Vec<LexError>) {
    Lexer::with_dialect(source, dialect).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(Token::into_kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.into())
    }

    fn number(text: &str) -> TokenKind {
        TokenKind::Number(text.into())
    }

    #[test]
    fn simple_function() {
        let source = "def fn():\n    n = 4 + 4\n    print(n)\nfn()\n";
        let expected = vec![
            TokenKind::Def,
            ident("fn"),
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            ident("n"),
            TokenKind::Equal,
            number("4"),
            TokenKind::Plus,
            number("4"),
            TokenKind::Newline,
            ident("print"),
            TokenKind::LeftParen,
            ident("n"),
            TokenKind::RightParen,
            TokenKind::Newline,
            TokenKind::Dedent,
            ident("fn"),
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::Newline,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(source), expected);
    }

    #[test]
    fn blank_line_does_not_change_indentation() {
        let source = "if True:\n    x = 1\n\n    y = 2\n";
        let expected = vec![
            TokenKind::If,
            TokenKind::True,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            ident("x"),
            TokenKind::Equal,
            number("1"),
            TokenKind::Newline,
            TokenKind::Newline,
            ident("y"),
            TokenKind::Equal,
            number("2"),
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(source), expected);
    }

    #[test]
    fn comment_only_line_does_not_change_indentation() {
        let source = "while x:\n    x = 1\n# note\n    x = 2\n";
        let k = kinds(source);
        assert_eq!(
            k.iter()
                .filter(|k| matches!(k, TokenKind::Dedent))
                .count(),
            1
        );
        assert_eq!(
            k.iter()
                .filter(|k| matches!(k, TokenKind::Indent))
                .count(),
            1
        );
    }

    #[test]
    fn emits_dedents_before_eof() {
        let source = "if True:\n    if True:\n        x = 1";
        let k = kinds(source);
        let tail: Vec<_> = k[k.len() - 3..].to_vec();
        assert_eq!(tail, vec![TokenKind::Dedent, TokenKind::Dedent, TokenKind::Eof]);
    }

    #[test]
    fn inconsistent_dedent_is_reported_and_recovered() {
        let source = "if True:\n    x = 1\n  y = 2\n";
        let (tokens, errors) = lex(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Inconsistent dedent"));
        // Lexing continued: the stream still ends with Eof.
        assert!(tokens.last().is_some_and(|t| t.kind().is_eof()));
    }

    #[test]
    fn operators_with_lookahead() {
        let source = "a ** b == c != d <= e >= f += g -= h *= i /= j %= k\n";
        let k = kinds(source);
        assert!(k.contains(&TokenKind::StarStar));
        assert!(k.contains(&TokenKind::EqualEqual));
        assert!(k.contains(&TokenKind::BangEqual));
        assert!(k.contains(&TokenKind::LessEqual));
        assert!(k.contains(&TokenKind::GreaterEqual));
        assert!(k.contains(&TokenKind::PlusEqual));
        assert!(k.contains(&TokenKind::MinusEqual));
        assert!(k.contains(&TokenKind::StarEqual));
        assert!(k.contains(&TokenKind::SlashEqual));
        assert!(k.contains(&TokenKind::PercentEqual));
    }

    #[test]
    fn string_escapes_are_decoded() {
        let (tokens, errors) = lex("s = \"a\\n\\t\\\"b\\\\\"\n");
        assert!(errors.is_empty());
        let value = tokens.iter().find_map(|t| match t.kind() {
            TokenKind::Str { value, .. } => Some(value.clone()),
            _ => None,
        });
        assert_eq!(value.as_deref(), Some("a\n\t\"b\\"));
    }

    #[test]
    fn unknown_escape_keeps_backslash() {
        let (tokens, _) = lex("s = \"a\\qb\"\n");
        let value = tokens.iter().find_map(|t| match t.kind() {
            TokenKind::Str { value, .. } => Some(value.clone()),
            _ => None,
        });
        assert_eq!(value.as_deref(), Some("a\\qb"));
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let (tokens, errors) = lex("\"\"\"one\ntwo\"\"\"\n");
        assert!(errors.is_empty());
        let found = tokens.iter().find_map(|t| match t.kind() {
            TokenKind::Str { value, triple } => Some((value.clone(), *triple)),
            _ => None,
        });
        assert_eq!(found, Some(("one\ntwo".into(), true)));
    }

    #[test]
    fn unterminated_string_reported_at_opening_quote() {
        let (_, errors) = lex("x = \"abc\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Unterminated string"));
        assert_eq!(errors[0].span().start(), 4);
    }

    #[test]
    fn unexpected_character_is_skipped() {
        let (tokens, errors) = lex("x = 1 @ 2\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains('@'));
        // The 2 after the bad character still lexes.
        assert!(tokens.iter().any(|t| t.kind() == &number("2")));
    }

    #[test]
    fn float_literal_keeps_raw_text() {
        let k = kinds("x = 3.14\n");
        assert!(k.contains(&number("3.14")));
    }

    #[test]
    fn dot_without_digits_is_member_access() {
        let k = kinds("a.b\n");
        assert_eq!(
            k,
            vec![ident("a"), TokenKind::Dot, ident("b"), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn layout_tokens_have_empty_spans() {
        let (tokens, _) = lex("if True:\n    x = 1\n");
        for token in &tokens {
            if token.kind().is_layout() {
                assert!(token.span().is_empty(), "{:?}", token);
            } else {
                assert!(token.span().len() >= 1, "{:?}", token);
            }
        }
    }

    #[test]
    fn lexeme_matches_source_slice() {
        let source = "total = price + 12\n";
        let (tokens, _) = lex(source);
        for token in &tokens {
            if let TokenKind::Identifier(name) = token.kind() {
                assert_eq!(&source[token.span().as_range()], name.as_str());
            }
            if let TokenKind::Number(text) = token.kind() {
                assert_eq!(&source[token.span().as_range()], text.as_str());
            }
        }
    }

    #[test]
    fn this_dialect_swaps_keyword() {
        let (tokens, _) = lex_with_dialect("this.x\n", Dialect::ThisKeyword);
        assert!(matches!(tokens[0].kind(), TokenKind::SelfKw));
        let (tokens, _) = lex_with_dialect("self.x\n", Dialect::ThisKeyword);
        assert!(matches!(tokens[0].kind(), TokenKind::Identifier(name) if name == "self"));
    }
}
