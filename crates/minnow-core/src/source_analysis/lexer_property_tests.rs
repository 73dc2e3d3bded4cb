// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Minnow lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** - arbitrary string input always produces tokens
//! 2. **Eof is always last** - the stream ends with exactly one `Eof`
//! 3. **Token spans within input** - all spans satisfy `end <= input.len()`
//! 4. **Indent/Dedent balance** - every `Indent` is matched by a `Dedent`
//!    before `Eof`
//! 5. **Lexer is deterministic** - same input, same tokens
//! 6. **Valid fragments produce no errors** - known-valid inputs lex cleanly
//! 7. **Layout tokens are empty, others are not** - span length rules

use proptest::prelude::*;

use super::lexer::lex;
use super::token::{Token, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    "\"hello\"",
    "'hello'",
    "True",
    "False",
    "None",
    "x",
    "my_var",
    "self",
    "def",
    "lambda",
    "implements",
    "+",
    "-",
    "*",
    "/",
    "%",
    "**",
    "==",
    "!=",
    "<=",
    ">=",
    "+=",
    "-=",
    "(",
    ")",
    "{",
    "}",
    "[",
    "]",
    ",",
    ":",
    ".",
];

/// Multi-token valid lines that should lex cleanly.
const VALID_LINES: &[&str] = &[
    "x = 1 + 2\n",
    "print(x)\n",
    "sprite.x = 100\n",
    "a = {1, 2, 3}\n",
    "b = {x = 1}\n",
    "if x == 1:\n    y = 2\n",
    "while True:\n    break\n",
    "for i = 0, i < 3, i += 1:\n    pass\n",
    "def f(a, b):\n    return a ** b\n",
    "class A implements B:\n    pass\n",
    "s = \"a\\tb\\n\"\n",
    "# a comment\n",
    "\"\"\"docstring\"\"\"\n",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_line() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_LINES).prop_map(std::string::ToString::to_string)
}

fn kinds(tokens: &[Token]) -> Vec<&TokenKind> {
    tokens.iter().map(Token::kind).collect()
}

/// Default is 512 cases; override via `PROPTEST_CASES` env var.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _ = lex(&input);
    }

    /// Property 2: The stream always ends with exactly one Eof.
    #[test]
    fn eof_is_always_last(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input);
        prop_assert!(matches!(tokens.last().map(Token::kind), Some(TokenKind::Eof)));
        let eof_count = tokens
            .iter()
            .filter(|t| t.kind().is_eof())
            .count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Property 3: All token spans are within input bounds.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in &tokens {
            prop_assert!(
                token.span().end() <= input_len,
                "Token {:?} span end {} exceeds input length {}",
                token.kind(),
                token.span().end(),
                input_len,
            );
        }
    }

    /// Property 4: Indent and Dedent tokens balance to zero, and the
    /// running balance never goes negative.
    #[test]
    fn indent_dedent_balance(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input);
        let mut depth: i64 = 0;
        for token in &tokens {
            match token.kind() {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0, "dedent without matching indent");
        }
        prop_assert_eq!(depth, 0, "unbalanced indentation at Eof");
    }

    /// Property 4b: Balance also holds for structured multi-line programs.
    #[test]
    fn indent_dedent_balance_on_valid_lines(lines in prop::collection::vec(valid_line(), 1..6)) {
        let input: String = lines.concat();
        let (tokens, errors) = lex(&input);
        prop_assert!(errors.is_empty(), "errors on valid input: {errors:?}");
        let mut depth: i64 = 0;
        for token in &tokens {
            match token.kind() {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => depth -= 1,
                _ => {}
            }
        }
        prop_assert_eq!(depth, 0);
    }

    /// Property 5: Lexing is deterministic.
    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,500}") {
        let (first_tokens, first_errors) = lex(&input);
        let (second_tokens, second_errors) = lex(&input);
        prop_assert_eq!(kinds(&first_tokens), kinds(&second_tokens));
        prop_assert_eq!(first_errors, second_errors);
    }

    /// Property 6: Known-valid fragments lex without errors.
    #[test]
    fn valid_fragments_lex_cleanly(fragment in valid_single_token()) {
        let (_, errors) = lex(&fragment);
        prop_assert!(errors.is_empty(), "errors for {fragment:?}: {errors:?}");
    }

    /// Property 7: Layout tokens carry empty spans; every other token spans
    /// at least one byte.
    #[test]
    fn span_length_rules(lines in prop::collection::vec(valid_line(), 1..6)) {
        let input: String = lines.concat();
        let (tokens, _) = lex(&input);
        for token in &tokens {
            if token.kind().is_layout() {
                prop_assert!(token.span().is_empty(), "{:?}", token);
            } else {
                prop_assert!(token.span().len() >= 1, "{:?}", token);
            }
        }
    }
}
