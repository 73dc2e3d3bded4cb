// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Binary and logical operators use Pratt binding powers from the table in
//! the parent module; postfix chains (call, member, index) bind tighter than
//! any operator; primaries cover literals, identifiers, groupings, brace
//! literals, and both anonymous-function spellings.
//!
//! # Brace disambiguation
//!
//! `{…}` spells both list and object literals. The choice is made with a
//! single balanced lookahead over the token stream (no backtracking):
//!
//! 1. `{}` is an empty object literal.
//! 2. If `IDENT =` occurs at the top level of the braces, it is an object
//!    literal.
//! 3. Otherwise it is a list literal.
//!
//! Finding an entry of the other shape while parsing is the hard error
//! `Cannot mix list and object entries`.

use ecow::eco_format;

use crate::ast::{
    BinaryOp, Expression, Identifier, LiteralExpr, LiteralValue, LogicalOp, UnaryOp,
};
use crate::source_analysis::{Span, Token, TokenKind};

use super::{binding_power, Diagnostic, Parser, NEG_BP, NOT_BP};

/// Maps an infix operator token to its non-logical [`BinaryOp`].
fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::StarStar => BinaryOp::Pow,
        TokenKind::EqualEqual => BinaryOp::Eq,
        TokenKind::BangEqual => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parses a full expression.
    pub(super) fn parse_expression(&mut self) -> Expression {
        self.parse_binary_expr(0)
    }

    /// Pratt loop: folds infix operators with at least `min_bp` left
    /// binding power.
    fn parse_binary_expr(&mut self, min_bp: u8) -> Expression {
        let mut left = self.parse_prefix();

        loop {
            let Some(bp) = binding_power(self.current_kind()) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let op_token = self.advance();
            let right = self.parse_binary_expr(bp.right);
            let span = left.span().through(right.span());

            left = match op_token.kind() {
                TokenKind::And => Expression::Logical {
                    left: Box::new(left),
                    op: LogicalOp::And,
                    right: Box::new(right),
                    span,
                },
                TokenKind::Or => Expression::Logical {
                    left: Box::new(left),
                    op: LogicalOp::Or,
                    right: Box::new(right),
                    span,
                },
                kind => match binary_op(kind) {
                    Some(op) => Expression::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                        span,
                    },
                    // binding_power and binary_op cover the same kinds.
                    None => Expression::Error(span),
                },
            };
        }

        left
    }

    /// Parses the prefix operators `not` and unary `-`.
    fn parse_prefix(&mut self) -> Expression {
        match self.current_kind() {
            TokenKind::Not => {
                let start = self.current_span();
                self.advance();
                let operand = self.parse_binary_expr(NOT_BP);
                Expression::Unary {
                    span: start.through(operand.span()),
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Minus => {
                let start = self.current_span();
                self.advance();
                let operand = self.parse_binary_expr(NEG_BP);
                Expression::Unary {
                    span: start.through(operand.span()),
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                }
            }
            _ => self.parse_postfix(),
        }
    }

    /// Parses a primary followed by any chain of calls, member accesses,
    /// and index accesses.
    fn parse_postfix(&mut self) -> Expression {
        let mut expr = self.parse_primary();

        loop {
            match self.current_kind() {
                TokenKind::LeftParen => {
                    let open = self.current_span();
                    self.advance();
                    let args = self.parse_call_args(open);
                    expr = Expression::Call {
                        span: expr.span().through(self.previous_span()),
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let Some(name) = self.expect_identifier("Expected property name after '.'")
                    else {
                        return Expression::Error(expr.span().through(self.current_span()));
                    };
                    expr = Expression::Member {
                        span: expr.span().through(name.span),
                        object: Box::new(expr),
                        name,
                    };
                }
                TokenKind::LeftBracket => {
                    let open = self.current_span();
                    self.advance();
                    self.skip_layout();
                    let index = self.parse_expression();
                    self.skip_layout();
                    if !self.match_token(&TokenKind::RightBracket) {
                        self.diagnostics.push(
                            Diagnostic::error("Missing closing ']'", open)
                                .with_hint("the '[' opened here is never closed"),
                        );
                    }
                    expr = Expression::Index {
                        span: expr.span().through(self.previous_span()),
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }

        expr
    }

    /// Parses call arguments after the opening parenthesis.
    fn parse_call_args(&mut self, open: Span) -> Vec<Expression> {
        let mut args = Vec::new();
        self.skip_layout();
        if self.match_token(&TokenKind::RightParen) {
            return args;
        }

        loop {
            args.push(self.parse_expression());
            self.skip_layout();
            if self.match_token(&TokenKind::Comma) {
                self.skip_layout();
                if self.check(&TokenKind::RightParen) {
                    break;
                }
                continue;
            }
            break;
        }

        if !self.match_token(&TokenKind::RightParen) {
            self.diagnostics.push(
                Diagnostic::error("Missing closing ')'", open)
                    .with_hint("the '(' opened here is never closed"),
            );
        }
        args
    }

    /// Parses parameter names after the opening parenthesis of a `def` or
    /// anonymous function head.
    pub(super) fn parse_param_list(&mut self, open: Span) -> Vec<Identifier> {
        let mut params = Vec::new();
        self.skip_layout();
        if self.match_token(&TokenKind::RightParen) {
            return params;
        }

        loop {
            let Some(param) = self.expect_identifier("Expected parameter name") else {
                break;
            };
            params.push(param);
            self.skip_layout();
            if self.match_token(&TokenKind::Comma) {
                self.skip_layout();
                continue;
            }
            break;
        }

        if !self.match_token(&TokenKind::RightParen) {
            self.diagnostics.push(
                Diagnostic::error("Missing closing ')'", open)
                    .with_hint("the '(' opened here is never closed"),
            );
        }
        params
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Expression {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Number(text) => {
                self.advance();
                Expression::Literal(LiteralExpr {
                    value: LiteralValue::Number(text),
                    span,
                })
            }
            TokenKind::Str { value, triple } => {
                self.advance();
                Expression::Literal(LiteralExpr {
                    value: LiteralValue::Str { value, triple },
                    span,
                })
            }
            TokenKind::True => {
                self.advance();
                Expression::Literal(LiteralExpr {
                    value: LiteralValue::True,
                    span,
                })
            }
            TokenKind::False => {
                self.advance();
                Expression::Literal(LiteralExpr {
                    value: LiteralValue::False,
                    span,
                })
            }
            TokenKind::None => {
                self.advance();
                Expression::Literal(LiteralExpr {
                    value: LiteralValue::None,
                    span,
                })
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Expression::Variable(Identifier::new(name, span))
            }
            TokenKind::SelfKw => {
                self.advance();
                Expression::SelfRef(span)
            }
            TokenKind::LeftParen => {
                self.advance();
                self.skip_layout();
                let inner = self.parse_expression();
                self.skip_layout();
                if !self.match_token(&TokenKind::RightParen) {
                    self.diagnostics.push(
                        Diagnostic::error("Missing closing ')'", span)
                            .with_hint("the '(' opened here is never closed"),
                    );
                }
                Expression::Grouping {
                    span: span.through(self.previous_span()),
                    inner: Box::new(inner),
                }
            }
            TokenKind::LeftBrace => self.parse_brace_literal(),
            TokenKind::Lambda => self.parse_lambda(span),
            TokenKind::Def => self.parse_anonymous_function(span),
            other => {
                let message = if other.is_layout() {
                    eco_format!("Unexpected {}", other.describe())
                } else {
                    eco_format!("Unexpected token '{}'", other.describe())
                };
                self.error(message);
                // Layout tokens are left for the statement machinery.
                if !self.current_kind().is_layout() {
                    self.advance();
                }
                Expression::Error(span)
            }
        }
    }

    /// Parses `lambda a, b: expr`.
    fn parse_lambda(&mut self, start: Span) -> Expression {
        self.advance(); // lambda
        let mut params = Vec::new();
        if matches!(self.current_kind(), TokenKind::Identifier(_)) {
            loop {
                let Some(param) = self.expect_identifier("Expected parameter name") else {
                    break;
                };
                params.push(param);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::Colon, "Expected ':' after lambda parameters");
        let body = self.parse_expression();
        Expression::Lambda {
            span: start.through(body.span()),
            params,
            body: crate::ast::LambdaBody::Expr(Box::new(body)),
        }
    }

    /// Parses `def (a, b):` followed by an indented block, in expression
    /// position.
    fn parse_anonymous_function(&mut self, start: Span) -> Expression {
        self.advance(); // def
        let open = self.current_span();
        if self.expect(&TokenKind::LeftParen, "Expected '(' after 'def'").is_none() {
            return Expression::Error(start);
        }
        let params = self.parse_param_list(open);
        let body = self.parse_block("anonymous function parameters");
        Expression::Lambda {
            span: start.through(self.previous_span()),
            params,
            body: crate::ast::LambdaBody::Block(body),
        }
    }

    // ========================================================================
    // Brace Literals
    // ========================================================================

    /// Parses `{…}` as an object or list literal.
    fn parse_brace_literal(&mut self) -> Expression {
        let open = self.current_span();
        self.advance(); // {
        self.skip_layout();

        if self.check(&TokenKind::RightBrace) {
            let close = self.advance();
            return Expression::ObjectLiteral {
                entries: Vec::new(),
                span: open.through(close.span()),
            };
        }

        if self.braces_contain_named_entry() {
            self.parse_object_literal(open)
        } else {
            self.parse_list_literal(open)
        }
    }

    /// Balanced lookahead: does `IDENT =` occur at the top level of the
    /// braces whose opening token was just consumed?
    fn braces_contain_named_entry(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.current;

        while let Some(token) = self.tokens.get(i) {
            match token.kind() {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::RightBrace => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::Eof => return false,
                TokenKind::Identifier(_) if depth == 0 => {
                    let mut j = i + 1;
                    while self
                        .tokens
                        .get(j)
                        .is_some_and(|t| t.kind().is_layout() && !t.kind().is_eof())
                    {
                        j += 1;
                    }
                    if matches!(self.tokens.get(j).map(Token::kind), Some(TokenKind::Equal)) {
                        return true;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        false
    }

    /// Parses object entries `name = expr, …` up to the closing brace.
    fn parse_object_literal(&mut self, open: Span) -> Expression {
        let mut entries = Vec::new();

        loop {
            self.skip_layout();
            if self.check(&TokenKind::RightBrace) {
                break;
            }

            let name = if let TokenKind::Identifier(name) = self.current_kind() {
                let id = Identifier::new(name.clone(), self.current_span());
                self.advance();
                id
            } else {
                self.diagnostics.push(Diagnostic::error(
                    "Cannot mix list and object entries",
                    self.current_span(),
                ));
                return self.skip_brace_remainder(open);
            };

            if !self.match_token(&TokenKind::Equal) {
                self.diagnostics.push(Diagnostic::error(
                    "Cannot mix list and object entries",
                    name.span,
                ));
                return self.skip_brace_remainder(open);
            }

            self.skip_layout();
            let value = self.parse_expression();
            entries.push((name, value));
            self.skip_layout();
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        if !self.match_token(&TokenKind::RightBrace) {
            self.diagnostics.push(
                Diagnostic::error("Missing closing '}'", open)
                    .with_hint("the '{' opened here is never closed"),
            );
        }
        Expression::ObjectLiteral {
            entries,
            span: open.through(self.previous_span()),
        }
    }

    /// Parses list elements `expr, …` up to the closing brace.
    fn parse_list_literal(&mut self, open: Span) -> Expression {
        let mut elements = Vec::new();

        loop {
            self.skip_layout();
            if self.check(&TokenKind::RightBrace) {
                break;
            }
            elements.push(self.parse_expression());
            self.skip_layout();
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        if !self.match_token(&TokenKind::RightBrace) {
            self.diagnostics.push(
                Diagnostic::error("Missing closing '}'", open)
                    .with_hint("the '{' opened here is never closed"),
            );
        }
        Expression::ListLiteral {
            elements,
            span: open.through(self.previous_span()),
        }
    }

    /// Discards tokens up to and including the brace that closes `open`,
    /// returning a recovery placeholder.
    fn skip_brace_remainder(&mut self, open: Span) -> Expression {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightBrace => {
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
        Expression::Error(open.through(self.previous_span()))
    }
}
