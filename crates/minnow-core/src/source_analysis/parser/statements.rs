// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.
//!
//! Simple statements end at a `Newline`; compound statements own an indented
//! block. Every parse method reports diagnostics instead of failing, and a
//! method that cannot produce a node synchronizes to the next statement
//! boundary and returns `None`.

use ecow::eco_format;

use crate::ast::{
    AssignOp, AssignStmt, ClassStmt, Expression, ExpressionStmt, ForStep, ForStmt, FunctionStmt,
    Identifier, IfBranch, IfStmt, Program, ReturnStmt, Statement, VariableStmt, WhileStmt,
};
use crate::source_analysis::{Span, TokenKind};

use super::{Diagnostic, Parser};

/// Maps an assignment-operator token to its [`AssignOp`], if it is one.
pub(super) fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Equal => AssignOp::Assign,
        TokenKind::PlusEqual => AssignOp::Add,
        TokenKind::MinusEqual => AssignOp::Sub,
        TokenKind::StarEqual => AssignOp::Mul,
        TokenKind::SlashEqual => AssignOp::Div,
        TokenKind::PercentEqual => AssignOp::Rem,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parses the whole token stream into a [`Program`].
    pub(super) fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            match self.current_kind() {
                TokenKind::Indent => {
                    self.error("Unexpected indent");
                    self.advance();
                }
                TokenKind::Dedent => {
                    // Stray dedent after recovery; drop it and keep going.
                    self.advance();
                }
                _ => {
                    if let Some(stmt) = self.parse_statement() {
                        statements.push(stmt);
                    }
                }
            }
        }

        let end = self.tokens.last().map_or(0, |t| t.span().end());
        Program::new(statements, Span::new(0, end))
    }

    /// Parses a single statement, or returns `None` after recovery.
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        match self.current_kind() {
            TokenKind::Global => self.parse_global_declaration(),
            TokenKind::Def if matches!(self.peek_kind(), Some(TokenKind::Identifier(_))) => {
                self.parse_function().map(Statement::Function)
            }
            TokenKind::Class => self.parse_class(false).map(Statement::Class),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let span = self.current_span();
                self.advance();
                self.end_of_statement();
                Some(Statement::Break(span))
            }
            TokenKind::Pass => {
                let span = self.current_span();
                self.advance();
                self.end_of_statement();
                Some(Statement::Pass(span))
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses `global x = …`, `global def …`, or `global class …`.
    fn parse_global_declaration(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // global

        match self.current_kind() {
            TokenKind::Def if matches!(self.peek_kind(), Some(TokenKind::Identifier(_))) => {
                let mut func = self.parse_function()?;
                func.is_global = true;
                func.span = start.through(func.span);
                Some(Statement::Function(func))
            }
            TokenKind::Class => {
                let mut class = self.parse_class(true)?;
                class.span = start.through(class.span);
                Some(Statement::Class(class))
            }
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier("Expected variable name after 'global'")?;
                if self
                    .expect(&TokenKind::Equal, "Expected '=' after variable name")
                    .is_none()
                {
                    self.synchronize();
                    return None;
                }
                let value = self.parse_expression();
                let span = start.through(value.span());
                self.end_of_statement();
                Some(Statement::Variable(VariableStmt {
                    name,
                    value,
                    is_global: true,
                    span,
                }))
            }
            _ => {
                self.error("Expected a declaration after 'global'");
                self.synchronize();
                None
            }
        }
    }

    /// Parses `def name(params):` with its indented body.
    pub(super) fn parse_function(&mut self) -> Option<FunctionStmt> {
        let start = self.current_span();
        self.advance(); // def
        let name = self.expect_identifier("Expected function name after 'def'");
        let Some(name) = name else {
            self.synchronize();
            return None;
        };

        let open = self.current_span();
        if self.expect(&TokenKind::LeftParen, "Expected '(' after function name").is_none() {
            self.synchronize();
            return None;
        }
        let params = self.parse_param_list(open);
        let body = self.parse_block("function parameters");
        let span = start.through(self.previous_span());

        Some(FunctionStmt {
            name,
            params,
            body,
            is_global: false,
            span,
        })
    }

    /// Parses `class Name [implements Parent]:` with its method members.
    fn parse_class(&mut self, is_global: bool) -> Option<ClassStmt> {
        let start = self.current_span();
        self.advance(); // class
        let Some(name) = self.expect_identifier("Expected class name after 'class'") else {
            self.synchronize();
            return None;
        };

        let parent = if self.match_token(&TokenKind::Implements) {
            self.expect_identifier("Expected parent class name after 'implements'")
        } else {
            None
        };

        let mut methods: Vec<FunctionStmt> = Vec::new();

        if self.expect(&TokenKind::Colon, "Expected ':' after class head").is_none() {
            self.synchronize();
        } else if self.expect(&TokenKind::Newline, "Expected a new line after ':'").is_none() {
            self.synchronize();
        } else if self.expect(&TokenKind::Indent, "Expected an indented class body").is_some() {
            loop {
                self.skip_newlines();
                match self.current_kind() {
                    TokenKind::Dedent | TokenKind::Eof => break,
                    TokenKind::Indent => {
                        self.error("Unexpected indent");
                        self.advance();
                    }
                    TokenKind::Pass => {
                        self.advance();
                        self.end_of_statement();
                    }
                    TokenKind::Def => {
                        if let Some(method) = self.parse_function() {
                            if method.name.name == "init"
                                && methods.iter().any(|m| m.name.name == "init")
                            {
                                self.diagnostics.push(Diagnostic::error(
                                    "Duplicate 'init' method",
                                    method.name.span,
                                ));
                            }
                            methods.push(method);
                        }
                    }
                    _ => {
                        self.error("Expected a method definition or 'pass' in class body");
                        self.synchronize();
                    }
                }
            }
            self.match_token(&TokenKind::Dedent);
        }

        let span = start.through(self.previous_span());
        Some(ClassStmt {
            name,
            parent,
            methods,
            is_global,
            span,
        })
    }

    /// Parses an `if`/`elif`/`else` chain.
    fn parse_if(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // if
        let condition = self.parse_expression();
        let body = self.parse_block("'if' condition");
        let mut branches = vec![IfBranch { condition, body }];

        while self.check(&TokenKind::Elif) {
            self.advance();
            let condition = self.parse_expression();
            let body = self.parse_block("'elif' condition");
            branches.push(IfBranch { condition, body });
        }

        let else_body = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_block("'else'"))
        } else {
            None
        };

        let span = start.through(self.previous_span());
        Some(Statement::If(IfStmt {
            branches,
            else_body,
            span,
        }))
    }

    /// Parses a `while` loop.
    fn parse_while(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // while
        let condition = self.parse_expression();
        let body = self.parse_block("'while' condition");
        let span = start.through(self.previous_span());
        Some(Statement::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    /// Parses `for [global] i = init, cond, step:` with its body.
    fn parse_for(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // for
        let init_is_global = self.match_token(&TokenKind::Global);
        let Some(init_name) = self.expect_identifier("Expected loop variable name") else {
            self.synchronize();
            return None;
        };
        self.expect(&TokenKind::Equal, "Expected '=' after loop variable");
        let init_value = self.parse_expression();
        self.expect(&TokenKind::Comma, "Expected ',' after 'for' initializer");
        let condition = self.parse_expression();
        self.expect(&TokenKind::Comma, "Expected ',' after 'for' condition");
        let step = self.parse_for_step();
        let body = self.parse_block("'for' head");
        let span = start.through(self.previous_span());

        Some(Statement::For(ForStmt {
            init_name,
            init_value,
            init_is_global,
            condition,
            step,
            body,
            span,
        }))
    }

    /// Parses the step clause of a `for` head: an assignment or a bare
    /// expression.
    fn parse_for_step(&mut self) -> ForStep {
        let target = self.parse_expression();
        let Some(op) = assign_op(self.current_kind()) else {
            return ForStep::Expr(target);
        };
        self.advance();
        let value = self.parse_expression();
        if !target.is_assign_target() {
            self.diagnostics
                .push(Diagnostic::error("Invalid assignment target", target.span()));
        }
        ForStep::Assign { target, op, value }
    }

    /// Parses `return [expr]`.
    fn parse_return(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // return
        let value = if matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expression())
        };
        let span = start.through(self.previous_span());
        self.end_of_statement();
        Some(Statement::Return(ReturnStmt { value, span }))
    }

    /// Parses an expression statement, which may turn out to be an
    /// assignment once the first expression has been read.
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression();
        if expr.is_error() {
            self.synchronize();
            return None;
        }

        if let Some(op) = assign_op(self.current_kind()) {
            self.advance();
            let value = self.parse_expression();
            let span = expr.span().through(value.span());
            if !expr.is_assign_target() {
                self.diagnostics
                    .push(Diagnostic::error("Invalid assignment target", expr.span()));
            }
            let stmt = match (op, expr) {
                (AssignOp::Assign, Expression::Variable(name)) => {
                    Statement::Variable(VariableStmt {
                        name,
                        value,
                        is_global: false,
                        span,
                    })
                }
                (op, target) => Statement::Assign(AssignStmt {
                    target,
                    op,
                    value,
                    span,
                }),
            };
            self.end_of_statement();
            return Some(stmt);
        }

        self.end_of_statement();
        Some(Statement::Expression(ExpressionStmt {
            span: expr.span(),
            expression: expr,
        }))
    }

    /// Parses `: Newline Indent <statements> Dedent` after a compound head.
    ///
    /// On a malformed head the parser reports, synchronizes, and returns an
    /// empty body.
    pub(super) fn parse_block(&mut self, context: &str) -> Vec<Statement> {
        if self
            .expect(&TokenKind::Colon, &eco_format!("Expected ':' after {context}"))
            .is_none()
        {
            self.synchronize();
            return Vec::new();
        }
        if self
            .expect(&TokenKind::Newline, "Expected a new line after ':'")
            .is_none()
        {
            self.synchronize();
            return Vec::new();
        }
        if self
            .expect(&TokenKind::Indent, "Expected an indented block")
            .is_none()
        {
            return Vec::new();
        }

        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            match self.current_kind() {
                TokenKind::Dedent | TokenKind::Eof => break,
                // A stray over-indented line; consume the Indent so the
                // statement loop keeps making progress.
                TokenKind::Indent => {
                    self.error("Unexpected indent");
                    self.advance();
                }
                _ => {
                    if let Some(stmt) = self.parse_statement() {
                        body.push(stmt);
                    }
                }
            }
        }
        self.match_token(&TokenKind::Dedent);
        body
    }

    /// Consumes the end of a simple statement.
    ///
    /// Accepts a `Newline` (consumed), a `Dedent`/`Eof` (left for the block
    /// parser), or nothing at all when the statement ended with a
    /// block-bodied expression that swallowed its own `Dedent`.
    pub(super) fn end_of_statement(&mut self) {
        match self.current_kind() {
            TokenKind::Newline => {
                self.advance();
            }
            TokenKind::Dedent | TokenKind::Eof => {}
            _ if self.previous_was_dedent() => {}
            other => {
                let message = eco_format!("Expected end of line, found {}", other.describe());
                self.error(message);
                self.synchronize();
            }
        }
    }

    /// Returns the span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        if self.current == 0 {
            self.current_span()
        } else {
            self.tokens[self.current - 1].span()
        }
    }

    /// Consumes an identifier, reporting `message` if the current token is
    /// something else.
    pub(super) fn expect_identifier(&mut self, message: &str) -> Option<Identifier> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let id = Identifier::new(name.clone(), self.current_span());
            self.advance();
            Some(id)
        } else {
            self.error(message);
            None
        }
    }
}
