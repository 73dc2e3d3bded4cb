// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Canonical printing of the AST back to Minnow source.
//!
//! The printer produces one fixed, canonical spelling: four-space
//! indentation, one statement per line, no redundant parentheses beyond the
//! grouping nodes the parser recorded. Printing a parsed program and parsing
//! the output again yields a structurally identical tree, which the
//! round-trip tests lean on (`unparse ∘ parse` is idempotent on its own
//! output).
//!
//! Block-bodied anonymous functions print with their indented body and
//! therefore only re-parse where layout is live (statement position or an
//! assignment right-hand side); the canonical test corpus stays within that
//! subset.

use std::fmt::Write;

use crate::ast::{
    Expression, ForStep, FunctionStmt, LambdaBody, LiteralValue, Program, Statement, UnaryOp,
};

/// Renders a program as canonical Minnow source, ending with a newline.
#[must_use]
pub fn unparse(program: &Program) -> String {
    let mut printer = Unparser::new();
    for statement in &program.statements {
        printer.statement(statement);
    }
    printer.out
}

struct Unparser {
    out: String,
    indent: usize,
}

impl Unparser {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn block(&mut self, body: &[Statement]) {
        self.indent += 1;
        if body.is_empty() {
            self.write_indent();
            self.out.push_str("pass\n");
        } else {
            for statement in body {
                self.statement(statement);
            }
        }
        self.indent -= 1;
    }

    fn statement(&mut self, statement: &Statement) {
        self.write_indent();
        match statement {
            Statement::Variable(var) => {
                if var.is_global {
                    self.out.push_str("global ");
                }
                let _ = write!(self.out, "{} = ", var.name.name);
                self.expression(&var.value);
                self.out.push('\n');
            }
            Statement::Assign(assign) => {
                self.expression(&assign.target);
                let _ = write!(self.out, " {} ", assign.op.symbol());
                self.expression(&assign.value);
                self.out.push('\n');
            }
            Statement::Function(func) => self.function(func),
            Statement::Class(class) => {
                if class.is_global {
                    self.out.push_str("global ");
                }
                let _ = write!(self.out, "class {}", class.name.name);
                if let Some(parent) = &class.parent {
                    let _ = write!(self.out, " implements {}", parent.name);
                }
                self.out.push_str(":\n");
                self.indent += 1;
                if class.methods.is_empty() {
                    self.write_indent();
                    self.out.push_str("pass\n");
                } else {
                    for method in &class.methods {
                        self.write_indent();
                        self.function(method);
                    }
                }
                self.indent -= 1;
            }
            Statement::If(stmt) => {
                for (i, branch) in stmt.branches.iter().enumerate() {
                    if i > 0 {
                        self.write_indent();
                    }
                    self.out
                        .push_str(if i == 0 { "if " } else { "elif " });
                    self.expression(&branch.condition);
                    self.out.push_str(":\n");
                    self.block(&branch.body);
                }
                if let Some(else_body) = &stmt.else_body {
                    self.write_indent();
                    self.out.push_str("else:\n");
                    self.block(else_body);
                }
            }
            Statement::While(stmt) => {
                self.out.push_str("while ");
                self.expression(&stmt.condition);
                self.out.push_str(":\n");
                self.block(&stmt.body);
            }
            Statement::For(stmt) => {
                self.out.push_str("for ");
                if stmt.init_is_global {
                    self.out.push_str("global ");
                }
                let _ = write!(self.out, "{} = ", stmt.init_name.name);
                self.expression(&stmt.init_value);
                self.out.push_str(", ");
                self.expression(&stmt.condition);
                self.out.push_str(", ");
                match &stmt.step {
                    ForStep::Assign { target, op, value } => {
                        self.expression(target);
                        let _ = write!(self.out, " {} ", op.symbol());
                        self.expression(value);
                    }
                    ForStep::Expr(expr) => self.expression(expr),
                }
                self.out.push_str(":\n");
                self.block(&stmt.body);
            }
            Statement::Return(stmt) => {
                self.out.push_str("return");
                if let Some(value) = &stmt.value {
                    self.out.push(' ');
                    self.expression(value);
                }
                self.out.push('\n');
            }
            Statement::Break(_) => self.out.push_str("break\n"),
            Statement::Pass(_) => self.out.push_str("pass\n"),
            Statement::Expression(stmt) => {
                self.expression(&stmt.expression);
                self.out.push('\n');
            }
        }
    }

    /// Prints a `def` head and body. The caller has already written any
    /// indentation.
    fn function(&mut self, func: &FunctionStmt) {
        if func.is_global {
            self.out.push_str("global ");
        }
        let _ = write!(self.out, "def {}(", func.name.name);
        self.params(&func.params);
        self.out.push_str("):\n");
        self.block(&func.body);
    }

    fn params(&mut self, params: &[crate::ast::Identifier]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&param.name);
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Literal(lit) => self.literal(&lit.value),
            Expression::Variable(id) => self.out.push_str(&id.name),
            Expression::SelfRef(_) => self.out.push_str("self"),
            Expression::Binary {
                left, op, right, ..
            } => {
                self.expression(left);
                let _ = write!(self.out, " {} ", op.symbol());
                self.expression(right);
            }
            Expression::Logical {
                left, op, right, ..
            } => {
                self.expression(left);
                let _ = write!(self.out, " {} ", op.symbol());
                self.expression(right);
            }
            Expression::Unary { op, operand, .. } => {
                match op {
                    UnaryOp::Not => self.out.push_str("not "),
                    UnaryOp::Neg => self.out.push('-'),
                }
                self.expression(operand);
            }
            Expression::Call { callee, args, .. } => {
                self.expression(callee);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expression(arg);
                }
                self.out.push(')');
            }
            Expression::Member { object, name, .. } => {
                self.expression(object);
                let _ = write!(self.out, ".{}", name.name);
            }
            Expression::Index { object, index, .. } => {
                self.expression(object);
                self.out.push('[');
                self.expression(index);
                self.out.push(']');
            }
            Expression::Grouping { inner, .. } => {
                self.out.push('(');
                self.expression(inner);
                self.out.push(')');
            }
            Expression::ObjectLiteral { entries, .. } => {
                self.out.push('{');
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    let _ = write!(self.out, "{} = ", name.name);
                    self.expression(value);
                }
                self.out.push('}');
            }
            Expression::ListLiteral { elements, .. } => {
                self.out.push('{');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expression(element);
                }
                self.out.push('}');
            }
            Expression::Lambda { params, body, .. } => match body {
                LambdaBody::Expr(value) => {
                    self.out.push_str("lambda");
                    if !params.is_empty() {
                        self.out.push(' ');
                        self.params(params);
                    }
                    self.out.push_str(": ");
                    self.expression(value);
                }
                LambdaBody::Block(statements) => {
                    self.out.push_str("def (");
                    self.params(params);
                    self.out.push_str("):\n");
                    self.block(statements);
                    // The block printed its own trailing newline; the
                    // statement wrapper adds nothing further.
                    if self.out.ends_with('\n') {
                        self.out.pop();
                    }
                }
            },
            Expression::Error(_) => self.out.push_str("pass"),
        }
    }

    fn literal(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::Number(text) => self.out.push_str(text),
            LiteralValue::Str { value, triple } => {
                if *triple {
                    let _ = write!(self.out, "\"\"\"{value}\"\"\"");
                } else {
                    self.out.push('"');
                    for c in value.chars() {
                        match c {
                            '"' => self.out.push_str("\\\""),
                            '\\' => self.out.push_str("\\\\"),
                            '\n' => self.out.push_str("\\n"),
                            '\r' => self.out.push_str("\\r"),
                            '\t' => self.out.push_str("\\t"),
                            '\0' => self.out.push_str("\\0"),
                            c => self.out.push(c),
                        }
                    }
                    self.out.push('"');
                }
            }
            LiteralValue::True => self.out.push_str("True"),
            LiteralValue::False => self.out.push_str("False"),
            LiteralValue::None => self.out.push_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{lex, parse};

    fn parse_program(source: &str) -> Program {
        let (tokens, lex_errors) = lex(source);
        assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
        let (program, diagnostics) = parse(tokens);
        assert!(diagnostics.is_empty(), "parse errors: {diagnostics:?}");
        program
    }

    /// Canonical sources print back exactly as written.
    #[test]
    fn canonical_sources_are_fixed_points() {
        let sources = [
            "x = 10\nprint(x)\n",
            "global score = 0\nscore += 1\n",
            "if x == 1:\n    y = 2\nelif x == 2:\n    y = 3\nelse:\n    y = 4\n",
            "while x < 3:\n    x += 1\n",
            "for i = 0, i < 3, i += 1:\n    print(i)\n",
            "for global i = 0, i < 10, i += 2:\n    pass\n",
            "def add(a, b):\n    return a + b\n",
            "class Dog implements Animal:\n    def init(name):\n        self.name = name\n    def speak():\n        print(self.name)\n",
            "class Empty:\n    pass\n",
            "a = {1, 2, 3}\nb = {x = 1, y = 2}\nc = {}\n",
            "f = lambda a, b: a + b\n",
            "x = (1 + 2) * 3\n",
            "x = not a == b\n",
            "x = -y\n",
            "x = a.b(1)[2]\n",
            "s = \"hi\\nthere\"\n",
            "x = 2 ** 3 ** 4\n",
            "x = True and False or None\n",
            "return\n",
            "break\n",
        ];
        for source in sources {
            let printed = unparse(&parse_program(source));
            assert_eq!(printed, source, "not a fixed point");
        }
    }

    /// Printing a parsed tree and re-parsing the output reaches a fixed
    /// point after one round for non-canonical spellings too.
    #[test]
    fn unparse_parse_is_idempotent() {
        let sources = [
            "x   =   10\nprint( x )\n",
            "if a:\n        b = 1\n",
            "f = def (a):\n    return a\n",
            "\"\"\"docstring\"\"\"\nx = 1\n",
        ];
        for source in sources {
            let once = unparse(&parse_program(source));
            let twice = unparse(&parse_program(&once));
            assert_eq!(once, twice, "printing did not stabilize for {source:?}");
        }
    }

    #[test]
    fn empty_bodies_print_pass() {
        // A recovered empty body still prints as parseable source.
        let program = parse_program("def f():\n    pass\n");
        assert_eq!(unparse(&program), "def f():\n    pass\n");
    }

    #[test]
    fn triple_quoted_strings_keep_their_spelling() {
        let program = parse_program("\"\"\"one\ntwo\"\"\"\n");
        assert_eq!(unparse(&program), "\"\"\"one\ntwo\"\"\"\n");
    }
}
