// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! JavaScript code generation for Minnow.
//!
//! This module walks the AST once, validating names, arities, and
//! literal-deducible argument types against the host's registration table
//! while emitting the JavaScript translation. Validation and emission share
//! the walk: every semantic error is recorded and emission continues with a
//! best-effort placeholder, so one compile reports as many independent
//! problems as possible.
//!
//! # Scope model
//!
//! A [`ScopeStack`] of declaration frames tracks which names are visible.
//! An assignment to a name no frame knows introduces a local (`var x = …`);
//! an assignment to a visible name re-assigns it. `global x = …` routes the
//! name through the host-provided `globals` object instead. Unresolved
//! reads consult the registration table before becoming
//! `Undefined variable` errors.
//!
//! # Statement shape
//!
//! Every simple statement emits with a trailing `;`; blocks emit braced,
//! two-space indented. The `globals` object is never declared here: the
//! host runtime provides it.

pub mod document;
mod error;
mod expressions;
mod scope;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use ecow::EcoString;

use crate::ast::{
    AssignStmt, ClassStmt, Expression, ForStep, ForStmt, FunctionStmt, Identifier, IfStmt,
    LiteralValue, Program, ReturnStmt, Statement, VariableStmt, WhileStmt,
};
use crate::docvec;
use crate::registry::Registry;
use crate::source_analysis::Span;

use document::{join, line, nest, nil, Document, INDENT};
pub use error::{SemanticError, SemanticErrorKind};
pub use scope::{FrameKind, ScopeStack};

/// Generates JavaScript for a program against a registration table.
///
/// Always returns the emitted text, even when semantic errors were found;
/// the caller decides whether to surface it.
///
/// # Examples
///
/// ```
/// use minnow_core::codegen::javascript::generate;
/// use minnow_core::registry::Registry;
/// use minnow_core::source_analysis::{lex, parse};
///
/// let (tokens, _) = lex("x = 10\nprint(x)\n");
/// let (program, _) = parse(tokens);
/// let (js, errors) = generate(&program, &Registry::new());
///
/// assert!(errors.is_empty());
/// assert_eq!(js, "var x = 10;\nconsole.log(x);");
/// ```
#[must_use]
pub fn generate(program: &Program, registry: &Registry) -> (String, Vec<SemanticError>) {
    let mut generator = JsGenerator::new(registry);
    let doc = generator.program_doc(program);
    (doc.to_text(), generator.errors)
}

/// The generator state for one compilation.
pub(crate) struct JsGenerator<'a> {
    /// The host's registration table.
    pub(crate) registry: &'a Registry,
    /// The lexical scope stack.
    pub(crate) scope: ScopeStack,
    /// Names declared with `global`; reads and writes route through the
    /// host-provided `globals` object.
    pub(crate) globals: HashSet<EcoString>,
    /// Accumulated semantic errors.
    pub(crate) errors: Vec<SemanticError>,
}

impl<'a> JsGenerator<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            scope: ScopeStack::new(),
            globals: HashSet::new(),
            errors: Vec::new(),
        }
    }

    /// Records a semantic error.
    pub(crate) fn error(&mut self, kind: SemanticErrorKind, span: Span) {
        self.errors.push(SemanticError::new(kind, span));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn program_doc(&mut self, program: &Program) -> Document<'static> {
        let docs = self.statements_docs(&program.statements);
        join(docs, &line())
    }

    /// Emits each statement, dropping the ones that render to nothing
    /// (`pass`, docstrings).
    pub(crate) fn statements_docs(&mut self, statements: &[Statement]) -> Vec<Document<'static>> {
        statements
            .iter()
            .map(|stmt| self.statement_doc(stmt))
            .filter(|doc| !doc.is_nil())
            .collect()
    }

    fn statement_doc(&mut self, statement: &Statement) -> Document<'static> {
        match statement {
            Statement::Variable(var) => self.variable_doc(var),
            Statement::Function(func) => self.function_doc(func),
            Statement::Class(class) => self.class_doc(class),
            Statement::If(stmt) => self.if_doc(stmt),
            Statement::While(stmt) => self.while_doc(stmt),
            Statement::For(stmt) => self.for_doc(stmt),
            Statement::Return(stmt) => self.return_doc(stmt),
            Statement::Break(span) => self.break_doc(*span),
            Statement::Pass(_) => nil(),
            Statement::Expression(stmt) => self.expression_statement_doc(&stmt.expression),
            Statement::Assign(assign) => self.assign_doc(assign),
        }
    }

    /// `x = e`: declares a local when no enclosing frame knows the name,
    /// re-assigns otherwise. `global x = e` routes through `globals`.
    fn variable_doc(&mut self, var: &VariableStmt) -> Document<'static> {
        // The right-hand side is evaluated before the name is introduced, so
        // `x = x + 1` on an undeclared `x` reports the read.
        let value = self.expression_doc(&var.value, 0);
        let name = &var.name.name;

        let target = if var.is_global {
            self.globals.insert(name.clone());
            format!("globals.{name} = ")
        } else if self.scope.resolves(name) {
            format!("{name} = ")
        } else if self.globals.contains(name) {
            format!("globals.{name} = ")
        } else {
            self.scope.declare(name.clone());
            format!("var {name} = ")
        };

        docvec![Document::String(target), value, ";"]
    }

    /// Member/index stores and every augmented assignment.
    fn assign_doc(&mut self, assign: &AssignStmt) -> Document<'static> {
        let target = self.expression_doc(&assign.target, 0);
        let value = self.expression_doc(&assign.value, 0);
        docvec![
            target,
            Document::String(format!(" {} ", assign.op.symbol())),
            value,
            ";"
        ]
    }

    fn function_doc(&mut self, func: &FunctionStmt) -> Document<'static> {
        let name = &func.name.name;
        let params = params_text(&func.params);

        // Reserved functions: the declaration is rewritten into a
        // callback-passing call, and the name is NOT declared in scope.
        if let Some(js_name) = self.registry.reserved_function(name).cloned() {
            let body = self.function_body_doc(&func.params, &func.body, FrameKind::Function);
            return docvec![
                Document::String(format!("{js_name}(({params}) => ")),
                body,
                ");"
            ];
        }

        if func.is_global {
            self.globals.insert(name.clone());
            let body = self.function_body_doc(&func.params, &func.body, FrameKind::Function);
            docvec![
                Document::String(format!("globals.{name} = function ({params}) ")),
                body,
                ";"
            ]
        } else {
            // Declared before the body is walked so the function can recurse.
            self.scope.declare(name.clone());
            let body = self.function_body_doc(&func.params, &func.body, FrameKind::Function);
            docvec![
                Document::String(format!("function {name}({params}) ")),
                body
            ]
        }
    }

    /// Emits a braced function body in a fresh frame with the parameters
    /// declared.
    pub(crate) fn function_body_doc(
        &mut self,
        params: &[Identifier],
        body: &[Statement],
        kind: FrameKind,
    ) -> Document<'static> {
        self.scope.push(kind);
        for param in params {
            self.scope.declare(param.name.clone());
        }
        let docs = self.statements_docs(body);
        self.scope.pop();
        braced_block(docs)
    }

    fn class_doc(&mut self, class: &ClassStmt) -> Document<'static> {
        let name = &class.name.name;

        // The parent must itself be resolvable before we chain to it.
        let parent_ref = class.parent.as_ref().map(|parent| self.name_ref(parent));

        let class_ref = if class.is_global {
            self.globals.insert(name.clone());
            format!("globals.{name}")
        } else {
            self.scope.declare(name.clone());
            name.to_string()
        };

        self.scope.push(FrameKind::ClassBody);

        let init = class.init();
        let init_params = init.map(|m| m.params.as_slice()).unwrap_or_default();
        let params = params_text(init_params);

        // Constructor body, with the parent-constructor call inserted when
        // the source did not write one itself.
        self.scope.push(FrameKind::Method);
        for param in init_params {
            self.scope.declare(param.name.clone());
        }
        let mut ctor_body: Vec<Document<'static>> = Vec::new();
        if let (Some(parent), Some(parent_ref)) = (&class.parent, &parent_ref) {
            let explicit = init
                .and_then(|m| m.body.first())
                .is_some_and(|stmt| is_parent_call(stmt, &parent.name));
            if !explicit {
                let args = if params.is_empty() {
                    String::new()
                } else {
                    format!(", {params}")
                };
                ctor_body.push(Document::String(format!("{parent_ref}.call(this{args});")));
            }
        }
        if let Some(init) = init {
            for stmt in &init.body {
                let doc = self.statement_doc(stmt);
                if !doc.is_nil() {
                    ctor_body.push(doc);
                }
            }
        }
        self.scope.pop();

        let mut doc = if class.is_global {
            docvec![
                Document::String(format!("{class_ref} = function ({params}) ")),
                braced_block(ctor_body),
                ";"
            ]
        } else {
            docvec![
                Document::String(format!("function {name}({params}) ")),
                braced_block(ctor_body)
            ]
        };

        // Prototype chain before method assignments, so the methods land on
        // the new prototype object.
        if let Some(parent_ref) = &parent_ref {
            doc = docvec![
                doc,
                line(),
                Document::String(format!(
                    "{class_ref}.prototype = Object.create({parent_ref}.prototype);"
                ))
            ];
        }

        for method in class.methods.iter().filter(|m| m.name.name != "init") {
            let params = params_text(&method.params);
            let body = self.function_body_doc(&method.params, &method.body, FrameKind::Method);
            doc = docvec![
                doc,
                line(),
                Document::String(format!(
                    "{class_ref}.prototype.{} = function ({params}) ",
                    method.name.name
                )),
                body,
                ";"
            ];
        }

        self.scope.pop(); // class body
        doc
    }

    fn if_doc(&mut self, stmt: &IfStmt) -> Document<'static> {
        let mut doc = nil();
        for (i, branch) in stmt.branches.iter().enumerate() {
            let condition = self.expression_doc(&branch.condition, 0);
            self.scope.push(FrameKind::Block);
            let body = braced_block(self.statements_docs(&branch.body));
            self.scope.pop();
            let keyword = if i == 0 { "if (" } else { " else if (" };
            doc = docvec![doc, keyword, condition, ") ", body];
        }
        if let Some(else_body) = &stmt.else_body {
            self.scope.push(FrameKind::Block);
            let body = braced_block(self.statements_docs(else_body));
            self.scope.pop();
            doc = docvec![doc, " else ", body];
        }
        doc
    }

    fn while_doc(&mut self, stmt: &WhileStmt) -> Document<'static> {
        let condition = self.expression_doc(&stmt.condition, 0);
        self.scope.push(FrameKind::Loop);
        let body = braced_block(self.statements_docs(&stmt.body));
        self.scope.pop();
        docvec!["while (", condition, ") ", body]
    }

    fn for_doc(&mut self, stmt: &ForStmt) -> Document<'static> {
        self.scope.push(FrameKind::Loop);

        // The initializer value cannot see the induction variable.
        let init_value = self.expression_doc(&stmt.init_value, 0);
        let name = &stmt.init_name.name;
        let init = if stmt.init_is_global {
            self.globals.insert(name.clone());
            docvec![Document::String(format!("globals.{name} = ")), init_value]
        } else {
            self.scope.declare(name.clone());
            docvec![Document::String(format!("var {name} = ")), init_value]
        };

        let condition = self.expression_doc(&stmt.condition, 0);
        let step = match &stmt.step {
            ForStep::Assign { target, op, value } => {
                let target = self.expression_doc(target, 0);
                let value = self.expression_doc(value, 0);
                docvec![
                    target,
                    Document::String(format!(" {} ", op.symbol())),
                    value
                ]
            }
            ForStep::Expr(expr) => self.expression_doc(expr, 0),
        };

        let body = braced_block(self.statements_docs(&stmt.body));
        self.scope.pop();

        docvec!["for (", init, "; ", condition, "; ", step, ") ", body]
    }

    fn return_doc(&mut self, stmt: &ReturnStmt) -> Document<'static> {
        if !self.scope.in_function() {
            self.error(SemanticErrorKind::ReturnOutsideFunction, stmt.span);
        }
        match &stmt.value {
            Some(value) => {
                let value = self.expression_doc(value, 0);
                docvec!["return ", value, ";"]
            }
            None => docvec!["return;"],
        }
    }

    fn break_doc(&mut self, span: Span) -> Document<'static> {
        if !self.scope.in_loop() {
            self.error(SemanticErrorKind::BreakOutsideLoop, span);
        }
        docvec!["break;"]
    }

    fn expression_statement_doc(&mut self, expression: &Expression) -> Document<'static> {
        // Free-standing triple-quoted strings are docstrings; drop them.
        if let Expression::Literal(lit) = expression {
            if matches!(lit.value, LiteralValue::Str { triple: true, .. }) {
                return nil();
            }
        }
        let doc = self.expression_doc(expression, 0);
        // A function expression at statement start would parse as a
        // (nameless, invalid) declaration in JavaScript.
        if matches!(expression, Expression::Lambda { .. }) {
            docvec!["(", doc, ");"]
        } else {
            docvec![doc, ";"]
        }
    }
}

/// Renders a parameter list as `a, b, c`.
pub(crate) fn params_text(params: &[Identifier]) -> String {
    params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wraps statement documents in braces with one level of indentation.
/// An empty body renders as `{}`.
pub(crate) fn braced_block(docs: Vec<Document<'static>>) -> Document<'static> {
    if docs.is_empty() {
        return Document::Str("{}");
    }
    docvec![
        "{",
        nest(INDENT, docvec![line(), join(docs, &line())]),
        line(),
        "}"
    ]
}

/// Does this statement explicitly invoke the parent constructor? True for an
/// expression statement calling `Parent` or anything reached through
/// `Parent.…`.
fn is_parent_call(statement: &Statement, parent: &str) -> bool {
    let Statement::Expression(stmt) = statement else {
        return false;
    };
    let Expression::Call { callee, .. } = &stmt.expression else {
        return false;
    };
    match callee.as_ref() {
        Expression::Variable(id) => id.name == parent,
        Expression::Member { object, .. } => {
            matches!(object.as_ref(), Expression::Variable(id) if id.name == parent)
        }
        _ => false,
    }
}
