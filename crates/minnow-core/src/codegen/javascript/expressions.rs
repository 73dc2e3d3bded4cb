// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression emission with precedence-aware parenthesization.
//!
//! The DSL and JavaScript do not agree on operator precedence everywhere
//! (the DSL has one comparison level where JavaScript splits relational
//! from equality), so every child expression is emitted against the
//! precedence its context requires and wrapped in parentheses when it binds
//! looser. `**` lowers to `Math.pow(…)`, which sidesteps precedence
//! entirely.

use ecow::EcoString;

use crate::ast::{BinaryOp, Expression, Identifier, LambdaBody, LiteralValue, LogicalOp, UnaryOp};
use crate::docvec;
use crate::registry::{Arity, PropertySig, ValueType};
use crate::source_analysis::Span;

use super::document::{join, Document};
use super::error::SemanticErrorKind;
use super::scope::FrameKind;
use super::{params_text, braced_block, JsGenerator};

/// Precedence of atoms: literals, identifiers, groupings.
const PREC_ATOM: u8 = 100;
/// Precedence of calls, member and index accesses.
const PREC_POSTFIX: u8 = 90;
/// Precedence of unary `!` and `-`.
const PREC_UNARY: u8 = 80;
/// Precedence of a function expression (binds loosest).
const PREC_FUNCTION: u8 = 0;

/// JavaScript precedence for the directly-mapped binary operators.
const fn binary_prec(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 60,
        BinaryOp::Add | BinaryOp::Sub => 50,
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 45,
        BinaryOp::Eq | BinaryOp::Ne => 40,
        // Pow lowers to Math.pow and never reaches here.
        BinaryOp::Pow => PREC_POSTFIX,
    }
}

const fn logical_prec(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::And => 30,
        LogicalOp::Or => 20,
    }
}

impl JsGenerator<'_> {
    /// Emits `expr`, parenthesized if it binds looser than `min_prec`.
    pub(crate) fn expression_doc(
        &mut self,
        expr: &Expression,
        min_prec: u8,
    ) -> Document<'static> {
        let (doc, prec) = self.expression_parts(expr);
        if prec < min_prec {
            docvec!["(", doc, ")"]
        } else {
            doc
        }
    }

    /// Emits `expr` and reports the precedence of the produced JavaScript.
    fn expression_parts(&mut self, expr: &Expression) -> (Document<'static>, u8) {
        match expr {
            Expression::Literal(lit) => (literal_doc(&lit.value), PREC_ATOM),
            Expression::Variable(id) => self.read_parts(id),
            Expression::SelfRef(span) => {
                if !self.scope.in_method() {
                    self.error(SemanticErrorKind::SelfOutsideClass, *span);
                }
                (Document::Str("this"), PREC_ATOM)
            }
            Expression::Binary {
                left, op, right, ..
            } => self.binary_parts(left, *op, right),
            Expression::Logical {
                left, op, right, ..
            } => {
                let prec = logical_prec(*op);
                let symbol = match op {
                    LogicalOp::And => " && ",
                    LogicalOp::Or => " || ",
                };
                let left = self.expression_doc(left, prec);
                let right = self.expression_doc(right, prec + 1);
                (docvec![left, symbol, right], prec)
            }
            Expression::Unary { op, operand, .. } => {
                let symbol = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                };
                // Equal precedence is parenthesized too: `- -a` must not
                // fuse into the `--` operator.
                let operand = self.expression_doc(operand, PREC_UNARY + 1);
                (docvec![symbol, operand], PREC_UNARY)
            }
            Expression::Call { callee, args, span } => {
                (self.call_doc(callee, args, *span), PREC_POSTFIX)
            }
            Expression::Member { object, name, .. } => {
                let object_doc = self.object_doc(object);
                self.member_property_check(object, name);
                (
                    docvec![object_doc, ".", name.name.clone()],
                    PREC_POSTFIX,
                )
            }
            Expression::Index { object, index, .. } => {
                let object_doc = self.object_doc(object);
                let index_doc = self.expression_doc(index, 0);
                (docvec![object_doc, "[", index_doc, "]"], PREC_POSTFIX)
            }
            Expression::Grouping { inner, .. } => {
                let inner = self.expression_doc(inner, 0);
                (docvec!["(", inner, ")"], PREC_ATOM)
            }
            Expression::ObjectLiteral { entries, .. } => {
                let docs: Vec<_> = entries
                    .iter()
                    .map(|(name, value)| {
                        let value = self.expression_doc(value, 0);
                        docvec![Document::String(format!("{}: ", name.name)), value]
                    })
                    .collect();
                let doc = if docs.is_empty() {
                    Document::Str("{}")
                } else {
                    docvec!["{ ", join(docs, &Document::Str(", ")), " }"]
                };
                (doc, PREC_ATOM)
            }
            Expression::ListLiteral { elements, .. } => {
                let docs: Vec<_> = elements
                    .iter()
                    .map(|element| self.expression_doc(element, 0))
                    .collect();
                (docvec!["[", join(docs, &Document::Str(", ")), "]"], PREC_ATOM)
            }
            Expression::Lambda { params, body, .. } => self.lambda_parts(params, body),
            Expression::Error(_) => (Document::Str("undefined"), PREC_ATOM),
        }
    }

    /// Emits the object of a member/index access. A bare number literal
    /// needs parentheses (`5.x` would lex as a malformed float in JS).
    fn object_doc(&mut self, object: &Expression) -> Document<'static> {
        let numeric_literal = matches!(
            object,
            Expression::Literal(lit) if matches!(lit.value, LiteralValue::Number(_))
        );
        let doc = self.expression_doc(object, PREC_POSTFIX);
        if numeric_literal {
            docvec!["(", doc, ")"]
        } else {
            doc
        }
    }

    fn binary_parts(
        &mut self,
        left: &Expression,
        op: BinaryOp,
        right: &Expression,
    ) -> (Document<'static>, u8) {
        if op == BinaryOp::Pow {
            let left = self.expression_doc(left, 0);
            let right = self.expression_doc(right, 0);
            return (
                docvec!["Math.pow(", left, ", ", right, ")"],
                PREC_POSTFIX,
            );
        }
        let prec = binary_prec(op);
        let left = self.expression_doc(left, prec);
        let right = self.expression_doc(right, prec + 1);
        (
            docvec![left, Document::String(format!(" {} ", op.symbol())), right],
            prec,
        )
    }

    /// Resolves a bare name read and emits its JavaScript spelling.
    fn read_parts(&mut self, id: &Identifier) -> (Document<'static>, u8) {
        let name = &id.name;
        if self.scope.resolves(name) {
            return (Document::String(name.to_string()), PREC_ATOM);
        }
        if self.globals.contains(name) {
            return (
                Document::String(format!("globals.{name}")),
                PREC_POSTFIX,
            );
        }
        match name.as_str() {
            "print" => return (Document::Str("console.log"), PREC_POSTFIX),
            "str" => return (Document::Str("String"), PREC_ATOM),
            _ => {}
        }
        if self.registry.resolves(name) {
            return (Document::String(name.to_string()), PREC_ATOM);
        }
        self.error(
            SemanticErrorKind::UndefinedVariable { name: name.clone() },
            id.span,
        );
        (Document::String(name.to_string()), PREC_ATOM)
    }

    /// Resolves an identifier the way a read would, without emitting a
    /// document. Used for class-parent references.
    pub(crate) fn name_ref(&mut self, id: &Identifier) -> String {
        let (doc, _) = self.read_parts(id);
        doc.to_text()
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn call_doc(
        &mut self,
        callee: &Expression,
        args: &[Expression],
        span: Span,
    ) -> Document<'static> {
        match callee {
            Expression::Variable(id) => self.named_call_doc(id, args, span),
            Expression::Member { object, name, .. } => {
                let object_doc = self.object_doc(object);
                if let Some(sig) = self.member_property_check(object, name) {
                    if sig.is_function {
                        let arity = sig.arity.unwrap_or(Arity::Variadic);
                        self.check_call(
                            name.name.clone(),
                            arity,
                            sig.arg_types.as_deref(),
                            args,
                            span,
                        );
                    }
                }
                let args = self.args_doc(args);
                docvec![object_doc, ".", name.name.clone(), "(", args, ")"]
            }
            other => {
                let callee_doc = self.expression_doc(other, PREC_POSTFIX);
                let args = self.args_doc(args);
                docvec![callee_doc, "(", args, ")"]
            }
        }
    }

    /// A call through a bare name: user functions and variables call
    /// directly; registered functions are arity/type checked; `print` and
    /// `str` lower to their host spellings.
    fn named_call_doc(
        &mut self,
        id: &Identifier,
        args: &[Expression],
        span: Span,
    ) -> Document<'static> {
        let name = &id.name;

        // A local or global binding shadows every registration.
        if self.scope.resolves(name) || self.globals.contains(name) {
            let (callee, _) = self.read_parts(id);
            let args = self.args_doc(args);
            return docvec![callee, "(", args, ")"];
        }

        if let Some(sig) = self.registry.function(name).cloned() {
            self.check_call(name.clone(), sig.arity, sig.arg_types.as_deref(), args, span);
            let target = host_call_target(name);
            let args = self.args_doc(args);
            return docvec![Document::String(target), "(", args, ")"];
        }

        if matches!(name.as_str(), "print" | "str") {
            let target = host_call_target(name);
            let args = self.args_doc(args);
            return docvec![Document::String(target), "(", args, ")"];
        }

        if self.registry.resolves(name) {
            // Reserved declarations, reserved function names, and builtin
            // objects may be called dynamically; no checks apply.
            let args = self.args_doc(args);
            return docvec![Document::String(name.to_string()), "(", args, ")"];
        }

        self.error(
            SemanticErrorKind::UndefinedVariable { name: name.clone() },
            id.span,
        );
        let args = self.args_doc(args);
        docvec![Document::String(name.to_string()), "(", args, ")"]
    }

    fn args_doc(&mut self, args: &[Expression]) -> Document<'static> {
        let docs: Vec<_> = args
            .iter()
            .map(|arg| self.expression_doc(arg, 0))
            .collect();
        join(docs, &Document::Str(", "))
    }

    /// Arity and literal-type checks for a registered callable.
    fn check_call(
        &mut self,
        name: EcoString,
        arity: Arity,
        arg_types: Option<&[ValueType]>,
        args: &[Expression],
        span: Span,
    ) {
        if let Arity::Exact(expected) = arity {
            if args.len() != expected {
                self.error(
                    SemanticErrorKind::ArityMismatch {
                        name: name.clone(),
                        expected,
                        found: args.len(),
                    },
                    span,
                );
            }
        }
        let Some(types) = arg_types else { return };
        for (i, arg) in args.iter().enumerate() {
            let Some(&expected) = types.get(i) else { break };
            if expected == ValueType::Unknown {
                continue;
            }
            let actual = literal_type(arg);
            if actual != ValueType::Unknown && actual != expected {
                self.error(
                    SemanticErrorKind::TypeMismatch {
                        name: name.clone(),
                        expected,
                        argument: i + 1,
                    },
                    arg.span(),
                );
            }
        }
    }

    /// Schema check for `object.property`. Returns the property signature
    /// when the object is an unshadowed registered builtin, reporting
    /// `Unknown property` if the schema lacks the name. Reserved
    /// declarations and ordinary values allow any property.
    fn member_property_check(
        &mut self,
        object: &Expression,
        property: &Identifier,
    ) -> Option<PropertySig> {
        let Expression::Variable(id) = object else {
            return None;
        };
        let name = &id.name;
        if self.scope.resolves(name) || self.globals.contains(name) {
            return None;
        }
        let schema = self.registry.builtin_object(name)?;
        match schema.property(&property.name) {
            Some(sig) => Some(sig.clone()),
            None => {
                self.error(
                    SemanticErrorKind::UnknownProperty {
                        object: name.clone(),
                        property: property.name.clone(),
                    },
                    property.span,
                );
                None
            }
        }
    }

    // ========================================================================
    // Anonymous functions
    // ========================================================================

    fn lambda_parts(
        &mut self,
        params: &[Identifier],
        body: &LambdaBody,
    ) -> (Document<'static>, u8) {
        let params_str = params_text(params);
        let doc = match body {
            LambdaBody::Expr(expr) => {
                self.scope.push(FrameKind::Function);
                for param in params {
                    self.scope.declare(param.name.clone());
                }
                let value = self.expression_doc(expr, 0);
                self.scope.pop();
                docvec![
                    Document::String(format!("function ({params_str}) {{ return ")),
                    value,
                    "; }"
                ]
            }
            LambdaBody::Block(statements) => {
                self.scope.push(FrameKind::Function);
                for param in params {
                    self.scope.declare(param.name.clone());
                }
                let docs = self.statements_docs(statements);
                self.scope.pop();
                docvec![
                    Document::String(format!("function ({params_str}) ")),
                    braced_block(docs)
                ]
            }
        };
        (doc, PREC_FUNCTION)
    }
}

/// The JavaScript spelling of the hard-coded host calls.
fn host_call_target(name: &str) -> String {
    match name {
        "print" => "console.log".to_string(),
        "str" => "String".to_string(),
        other => other.to_string(),
    }
}

/// The literal-deducible type of an argument expression. Anything that is
/// not a direct literal is [`ValueType::Unknown`] and always passes.
fn literal_type(expr: &Expression) -> ValueType {
    match expr {
        Expression::Literal(lit) => match lit.value {
            LiteralValue::Number(_) => ValueType::Number,
            LiteralValue::Str { .. } => ValueType::Str,
            LiteralValue::True | LiteralValue::False => ValueType::Boolean,
            LiteralValue::None => ValueType::Null,
        },
        _ => ValueType::Unknown,
    }
}

/// Quotes a decoded string value as a double-quoted, ASCII-safe JavaScript
/// string literal.
pub(crate) fn quote_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\x00"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\x0B' => out.push_str("\\v"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
        }
    }
    out.push('"');
    out
}

/// Emits a literal value.
fn literal_doc(value: &LiteralValue) -> Document<'static> {
    match value {
        LiteralValue::Number(text) => Document::String(text.to_string()),
        LiteralValue::Str { value, .. } => Document::String(quote_js_string(value)),
        LiteralValue::True => Document::Str("true"),
        LiteralValue::False => Document::Str("false"),
        LiteralValue::None => Document::Str("null"),
    }
}
