// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Minnow.
//!
//! The AST represents the structure of a Minnow script after parsing.
//! Every node carries a [`Span`] for diagnostics.
//!
//! # Design Philosophy
//!
//! - **All nodes have spans** - Required for precise error reporting
//! - **Error recovery** - The parser can produce incomplete trees with
//!   [`Expression::Error`] placeholders and keep going
//! - **Tagged sums** - Statements and expressions are enums with exhaustive
//!   matching; there is no node subtyping
//!
//! Nodes are produced once by the parser and consumed read-only by the
//! JavaScript generator and the canonical printer.

use ecow::EcoString;

use crate::source_analysis::Span;

/// Top-level container for a parsed script.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements of the script, in source order.
    pub statements: Vec<Statement>,
    /// Source location spanning the entire script.
    pub span: Span,
}

impl Program {
    /// Creates a new program.
    #[must_use]
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }
}

/// A named reference with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text.
    pub name: EcoString,
    /// Source location of the identifier.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `x = expr` or `global x = expr`.
    Variable(VariableStmt),
    /// `def name(params):` with an indented body.
    Function(FunctionStmt),
    /// `class Name [implements Parent]:` with method members.
    Class(ClassStmt),
    /// `if`/`elif`/`else` chain.
    If(IfStmt),
    /// `while cond:` loop.
    While(WhileStmt),
    /// `for [global] i = init, cond, step:` loop.
    For(ForStmt),
    /// `return [expr]`.
    Return(ReturnStmt),
    /// `break`.
    Break(Span),
    /// `pass`.
    Pass(Span),
    /// A free-standing expression.
    Expression(ExpressionStmt),
    /// Assignment through a member/index target, or any augmented assignment.
    Assign(AssignStmt),
}

impl Statement {
    /// Returns the source span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Variable(s) => s.span,
            Self::Function(s) => s.span,
            Self::Class(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::Return(s) => s.span,
            Self::Break(span) | Self::Pass(span) => *span,
            Self::Expression(s) => s.span,
            Self::Assign(s) => s.span,
        }
    }
}

/// `x = expr` (local declaration or re-assignment) or `global x = expr`.
///
/// Whether the local form introduces a binding or re-assigns an existing one
/// is decided by the generator's scope stack, not the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStmt {
    /// The assigned name.
    pub name: Identifier,
    /// The right-hand side.
    pub value: Expression,
    /// True when spelled with the `global` keyword.
    pub is_global: bool,
    /// Source location of the whole statement.
    pub span: Span,
}

/// `def name(params):` with an indented body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStmt {
    /// The function name.
    pub name: Identifier,
    /// Parameter names.
    pub params: Vec<Identifier>,
    /// The body statements.
    pub body: Vec<Statement>,
    /// True when spelled with the `global` keyword.
    pub is_global: bool,
    /// Source location of the whole definition.
    pub span: Span,
}

/// `class Name [implements Parent]:` with method members.
///
/// Members are exclusively function definitions; a member named `init` is the
/// constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStmt {
    /// The class name.
    pub name: Identifier,
    /// The parent class named by `implements`, if any.
    pub parent: Option<Identifier>,
    /// Method definitions in source order.
    pub methods: Vec<FunctionStmt>,
    /// True when spelled with the `global` keyword.
    pub is_global: bool,
    /// Source location of the whole definition.
    pub span: Span,
}

impl ClassStmt {
    /// Returns the `init` method (the constructor), if declared.
    #[must_use]
    pub fn init(&self) -> Option<&FunctionStmt> {
        self.methods.iter().find(|m| m.name.name == "init")
    }
}

/// An `if`/`elif`/`else` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// The `if` branch followed by each `elif` branch, in source order.
    pub branches: Vec<IfBranch>,
    /// The `else` body, if present.
    pub else_body: Option<Vec<Statement>>,
    /// Source location of the whole chain.
    pub span: Span,
}

/// One `if`/`elif` condition and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    /// The branch condition.
    pub condition: Expression,
    /// The branch body.
    pub body: Vec<Statement>,
}

/// A `while cond:` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// The loop condition.
    pub condition: Expression,
    /// The loop body.
    pub body: Vec<Statement>,
    /// Source location of the whole loop.
    pub span: Span,
}

/// A `for [global] i = init, cond, step:` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// The induction variable.
    pub init_name: Identifier,
    /// The initializer expression.
    pub init_value: Expression,
    /// True when the head was spelled `for global i = …`.
    pub init_is_global: bool,
    /// The continuation condition.
    pub condition: Expression,
    /// The step clause.
    pub step: ForStep,
    /// The loop body.
    pub body: Vec<Statement>,
    /// Source location of the whole loop.
    pub span: Span,
}

/// The step clause of a `for` head: typically an assignment, but any
/// expression is allowed.
#[derive(Debug, Clone, PartialEq)]
pub enum ForStep {
    /// `i = expr`, `i += expr`, `a.b -= expr`, …
    Assign {
        /// The assignment target (variable, member, or index expression).
        target: Expression,
        /// The assignment operator.
        op: AssignOp,
        /// The right-hand side.
        value: Expression,
    },
    /// A bare expression step.
    Expr(Expression),
}

/// A `return [expr]` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// The returned value, if any.
    pub value: Option<Expression>,
    /// Source location of the statement.
    pub span: Span,
}

/// A free-standing expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    /// The expression.
    pub expression: Expression,
    /// Source location of the statement.
    pub span: Span,
}

/// Assignment through a member/index target, or any augmented assignment.
///
/// The target is restricted to variable, member, and index expressions; the
/// parser reports `Invalid assignment target` for anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// The assignment target.
    pub target: Expression,
    /// The assignment operator.
    pub op: AssignOp,
    /// The right-hand side.
    pub value: Expression,
    /// Source location of the whole statement.
    pub span: Span,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Rem,
}

impl AssignOp {
    /// The source spelling of the operator (identical in the DSL and in
    /// emitted JavaScript).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Rem => "%=",
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(LiteralExpr),
    /// A variable reference.
    Variable(Identifier),
    /// The receiver keyword (`self`/`this`).
    SelfRef(Span),
    /// An arithmetic or comparison operation.
    Binary {
        /// Left operand.
        left: Box<Expression>,
        /// The operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expression>,
        /// Source location of the whole operation.
        span: Span,
    },
    /// A short-circuiting `and`/`or` operation.
    Logical {
        /// Left operand.
        left: Box<Expression>,
        /// The operator.
        op: LogicalOp,
        /// Right operand.
        right: Box<Expression>,
        /// Source location of the whole operation.
        span: Span,
    },
    /// A unary operation (`not x`, `-x`).
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expression>,
        /// Source location of the whole operation.
        span: Span,
    },
    /// A call: `callee(args…)`.
    Call {
        /// The called expression.
        callee: Box<Expression>,
        /// The argument expressions.
        args: Vec<Expression>,
        /// Source location of the whole call.
        span: Span,
    },
    /// A member access: `object.name`.
    Member {
        /// The accessed object.
        object: Box<Expression>,
        /// The property name.
        name: Identifier,
        /// Source location of the whole access.
        span: Span,
    },
    /// An index access: `object[index]`.
    Index {
        /// The indexed object.
        object: Box<Expression>,
        /// The index expression.
        index: Box<Expression>,
        /// Source location of the whole access.
        span: Span,
    },
    /// A parenthesized expression.
    Grouping {
        /// The inner expression.
        inner: Box<Expression>,
        /// Source location including the parentheses.
        span: Span,
    },
    /// An object literal: `{x = 1, y = 2}`.
    ObjectLiteral {
        /// Key/value entries in source order.
        entries: Vec<(Identifier, Expression)>,
        /// Source location including the braces.
        span: Span,
    },
    /// A list literal: `{1, 2, 3}`.
    ListLiteral {
        /// Element expressions in source order.
        elements: Vec<Expression>,
        /// Source location including the braces.
        span: Span,
    },
    /// An anonymous function: `lambda a, b: expr` or `def (a, b):` + block.
    Lambda {
        /// Parameter names.
        params: Vec<Identifier>,
        /// The body.
        body: LambdaBody,
        /// Source location of the whole function.
        span: Span,
    },
    /// A placeholder produced during parser error recovery.
    Error(Span),
}

/// The body of an anonymous function.
#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    /// `lambda a, b: expr`; the expression is the return value.
    Expr(Box<Expression>),
    /// `def (a, b):` followed by an indented block.
    Block(Vec<Statement>),
}

impl Expression {
    /// Returns the source span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(lit) => lit.span,
            Self::Variable(id) => id.span,
            Self::SelfRef(span) | Self::Error(span) => *span,
            Self::Binary { span, .. }
            | Self::Logical { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. }
            | Self::Member { span, .. }
            | Self::Index { span, .. }
            | Self::Grouping { span, .. }
            | Self::ObjectLiteral { span, .. }
            | Self::ListLiteral { span, .. }
            | Self::Lambda { span, .. } => *span,
        }
    }

    /// Returns `true` if this is a recovery placeholder.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` if this expression may appear on the left of an
    /// assignment operator.
    #[must_use]
    pub const fn is_assign_target(&self) -> bool {
        matches!(
            self,
            Self::Variable(_) | Self::Member { .. } | Self::Index { .. }
        )
    }
}

/// A literal expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    /// The literal value.
    pub value: LiteralValue,
    /// Source location of the literal token.
    pub span: Span,
}

/// The decoded value of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A number, kept as its raw source text (emitted verbatim).
    Number(EcoString),
    /// A string with escapes resolved.
    Str {
        /// The decoded value.
        value: EcoString,
        /// True when the source spelled it with triple quotes.
        triple: bool,
    },
    /// `True`
    True,
    /// `False`
    False,
    /// `None`
    None,
}

/// Binary operators (non-short-circuiting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Pow,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl BinaryOp {
    /// The source spelling of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Short-circuiting logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

impl LogicalOp {
    /// The source spelling of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// Unary `-`
    Neg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_span_dispatch() {
        let stmt = Statement::Break(Span::new(3, 8));
        assert_eq!(stmt.span(), Span::new(3, 8));
    }

    #[test]
    fn assign_target_predicate() {
        let var = Expression::Variable(Identifier::new("x", Span::new(0, 1)));
        assert!(var.is_assign_target());

        let lit = Expression::Literal(LiteralExpr {
            value: LiteralValue::True,
            span: Span::new(0, 4),
        });
        assert!(!lit.is_assign_target());
    }

    #[test]
    fn class_init_lookup() {
        let span = Span::default();
        let method = |name: &str| FunctionStmt {
            name: Identifier::new(name, span),
            params: Vec::new(),
            body: Vec::new(),
            is_global: false,
            span,
        };
        let class = ClassStmt {
            name: Identifier::new("Dog", span),
            parent: None,
            methods: vec![method("speak"), method("init")],
            is_global: false,
            span,
        };
        assert_eq!(class.init().map(|m| m.name.name.as_str()), Some("init"));
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(BinaryOp::Pow.symbol(), "**");
        assert_eq!(AssignOp::Rem.symbol(), "%=");
        assert_eq!(LogicalOp::Or.symbol(), "or");
    }
}
