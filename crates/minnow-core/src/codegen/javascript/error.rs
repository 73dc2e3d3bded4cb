// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic error types for validation during code generation.
//!
//! Message text is a stable contract: embedding hosts match on prefixes such
//! as `"Undefined variable"`. Every error carries the span of the offending
//! construct; arity errors point at the call, type errors at the argument.

use std::fmt;

use ecow::EcoString;

use crate::registry::ValueType;
use crate::source_analysis::Span;

/// A semantic error discovered while walking the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    /// The category of semantic error.
    pub kind: SemanticErrorKind,
    /// Source location where the error was detected.
    pub span: Span,
}

impl SemanticError {
    /// Creates a new semantic error.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for SemanticError {}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// Name resolved neither in scope nor through the registration table.
    UndefinedVariable {
        /// The unresolved name.
        name: EcoString,
    },

    /// A registered callable received the wrong number of arguments.
    ArityMismatch {
        /// The callable's name.
        name: EcoString,
        /// How many arguments it accepts.
        expected: usize,
        /// How many the call supplied.
        found: usize,
    },

    /// A literal argument's type contradicts the registered signature.
    TypeMismatch {
        /// The callable's name.
        name: EcoString,
        /// The registered argument type.
        expected: ValueType,
        /// 1-based position of the offending argument.
        argument: usize,
    },

    /// A property not present in a builtin object's schema.
    UnknownProperty {
        /// The builtin object's name.
        object: EcoString,
        /// The unknown property.
        property: EcoString,
    },

    /// The receiver keyword outside a class method body.
    SelfOutsideClass,

    /// `break` outside any enclosing loop.
    BreakOutsideLoop,

    /// `return` outside any enclosing function.
    ReturnOutsideFunction,
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "Undefined variable '{name}'"),
            Self::ArityMismatch {
                name,
                expected,
                found,
            } => {
                let plural = if *expected == 1 { "argument" } else { "arguments" };
                write!(
                    f,
                    "Function '{name}' expects {expected} {plural}, found {found}"
                )
            }
            Self::TypeMismatch {
                name,
                expected,
                argument,
            } => write!(
                f,
                "Function '{name}' expected '{}' for argument {argument}",
                expected.name()
            ),
            Self::UnknownProperty { object, property } => {
                write!(f, "Unknown property '{property}' on builtin object '{object}'")
            }
            Self::SelfOutsideClass => write!(f, "Cannot use 'self' outside of a class method"),
            Self::BreakOutsideLoop => write!(f, "'break' outside of a loop"),
            Self::ReturnOutsideFunction => write!(f, "'return' outside of a function"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefixes_are_stable() {
        let err = SemanticErrorKind::UndefinedVariable { name: "x".into() };
        assert_eq!(err.to_string(), "Undefined variable 'x'");

        let err = SemanticErrorKind::ArityMismatch {
            name: "wait".into(),
            expected: 1,
            found: 0,
        };
        assert_eq!(err.to_string(), "Function 'wait' expects 1 argument, found 0");

        let err = SemanticErrorKind::ArityMismatch {
            name: "clamp".into(),
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "Function 'clamp' expects 3 arguments, found 1");

        let err = SemanticErrorKind::TypeMismatch {
            name: "setCostume".into(),
            expected: ValueType::Str,
            argument: 1,
        };
        assert_eq!(
            err.to_string(),
            "Function 'setCostume' expected 'string' for argument 1"
        );

        let err = SemanticErrorKind::UnknownProperty {
            object: "sprite".into(),
            property: "bogus".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown property 'bogus' on builtin object 'sprite'"
        );
    }
}
