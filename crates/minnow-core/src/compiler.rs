// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The compiler façade.
//!
//! A [`Compiler`] owns the host's [`Registry`] and boilerplate string and
//! runs the full pipeline: lex, parse, generate. Nothing in the pipeline
//! raises; every stage's diagnostics are collected into the returned
//! [`Compilation`], and `success` is true exactly when all three lists are
//! empty.
//!
//! # Example
//!
//! ```
//! use minnow_core::compiler::Compiler;
//! use minnow_core::registry::Arity;
//!
//! let mut compiler = Compiler::new();
//! compiler.register_function("wait", Arity::Exact(1), None);
//! compiler.define_boilerplate("// runtime prelude");
//!
//! let result = compiler.compile("x = 10\nprint(x)\n");
//! assert!(result.success);
//! assert_eq!(result.raw.as_deref(), Some("var x = 10;\nconsole.log(x);"));
//! ```
//!
//! The compiler is synchronous and single-threaded; `compile` reads the
//! registration table without mutating it, so a `&self` borrow is enough.

use ecow::EcoString;

use crate::ast::Program;
use crate::codegen::javascript::generate;
use crate::registry::{Arity, ObjectSchema, Registry, ValueType};
use crate::source_analysis::{
    lex_with_dialect, parse, Dialect, Location, Severity, Token,
};

/// A compile diagnostic surfaced to the host: a stable message plus a
/// human-oriented source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// The diagnostic message. Prefixes are a stable contract
    /// (e.g. `"Undefined variable"`).
    pub message: EcoString,
    /// Where it happened: 1-based line, 0-based column, length.
    pub location: Location,
}

/// Per-stage diagnostic lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileErrors {
    /// Lexical errors.
    pub lexer: Vec<CompileError>,
    /// Parse errors.
    pub parser: Vec<CompileError>,
    /// Semantic errors from validation during generation.
    pub transpiler: Vec<CompileError>,
}

impl CompileErrors {
    /// True when no stage reported an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lexer.is_empty() && self.parser.is_empty() && self.transpiler.is_empty()
    }
}

/// Everything one `compile` call produced.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// True exactly when every error list is empty.
    pub success: bool,
    /// On success, `final_output`; on failure, the boilerplate plus whatever
    /// partial text generation produced (for tooling).
    pub output: String,
    /// The generated JavaScript, without boilerplate. `None` on failure.
    pub raw: Option<String>,
    /// `boilerplate + "\n" + raw`. `None` on failure.
    pub final_output: Option<String>,
    /// The token stream, including layout tokens and `Eof`.
    pub tokens: Vec<Token>,
    /// The parsed program (possibly partial after recovery).
    pub ast: Program,
    /// Per-stage diagnostics.
    pub errors: CompileErrors,
    /// The source text that was compiled.
    pub source: String,
}

/// The stateful compiler façade.
///
/// Owns the registration table and the boilerplate prepended to successful
/// output. Registrations are last-write-wins;
/// [`clear_custom_registrations`](Self::clear_custom_registrations) resets
/// everything to a fresh state.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    registry: Registry,
    boilerplate: String,
    dialect: Dialect,
}

impl Compiler {
    /// Creates a compiler with an empty registry, empty boilerplate, and the
    /// default (`self`) dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler for an explicit keyword [`Dialect`].
    #[must_use]
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Declares a host function callable from scripts.
    pub fn register_function(
        &mut self,
        name: impl Into<EcoString>,
        arity: Arity,
        arg_types: Option<Vec<ValueType>>,
    ) {
        self.registry.register_function(name, arity, arg_types);
    }

    /// Declares a host object with a fixed property schema.
    pub fn register_builtin_object(
        &mut self,
        name: impl Into<EcoString>,
        schema: ObjectSchema,
    ) {
        self.registry.register_builtin_object(name, schema);
    }

    /// Declares a name that always resolves and accepts any member access.
    pub fn register_reserved_declaration(&mut self, name: impl Into<EcoString>) {
        self.registry.register_reserved_declaration(name);
    }

    /// Declares a reserved function: script declarations of `dsl_name` are
    /// rewritten into callback-passing calls to `js_name`.
    pub fn register_reserved_function(
        &mut self,
        dsl_name: impl Into<EcoString>,
        js_name: impl Into<EcoString>,
    ) {
        self.registry.register_reserved_function(dsl_name, js_name);
    }

    /// Replaces the boilerplate prepended to every successful compilation.
    pub fn define_boilerplate(&mut self, code: impl Into<String>) {
        self.boilerplate = code.into();
    }

    /// Resets functions, objects, reserved names, reserved functions, and
    /// boilerplate; the result is indistinguishable from a new compiler.
    pub fn clear_custom_registrations(&mut self) {
        self.registry.clear();
        self.boilerplate.clear();
    }

    /// Compiles a script, returning every stream the pipeline produced.
    ///
    /// Never fails: all problems are reported through
    /// [`Compilation::errors`].
    #[must_use]
    pub fn compile(&self, source: &str) -> Compilation {
        let (tokens, lex_errors) = lex_with_dialect(source, self.dialect);
        let (ast, parse_diagnostics) = parse(tokens.clone());
        let (raw, semantic_errors) = generate(&ast, &self.registry);

        let errors = CompileErrors {
            lexer: lex_errors
                .iter()
                .map(|e| CompileError {
                    message: e.to_string().into(),
                    location: Location::of(source, e.span()),
                })
                .collect(),
            parser: parse_diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .map(|d| CompileError {
                    message: d.message.clone(),
                    location: Location::of(source, d.span),
                })
                .collect(),
            transpiler: semantic_errors
                .iter()
                .map(|e| CompileError {
                    message: e.to_string().into(),
                    location: Location::of(source, e.span),
                })
                .collect(),
        };

        let success = errors.is_empty();
        let final_output = format!("{}\n{}", self.boilerplate, raw);

        if success {
            Compilation {
                success,
                output: final_output.clone(),
                raw: Some(raw),
                final_output: Some(final_output),
                tokens,
                ast,
                errors,
                source: source.to_string(),
            }
        } else {
            // The buffered emission is withdrawn from raw/final, but the
            // output keeps boilerplate plus partial text for tooling.
            let output = if raw.is_empty() {
                self.boilerplate.clone()
            } else {
                format!("{}\n{}", self.boilerplate, raw)
            };
            Compilation {
                success,
                output,
                raw: None,
                final_output: None,
                tokens,
                ast,
                errors,
                source: source.to_string(),
            }
        }
    }
}
