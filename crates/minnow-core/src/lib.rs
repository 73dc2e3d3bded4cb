// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Minnow compiler core.
//!
//! Minnow is a small Python-flavored scripting language that compiles to
//! JavaScript source text, for embedding in applications that expose a
//! curated API surface to end users. This crate contains the whole
//! pipeline:
//! - Source analysis (indentation-aware lexing, recursive descent parsing)
//! - Semantic validation against the host's registration table
//! - JavaScript code generation
//! - The compiler façade that assembles a [`Compilation`] per source
//!
//! Every stage accumulates diagnostics and keeps going; nothing raises.
//!
//! ```
//! use minnow_core::prelude::*;
//!
//! let mut compiler = Compiler::new();
//! compiler.register_function("wait", Arity::Exact(1), None);
//!
//! let result = compiler.compile("x = 1\nwait(x)\n");
//! assert!(result.success);
//! ```

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod registry;
pub mod source_analysis;
pub mod unparse;

pub use compiler::{Compilation, CompileError, CompileErrors, Compiler};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Program, Statement};
    pub use crate::compiler::{Compilation, CompileError, CompileErrors, Compiler};
    pub use crate::registry::{Arity, ObjectSchema, Registry, ValueType};
    pub use crate::source_analysis::{Dialect, Location, Span};
}
