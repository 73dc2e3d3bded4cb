// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The host registration table.
//!
//! Before compiling, an embedding host declares which identifiers are
//! well-known: callable functions (with an arity and optional per-argument
//! literal types), builtin objects (with a property schema), reserved
//! declarations (always defined, no property validation), and reserved
//! functions (DSL declarations rewritten into callback-passing calls).
//!
//! The table is consulted by the JavaScript generator for name resolution,
//! arity checking, and literal-type checking. Registration is
//! last-write-wins for every key.
//!
//! # Example
//!
//! ```
//! use minnow_core::registry::{Arity, ObjectSchema, Registry, ValueType};
//!
//! let mut registry = Registry::new();
//! registry.register_function("wait", Arity::Exact(1), Some(vec![ValueType::Number]));
//! registry.register_builtin_object(
//!     "sprite",
//!     ObjectSchema::new()
//!         .field("x")
//!         .method("setCostume", Arity::Exact(1), Some(vec![ValueType::Str])),
//! );
//! registry.register_reserved_function("_forever", "forever");
//! assert!(registry.function("wait").is_some());
//! ```

use std::collections::{HashMap, HashSet};

use ecow::EcoString;

/// How many arguments a registered callable accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any number of arguments; the arity check is skipped.
    Variadic,
}

impl From<i64> for Arity {
    /// Hosts conventionally spell variadic as `-1`; any negative count maps
    /// to [`Arity::Variadic`].
    #[expect(
        clippy::cast_sign_loss,
        reason = "negative counts are mapped to Variadic above"
    )]
    fn from(count: i64) -> Self {
        if count < 0 {
            Self::Variadic
        } else {
            Self::Exact(count as usize)
        }
    }
}

/// The literal-deducible type of an argument.
///
/// Only literal arguments have a checkable type; everything else is
/// [`ValueType::Unknown`] and always passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A string literal.
    Str,
    /// A number literal.
    Number,
    /// `True` or `False`.
    Boolean,
    /// `None`.
    Null,
    /// Not deducible from the argument expression.
    Unknown,
}

impl ValueType {
    /// The type name used in diagnostics (`string`, `number`, …).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Unknown => "unknown",
        }
    }
}

/// The signature of a registered function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    /// Accepted argument count.
    pub arity: Arity,
    /// Per-argument literal types, if the host declared them.
    pub arg_types: Option<Vec<ValueType>>,
}

/// The schema entry for one property of a builtin object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySig {
    /// True when the property is callable.
    pub is_function: bool,
    /// Accepted argument count, for callable properties.
    pub arity: Option<Arity>,
    /// Per-argument literal types, for callable properties.
    pub arg_types: Option<Vec<ValueType>>,
}

/// The property schema of a registered builtin object.
///
/// Built with a fluent interface: [`field`](Self::field) for plain values,
/// [`method`](Self::method) for callables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    properties: HashMap<EcoString, PropertySig>,
}

impl ObjectSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a non-callable property.
    #[must_use]
    pub fn field(mut self, name: impl Into<EcoString>) -> Self {
        self.properties.insert(
            name.into(),
            PropertySig {
                is_function: false,
                arity: None,
                arg_types: None,
            },
        );
        self
    }

    /// Adds a callable property.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<EcoString>,
        arity: Arity,
        arg_types: Option<Vec<ValueType>>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            PropertySig {
                is_function: true,
                arity: Some(arity),
                arg_types,
            },
        );
        self
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySig> {
        self.properties.get(name)
    }
}

/// The registration table: everything the host has declared.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: HashMap<EcoString, FunctionSig>,
    objects: HashMap<EcoString, ObjectSchema>,
    reserved_declarations: HashSet<EcoString>,
    reserved_functions: HashMap<EcoString, EcoString>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callable function. Overwrites any prior entry under the
    /// same name.
    pub fn register_function(
        &mut self,
        name: impl Into<EcoString>,
        arity: Arity,
        arg_types: Option<Vec<ValueType>>,
    ) {
        self.functions
            .insert(name.into(), FunctionSig { arity, arg_types });
    }

    /// Registers a builtin object with a fixed property schema. Overwrites
    /// any prior entry under the same name.
    pub fn register_builtin_object(&mut self, name: impl Into<EcoString>, schema: ObjectSchema) {
        self.objects.insert(name.into(), schema);
    }

    /// Registers a name that is always considered defined and accepts any
    /// member access without validation.
    pub fn register_reserved_declaration(&mut self, name: impl Into<EcoString>) {
        self.reserved_declarations.insert(name.into());
    }

    /// Registers a reserved function: declarations of `dsl_name` are
    /// rewritten into callback-passing calls to `js_name`. Call sites are
    /// never rewritten.
    pub fn register_reserved_function(
        &mut self,
        dsl_name: impl Into<EcoString>,
        js_name: impl Into<EcoString>,
    ) {
        self.reserved_functions.insert(dsl_name.into(), js_name.into());
    }

    /// Resets every registration, leaving a state indistinguishable from a
    /// fresh registry.
    pub fn clear(&mut self) {
        self.functions.clear();
        self.objects.clear();
        self.reserved_declarations.clear();
        self.reserved_functions.clear();
    }

    /// Looks up a registered function signature.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }

    /// Looks up a builtin object schema.
    #[must_use]
    pub fn builtin_object(&self, name: &str) -> Option<&ObjectSchema> {
        self.objects.get(name)
    }

    /// Returns true if `name` is a reserved declaration.
    #[must_use]
    pub fn is_reserved_declaration(&self, name: &str) -> bool {
        self.reserved_declarations.contains(name)
    }

    /// Looks up the JS-side name a reserved function declaration maps to.
    #[must_use]
    pub fn reserved_function(&self, dsl_name: &str) -> Option<&EcoString> {
        self.reserved_functions.get(dsl_name)
    }

    /// Returns true if `name` resolves through the table at all: registered
    /// function, builtin object, reserved declaration, or reserved function
    /// name.
    #[must_use]
    pub fn resolves(&self, name: &str) -> bool {
        self.functions.contains_key(name)
            || self.objects.contains_key(name)
            || self.reserved_declarations.contains(name)
            || self.reserved_functions.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_last_write_wins() {
        let mut registry = Registry::new();
        registry.register_function("wait", Arity::Exact(1), None);
        registry.register_function("wait", Arity::Variadic, None);
        assert_eq!(
            registry.function("wait").map(|sig| sig.arity),
            Some(Arity::Variadic)
        );
    }

    #[test]
    fn clear_leaves_fresh_state() {
        let mut registry = Registry::new();
        registry.register_function("wait", Arity::Exact(1), None);
        registry.register_builtin_object("sprite", ObjectSchema::new().field("x"));
        registry.register_reserved_declaration("stage");
        registry.register_reserved_function("_forever", "forever");

        registry.clear();

        assert!(registry.function("wait").is_none());
        assert!(registry.builtin_object("sprite").is_none());
        assert!(!registry.is_reserved_declaration("stage"));
        assert!(registry.reserved_function("_forever").is_none());
        assert!(!registry.resolves("wait"));
    }

    #[test]
    fn schema_lookup() {
        let schema = ObjectSchema::new()
            .field("x")
            .method("setCostume", Arity::Exact(1), Some(vec![ValueType::Str]));

        let x = schema.property("x").expect("x");
        assert!(!x.is_function);

        let set_costume = schema.property("setCostume").expect("setCostume");
        assert!(set_costume.is_function);
        assert_eq!(set_costume.arity, Some(Arity::Exact(1)));
        assert!(schema.property("bogus").is_none());
    }

    #[test]
    fn resolves_covers_every_table() {
        let mut registry = Registry::new();
        registry.register_function("f", Arity::Variadic, None);
        registry.register_builtin_object("o", ObjectSchema::new());
        registry.register_reserved_declaration("r");
        registry.register_reserved_function("_d", "d");

        for name in ["f", "o", "r", "_d"] {
            assert!(registry.resolves(name), "{name} should resolve");
        }
        assert!(!registry.resolves("missing"));
    }

    #[test]
    fn value_type_names() {
        assert_eq!(ValueType::Str.name(), "string");
        assert_eq!(ValueType::Null.name(), "null");
    }

    #[test]
    fn negative_arity_means_variadic() {
        assert_eq!(Arity::from(-1), Arity::Variadic);
        assert_eq!(Arity::from(2), Arity::Exact(2));
    }
}
