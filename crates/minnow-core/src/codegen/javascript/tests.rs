// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tests for JavaScript generation: source in, emitted text (and semantic
//! errors) out.

use super::{generate, SemanticError, SemanticErrorKind};
use crate::registry::{Arity, ObjectSchema, Registry, ValueType};
use crate::source_analysis::{lex, parse};

fn emit_with(registry: &Registry, source: &str) -> (String, Vec<SemanticError>) {
    let (tokens, lex_errors) = lex(source);
    assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
    let (program, parse_errors) = parse(tokens);
    assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");
    generate(&program, registry)
}

/// Emits with an empty registry, asserting no semantic errors.
fn emit(source: &str) -> String {
    let (text, errors) = emit_with(&Registry::new(), source);
    assert!(errors.is_empty(), "semantic errors: {errors:?}");
    text
}

/// Emits with an empty registry, returning only the errors.
fn emit_errors(source: &str) -> Vec<SemanticError> {
    let (_, errors) = emit_with(&Registry::new(), source);
    errors
}

// ============================================================================
// Declarations and assignment
// ============================================================================

#[test]
fn first_assignment_declares_a_local() {
    assert_eq!(emit("x = 10\n"), "var x = 10;");
}

#[test]
fn second_assignment_reassigns() {
    assert_eq!(emit("x = 1\nx = 2\n"), "var x = 1;\nx = 2;");
}

#[test]
fn global_assignment_routes_through_globals() {
    assert_eq!(
        emit("global score = 0\nscore = 1\n"),
        "globals.score = 0;\nglobals.score = 1;"
    );
}

#[test]
fn augmented_assignment_on_global() {
    assert_eq!(
        emit("global n = 0\nn += 2\n"),
        "globals.n = 0;\nglobals.n += 2;"
    );
}

#[test]
fn augmented_assignment_on_undeclared_name_reports() {
    let errors = emit_errors("x += 1\n");
    assert!(matches!(
        &errors[0].kind,
        SemanticErrorKind::UndefinedVariable { name } if name == "x"
    ));
}

#[test]
fn assignment_in_inner_frame_reaches_outer_local() {
    let js = emit("x = 1\nif True:\n    x = 2\n");
    assert_eq!(js, "var x = 1;\nif (true) {\n  x = 2;\n}");
}

// ============================================================================
// Hard-coded host builtins
// ============================================================================

#[test]
fn print_lowers_to_console_log() {
    assert_eq!(emit("print(1, 2)\n"), "console.log(1, 2);");
}

#[test]
fn str_lowers_to_string() {
    assert_eq!(emit("x = str(5)\n"), "var x = String(5);");
}

#[test]
fn local_binding_shadows_print() {
    let js = emit("print = 5\nx = print\n");
    assert_eq!(js, "var print = 5;\nvar x = print;");
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn if_elif_else_chain() {
    let js = emit("a = 1\nif a == 1:\n    x = 1\nelif a == 2:\n    x = 2\nelse:\n    x = 3\n");
    assert_eq!(
        js,
        "var a = 1;\nif (a == 1) {\n  var x = 1;\n} else if (a == 2) {\n  var x = 2;\n} else {\n  var x = 3;\n}"
    );
}

#[test]
fn if_body_locals_do_not_leak() {
    // `x` declared inside each branch is a fresh local per frame.
    let errors = emit_errors("if a:\n    x = 1\ny = x\n");
    assert!(
        errors
            .iter()
            .any(|e| matches!(&e.kind, SemanticErrorKind::UndefinedVariable { name } if name == "x")),
        "{errors:?}"
    );
}

#[test]
fn while_loop_shape() {
    let js = emit("x = 0\nwhile x < 3:\n    x += 1\n");
    assert_eq!(js, "var x = 0;\nwhile (x < 3) {\n  x += 1;\n}");
}

#[test]
fn for_loop_local_induction_variable() {
    let js = emit("for i = 0, i < 3, i += 1:\n    print(i)\n");
    assert_eq!(
        js,
        "for (var i = 0; i < 3; i += 1) {\n  console.log(i);\n}"
    );
}

#[test]
fn for_loop_global_uses_globals_everywhere() {
    let js = emit("for global i = 0, i < 3, i += 1:\n    print(i)\n");
    assert_eq!(
        js,
        "for (globals.i = 0; globals.i < 3; globals.i += 1) {\n  console.log(globals.i);\n}"
    );
}

#[test]
fn break_inside_loop_is_fine() {
    let js = emit("while True:\n    break\n");
    assert_eq!(js, "while (true) {\n  break;\n}");
}

#[test]
fn break_outside_loop_reports() {
    let errors = emit_errors("break\n");
    assert!(matches!(errors[0].kind, SemanticErrorKind::BreakOutsideLoop));
}

#[test]
fn break_inside_function_inside_loop_reports() {
    let errors = emit_errors("while True:\n    def f():\n        break\n");
    assert!(matches!(errors[0].kind, SemanticErrorKind::BreakOutsideLoop));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn function_declaration_and_call() {
    let js = emit("def add(a, b):\n    return a + b\nx = add(1, 2)\n");
    assert_eq!(
        js,
        "function add(a, b) {\n  return a + b;\n}\nvar x = add(1, 2);"
    );
}

#[test]
fn empty_function_body() {
    assert_eq!(emit("def noop():\n    pass\n"), "function noop() {}");
}

#[test]
fn return_outside_function_reports() {
    let errors = emit_errors("return 1\n");
    assert!(matches!(
        errors[0].kind,
        SemanticErrorKind::ReturnOutsideFunction
    ));
}

#[test]
fn global_function_is_assigned_to_globals() {
    let js = emit("global def ping():\n    pass\nping()\n");
    assert_eq!(js, "globals.ping = function () {};\nglobals.ping();");
}

#[test]
fn reserved_function_declaration_is_rewritten() {
    let mut registry = Registry::new();
    registry.register_reserved_function("_forever", "forever");
    let (js, errors) = emit_with(&registry, "def _forever():\n    pass\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "forever(() => {});");
}

#[test]
fn reserved_function_with_body_and_params() {
    let mut registry = Registry::new();
    registry.register_reserved_function("_on_tick", "onTick");
    let (js, errors) = emit_with(&registry, "def _on_tick(dt):\n    print(dt)\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "onTick((dt) => {\n  console.log(dt);\n});");
}

#[test]
fn reserved_function_name_is_not_declared() {
    let mut registry = Registry::new();
    registry.register_reserved_function("_forever", "forever");
    // Calling `_forever` afterwards is allowed (the runtime provides it),
    // and it is emitted verbatim, not rewritten.
    let (js, errors) = emit_with(&registry, "def _forever():\n    pass\n_forever()\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "forever(() => {});\n_forever();");
}

#[test]
fn lambda_expression_body() {
    let js = emit("f = lambda a, b: a + b\nf(1, 2)\n");
    assert_eq!(
        js,
        "var f = function (a, b) { return a + b; };\nf(1, 2);"
    );
}

#[test]
fn anonymous_def_block_body() {
    let js = emit("f = def (a):\n    return a * 2\n");
    assert_eq!(js, "var f = function (a) {\n  return a * 2;\n};");
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn class_with_constructor_and_method() {
    let js = emit(
        "class Animal:\n    def init(name):\n        self.name = name\n    def speak():\n        print(self.name)\n",
    );
    assert_eq!(
        js,
        "function Animal(name) {\n  this.name = name;\n}\n\
         Animal.prototype.speak = function () {\n  console.log(this.name);\n};"
    );
}

#[test]
fn empty_class_emits_default_constructor() {
    assert_eq!(emit("class Empty:\n    pass\n"), "function Empty() {}");
}

#[test]
fn implements_chains_prototype_and_inserts_parent_call() {
    let js = emit(
        "class Animal:\n    def init(name):\n        self.name = name\nclass Dog implements Animal:\n    def init(name, breed):\n        self.breed = breed\n",
    );
    assert_eq!(
        js,
        "function Animal(name) {\n  this.name = name;\n}\n\
         function Dog(name, breed) {\n  Animal.call(this, name, breed);\n  this.breed = breed;\n}\n\
         Dog.prototype = Object.create(Animal.prototype);"
    );
}

#[test]
fn explicit_parent_call_is_not_duplicated() {
    let js = emit(
        "class Animal:\n    def init(name):\n        self.name = name\nclass Dog implements Animal:\n    def init(name):\n        Animal.call(self, name)\n",
    );
    assert_eq!(
        js,
        "function Animal(name) {\n  this.name = name;\n}\n\
         function Dog(name) {\n  Animal.call(this, name);\n}\n\
         Dog.prototype = Object.create(Animal.prototype);"
    );
}

#[test]
fn empty_subclass_still_chains_parent_constructor() {
    let js = emit("class Base:\n    pass\nclass Sub implements Base:\n    pass\n");
    assert_eq!(
        js,
        "function Base() {}\n\
         function Sub() {\n  Base.call(this);\n}\n\
         Sub.prototype = Object.create(Base.prototype);"
    );
}

#[test]
fn self_outside_class_reports() {
    let errors = emit_errors("x = self\n");
    assert!(matches!(errors[0].kind, SemanticErrorKind::SelfOutsideClass));
}

#[test]
fn self_in_nested_function_inside_method_reports() {
    let errors = emit_errors(
        "class A:\n    def m():\n        def inner():\n            return self\n",
    );
    assert!(
        errors
            .iter()
            .any(|e| matches!(e.kind, SemanticErrorKind::SelfOutsideClass)),
        "{errors:?}"
    );
}

#[test]
fn unknown_parent_class_reports() {
    let errors = emit_errors("class Dog implements Animal:\n    pass\n");
    assert!(matches!(
        &errors[0].kind,
        SemanticErrorKind::UndefinedVariable { name } if name == "Animal"
    ));
}

// ============================================================================
// Registered functions and builtin objects
// ============================================================================

#[test]
fn registered_function_arity_mismatch() {
    let mut registry = Registry::new();
    registry.register_function("wait", Arity::Exact(1), None);
    let (_, errors) = emit_with(&registry, "wait()\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Function 'wait' expects 1 argument, found 0"
    );
}

#[test]
fn variadic_function_never_reports_arity() {
    let mut registry = Registry::new();
    registry.register_function("log", Arity::Variadic, None);
    for source in ["log()\n", "log(1)\n", "log(1, 2, 3, 4, 5)\n"] {
        let (_, errors) = emit_with(&registry, source);
        assert!(errors.is_empty(), "{source}: {errors:?}");
    }
}

#[test]
fn registered_function_type_mismatch_on_literal() {
    let mut registry = Registry::new();
    registry.register_function("say", Arity::Exact(1), Some(vec![ValueType::Str]));
    let (_, errors) = emit_with(&registry, "say(42)\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Function 'say' expected 'string' for argument 1"
    );
}

#[test]
fn non_literal_argument_passes_type_check() {
    let mut registry = Registry::new();
    registry.register_function("say", Arity::Exact(1), Some(vec![ValueType::Str]));
    let (_, errors) = emit_with(&registry, "x = 42\nsay(x)\n");
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn builtin_object_field_store_and_method_call() {
    let mut registry = Registry::new();
    registry.register_builtin_object(
        "sprite",
        ObjectSchema::new()
            .field("x")
            .method("setCostume", Arity::Exact(1), Some(vec![ValueType::Str])),
    );
    let (js, errors) = emit_with(&registry, "sprite.x = 100\nsprite.setCostume(\"idle\")\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "sprite.x = 100;\nsprite.setCostume(\"idle\");");
}

#[test]
fn builtin_object_method_type_mismatch() {
    let mut registry = Registry::new();
    registry.register_builtin_object(
        "sprite",
        ObjectSchema::new().method("setCostume", Arity::Exact(1), Some(vec![ValueType::Str])),
    );
    let (_, errors) = emit_with(&registry, "sprite.setCostume(42)\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Function 'setCostume' expected 'string' for argument 1"
    );
}

#[test]
fn builtin_object_unknown_property() {
    let mut registry = Registry::new();
    registry.register_builtin_object("sprite", ObjectSchema::new().field("x"));
    let (_, errors) = emit_with(&registry, "sprite.bogus = 1\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Unknown property 'bogus' on builtin object 'sprite'"
    );
}

#[test]
fn local_binding_shadows_builtin_object_schema() {
    let mut registry = Registry::new();
    registry.register_builtin_object("sprite", ObjectSchema::new().field("x"));
    // Once shadowed, any property goes.
    let (js, errors) = emit_with(&registry, "sprite = {}\nsprite.bogus = 1\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "var sprite = {};\nsprite.bogus = 1;");
}

#[test]
fn reserved_declaration_allows_any_property() {
    let mut registry = Registry::new();
    registry.register_reserved_declaration("stage");
    let (js, errors) = emit_with(&registry, "stage.anything.goes = 1\n");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(js, "stage.anything.goes = 1;");
}

#[test]
fn undefined_variable_read_reports_but_still_emits() {
    let (js, errors) = emit_with(&Registry::new(), "x = missing\n");
    assert!(matches!(
        &errors[0].kind,
        SemanticErrorKind::UndefinedVariable { name } if name == "missing"
    ));
    assert_eq!(js, "var x = missing;");
}

// ============================================================================
// Operators and literals
// ============================================================================

#[test]
fn power_lowers_to_math_pow() {
    assert_eq!(emit("x = 2 ** 8\n"), "var x = Math.pow(2, 8);");
}

#[test]
fn logic_operators_map_to_js() {
    assert_eq!(emit("x = 1 and 2 or not 3\n"), "var x = 1 && 2 || !3;");
}

#[test]
fn equality_chain_keeps_dsl_grouping() {
    // The DSL parses comparisons left-to-right at one level; JavaScript
    // binds `<` tighter than `==`, so the left side needs parentheses.
    assert_eq!(emit("x = 1 == 2 < 3\n"), "var x = (1 == 2) < 3;");
}

#[test]
fn grouping_parentheses_survive() {
    assert_eq!(emit("x = (1 + 2) * 3\n"), "var x = (1 + 2) * 3;");
}

#[test]
fn double_negation_does_not_fuse() {
    assert_eq!(emit("x = - -1\n"), "var x = -(-1);");
}

#[test]
fn string_literal_is_requoted() {
    assert_eq!(
        emit("s = 'a\\n\"b\"'\n"),
        "var s = \"a\\n\\\"b\\\"\";"
    );
}

#[test]
fn boolean_and_none_literals() {
    assert_eq!(
        emit("a = True\nb = False\nc = None\n"),
        "var a = true;\nvar b = false;\nvar c = null;"
    );
}

#[test]
fn list_literal_emits_array() {
    assert_eq!(emit("a = {1, 2, 3}\n"), "var a = [1, 2, 3];");
}

#[test]
fn object_literal_emits_object() {
    assert_eq!(
        emit("a = {x = 1, y = 2}\n"),
        "var a = { x: 1, y: 2 };"
    );
}

#[test]
fn empty_braces_emit_empty_object() {
    assert_eq!(emit("a = {}\n"), "var a = {};");
}

#[test]
fn index_access() {
    assert_eq!(emit("a = {1, 2}\nx = a[0]\n"), "var a = [1, 2];\nvar x = a[0];");
}

// ============================================================================
// Docstrings
// ============================================================================

#[test]
fn triple_quoted_statement_is_dropped() {
    assert_eq!(
        emit("\"\"\"module docstring\"\"\"\nx = 1\n"),
        "var x = 1;"
    );
}

#[test]
fn docstring_inside_function_is_dropped() {
    assert_eq!(
        emit("def f():\n    \"\"\"docs\"\"\"\n    return 1\n"),
        "function f() {\n  return 1;\n}"
    );
}

#[test]
fn plain_string_statement_is_emitted() {
    assert_eq!(emit("\"side effect free\"\n"), "\"side effect free\";");
}
