// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for validation during code generation.
//!
//! The generator walks the AST once with a stack of frames. Each frame holds
//! the names declared in it plus the frame's kind, which answers the context
//! questions validation needs: are we inside a function body (is `return`
//! legal), inside a loop (is `break` legal), inside a class method (is
//! `self` legal).
//!
//! Name resolution searches the stack from innermost to outermost. Names the
//! stack does not know are then resolved against the registration table and
//! the globals set by the caller.

use std::collections::HashSet;

use ecow::EcoString;

/// The kind of a scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The top-level script scope.
    Script,
    /// An `if`/`elif`/`else` body.
    Block,
    /// A `while` or `for` body.
    Loop,
    /// A named or anonymous function body.
    Function,
    /// A class body (the region holding method definitions).
    ClassBody,
    /// A class method body: a function body where `self` is defined.
    Method,
}

#[derive(Debug, Clone)]
struct Frame {
    names: HashSet<EcoString>,
    kind: FrameKind,
}

/// A stack of lexical scope frames.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Creates a stack holding only the top-level script frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                names: HashSet::new(),
                kind: FrameKind::Script,
            }],
        }
    }

    /// Enters a new frame of the given kind.
    pub fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame {
            names: HashSet::new(),
            kind,
        });
    }

    /// Exits the current frame.
    ///
    /// Popping the script frame is a no-op; the stack never empties.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Declares a name in the current frame.
    pub fn declare(&mut self, name: impl Into<EcoString>) {
        // INVARIANT: frames always contains at least the script frame.
        self.frames
            .last_mut()
            .expect("scope stack is never empty")
            .names
            .insert(name.into());
    }

    /// Returns true if `name` is declared in any frame, innermost first.
    #[must_use]
    pub fn resolves(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|frame| frame.names.contains(name))
    }

    /// Returns true if the walk is inside a function body (of any kind).
    #[must_use]
    pub fn in_function(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame.kind, FrameKind::Function | FrameKind::Method))
    }

    /// Returns true if the walk is inside a class method body.
    ///
    /// Only frames inward of the nearest function boundary count: `self`
    /// inside a plain nested function is not a receiver reference.
    #[must_use]
    pub fn in_method(&self) -> bool {
        for frame in self.frames.iter().rev() {
            match frame.kind {
                FrameKind::Method => return true,
                FrameKind::Function => return false,
                _ => {}
            }
        }
        false
    }

    /// Returns true if `break` is legal here: a loop frame occurs before any
    /// function boundary, walking outward.
    #[must_use]
    pub fn in_loop(&self) -> bool {
        for frame in self.frames.iter().rev() {
            match frame.kind {
                FrameKind::Loop => return true,
                FrameKind::Function | FrameKind::Method => return false,
                _ => {}
            }
        }
        false
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_resolve_in_script_frame() {
        let mut scope = ScopeStack::new();
        scope.declare("x");
        assert!(scope.resolves("x"));
        assert!(!scope.resolves("y"));
    }

    #[test]
    fn resolution_searches_outer_frames() {
        let mut scope = ScopeStack::new();
        scope.declare("outer");
        scope.push(FrameKind::Function);
        scope.declare("inner");

        assert!(scope.resolves("outer"));
        assert!(scope.resolves("inner"));

        scope.pop();
        assert!(!scope.resolves("inner"));
    }

    #[test]
    fn script_frame_is_never_popped() {
        let mut scope = ScopeStack::new();
        scope.declare("x");
        scope.pop();
        scope.pop();
        assert!(scope.resolves("x"));
    }

    #[test]
    fn in_function_tracks_function_frames() {
        let mut scope = ScopeStack::new();
        assert!(!scope.in_function());

        scope.push(FrameKind::Block);
        assert!(!scope.in_function());

        scope.push(FrameKind::Function);
        assert!(scope.in_function());

        scope.push(FrameKind::Loop);
        assert!(scope.in_function());
    }

    #[test]
    fn in_method_stops_at_function_boundary() {
        let mut scope = ScopeStack::new();
        scope.push(FrameKind::ClassBody);
        scope.push(FrameKind::Method);
        assert!(scope.in_method());

        // A plain function nested inside the method hides the receiver.
        scope.push(FrameKind::Function);
        assert!(!scope.in_method());

        scope.pop();
        assert!(scope.in_method());
    }

    #[test]
    fn in_loop_stops_at_function_boundary() {
        let mut scope = ScopeStack::new();
        scope.push(FrameKind::Loop);
        assert!(scope.in_loop());

        scope.push(FrameKind::Block);
        assert!(scope.in_loop());

        // A function body inside the loop cannot `break` out of it.
        scope.push(FrameKind::Function);
        assert!(!scope.in_loop());
    }

    #[test]
    fn block_frames_do_not_leak_declarations() {
        let mut scope = ScopeStack::new();
        scope.push(FrameKind::Block);
        scope.declare("shadow");
        assert!(scope.resolves("shadow"));
        scope.pop();
        assert!(!scope.resolves("shadow"));
    }
}
