// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for JavaScript code generation.
//!
//! This module provides a composable `Document` type for building emitted
//! output declaratively. Instead of writing directly to a string buffer with
//! manual indentation tracking, codegen functions return `Document` values
//! that are rendered in a final pass.
//!
//! Emitted JavaScript has a fixed statement layout (nothing is
//! width-dependent), so this is the always-broken subset of a
//! Wadler-Lindig printer: strings, mandatory newlines, and nesting.
//!
//! # Example
//!
//! ```
//! use minnow_core::codegen::javascript::document::{line, nest};
//! use minnow_core::docvec;
//!
//! let doc = docvec![
//!     "while (x < 3) {",
//!     nest(2, docvec![line(), "x += 1;"]),
//!     line(),
//!     "}",
//! ];
//! assert_eq!(doc.to_text(), "while (x < 3) {\n  x += 1;\n}");
//! ```

/// Indentation width used throughout JavaScript generation.
pub const INDENT: isize = 2;

/// A renderable document tree.
///
/// Documents are composable, immutable tree structures that describe the
/// layout of emitted output. They are rendered to a string in a final pass,
/// with automatic indentation handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// A borrowed string literal.
    Str(&'a str),
    /// An owned string.
    String(String),
    /// A newline followed by current indentation.
    Line,
    /// Increase indentation for nested content.
    Nest(isize, Box<Document<'a>>),
    /// A sequence of documents.
    Vec(Vec<Document<'a>>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable<'a> {
    /// Converts this value into a `Document`.
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for ecow::EcoString {
    fn to_doc(self) -> Document<'a> {
        Document::String(self.to_string())
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted to a `Document` via the `Documentable` trait.
/// Documents are concatenated directly, with no separator inserted.
///
/// ```
/// use minnow_core::docvec;
///
/// let doc = docvec!["hello", " ", "world"];
/// assert_eq!(doc.to_text(), "hello world");
/// ```
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::codegen::javascript::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::codegen::javascript::document::Document::Vec(
            vec![$crate::codegen::javascript::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::codegen::javascript::document::Documentable::to_doc($first) {
            $crate::codegen::javascript::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::codegen::javascript::document::Documentable::to_doc($rest));
                )*
                $crate::codegen::javascript::document::Document::Vec(vec)
            },
            first => {
                $crate::codegen::javascript::document::Document::Vec(
                    vec![first, $($crate::codegen::javascript::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document: a newline followed by indentation.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

/// Creates a `Nil` document: an empty document.
#[must_use]
pub fn nil() -> Document<'static> {
    Document::Nil
}

/// Creates a `Nest` document: increases indentation for the inner document.
#[must_use]
pub fn nest(indent: isize, doc: Document<'_>) -> Document<'_> {
    Document::Nest(indent, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let docs: Vec<_> = docs.into_iter().collect();
    if docs.is_empty() {
        return Document::Nil;
    }
    let mut result = Vec::with_capacity(docs.len() * 2 - 1);
    let mut first = true;
    for doc in docs {
        if !first {
            result.push(separator.clone());
        }
        result.push(doc);
        first = false;
    }
    Document::Vec(result)
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat<'a>(docs: impl IntoIterator<Item = Document<'a>>) -> Document<'a> {
    Document::Vec(docs.into_iter().collect())
}

impl Document<'_> {
    /// Returns true if the document renders to nothing.
    ///
    /// Used to filter dropped statements (e.g. `pass`, docstrings) before
    /// joining a block with newlines.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Str(s) => s.is_empty(),
            Self::String(s) => s.is_empty(),
            Self::Vec(docs) => docs.iter().all(Self::is_nil),
            Self::Nest(_, inner) => inner.is_nil(),
            Self::Line => false,
        }
    }

    /// Renders the document to a string.
    ///
    /// Uses an iterative work-list to avoid recursion overflow on deeply
    /// nested documents. Trailing whitespace is stripped from every line.
    #[must_use]
    pub fn to_text(&self) -> String {
        use std::collections::VecDeque;

        let mut output = String::new();

        // Work list: (indent, document_ref). Items pushed with push_front
        // are processed next, expanding composite documents in order.
        let mut work: VecDeque<(isize, &Document<'_>)> = VecDeque::new();
        work.push_back((0, self));

        while let Some((indent, doc)) = work.pop_front() {
            match doc {
                Document::Nil => {}
                Document::Str(s) => output.push_str(s),
                Document::String(s) => output.push_str(s.as_str()),
                Document::Line => {
                    output.push('\n');
                    for _ in 0..indent {
                        output.push(' ');
                    }
                }
                Document::Nest(extra, inner) => {
                    work.push_front((indent + extra, inner));
                }
                Document::Vec(docs) => {
                    // Push in reverse so the first element is processed first.
                    for d in docs.iter().rev() {
                        work.push_front((indent, d));
                    }
                }
            }
        }

        // Strip trailing whitespace from every line.
        output
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_document() {
        let doc = Document::Str("hello");
        assert_eq!(doc.to_text(), "hello");
    }

    #[test]
    fn nil_document() {
        let doc = Document::Nil;
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn line_document() {
        let doc = Document::Vec(vec![Document::Str("a"), Document::Line, Document::Str("b")]);
        assert_eq!(doc.to_text(), "a\nb");
    }

    #[test]
    fn nest_document() {
        let doc = Document::Vec(vec![
            Document::Str("function f() {"),
            nest(INDENT, Document::Vec(vec![line(), Document::Str("return 1;")])),
            line(),
            Document::Str("}"),
        ]);
        assert_eq!(doc.to_text(), "function f() {\n  return 1;\n}");
    }

    #[test]
    fn nested_nest() {
        let doc = nest(
            2,
            Document::Vec(vec![
                line(),
                Document::Str("outer"),
                nest(2, Document::Vec(vec![line(), Document::Str("inner")])),
            ]),
        );
        assert_eq!(doc.to_text(), "\n  outer\n    inner");
    }

    #[test]
    fn docvec_macro_empty() {
        let doc = docvec![];
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn docvec_macro_multiple() {
        let doc = docvec!["a", "b", "c"];
        assert_eq!(doc.to_text(), "abc");
    }

    #[test]
    fn docvec_flattens_leading_vec() {
        // When the first element is already a Vec, it should be flattened
        let inner = docvec!["a", "b"];
        let doc = docvec![inner, "c"];
        assert_eq!(doc.to_text(), "abc");
        if let Document::Vec(v) = doc {
            assert_eq!(v.len(), 3);
        } else {
            panic!("Expected Vec");
        }
    }

    #[test]
    fn join_documents() {
        let docs = vec![Document::Str("a"), Document::Str("b"), Document::Str("c")];
        let doc = join(docs, &Document::Str(", "));
        assert_eq!(doc.to_text(), "a, b, c");
    }

    #[test]
    fn join_empty() {
        let docs: Vec<Document> = vec![];
        let doc = join(docs, &Document::Str(", "));
        assert_eq!(doc.to_text(), "");
    }

    #[test]
    fn concat_documents() {
        let docs = vec![
            Document::Str("hello"),
            Document::Str(" "),
            Document::Str("world"),
        ];
        let doc = concat(docs);
        assert_eq!(doc.to_text(), "hello world");
    }

    #[test]
    fn is_nil_sees_through_composites() {
        assert!(nil().is_nil());
        assert!(docvec!["", Document::Nil].is_nil());
        assert!(!docvec!["x"].is_nil());
        assert!(!Document::Line.is_nil());
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        let doc = docvec!["if (x) {", nest(2, docvec![line()]), line(), "}"];
        assert_eq!(doc.to_text(), "if (x) {\n\n}");
    }

    #[test]
    fn realistic_emitted_function() {
        let doc = docvec![
            "function add(a, b) {",
            nest(INDENT, docvec![line(), "return a + b;"]),
            line(),
            "}",
        ];
        assert_eq!(doc.to_text(), "function add(a, b) {\n  return a + b;\n}");
    }
}
