//! Rewrite diagnostics and the error sink that accumulates them.
//!
//! Diagnostics are never fatal: the rewriter always produces a tree and
//! reports every violation here. Callers decide whether accumulated
//! errors abort downstream code generation.

use stencil_source_map::SourceLocation;
use thiserror::Error;

/// The kinds of violations the tag-helper rewrite can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteErrorKind {
    /// A tag lacks a terminating `>`.
    #[error("the tag helper '{tag_name}' must have a matching closing angle bracket ('>')")]
    MissingCloseAngle { tag_name: String },

    /// Descriptors matched to one tag occurrence disagree on tag
    /// structure.
    #[error(
        "tag helpers '{first_type_name}' and '{second_type_name}' for element '{tag_name}' \
         declare conflicting tag structures"
    )]
    InconsistentTagStructure {
        first_type_name: String,
        second_type_name: String,
        tag_name: String,
    },

    /// A tag appears where the enclosing helper's allow-list forbids it.
    #[error(
        "the tag helper '{parent_tag_name}' only allows child tags: {allowed_children}; \
         found '{tag_name}'"
    )]
    InvalidNestedTag {
        tag_name: String,
        parent_tag_name: String,
        allowed_children: String,
    },

    /// Non-whitespace text appears where the enclosing helper's
    /// allow-list forbids content.
    #[error(
        "the tag helper '{parent_tag_name}' only allows child tags: {allowed_children}; \
         it cannot contain text content"
    )]
    CannotHaveNonTagContent {
        parent_tag_name: String,
        allowed_children: String,
    },

    /// An end tag exists for an element declared to forbid one.
    #[error(
        "the element '{tag_name}' must not have an end tag; tag helper '{type_name}' declares \
         it without one"
    )]
    EndTagForVoidTagHelper {
        tag_name: String,
        type_name: String,
    },

    /// A tag helper's start tag was never matched by an end tag within
    /// its scope.
    #[error("found malformed tag helper '{tag_name}': missing end tag")]
    MissingEndTag { tag_name: String },

    /// An end tag has no corresponding open tag helper to close.
    #[error("found malformed tag helper '{tag_name}': end tag has no matching start tag")]
    StrayEndTag { tag_name: String },
}

/// One reported violation: what went wrong, where, and how much source
/// text it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteError {
    /// The violation.
    pub kind: RewriteErrorKind,
    /// Where the offending text starts.
    pub location: SourceLocation,
    /// Length of the offending text in characters.
    pub length: usize,
}

/// Accumulator for rewrite diagnostics.
///
/// Always available to the rewriter and its collaborators; reporting
/// never fails. Errors are read back in report order.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<RewriteError>,
}

impl ErrorSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a violation.
    pub fn error(&mut self, location: SourceLocation, kind: RewriteErrorKind, length: usize) {
        self.errors.push(RewriteError {
            kind,
            location,
            length,
        });
    }

    /// The reported errors, in report order.
    pub fn errors(&self) -> &[RewriteError] {
        &self.errors
    }

    /// Whether any errors have been reported.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of reported errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the sink and return the errors.
    pub fn into_errors(self) -> Vec<RewriteError> {
        self.errors
    }
}
