//! Syntax tree data model for the Stencil semantic-lowering stage.
//!
//! A parsed template arrives here as a tree of [`SyntaxNode`]s: interior
//! [`Block`]s and leaf [`Span`]s of lexical [`Symbol`]s. The tag-helper
//! rewriter replaces recognized `Tag` blocks with [`TagHelperBlock`]s, a
//! distinct structured node carrying the matched [`TagHelperDescriptor`]s
//! and the original start/end tags for provenance.
//!
//! Trees are immutable once built: rewriting constructs new nodes through
//! the two-phase [`BlockBuilder`] / [`TagHelperBlockBuilder`] types and
//! never mutates an existing node in place.

pub mod builder;
pub mod descriptor;
pub mod symbol;
pub mod tree;

// Re-export main types at crate root
pub use builder::{BlockBuilder, TagHelperBlockBuilder};
pub use descriptor::{TagHelperDescriptor, TagStructure};
pub use symbol::{Symbol, SymbolKind};
pub use tree::{Block, BlockKind, Span, SpanKind, SyntaxNode, TagHelperBlock, TagMode};
