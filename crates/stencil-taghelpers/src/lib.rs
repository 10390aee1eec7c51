//! Tag-helper recognition for the Stencil semantic-lowering stage.
//!
//! This crate rewrites a raw syntax tree (see `stencil-syntax`) into a
//! tree where custom elements — "tag helpers" — are recognized against a
//! descriptor registry, validated, and materialized as structured
//! [`stencil_syntax::TagHelperBlock`] nodes.
//!
//! The rewrite is a single depth-first pass over an immutable input tree,
//! producing a new tree bottom-up. It never fails: malformed tag
//! structures (unbalanced start/end tags, stray end tags) are recovered
//! from with forced closes, and every violation is accumulated in an
//! [`ErrorSink`] for the host to render.
//!
//! # Example
//!
//! ```ignore
//! use stencil_syntax::TagHelperDescriptor;
//! use stencil_taghelpers::{ErrorSink, TagHelperRegistry, TagHelperRewriter};
//!
//! let mut registry = TagHelperRegistry::new();
//! registry.register(TagHelperDescriptor::new("HeroTagHelper", "hero"));
//!
//! let rewriter = TagHelperRewriter::new(&registry);
//! let mut sink = ErrorSink::new();
//! let rewritten = rewriter.rewrite(&tree, &mut sink);
//! ```

pub mod binder;
pub mod errors;
pub mod provider;
pub mod rewriter;
mod tracker;

// Re-export main types at crate root
pub use binder::{DefaultBinder, TagHelperBinder};
pub use errors::{ErrorSink, RewriteError, RewriteErrorKind};
pub use provider::{DescriptorProvider, TagHelperRegistry};
pub use rewriter::TagHelperRewriter;
