//! The attribute-binding boundary.
//!
//! Turning a raw tag's interior into typed attribute assignments is a
//! separate rewrite stage. The tree rewriter only needs a
//! [`TagHelperBlockBuilder`] ready for child accumulation, so the
//! boundary is the [`TagHelperBinder`] trait; [`DefaultBinder`] supplies
//! the slice of that stage the traversal depends on (tag-mode
//! resolution), leaving attribute typing to richer implementations.

use crate::errors::ErrorSink;
use stencil_syntax::{
    Block, SymbolKind, TagHelperBlockBuilder, TagHelperDescriptor, TagMode, TagStructure,
};

/// Builds a tag-helper block builder from a resolved start tag.
pub trait TagHelperBinder {
    /// Produce a builder for the occurrence.
    ///
    /// `is_syntax_valid` is false when the start tag is partial (no
    /// closing `>`); implementations may relax attribute validation in
    /// that case. Diagnostics go to `sink`; binding itself never fails.
    fn bind(
        &self,
        tag_name: &str,
        is_syntax_valid: bool,
        tag_block: &Block,
        descriptors: Vec<TagHelperDescriptor>,
        sink: &mut ErrorSink,
    ) -> TagHelperBlockBuilder;
}

/// Minimal binder: resolves the tag mode and attaches the descriptors.
///
/// The tag mode comes from the raw tag first (`/>` means self-closing),
/// then from the descriptors: when every structural preference declared
/// is [`TagStructure::WithoutEndTag`] the element takes no end tag at
/// all.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBinder;

impl TagHelperBinder for DefaultBinder {
    fn bind(
        &self,
        tag_name: &str,
        _is_syntax_valid: bool,
        tag_block: &Block,
        descriptors: Vec<TagHelperDescriptor>,
        _sink: &mut ErrorSink,
    ) -> TagHelperBlockBuilder {
        let tag_mode = if is_self_closing(tag_block) {
            TagMode::SelfClosing
        } else if descriptors
            .iter()
            .any(|d| d.tag_structure == TagStructure::WithoutEndTag)
        {
            TagMode::StartTagOnly
        } else {
            TagMode::StartTagAndEndTag
        };

        TagHelperBlockBuilder::new(tag_name, tag_mode, descriptors)
    }
}

/// Whether the raw tag's last span ends in `/>`.
fn is_self_closing(tag_block: &Block) -> bool {
    let Some(last_span) = tag_block.children.last().and_then(|child| child.as_span()) else {
        return false;
    };

    let mut symbols = last_span.symbols.iter().rev();
    matches!(
        (symbols.next(), symbols.next()),
        (
            Some(close),
            Some(slash)
        ) if close.kind == SymbolKind::CloseAngle && slash.kind == SymbolKind::ForwardSlash
    )
}
