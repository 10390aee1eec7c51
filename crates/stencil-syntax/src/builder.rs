//! Two-phase builders for tree construction.
//!
//! Rewriting never mutates an existing node: it accumulates children in a
//! mutable builder and then consumes the builder into an immutable node.
//! `build` takes the builder by value, so a finished node can no longer
//! be appended to.

use crate::descriptor::TagHelperDescriptor;
use crate::tree::{Block, BlockKind, SyntaxNode, TagHelperBlock, TagMode};
use stencil_source_map::SourceLocation;

/// Mutable accumulator for a [`Block`].
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    /// The block's classification.
    pub kind: BlockKind,
    /// Opaque code-generation annotation.
    pub annotation: Option<String>,
    /// Accumulated children.
    pub children: Vec<SyntaxNode>,
}

impl BlockBuilder {
    /// Start a builder with the given kind and no children.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            annotation: None,
            children: Vec::new(),
        }
    }

    /// Start a builder copying another block's shape (kind and
    /// annotation) with empty children.
    pub fn from_block(block: &Block) -> Self {
        Self {
            kind: block.kind,
            annotation: block.annotation.clone(),
            children: Vec::new(),
        }
    }

    /// Append a child node.
    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    /// Consume the builder into an immutable block.
    pub fn build(self) -> Block {
        Block {
            kind: self.kind,
            annotation: self.annotation,
            children: self.children,
        }
    }
}

/// Mutable accumulator for a [`TagHelperBlock`].
///
/// Produced by the attribute binder when a start tag resolves to one or
/// more descriptors, filled with content children during traversal, and
/// consumed exactly once when the helper's scope closes.
#[derive(Debug, Clone)]
pub struct TagHelperBlockBuilder {
    /// The element name as written in the start tag.
    pub tag_name: String,
    /// How the element's tags were written.
    pub tag_mode: TagMode,
    /// The descriptors that matched this occurrence.
    pub descriptors: Vec<TagHelperDescriptor>,
    /// Accumulated content children.
    pub children: Vec<SyntaxNode>,
    /// The raw start tag, for provenance.
    pub source_start_tag: Option<Block>,
    /// The raw end tag, once matched.
    pub source_end_tag: Option<Block>,
}

impl TagHelperBlockBuilder {
    /// Start a builder for the given element occurrence.
    pub fn new(
        tag_name: impl Into<String>,
        tag_mode: TagMode,
        descriptors: Vec<TagHelperDescriptor>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            tag_mode,
            descriptors,
            children: Vec::new(),
            source_start_tag: None,
            source_end_tag: None,
        }
    }

    /// Append a content child.
    pub fn push(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    /// Where the helper starts: the recorded start tag's position.
    pub fn start(&self) -> SourceLocation {
        self.source_start_tag
            .as_ref()
            .map(Block::start)
            .unwrap_or_default()
    }

    /// Consume the builder into an immutable tag helper block.
    pub fn build(self) -> TagHelperBlock {
        let start = self.start();
        TagHelperBlock {
            tag_name: self.tag_name,
            tag_mode: self.tag_mode,
            descriptors: self.descriptors,
            children: self.children,
            source_start_tag: self.source_start_tag,
            source_end_tag: self.source_end_tag,
            start,
        }
    }
}
