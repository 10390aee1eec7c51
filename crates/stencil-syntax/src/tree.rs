//! Tree nodes: blocks, spans, and materialized tag helpers.
//!
//! Lengths are always derived, never stored: a span's length is the sum
//! of its symbol lengths and a block's length is the sum of its
//! children's lengths. Start locations are stored on leaves and derived
//! for interior nodes from their first child.

use crate::descriptor::TagHelperDescriptor;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use stencil_source_map::SourceLocation;

/// Classification of a leaf span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    Markup,
    Code,
    Transition,
    MetaCode,
    Comment,
}

/// Classification of an interior block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Root,
    Markup,
    Tag,
    Template,
    Code,
    Comment,
}

/// Whether a materialized tag helper had both tags, was self-closing, or
/// was declared to never take an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagMode {
    /// `<helper>...</helper>`
    StartTagAndEndTag,
    /// `<helper />`
    SelfClosing,
    /// `<helper>` where the element forbids an end tag
    StartTagOnly,
}

/// A leaf node: an ordered run of lexical symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// The span's classification.
    pub kind: SpanKind,
    /// The symbols making up the span, in document order.
    pub symbols: Vec<Symbol>,
    /// Where the span starts in the document.
    pub start: SourceLocation,
}

impl Span {
    /// Create a span from its symbols.
    pub fn new(kind: SpanKind, symbols: Vec<Symbol>, start: SourceLocation) -> Self {
        Self {
            kind,
            symbols,
            start,
        }
    }

    /// The span's textual content: its symbols' contents concatenated.
    pub fn content(&self) -> String {
        self.symbols.iter().map(|s| s.content.as_str()).collect()
    }

    /// Length of the span in characters.
    pub fn length(&self) -> usize {
        self.symbols.iter().map(Symbol::length).sum()
    }
}

/// An interior node: an ordered sequence of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The block's classification.
    pub kind: BlockKind,
    /// Opaque code-generation annotation carried through rewriting.
    pub annotation: Option<String>,
    /// Child nodes, in document order.
    pub children: Vec<SyntaxNode>,
}

impl Block {
    /// Where the block starts: its first child's start, or the document
    /// start for an empty block.
    pub fn start(&self) -> SourceLocation {
        self.children
            .first()
            .map(SyntaxNode::start)
            .unwrap_or_default()
    }

    /// Length of the block in characters: the sum of its children.
    pub fn length(&self) -> usize {
        self.children.iter().map(SyntaxNode::length).sum()
    }
}

/// A recognized custom element, materialized as a structured node.
///
/// The original start and end tag blocks are retained so editors and
/// error reporting can point at the raw template text. `source_end_tag`
/// is `None` for self-closing, start-tag-only, and force-closed
/// (malformed) helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct TagHelperBlock {
    /// The element name as written in the start tag.
    pub tag_name: String,
    /// How the element's tags were written.
    pub tag_mode: TagMode,
    /// The descriptors that matched this occurrence.
    pub descriptors: Vec<TagHelperDescriptor>,
    /// Content children (the start/end tags themselves are not children).
    pub children: Vec<SyntaxNode>,
    /// The raw start tag this helper was built from.
    pub source_start_tag: Option<Block>,
    /// The raw end tag, when one was matched.
    pub source_end_tag: Option<Block>,
    /// Where the helper starts in the document.
    pub start: SourceLocation,
}

impl TagHelperBlock {
    /// Length of the helper's content in characters.
    pub fn length(&self) -> usize {
        self.children.iter().map(SyntaxNode::length).sum()
    }
}

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// An interior block.
    Block(Block),
    /// A materialized tag helper.
    TagHelper(TagHelperBlock),
    /// A leaf span.
    Span(Span),
}

impl SyntaxNode {
    /// Where the node starts in the document.
    pub fn start(&self) -> SourceLocation {
        match self {
            SyntaxNode::Block(block) => block.start(),
            SyntaxNode::TagHelper(helper) => helper.start,
            SyntaxNode::Span(span) => span.start,
        }
    }

    /// Length of the node in characters.
    pub fn length(&self) -> usize {
        match self {
            SyntaxNode::Block(block) => block.length(),
            SyntaxNode::TagHelper(helper) => helper.length(),
            SyntaxNode::Span(span) => span.length(),
        }
    }

    /// The node as a block, if it is one.
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            SyntaxNode::Block(block) => Some(block),
            _ => None,
        }
    }

    /// The node as a span, if it is one.
    pub fn as_span(&self) -> Option<&Span> {
        match self {
            SyntaxNode::Span(span) => Some(span),
            _ => None,
        }
    }

    /// The node as a tag helper, if it is one.
    pub fn as_tag_helper(&self) -> Option<&TagHelperBlock> {
        match self {
            SyntaxNode::TagHelper(helper) => Some(helper),
            _ => None,
        }
    }
}
