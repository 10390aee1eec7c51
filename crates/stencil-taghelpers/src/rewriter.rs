//! The tag-helper tree rewriter.
//!
//! A single depth-first pass over the input tree. Each block is rebuilt
//! through a builder stack; tag blocks that resolve against the
//! descriptor provider become tag-helper builders on that same stack,
//! absorbing their content children until their end tag closes them.
//! A parallel tracker stack carries the per-open-helper state (name
//! scope, same-name counter, allow-list). Both stacks are strictly LIFO
//! and ownership of every builder transfers to its parent exactly once.

use crate::binder::{DefaultBinder, TagHelperBinder};
use crate::errors::{ErrorSink, RewriteErrorKind};
use crate::provider::DescriptorProvider;
use crate::tracker::TagHelperTracker;
use stencil_syntax::{
    Block, BlockBuilder, BlockKind, Span, SpanKind, SymbolKind, SyntaxNode,
    TagHelperBlockBuilder, TagHelperDescriptor, TagMode, TagStructure,
};

/// The reserved pseudo-tag used to switch into markup mode; when written
/// as a transition it is never eligible to be a tag helper.
const TEXT_TAG_NAME: &str = "text";

/// Rewrites a syntax tree, materializing recognized tag helpers.
///
/// The rewriter never fails: it always returns a tree of the same
/// logical shape and reports every violation to the [`ErrorSink`].
pub struct TagHelperRewriter<'a> {
    provider: &'a dyn DescriptorProvider,
    binder: &'a dyn TagHelperBinder,
}

impl<'a> TagHelperRewriter<'a> {
    /// Create a rewriter using the default attribute binder.
    pub fn new(provider: &'a dyn DescriptorProvider) -> Self {
        Self {
            provider,
            binder: &DefaultBinder,
        }
    }

    /// Create a rewriter with an explicit attribute binder.
    pub fn with_binder(
        provider: &'a dyn DescriptorProvider,
        binder: &'a dyn TagHelperBinder,
    ) -> Self {
        Self { provider, binder }
    }

    /// Rewrite `tree`, reporting violations to `sink`.
    pub fn rewrite(&self, tree: &Block, sink: &mut ErrorSink) -> Block {
        let mut session = RewriteSession {
            provider: self.provider,
            binder: self.binder,
            sink,
            block_stack: Vec::new(),
            tracker_stack: Vec::new(),
        };

        match session.rewrite_block(tree) {
            Some(SyntaxNode::Block(block)) => block,
            _ => Block {
                kind: tree.kind,
                annotation: tree.annotation.clone(),
                children: Vec::new(),
            },
        }
    }
}

/// A builder on the block stack: either a plain block being rebuilt or
/// an open tag helper absorbing its content.
#[derive(Debug)]
enum Builder {
    Block(BlockBuilder),
    TagHelper(TagHelperBlockBuilder),
}

impl Builder {
    fn push(&mut self, child: SyntaxNode) {
        match self {
            Builder::Block(builder) => builder.push(child),
            Builder::TagHelper(builder) => builder.push(child),
        }
    }

    fn build(self) -> SyntaxNode {
        match self {
            Builder::Block(builder) => SyntaxNode::Block(builder.build()),
            Builder::TagHelper(builder) => SyntaxNode::TagHelper(builder.build()),
        }
    }
}

/// Mutable state for one rewrite run.
struct RewriteSession<'s> {
    provider: &'s dyn DescriptorProvider,
    binder: &'s dyn TagHelperBinder,
    sink: &'s mut ErrorSink,
    block_stack: Vec<Builder>,
    tracker_stack: Vec<TagHelperTracker>,
}

impl RewriteSession<'_> {
    /// Rebuild one block. Returns the finished node only at the root;
    /// nested calls attach their result to the enclosing builder.
    fn rewrite_block(&mut self, input: &Block) -> Option<SyntaxNode> {
        self.block_stack
            .push(Builder::Block(BlockBuilder::from_block(input)));
        let scope_depth = self.tracker_stack.len();

        for child in &input.children {
            match child {
                SyntaxNode::Block(block) if block.kind == BlockKind::Tag => {
                    if self.try_rewrite_tag_helper(block, scope_depth) {
                        continue;
                    }
                    self.validate_allows_plain_tag(block);
                    self.append(SyntaxNode::Block(block.clone()));
                }
                SyntaxNode::Block(block) => {
                    self.rewrite_block(block);
                }
                SyntaxNode::Span(span) => {
                    self.validate_allows_content(span);
                    self.append(child.clone());
                }
                // Already-materialized helpers pass through untouched.
                SyntaxNode::TagHelper(_) => {
                    self.append(child.clone());
                }
            }
        }

        // Helpers opened in this block's scope without a matching end
        // tag cannot survive past it; force-close them innermost-first.
        let unclosed = self.tracker_stack.len().saturating_sub(scope_depth);
        if unclosed > 0 {
            self.close_malformed(unclosed);
        }

        self.finish_current_block()
    }

    /// Resolve a tag block. Returns true when the tag was absorbed by
    /// the tag-helper stacks (opened, closed, or recovered a helper).
    fn try_rewrite_tag_helper(&mut self, tag_block: &Block, scope_depth: usize) -> bool {
        let Some(tag_name) = tag_name_of(tag_block) else {
            return false;
        };

        if !is_potential_tag_helper(&tag_name, tag_block) {
            return false;
        }

        if is_end_tag(tag_block) {
            self.try_rewrite_end_tag(&tag_name, tag_block, scope_depth)
        } else {
            self.try_rewrite_start_tag(&tag_name, tag_block)
        }
    }

    fn try_rewrite_start_tag(&mut self, tag_name: &str, tag_block: &Block) -> bool {
        let attribute_names = attribute_names_of(tag_block);
        let descriptors = self.provider.descriptors_for(tag_name, &attribute_names);

        if descriptors.is_empty() {
            // The enclosing helper matched its required attributes but
            // this same-named tag did not: count it so the helper is not
            // closed by the nested tag's end tag.
            if let Some(tracker) = self.tracker_stack.last_mut() {
                if tracker.tag_name.eq_ignore_ascii_case(tag_name) {
                    tracker.open_matching_tags += 1;
                }
            }
            return false;
        }

        self.validate_allows_tag_helper(tag_name, tag_block);
        self.validate_descriptors(&descriptors, tag_name, tag_block);
        let is_syntax_valid = self.validate_tag_syntax(tag_name, tag_block);

        let mut builder =
            self.binder
                .bind(tag_name, is_syntax_valid, tag_block, descriptors, self.sink);
        builder.source_start_tag = Some(tag_block.clone());

        tracing::debug!(tag = tag_name, mode = ?builder.tag_mode, "opened tag helper");

        let tag_mode = builder.tag_mode;
        self.tracker_stack.push(TagHelperTracker::new(&builder));
        self.block_stack.push(Builder::TagHelper(builder));

        // No content expected: complete the helper immediately.
        if matches!(tag_mode, TagMode::SelfClosing | TagMode::StartTagOnly) {
            self.close_current_tag_helper(None);
        }

        true
    }

    fn try_rewrite_end_tag(
        &mut self,
        tag_name: &str,
        tag_block: &Block,
        scope_depth: usize,
    ) -> bool {
        let scope_matches = self
            .tracker_stack
            .last()
            .is_some_and(|tracker| tracker.tag_name.eq_ignore_ascii_case(tag_name));

        if scope_matches {
            if let Some(tracker) = self.tracker_stack.last_mut() {
                // This end tag closes a nested same-named plain tag,
                // not the helper.
                if tracker.open_matching_tags > 0 {
                    tracker.open_matching_tags -= 1;
                    return false;
                }
            }

            // A helper opened outside this block's scope is closed by
            // that scope's cleanup, never from inside a nested block.
            if self.tracker_stack.len() <= scope_depth {
                return false;
            }

            self.validate_tag_syntax(tag_name, tag_block);
            self.close_current_tag_helper(Some(tag_block.clone()));
            tracing::debug!(tag = tag_name, "closed tag helper");
            return true;
        }

        let descriptors = self.provider.descriptors_for(tag_name, &[]);
        if descriptors.is_empty() {
            return false;
        }

        if let Some(void_descriptor) = descriptors
            .iter()
            .find(|d| d.tag_structure == TagStructure::WithoutEndTag)
        {
            self.sink.error(
                tag_block.start(),
                RewriteErrorKind::EndTagForVoidTagHelper {
                    tag_name: tag_name.to_string(),
                    type_name: void_descriptor.type_name.clone(),
                },
                tag_block.length(),
            );
            return false;
        }

        // The end tag does not match the current scope. Search the open
        // helpers for a matching start tag; everything above it is
        // malformed.
        if self.try_recover_tag_helper(tag_name, tag_block, scope_depth) {
            self.validate_allows_tag_helper(tag_name, tag_block);
            self.validate_tag_syntax(tag_name, tag_block);
            true
        } else {
            self.sink.error(
                tag_block.start(),
                RewriteErrorKind::StrayEndTag {
                    tag_name: tag_name.to_string(),
                },
                tag_block.length(),
            );
            false
        }
    }

    /// Recover an end tag whose helper is not the innermost open one:
    /// force-close every helper above the match, then close the match
    /// normally.
    fn try_recover_tag_helper(
        &mut self,
        tag_name: &str,
        end_tag: &Block,
        scope_depth: usize,
    ) -> bool {
        let Some(matching_index) = self
            .tracker_stack
            .iter()
            .enumerate()
            .skip(scope_depth)
            .rev()
            .find(|(_, tracker)| tracker.tag_name.eq_ignore_ascii_case(tag_name))
            .map(|(index, _)| index)
        else {
            return false;
        };

        let malformed = self.tracker_stack.len() - matching_index - 1;
        self.close_malformed(malformed);
        self.close_current_tag_helper(Some(end_tag.clone()));
        tracing::debug!(tag = tag_name, force_closed = malformed, "recovered tag helper");
        true
    }

    /// Force-close the `count` innermost helpers as malformed (missing
    /// end tag).
    fn close_malformed(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(tracker) = self.tracker_stack.last() {
                tracing::debug!(tag = %tracker.tag_name, "force-closing malformed tag helper");
                self.sink.error(
                    tracker.start,
                    RewriteErrorKind::MissingEndTag {
                        tag_name: tracker.tag_name.clone(),
                    },
                    tracker.start_tag_length,
                );
            }
            self.close_current_tag_helper(None);
        }
    }

    /// Pop the current helper (tracker and builder), record its end tag,
    /// and attach the finished node to the enclosing builder.
    fn close_current_tag_helper(&mut self, end_tag: Option<Block>) {
        self.tracker_stack.pop();

        let Some(builder) = self.block_stack.pop() else {
            return;
        };
        let node = match builder {
            Builder::TagHelper(mut helper) => {
                helper.source_end_tag = end_tag;
                SyntaxNode::TagHelper(helper.build())
            }
            Builder::Block(block) => SyntaxNode::Block(block.build()),
        };
        self.append(node);
    }

    /// Pop the current block builder; attach it to its parent, or return
    /// it when it is the root.
    fn finish_current_block(&mut self) -> Option<SyntaxNode> {
        let node = self.block_stack.pop()?.build();
        match self.block_stack.last_mut() {
            Some(parent) => {
                parent.push(node);
                None
            }
            None => Some(node),
        }
    }

    fn append(&mut self, child: SyntaxNode) {
        if let Some(current) = self.block_stack.last_mut() {
            current.push(child);
        }
    }

    fn validate_allows_content(&mut self, span: &Span) {
        let Some(tracker) = self.tracker_stack.last() else {
            return;
        };
        if tracker.allowed_children.is_none() {
            return;
        }

        let content = span.content();
        if content.trim().is_empty() {
            return;
        }

        let trimmed_start = content.trim_start();
        let leading_whitespace = &content[..content.len() - trimmed_start.len()];
        let error_start = span.start.advance(leading_whitespace);
        let length = trimmed_start.trim_end().chars().count();
        let kind = RewriteErrorKind::CannotHaveNonTagContent {
            parent_tag_name: tracker.tag_name.clone(),
            allowed_children: tracker.allowed_children_display(),
        };
        self.sink.error(error_start, kind, length);
    }

    fn validate_allows_plain_tag(&mut self, tag_block: &Block) {
        let Some(tracker) = self.tracker_stack.last() else {
            return;
        };
        if tracker.allowed_children.is_none() {
            return;
        }

        let kind = RewriteErrorKind::InvalidNestedTag {
            tag_name: tag_name_of(tag_block).unwrap_or_default(),
            parent_tag_name: tracker.tag_name.clone(),
            allowed_children: tracker.allowed_children_display(),
        };
        self.sink.error(tag_block.start(), kind, tag_block.length());
    }

    fn validate_allows_tag_helper(&mut self, tag_name: &str, tag_block: &Block) {
        let Some(tracker) = self.tracker_stack.last() else {
            return;
        };
        let Some(allowed) = &tracker.allowed_children else {
            return;
        };
        if allowed
            .iter()
            .any(|child| child.eq_ignore_ascii_case(tag_name))
        {
            return;
        }

        let kind = RewriteErrorKind::InvalidNestedTag {
            tag_name: tag_name.to_string(),
            parent_tag_name: tracker.tag_name.clone(),
            allowed_children: tracker.allowed_children_display(),
        };
        self.sink.error(tag_block.start(), kind, tag_block.length());
    }

    /// All non-Unspecified structural preferences on one occurrence must
    /// agree; the first conflict is reported and the conflicting value
    /// becomes the new baseline.
    fn validate_descriptors(
        &mut self,
        descriptors: &[TagHelperDescriptor],
        tag_name: &str,
        tag_block: &Block,
    ) {
        let mut baseline: Option<&TagHelperDescriptor> = None;
        for descriptor in descriptors {
            if descriptor.tag_structure == TagStructure::Unspecified {
                continue;
            }
            if let Some(base) = baseline {
                if base.tag_structure != descriptor.tag_structure {
                    self.sink.error(
                        tag_block.start(),
                        RewriteErrorKind::InconsistentTagStructure {
                            first_type_name: base.type_name.clone(),
                            second_type_name: descriptor.type_name.clone(),
                            tag_name: tag_name.to_string(),
                        },
                        tag_block.length(),
                    );
                }
            }
            baseline = Some(descriptor);
        }
    }

    fn validate_tag_syntax(&mut self, tag_name: &str, tag_block: &Block) -> bool {
        if is_partial_tag(tag_block) {
            self.sink.error(
                tag_block.start(),
                RewriteErrorKind::MissingCloseAngle {
                    tag_name: tag_name.to_string(),
                },
                tag_block.length(),
            );
            return false;
        }
        true
    }
}

/// The tag name from a tag block's first leaf, or `None` when it cannot
/// be determined (empty tag, unexpected shape, whitespace where the name
/// should be).
fn tag_name_of(tag_block: &Block) -> Option<String> {
    if tag_block.kind != BlockKind::Tag {
        return None;
    }
    let first_span = tag_block.children.first()?.as_span()?;
    let name_symbol = first_span
        .symbols
        .iter()
        .find(|symbol| matches!(symbol.kind, SymbolKind::Text | SymbolKind::WhiteSpace))?;

    if name_symbol.kind == SymbolKind::WhiteSpace {
        return None;
    }
    Some(name_symbol.content.clone())
}

/// Whether the tag block is an end tag: the symbol after `<` is `/`.
fn is_end_tag(tag_block: &Block) -> bool {
    let Some(first_span) = tag_block.children.first().and_then(SyntaxNode::as_span) else {
        return false;
    };
    first_span
        .symbols
        .iter()
        .take(2)
        .last()
        .is_some_and(|symbol| symbol.kind == SymbolKind::ForwardSlash)
}

/// The `text` pseudo-tag written as a transition is never a helper.
fn is_potential_tag_helper(tag_name: &str, tag_block: &Block) -> bool {
    let first_is_transition = tag_block
        .children
        .first()
        .and_then(SyntaxNode::as_span)
        .is_some_and(|span| span.kind == SpanKind::Transition);

    !(tag_name.eq_ignore_ascii_case(TEXT_TAG_NAME) && first_is_transition)
}

/// A tag is partial (malformed) unless its last leaf is markup ending in
/// a closing angle bracket.
fn is_partial_tag(tag_block: &Block) -> bool {
    let Some(last_span) = tag_block.children.last().and_then(SyntaxNode::as_span) else {
        return true;
    };
    if last_span.kind != SpanKind::Markup {
        return true;
    }
    !last_span
        .symbols
        .last()
        .is_some_and(|symbol| symbol.kind == SymbolKind::CloseAngle)
}

/// Attribute names from a start tag's interior children: everything
/// before the first `=`, leading whitespace trimmed. The first child is
/// the tag open, and the last is the tag close when the tag is complete.
fn attribute_names_of(tag_block: &Block) -> Vec<String> {
    let child_count = tag_block.children.len();
    let trailing = if is_partial_tag(tag_block) { 0 } else { 1 };
    if child_count <= 1 + trailing {
        return Vec::new();
    }

    tag_block.children[1..child_count - trailing]
        .iter()
        .filter_map(attribute_name_of)
        .collect()
}

fn attribute_name_of(child: &SyntaxNode) -> Option<String> {
    let content = match child {
        SyntaxNode::Span(span) => span.content(),
        SyntaxNode::Block(block) => first_descendant_span(block)?.content(),
        SyntaxNode::TagHelper(_) => return None,
    };

    let name = match content.split_once('=') {
        Some((name, _)) => name,
        None => content.as_str(),
    };
    Some(name.trim_start().to_string())
}

fn first_descendant_span(block: &Block) -> Option<&Span> {
    for child in &block.children {
        match child {
            SyntaxNode::Span(span) => return Some(span),
            SyntaxNode::Block(inner) => {
                if let Some(span) = first_descendant_span(inner) {
                    return Some(span);
                }
            }
            SyntaxNode::TagHelper(_) => {}
        }
    }
    None
}
