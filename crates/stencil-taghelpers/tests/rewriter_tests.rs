//! End-to-end tests for the tag-helper tree rewriter.
//!
//! Trees are built by a small factory that threads source locations the
//! way the tokenizer would, so error locations and lengths can be
//! asserted exactly.

use pretty_assertions::assert_eq;
use stencil_source_map::SourceLocation;
use stencil_syntax::{
    Block, BlockKind, Span, SpanKind, Symbol, SyntaxNode, TagHelperDescriptor, TagMode,
    TagStructure,
};
use stencil_taghelpers::{
    ErrorSink, RewriteError, RewriteErrorKind, TagHelperRegistry, TagHelperRewriter,
};

/// Builds syntax trees with consistent source locations.
struct TreeFactory {
    location: SourceLocation,
}

impl TreeFactory {
    fn new() -> Self {
        Self {
            location: SourceLocation::zero(),
        }
    }

    fn span(&mut self, kind: SpanKind, symbols: Vec<Symbol>) -> Span {
        let start = self.location;
        for symbol in &symbols {
            self.location = self.location.advance(&symbol.content);
        }
        Span::new(kind, symbols, start)
    }

    fn markup(&mut self, text: &str) -> SyntaxNode {
        let span = self.span(SpanKind::Markup, vec![Symbol::text(text)]);
        SyntaxNode::Span(span)
    }

    fn start_tag(&mut self, name: &str, attributes: &[&str]) -> Block {
        self.tag(name, attributes, false, true)
    }

    fn self_closing_tag(&mut self, name: &str, attributes: &[&str]) -> Block {
        self.tag(name, attributes, true, true)
    }

    fn partial_start_tag(&mut self, name: &str) -> Block {
        self.tag(name, &[], false, false)
    }

    fn end_tag(&mut self, name: &str) -> Block {
        let span = self.span(
            SpanKind::Markup,
            vec![
                Symbol::open_angle(),
                Symbol::forward_slash(),
                Symbol::text(name),
                Symbol::close_angle(),
            ],
        );
        Block {
            kind: BlockKind::Tag,
            annotation: None,
            children: vec![SyntaxNode::Span(span)],
        }
    }

    fn tag(&mut self, name: &str, attributes: &[&str], self_closing: bool, complete: bool) -> Block {
        let open = self.span(
            SpanKind::Markup,
            vec![Symbol::open_angle(), Symbol::text(name)],
        );
        let mut children = vec![SyntaxNode::Span(open)];
        for attribute in attributes {
            let span = self.span(
                SpanKind::Markup,
                vec![Symbol::whitespace(" "), Symbol::text(*attribute)],
            );
            children.push(SyntaxNode::Span(span));
        }
        if complete {
            let mut close = Vec::new();
            if self_closing {
                close.push(Symbol::forward_slash());
            }
            close.push(Symbol::close_angle());
            children.push(SyntaxNode::Span(self.span(SpanKind::Markup, close)));
        }
        Block {
            kind: BlockKind::Tag,
            annotation: None,
            children,
        }
    }

    fn root(children: Vec<SyntaxNode>) -> Block {
        Block {
            kind: BlockKind::Root,
            annotation: None,
            children,
        }
    }
}

fn rewrite(registry: &TagHelperRegistry, tree: &Block) -> (Block, Vec<RewriteError>) {
    // Surfaces the rewriter's decision-point events when a test run sets
    // RUST_LOG; try_init because every test goes through this helper.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let rewriter = TagHelperRewriter::new(registry);
    let mut sink = ErrorSink::new();
    let result = rewriter.rewrite(tree, &mut sink);
    (result, sink.into_errors())
}

#[test]
fn test_balanced_helper_round_trip() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("HeroTagHelper", "hero")]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("hero", &[]);
    let content = f.markup("Hello");
    let end = f.end_tag("hero");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start.clone()),
        content.clone(),
        SyntaxNode::Block(end.clone()),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    assert_eq!(result.kind, BlockKind::Root);
    assert_eq!(result.children.len(), 1);

    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.tag_name, "hero");
    assert_eq!(helper.tag_mode, TagMode::StartTagAndEndTag);
    assert_eq!(helper.source_start_tag.as_ref(), Some(&start));
    assert_eq!(helper.source_end_tag.as_ref(), Some(&end));
    assert_eq!(helper.children, vec![content]);
    assert_eq!(helper.start, SourceLocation::zero());
}

#[test]
fn test_tag_name_matching_is_case_insensitive() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("HeroTagHelper", "hero")]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("Hero", &[]);
    let end = f.end_tag("HERO");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(start), SyntaxNode::Block(end)]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.tag_name, "Hero");
    assert!(helper.source_end_tag.is_some());
}

#[test]
fn test_same_name_nested_plain_tags_do_not_close_the_helper() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("MythTagHelper", "myth").with_required_attributes(["req"]),
    ]);
    let mut f = TreeFactory::new();
    let outer_start = f.start_tag("myth", &["req=\"true\""]);
    let inner_start = f.start_tag("myth", &[]);
    let inner_end = f.end_tag("myth");
    let outer_end = f.end_tag("myth");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(outer_start),
        SyntaxNode::Block(inner_start.clone()),
        SyntaxNode::Block(inner_end.clone()),
        SyntaxNode::Block(outer_end.clone()),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    assert_eq!(result.children.len(), 1);

    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.tag_name, "myth");
    // The inner same-named plain pair is preserved verbatim.
    assert_eq!(
        helper.children,
        vec![SyntaxNode::Block(inner_start), SyntaxNode::Block(inner_end)]
    );
    assert_eq!(helper.source_end_tag.as_ref(), Some(&outer_end));
}

#[test]
fn test_required_attribute_mismatch_leaves_plain_tags() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("MythTagHelper", "myth").with_required_attributes(["req"]),
    ]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("myth", &[]);
    let end = f.end_tag("myth");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start.clone()),
        SyntaxNode::Block(end.clone()),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    assert_eq!(
        result.children,
        vec![SyntaxNode::Block(start), SyntaxNode::Block(end)]
    );
}

#[test]
fn test_stray_end_tag_reports_and_leaves_the_tag() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("FooTagHelper", "foo")]);
    let mut f = TreeFactory::new();
    let end = f.end_tag("foo");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(end.clone())]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::StrayEndTag {
            tag_name: "foo".to_string()
        }
    );
    assert_eq!(errors[0].location, SourceLocation::zero());
    assert_eq!(errors[0].length, 6); // </foo>

    assert_eq!(result.children, vec![SyntaxNode::Block(end)]);
}

#[test]
fn test_unclosed_helper_is_force_closed_at_scope_exit() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("FooTagHelper", "foo")]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("foo", &[]);
    let content = f.markup("x");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(start.clone()), content.clone()]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::MissingEndTag {
            tag_name: "foo".to_string()
        }
    );
    assert_eq!(errors[0].location, SourceLocation::zero());
    assert_eq!(errors[0].length, 5); // <foo>

    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.source_start_tag.as_ref(), Some(&start));
    assert!(helper.source_end_tag.is_none());
    assert_eq!(helper.children, vec![content]);
}

#[test]
fn test_recovery_force_closes_intervening_helpers() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("ATagHelper", "a"),
        TagHelperDescriptor::new("BTagHelper", "b"),
    ]);
    let mut f = TreeFactory::new();
    let start_a = f.start_tag("a", &[]);
    let start_b = f.start_tag("b", &[]);
    let end_a = f.end_tag("a");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start_a),
        SyntaxNode::Block(start_b.clone()),
        SyntaxNode::Block(end_a.clone()),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::MissingEndTag {
            tag_name: "b".to_string()
        }
    );
    assert_eq!(errors[0].location, start_b.start());
    assert_eq!(errors[0].length, 3); // <b>

    let outer = result.children[0].as_tag_helper().expect("expected tag helper 'a'");
    assert_eq!(outer.tag_name, "a");
    assert_eq!(outer.source_end_tag.as_ref(), Some(&end_a));

    let inner = outer.children[0].as_tag_helper().expect("expected tag helper 'b'");
    assert_eq!(inner.tag_name, "b");
    assert!(inner.source_end_tag.is_none());
}

#[test]
fn test_allow_list_rejects_text_content_with_trimmed_extent() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("ListTagHelper", "list").with_allowed_children(["span"]),
    ]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("list", &[]);
    let content = f.markup("  oops  ");
    let end = f.end_tag("list");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        content.clone(),
        SyntaxNode::Block(end),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::CannotHaveNonTagContent {
            parent_tag_name: "list".to_string(),
            allowed_children: "span".to_string(),
        }
    );
    // "<list>" is 6 characters; the error starts past the 2 leading
    // spaces and spans the trimmed text only.
    assert_eq!(errors[0].location.absolute, 8);
    assert_eq!(errors[0].length, 4);

    // The leaf is still appended unchanged.
    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.children, vec![content]);
}

#[test]
fn test_allow_list_ignores_whitespace_only_content() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("ListTagHelper", "list").with_allowed_children(["span"]),
    ]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("list", &[]);
    let content = f.markup("  \n  ");
    let end = f.end_tag("list");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        content,
        SyntaxNode::Block(end),
    ]);

    let (_result, errors) = rewrite(&registry, &tree);
    assert!(errors.is_empty());
}

#[test]
fn test_allow_list_rejects_plain_tags() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("ListTagHelper", "list").with_allowed_children(["span"]),
    ]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("list", &[]);
    let div_start = f.start_tag("div", &[]);
    let div_end = f.end_tag("div");
    let end = f.end_tag("list");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        SyntaxNode::Block(div_start),
        SyntaxNode::Block(div_end),
        SyntaxNode::Block(end),
    ]);

    let (_result, errors) = rewrite(&registry, &tree);

    // Both the start and end tag of the plain element are flagged.
    assert_eq!(errors.len(), 2);
    for error in &errors {
        assert_eq!(
            error.kind,
            RewriteErrorKind::InvalidNestedTag {
                tag_name: "div".to_string(),
                parent_tag_name: "list".to_string(),
                allowed_children: "span".to_string(),
            }
        );
    }
}

#[test]
fn test_allow_list_accepts_listed_nested_helper() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("ListTagHelper", "list").with_allowed_children(["span"]),
        TagHelperDescriptor::new("SpanTagHelper", "span"),
    ]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("list", &[]);
    let span_start = f.start_tag("span", &[]);
    let span_end = f.end_tag("span");
    let end = f.end_tag("list");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        SyntaxNode::Block(span_start),
        SyntaxNode::Block(span_end),
        SyntaxNode::Block(end),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    let outer = result.children[0].as_tag_helper().expect("expected tag helper 'list'");
    let inner = outer.children[0].as_tag_helper().expect("expected tag helper 'span'");
    assert_eq!(inner.tag_name, "span");
}

#[test]
fn test_self_closing_helper_completes_immediately() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("HeroTagHelper", "hero")]);
    let mut f = TreeFactory::new();
    let tag = f.self_closing_tag("hero", &[]);
    let after = f.markup("after");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(tag), after.clone()]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    assert_eq!(result.children.len(), 2);

    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.tag_mode, TagMode::SelfClosing);
    assert!(helper.children.is_empty());
    assert!(helper.source_end_tag.is_none());
    assert_eq!(result.children[1], after);
}

#[test]
fn test_without_end_tag_helper_takes_no_children() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("MetaTagHelper", "meta")
            .with_tag_structure(TagStructure::WithoutEndTag),
    ]);
    let mut f = TreeFactory::new();
    let tag = f.start_tag("meta", &[]);
    let after = f.markup("after");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(tag), after.clone()]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.tag_mode, TagMode::StartTagOnly);
    assert!(helper.children.is_empty());
    assert_eq!(result.children[1], after);
}

#[test]
fn test_end_tag_for_void_helper_is_an_error() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("MetaTagHelper", "meta")
            .with_tag_structure(TagStructure::WithoutEndTag),
    ]);
    let mut f = TreeFactory::new();
    let end = f.end_tag("meta");
    let tree = TreeFactory::root(vec![SyntaxNode::Block(end.clone())]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::EndTagForVoidTagHelper {
            tag_name: "meta".to_string(),
            type_name: "MetaTagHelper".to_string(),
        }
    );
    assert_eq!(result.children, vec![SyntaxNode::Block(end)]);
}

#[test]
fn test_partial_start_tag_reports_missing_close_angle_but_still_binds() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("FooTagHelper", "foo")]);
    let mut f = TreeFactory::new();
    let start = f.partial_start_tag("foo");
    let content = f.markup("x");
    let end = f.end_tag("foo");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        content.clone(),
        SyntaxNode::Block(end.clone()),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::MissingCloseAngle {
            tag_name: "foo".to_string()
        }
    );
    assert_eq!(errors[0].length, 4); // <foo

    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.children, vec![content]);
    assert_eq!(helper.source_end_tag.as_ref(), Some(&end));
}

#[test]
fn test_conflicting_tag_structures_reported_once() {
    let registry = TagHelperRegistry::from_descriptors([
        TagHelperDescriptor::new("PairedDual", "dual")
            .with_tag_structure(TagStructure::RequiresEndTag),
        TagHelperDescriptor::new("VoidDual", "dual")
            .with_tag_structure(TagStructure::WithoutEndTag),
    ]);
    let mut f = TreeFactory::new();
    let tag = f.start_tag("dual", &[]);
    let tree = TreeFactory::root(vec![SyntaxNode::Block(tag)]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::InconsistentTagStructure {
            first_type_name: "PairedDual".to_string(),
            second_type_name: "VoidDual".to_string(),
            tag_name: "dual".to_string(),
        }
    );
    assert!(result.children[0].as_tag_helper().is_some());
}

#[test]
fn test_text_transition_pseudo_tag_is_never_a_helper() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("TextTagHelper", "text")]);
    let mut f = TreeFactory::new();
    let open = f.span(
        SpanKind::Transition,
        vec![Symbol::open_angle(), Symbol::text("text")],
    );
    let close = f.span(SpanKind::Markup, vec![Symbol::close_angle()]);
    let tag = Block {
        kind: BlockKind::Tag,
        annotation: None,
        children: vec![SyntaxNode::Span(open), SyntaxNode::Span(close)],
    };
    let tree = TreeFactory::root(vec![SyntaxNode::Block(tag.clone())]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    assert_eq!(result.children, vec![SyntaxNode::Block(tag)]);
}

#[test]
fn test_non_tag_blocks_are_recursed_into_helper_children() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("ATagHelper", "a")]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("a", &[]);
    let inner_markup = f.markup("inside");
    let template = Block {
        kind: BlockKind::Template,
        annotation: None,
        children: vec![inner_markup.clone()],
    };
    let end = f.end_tag("a");
    let tree = TreeFactory::root(vec![
        SyntaxNode::Block(start),
        SyntaxNode::Block(template.clone()),
        SyntaxNode::Block(end),
    ]);

    let (result, errors) = rewrite(&registry, &tree);

    assert!(errors.is_empty());
    let helper = result.children[0].as_tag_helper().expect("expected a tag helper");
    assert_eq!(helper.children, vec![SyntaxNode::Block(template)]);
}

#[test]
fn test_helper_unclosed_inside_nested_block_closes_at_that_scope() {
    let registry =
        TagHelperRegistry::from_descriptors([TagHelperDescriptor::new("ATagHelper", "a")]);
    let mut f = TreeFactory::new();
    let start = f.start_tag("a", &[]);
    let content = f.markup("x");
    let template = Block {
        kind: BlockKind::Template,
        annotation: None,
        children: vec![SyntaxNode::Block(start), content.clone()],
    };
    let tree = TreeFactory::root(vec![SyntaxNode::Block(template)]);

    let (result, errors) = rewrite(&registry, &tree);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        RewriteErrorKind::MissingEndTag {
            tag_name: "a".to_string()
        }
    );

    let rewritten_template = result.children[0].as_block().expect("expected template block");
    assert_eq!(rewritten_template.kind, BlockKind::Template);
    let helper = rewritten_template.children[0]
        .as_tag_helper()
        .expect("expected a tag helper");
    assert!(helper.source_end_tag.is_none());
    assert_eq!(helper.children, vec![content]);
}
