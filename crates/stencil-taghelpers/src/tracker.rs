//! Per-open-helper bookkeeping used during traversal.

use stencil_source_map::SourceLocation;
use stencil_syntax::TagHelperBlockBuilder;

/// Transient state for one currently-open tag helper scope.
///
/// Created when a start tag resolves to at least one descriptor and
/// destroyed when the helper closes (normally, via ancestor recovery, or
/// force-closed as malformed). The builder itself lives on the block
/// stack; the tracker carries the copies the traversal consults.
#[derive(Debug)]
pub(crate) struct TagHelperTracker {
    /// The helper's tag name (scope for same-name matching).
    pub tag_name: String,
    /// Count of same-named plain tags currently open directly inside
    /// this helper. Never decremented below zero.
    pub open_matching_tags: u32,
    /// Allow-list inherited from the descriptors: the case-insensitive
    /// union of every declared list, or `None` when unrestricted.
    pub allowed_children: Option<Vec<String>>,
    /// Where the helper's start tag begins, for malformed-close
    /// reporting.
    pub start: SourceLocation,
    /// Length of the raw start tag, for malformed-close reporting.
    pub start_tag_length: usize,
}

impl TagHelperTracker {
    /// Capture tracker state from a freshly bound builder.
    pub fn new(builder: &TagHelperBlockBuilder) -> Self {
        let allowed_children = if builder
            .descriptors
            .iter()
            .any(|d| d.allowed_children.is_some())
        {
            let mut union: Vec<String> = Vec::new();
            for descriptor in &builder.descriptors {
                for child in descriptor.allowed_children.iter().flatten() {
                    if !union.iter().any(|seen| seen.eq_ignore_ascii_case(child)) {
                        union.push(child.clone());
                    }
                }
            }
            Some(union)
        } else {
            None
        };

        Self {
            tag_name: builder.tag_name.clone(),
            open_matching_tags: 0,
            allowed_children,
            start: builder.start(),
            start_tag_length: builder
                .source_start_tag
                .as_ref()
                .map(|tag| tag.length())
                .unwrap_or_default(),
        }
    }

    /// The allow-list rendered for error messages.
    pub fn allowed_children_display(&self) -> String {
        self.allowed_children
            .as_deref()
            .unwrap_or_default()
            .join(", ")
    }
}
