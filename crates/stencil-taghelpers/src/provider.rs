//! Descriptor lookup: which registrations apply to a tag occurrence.

use std::collections::HashMap;

use stencil_syntax::TagHelperDescriptor;

/// The tag name that matches any element.
pub const CATCH_ALL_TAG_NAME: &str = "*";

/// Resolves a tag occurrence to the descriptors that apply to it.
///
/// Implementations must be deterministic for a fixed registry: the same
/// (tag name, attribute set) query always returns the same descriptors
/// in the same order.
pub trait DescriptorProvider {
    /// Descriptors whose tag name matches `tag_name` (case-insensitive)
    /// and whose required attributes are all present in
    /// `attribute_names`.
    ///
    /// End-tag-only queries pass an empty attribute set.
    fn descriptors_for(
        &self,
        tag_name: &str,
        attribute_names: &[String],
    ) -> Vec<TagHelperDescriptor>;
}

/// In-memory descriptor registry.
///
/// Descriptors are bucketed by lower-cased tag name at registration
/// time; `*` registrations apply to every tag. Within a query, results
/// preserve registration order with named registrations before
/// catch-alls.
#[derive(Debug, Default)]
pub struct TagHelperRegistry {
    by_tag_name: HashMap<String, Vec<TagHelperDescriptor>>,
    catch_alls: Vec<TagHelperDescriptor>,
}

impl TagHelperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    pub fn register(&mut self, descriptor: TagHelperDescriptor) {
        if descriptor.tag_name == CATCH_ALL_TAG_NAME {
            self.catch_alls.push(descriptor);
        } else {
            self.by_tag_name
                .entry(descriptor.tag_name.to_ascii_lowercase())
                .or_default()
                .push(descriptor);
        }
    }

    /// Build a registry from an iterator of descriptors.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = TagHelperDescriptor>,
    {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }
}

impl DescriptorProvider for TagHelperRegistry {
    fn descriptors_for(
        &self,
        tag_name: &str,
        attribute_names: &[String],
    ) -> Vec<TagHelperDescriptor> {
        let named = self
            .by_tag_name
            .get(&tag_name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default();

        named
            .iter()
            .chain(self.catch_alls.iter())
            .filter(|descriptor| descriptor.required_attributes_satisfied(attribute_names))
            .cloned()
            .collect()
    }
}
