//! Element descriptors: static metadata describing a tag helper.

use serde::{Deserialize, Serialize};

/// Constraint on whether an element takes a matching end tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagStructure {
    /// The element expresses no preference.
    #[default]
    Unspecified,
    /// The element must be written with an end tag (or self-closed).
    RequiresEndTag,
    /// The element must not have an end tag.
    WithoutEndTag,
}

/// Static metadata describing one tag helper registration.
///
/// A descriptor applies to a tag occurrence when the occurrence's name
/// matches `tag_name` (case-insensitive, `*` matches any tag) and every
/// name in `required_attributes` is present on the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHelperDescriptor {
    /// Identifier of the helper type this descriptor was extracted from.
    pub type_name: String,
    /// The tag name the descriptor targets, or `*` for any tag.
    pub tag_name: String,
    /// Attribute names that must all be present for the descriptor to
    /// apply.
    pub required_attributes: Vec<String>,
    /// Allow-list of child tag names; `None` means unrestricted.
    pub allowed_children: Option<Vec<String>>,
    /// Structural constraint on the element's end tag.
    pub tag_structure: TagStructure,
}

impl TagHelperDescriptor {
    /// Create a descriptor with no requirements or restrictions.
    pub fn new(type_name: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            tag_name: tag_name.into(),
            required_attributes: Vec::new(),
            allowed_children: None,
            tag_structure: TagStructure::Unspecified,
        }
    }

    /// Require the given attributes to be present on the tag.
    pub fn with_required_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the element's children to the given tag names.
    pub fn with_allowed_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    /// Set the element's structural constraint.
    pub fn with_tag_structure(mut self, tag_structure: TagStructure) -> Self {
        self.tag_structure = tag_structure;
        self
    }

    /// Whether every required attribute appears in `attribute_names`
    /// (case-insensitive).
    pub fn required_attributes_satisfied(&self, attribute_names: &[String]) -> bool {
        self.required_attributes.iter().all(|required| {
            attribute_names
                .iter()
                .any(|provided| provided.eq_ignore_ascii_case(required))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = TagHelperDescriptor::new("HeroTagHelper", "hero");
        assert!(descriptor.required_attributes.is_empty());
        assert!(descriptor.allowed_children.is_none());
        assert_eq!(descriptor.tag_structure, TagStructure::Unspecified);
    }

    #[test]
    fn test_required_attributes_satisfied_case_insensitive() {
        let descriptor = TagHelperDescriptor::new("BoldTagHelper", "bold")
            .with_required_attributes(["class", "Data-Id"]);

        let provided = vec!["CLASS".to_string(), "data-id".to_string(), "x".to_string()];
        assert!(descriptor.required_attributes_satisfied(&provided));

        let missing = vec!["class".to_string()];
        assert!(!descriptor.required_attributes_satisfied(&missing));
    }

    #[test]
    fn test_no_required_attributes_always_satisfied() {
        let descriptor = TagHelperDescriptor::new("P", "p");
        assert!(descriptor.required_attributes_satisfied(&[]));
    }

    #[test]
    fn test_serialization_round_trip() {
        let descriptor = TagHelperDescriptor::new("CatchAll", "*")
            .with_allowed_children(["span"])
            .with_tag_structure(TagStructure::WithoutEndTag);

        let json = serde_json::to_string(&descriptor).unwrap();
        let deserialized: TagHelperDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor, deserialized);
    }
}
