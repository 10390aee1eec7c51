//! The line-mapping table for one compilation unit

use crate::types::MappingLocation;
use serde::{Deserialize, Serialize};

/// One (document, generated) position pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMapping {
    /// Where the content came from in the template document
    pub document: MappingLocation,
    /// Where the content landed in the generated output
    pub generated: MappingLocation,
}

/// Append-only ordered list of line mappings.
///
/// Scoped to one compilation unit; mappings are kept in emission order,
/// not sorted by position. Downstream consumers (debuggers, source-map
/// emitters) read the table back to translate generated positions to
/// document positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMappingManager {
    mappings: Vec<LineMapping>,
}

impl LineMappingManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping pair.
    ///
    /// If either side's content length is unknown, it inherits the length
    /// recorded on its counterpart.
    pub fn add_mapping(&mut self, document: MappingLocation, generated: MappingLocation) {
        let mut document = document;
        let mut generated = generated;
        if document.content_length.is_none() {
            document.content_length = generated.content_length;
        }
        if generated.content_length.is_none() {
            generated.content_length = document.content_length;
        }
        self.mappings.push(LineMapping {
            document,
            generated,
        });
    }

    /// The recorded mappings, in emission order.
    pub fn mappings(&self) -> &[LineMapping] {
        &self.mappings
    }

    /// Number of recorded mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether any mappings have been recorded.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
