//! Source mapping for Stencil
//!
//! This crate provides the position types shared by the template rewriter
//! and the code generator, plus the line-mapping table that lets generated
//! output be traced back to original template text.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceLocation`]: a position in a text document (line, character,
//!   absolute offset), with newline-aware advancement
//! - [`MappingLocation`]: a location paired with a content length
//! - [`LineMappingManager`]: the ordered, append-only table of
//!   (document, generated) mapping pairs for one compilation unit
//!
//! # Example
//!
//! ```rust
//! use stencil_source_map::{LineMappingManager, MappingLocation, SourceLocation};
//!
//! let start = SourceLocation::zero().advance("line one\n  ");
//! assert_eq!(start.line, 1);
//! assert_eq!(start.character, 2);
//!
//! let mut manager = LineMappingManager::new();
//! manager.add_mapping(
//!     MappingLocation::new(start, Some(4)),
//!     MappingLocation::new(SourceLocation::zero(), Some(4)),
//! );
//! assert_eq!(manager.mappings().len(), 1);
//! ```

pub mod manager;
pub mod types;

// Re-export main types
pub use manager::{LineMapping, LineMappingManager};
pub use types::{MappingLocation, SourceLocation};
