//! Code emission with source attribution for Stencil.
//!
//! [`CodeWriter`] is the append-only output sink the code-generation
//! layer writes through: it tracks its own position, handles
//! indentation, and owns the compilation unit's
//! [`stencil_source_map::LineMappingManager`].
//!
//! [`LineMappingWriter`] brackets a generated-output span with accurate
//! source attribution: constructing one emits a line-number directive
//! and snapshots the output position; dropping it registers exactly one
//! (document, generated) mapping pair and emits the directives that
//! return the output to default numbering. Regions nest safely — each
//! scope manages its own sub-mapping.
//!
//! # Example
//!
//! ```rust
//! use stencil_codegen::{CodeWriter, LineMappingWriter};
//! use stencil_source_map::SourceLocation;
//!
//! let mut writer = CodeWriter::new();
//! {
//!     let mut mapping =
//!         LineMappingWriter::new(&mut writer, SourceLocation::new(12, 2, 0), Some(4), "page.stencil");
//!     mapping.writer().write("name");
//! }
//! assert_eq!(writer.mappings().len(), 1);
//! assert!(writer.to_string().contains("#line 3 \"page.stencil\""));
//! ```

pub mod line_mapping_writer;
pub mod writer;

pub use line_mapping_writer::LineMappingWriter;
pub use writer::CodeWriter;
