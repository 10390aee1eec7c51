//! Scoped source attribution for a generated-output span.

use crate::writer::CodeWriter;
use stencil_source_map::{MappingLocation, SourceLocation};

/// Brackets a region of generated output with a source mapping.
///
/// Construction emits a line-number directive pointing at the document
/// location and snapshots the generated position; dropping the writer
/// registers exactly one (document, generated) mapping pair with the
/// compilation unit's manager, emits the directives restoring default
/// numbering, and restores the indentation saved at construction.
///
/// The guard holds the [`CodeWriter`] mutably for its whole scope;
/// content written inside the region goes through [`Self::writer`].
pub struct LineMappingWriter<'a> {
    writer: &'a mut CodeWriter,
    document: MappingLocation,
    generated_start: SourceLocation,
    generated_length: Option<usize>,
    start_indent: usize,
}

impl<'a> LineMappingWriter<'a> {
    /// Open a mapped region.
    ///
    /// `content_length` is the length of the original document content,
    /// or `None` when the construct has no intrinsic source length; in
    /// that case the document side inherits the generated length at
    /// registration time.
    pub fn new(
        writer: &'a mut CodeWriter,
        document_location: SourceLocation,
        content_length: Option<usize>,
        source_file: &str,
    ) -> Self {
        let document = MappingLocation::new(document_location, content_length);
        let start_indent = writer.indent();
        writer.reset_indent();

        if writer.last_char().is_some_and(|c| c != '\n') {
            writer.newline();
        }
        writer.write_line_number_directive(document_location.line + 1, source_file);

        let generated_start = writer.current_location();
        Self {
            writer,
            document,
            generated_start,
            generated_length: None,
            start_indent,
        }
    }

    /// The underlying writer, for emitting the region's content.
    pub fn writer(&mut self) -> &mut CodeWriter {
        self.writer
    }

    /// Re-snapshot the generated-range start at the current position.
    pub fn mark_start(&mut self) {
        self.generated_start = self.writer.current_location();
    }

    /// Compute the generated length now. Scope exit will not recompute
    /// it.
    pub fn mark_end(&mut self) {
        self.generated_length = Some(self.writer.length() - self.generated_start.absolute);
    }
}

impl Drop for LineMappingWriter<'_> {
    fn drop(&mut self) {
        let generated_length = self
            .generated_length
            .unwrap_or_else(|| self.writer.length() - self.generated_start.absolute);
        let generated = MappingLocation::new(self.generated_start, Some(generated_length));

        tracing::debug!(
            document = self.document.location.absolute,
            generated = self.generated_start.absolute,
            length = generated_length,
            "registering line mapping"
        );
        self.writer.mappings_mut().add_mapping(self.document, generated);

        if self.writer.last_char().is_some_and(|c| c != '\n') {
            self.writer.newline();
        }
        self.writer.write_line_default_directive();
        self.writer.write_line_hidden_directive();

        let start_indent = self.start_indent;
        self.writer.set_indent(start_indent);
    }
}
