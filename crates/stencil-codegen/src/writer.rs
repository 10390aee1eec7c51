//! The append-only output sink for generated code.

use std::fmt;

use stencil_source_map::{LineMappingManager, SourceLocation};

/// Accumulates generated output text.
///
/// The writer tracks its own [`SourceLocation`] within the generated
/// text (newline-aware, counted in characters), applies the current
/// indentation lazily at the start of each line, and owns the
/// compilation unit's [`LineMappingManager`].
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    location: SourceLocation,
    indent: usize,
    at_line_start: bool,
    mappings: LineMappingManager,
}

impl CodeWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self {
            at_line_start: true,
            ..Self::default()
        }
    }

    /// Append text, indenting at line starts.
    pub fn write(&mut self, text: &str) -> &mut Self {
        for piece in text.split_inclusive('\n') {
            let is_terminator_only = piece == "\n" || piece == "\r\n";
            if self.at_line_start && self.indent > 0 && !is_terminator_only {
                let indent = " ".repeat(self.indent);
                self.push_raw(&indent);
            }
            self.push_raw(piece);
            self.at_line_start = piece.ends_with('\n');
        }
        self
    }

    /// Append text followed by a newline.
    pub fn write_line(&mut self, text: &str) -> &mut Self {
        self.write(text).write("\n")
    }

    /// Append a bare newline.
    pub fn newline(&mut self) -> &mut Self {
        self.write("\n")
    }

    /// Emit a `#line N "file"` directive on its own line.
    pub fn write_line_number_directive(&mut self, line: usize, file: &str) -> &mut Self {
        self.write_line(&format!("#line {line} \"{file}\""))
    }

    /// Emit a `#line default` directive on its own line.
    pub fn write_line_default_directive(&mut self) -> &mut Self {
        self.write_line("#line default")
    }

    /// Emit a `#line hidden` directive on its own line.
    pub fn write_line_hidden_directive(&mut self) -> &mut Self {
        self.write_line("#line hidden")
    }

    /// The writer's current position in the generated text.
    pub fn current_location(&self) -> SourceLocation {
        self.location
    }

    /// Total generated length so far, in characters.
    pub fn length(&self) -> usize {
        self.location.absolute
    }

    /// The most recently appended character.
    pub fn last_char(&self) -> Option<char> {
        self.output.chars().next_back()
    }

    /// Current indentation, in spaces.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Set the indentation, in spaces.
    pub fn set_indent(&mut self, indent: usize) -> &mut Self {
        self.indent = indent;
        self
    }

    /// Reset the indentation to zero.
    pub fn reset_indent(&mut self) -> &mut Self {
        self.set_indent(0)
    }

    /// The line-mapping table for this compilation unit.
    pub fn mappings(&self) -> &LineMappingManager {
        &self.mappings
    }

    /// Mutable access to the line-mapping table.
    pub fn mappings_mut(&mut self) -> &mut LineMappingManager {
        &mut self.mappings
    }

    /// Consume the writer, returning the generated text and the mapping
    /// table.
    pub fn finish(self) -> (String, LineMappingManager) {
        (self.output, self.mappings)
    }

    fn push_raw(&mut self, text: &str) {
        self.output.push_str(text);
        self.location = self.location.advance(text);
    }
}

impl fmt::Display for CodeWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
