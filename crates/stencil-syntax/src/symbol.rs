//! Lexical symbols produced by the tokenizer.

use serde::{Deserialize, Serialize};

/// Classification of a lexical symbol.
///
/// Only the kinds the semantic-lowering stage actually consults are
/// modeled; everything else the tokenizer emits arrives as `Text` or
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Text,
    WhiteSpace,
    NewLine,
    OpenAngle,
    CloseAngle,
    ForwardSlash,
    Equals,
    DoubleQuote,
    SingleQuote,
    Transition,
    Unknown,
}

/// A single lexical symbol: a classified slice of template text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// The raw text of the symbol.
    pub content: String,
    /// The symbol's classification.
    pub kind: SymbolKind,
}

impl Symbol {
    /// Create a symbol of an arbitrary kind.
    pub fn new(content: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }

    /// A text symbol.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, SymbolKind::Text)
    }

    /// A whitespace symbol.
    pub fn whitespace(content: impl Into<String>) -> Self {
        Self::new(content, SymbolKind::WhiteSpace)
    }

    /// The `<` symbol.
    pub fn open_angle() -> Self {
        Self::new("<", SymbolKind::OpenAngle)
    }

    /// The `>` symbol.
    pub fn close_angle() -> Self {
        Self::new(">", SymbolKind::CloseAngle)
    }

    /// The `/` symbol.
    pub fn forward_slash() -> Self {
        Self::new("/", SymbolKind::ForwardSlash)
    }

    /// Length of the symbol in characters.
    pub fn length(&self) -> usize {
        self.content.chars().count()
    }
}
