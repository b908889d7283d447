//! Fenced diagram block extraction.
//!
//! A block starts with a code fence tagged with the diagram label
//! (`` ```mermaid ``) and ends at the next closing fence. Matching is
//! non-greedy and purely textual: an opening fence without a closing one
//! ends the scan.

use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

use crate::consts::DEFAULT_FENCE;
use crate::error::ExportError;

static MERMAID_FENCE: LazyLock<Fence> = LazyLock::new(|| {
    Fence::new(DEFAULT_FENCE).expect("default fence label is a valid pattern")
});

/// One fenced diagram block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramBlock<'a> {
    /// Zero-based position among all extracted blocks.
    pub index: usize,
    /// Byte offset of the opening fence in the document.
    pub start_offset: usize,
    /// Text strictly between the fence markers.
    pub content: &'a str,
}

impl DiagramBlock<'_> {
    /// Name used when no heading precedes the block (`diagram_<index + 1>`).
    #[must_use]
    pub fn fallback_name(&self) -> String {
        format!("diagram_{}", self.index + 1)
    }
}

/// Compiled matcher for one fence label.
#[derive(Debug, Clone)]
pub struct Fence {
    label: String,
    pattern: Regex,
}

impl Fence {
    /// Build a matcher for `` ```<label> `` blocks.
    ///
    /// The label is matched literally.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidFence`] if the pattern cannot be compiled.
    pub fn new(label: &str) -> Result<Self, ExportError> {
        let pattern = Regex::new(&format!(r"```{}\r?\n((?s:.*?))```", regex::escape(label)))
            .map_err(|source| ExportError::InvalidFence {
                label: label.to_owned(),
                source,
            })?;
        Ok(Self {
            label: label.to_owned(),
            pattern,
        })
    }

    /// Matcher for `` ```mermaid `` blocks.
    #[must_use]
    pub fn mermaid() -> Self {
        MERMAID_FENCE.clone()
    }

    /// Fence label this matcher looks for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lazily iterate over the blocks of `text` in document order.
    #[must_use]
    pub fn blocks<'f, 't>(&'f self, text: &'t str) -> Blocks<'f, 't> {
        Blocks {
            captures: self.pattern.captures_iter(text),
            next_index: 0,
        }
    }
}

impl Default for Fence {
    fn default() -> Self {
        Self::mermaid()
    }
}

/// Iterator over the diagram blocks of one document.
pub struct Blocks<'f, 't> {
    captures: CaptureMatches<'f, 't>,
    next_index: usize,
}

impl<'t> Iterator for Blocks<'_, 't> {
    type Item = DiagramBlock<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
            return None;
        };

        let block = DiagramBlock {
            index: self.next_index,
            start_offset: whole.start(),
            content: content.as_str(),
        };
        self.next_index += 1;
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> Vec<DiagramBlock<'_>> {
        Fence::mermaid().blocks(text).collect()
    }

    #[test]
    fn test_no_blocks() {
        assert!(extract("# Title\n\nJust prose.\n").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_single_block_content() {
        let text = "## Login Flow\n```mermaid\nA-->B\n```\n";
        let blocks = extract(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "A-->B\n");
        assert_eq!(blocks[0].index, 0);
        assert_eq!(blocks[0].start_offset, 14);
        assert_eq!(&text[blocks[0].start_offset..][..10], "```mermaid");
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let text = "```mermaid\nfirst\n```\ntext\n```mermaid\nsecond\n```\n```mermaid\nthird\n```";
        let blocks = extract(text);

        let contents: Vec<_> = blocks.iter().map(|b| b.content).collect();
        assert_eq!(contents, vec!["first\n", "second\n", "third\n"]);
        let indexes: Vec<_> = blocks.iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert!(blocks.windows(2).all(|w| w[0].start_offset < w[1].start_offset));
    }

    #[test]
    fn test_content_preserves_internal_newlines() {
        let text = "```mermaid\nsequenceDiagram\n\n    A->>B: hi\n  B-->>A: ok\n```\n";
        let blocks = extract(text);

        assert_eq!(
            blocks[0].content,
            "sequenceDiagram\n\n    A->>B: hi\n  B-->>A: ok\n"
        );
    }

    #[test]
    fn test_non_greedy_stops_at_first_close() {
        let text = "```mermaid\nA\n```\nbetween\n```\nB\n```\n";
        let blocks = extract(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "A\n");
    }

    #[test]
    fn test_other_languages_ignored() {
        let text = "```rust\nfn main() {}\n```\n```mermaid\ngraph TD\n```\n```plantuml\n@startuml\n```\n";
        let blocks = extract(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "graph TD\n");
        assert_eq!(blocks[0].index, 0);
    }

    #[test]
    fn test_label_must_end_the_line() {
        assert!(extract("```mermaid-js\nA\n```\n").is_empty());
        assert!(extract("```mermaid {format=png}\nA\n```\n").is_empty());
    }

    #[test]
    fn test_unclosed_fence_ends_scan() {
        let text = "```mermaid\nA\n```\n```mermaid\nunclosed\n";
        let blocks = extract(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "A\n");
    }

    #[test]
    fn test_crlf_opening_line() {
        let text = "```mermaid\r\nA-->B\r\n```\r\n";
        let blocks = extract(text);

        assert_eq!(blocks[0].content, "A-->B\r\n");
    }

    #[test]
    fn test_empty_block() {
        let blocks = extract("```mermaid\n```\n");

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "");
    }

    #[test]
    fn test_custom_label_is_literal() {
        let fence = Fence::new("c++").unwrap();
        let text = "```c++\nint x;\n```\n```cxx\nno\n```\n";
        let blocks: Vec<_> = fence.blocks(text).collect();

        assert_eq!(fence.label(), "c++");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "int x;\n");
    }

    #[test]
    fn test_fallback_name_is_one_based() {
        let block = DiagramBlock {
            index: 0,
            start_offset: 0,
            content: "",
        };
        assert_eq!(block.fallback_name(), "diagram_1");

        let block = DiagramBlock { index: 6, ..block };
        assert_eq!(block.fallback_name(), "diagram_7");
    }
}
