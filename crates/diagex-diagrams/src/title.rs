//! Output name resolution from section headings.
//!
//! Each diagram is named after the closest `## ` heading that precedes it.
//! Headings are collected once per document into a [`HeadingIndex`] and
//! looked up by binary search on the block's start offset.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::DiagramBlock;

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]([^\r\n]*)").unwrap());

/// A second-level heading in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Heading {
    /// Byte offset of the heading line.
    offset: usize,
    /// Byte offset where the heading text starts.
    text_start: usize,
    /// Byte offset where the heading text ends.
    text_end: usize,
}

/// Headings of one document, sorted by offset.
#[derive(Debug)]
pub struct HeadingIndex<'a> {
    text: &'a str,
    headings: Vec<Heading>,
}

impl<'a> HeadingIndex<'a> {
    /// Collect all `## ` headings of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let headings = HEADING_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let line = caps.get(0)?;
                let title = caps.get(1)?;
                Some(Heading {
                    offset: line.start(),
                    text_start: title.start(),
                    text_end: title.end(),
                })
            })
            .collect();
        Self { text, headings }
    }

    /// Text of the last heading starting strictly before `offset`.
    ///
    /// The returned text never extends past `offset`.
    #[must_use]
    pub fn preceding(&self, offset: usize) -> Option<&'a str> {
        let pos = self.headings.partition_point(|h| h.offset < offset);
        let heading = self.headings.get(pos.checked_sub(1)?)?;
        let end = heading.text_end.min(offset).max(heading.text_start);
        self.text.get(heading.text_start..end)
    }

    /// Resolve the output name of `block`.
    ///
    /// Falls back to `diagram_<index + 1>` when no heading precedes the block
    /// or the heading has no usable characters.
    #[must_use]
    pub fn resolve(&self, block: &DiagramBlock<'_>) -> String {
        let name = self
            .preceding(block.start_offset)
            .map(slugify)
            .unwrap_or_default();
        if name.is_empty() {
            block.fallback_name()
        } else {
            name
        }
    }
}

/// Turn heading text into a filesystem-safe name.
///
/// Keeps ASCII word characters, hyphens and whitespace, turns every
/// whitespace run into a single underscore and lower-cases the result.
/// Leading and trailing whitespace runs become underscores too.
#[must_use]
pub fn slugify(heading: &str) -> String {
    let mut slug = String::with_capacity(heading.len());
    let mut in_whitespace = false;
    for c in heading.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c.to_ascii_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Fence;
    use pretty_assertions::assert_eq;

    fn names(text: &str) -> Vec<String> {
        let index = HeadingIndex::new(text);
        Fence::mermaid()
            .blocks(text)
            .map(|block| index.resolve(&block))
            .collect()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Login Flow"), "login_flow");
        assert_eq!(slugify("Class Diagram - Users"), "class_diagram_-_users");
        assert_eq!(slugify("snake_case stays"), "snake_case_stays");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("1. Overview (v2)!"), "1_overview_v2");
        assert_eq!(slugify("User's `Profile`"), "users_profile");
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("Many   spaces\there"), "many_spaces_here");
        assert_eq!(slugify("a ! b"), "a_b");
    }

    #[test]
    fn test_slugify_keeps_edge_whitespace_as_underscore() {
        assert_eq!(slugify("Login Flow "), "login_flow_");
        assert_eq!(slugify(" Two Words"), "_two_words");
        assert_eq!(slugify("  \t "), "_");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Überblick"), "caf_berblick");
    }

    #[test]
    fn test_slugify_punctuation_only_is_empty() {
        assert_eq!(slugify("!!!???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_resolve_login_flow() {
        assert_eq!(names("## Login Flow\n```mermaid\nA-->B\n```\n"), vec!["login_flow"]);
    }

    #[test]
    fn test_resolve_without_heading_uses_position() {
        let text = "# Title\n```mermaid\nA\n```\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["diagram_1", "diagram_2"]);
    }

    #[test]
    fn test_resolve_picks_closest_heading() {
        let text = "## First\n\n## Second\ntext\n```mermaid\nA\n```\n## Third\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["second", "third"]);
    }

    #[test]
    fn test_resolve_same_heading_twice() {
        let text = "## Flows\n```mermaid\nA\n```\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["flows", "flows"]);
    }

    #[test]
    fn test_resolve_fallback_counts_all_blocks() {
        let text = "```mermaid\nA\n```\n## Named\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["diagram_1", "named"]);
    }

    #[test]
    fn test_resolve_punctuation_heading_falls_back() {
        let text = "## ???\n```mermaid\nA\n```\n## !!!\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["diagram_1", "diagram_2"]);
    }

    #[test]
    fn test_other_heading_levels_ignored() {
        let text = "# Top\n### Deep\n#### Deeper\n```mermaid\nA\n```\n";
        assert_eq!(names(text), vec!["diagram_1"]);
    }

    #[test]
    fn test_heading_must_start_line() {
        let text = "text ## Not a heading\n```mermaid\nA\n```\n";
        assert_eq!(names(text), vec!["diagram_1"]);
    }

    #[test]
    fn test_heading_after_block_not_used() {
        let text = "```mermaid\nA\n```\n## Later\n";
        assert_eq!(names(text), vec!["diagram_1"]);
    }

    #[test]
    fn test_heading_whitespace_kept_in_name() {
        let text = "## Login Flow \n```mermaid\nA\n```\n##  Two Words\n```mermaid\nB\n```\n";
        assert_eq!(names(text), vec!["login_flow_", "_two_words"]);
    }

    #[test]
    fn test_crlf_heading() {
        let text = "## Data Model\r\n```mermaid\r\nA\r\n```\r\n";
        assert_eq!(names(text), vec!["data_model"]);
    }

    #[test]
    fn test_preceding_clamps_to_offset() {
        let text = "## Inline ```mermaid\nA\n```\n";
        let index = HeadingIndex::new(text);
        let block = Fence::mermaid().blocks(text).next().unwrap();

        assert_eq!(index.preceding(block.start_offset), Some("Inline "));
        assert_eq!(index.resolve(&block), "inline_");
    }

    #[test]
    fn test_preceding_before_first_heading() {
        let index = HeadingIndex::new("intro\n## One\n## Two\n");

        assert_eq!(index.preceding(0), None);
        assert_eq!(index.preceding(6), None);
        assert_eq!(index.preceding(13), Some("One"));
        assert_eq!(index.preceding(100), Some("Two"));
    }

    #[test]
    fn test_empty_index() {
        let index = HeadingIndex::new("no headings here");
        assert_eq!(index.preceding(10), None);
    }

    #[test]
    fn test_naming_is_deterministic() {
        let text = "## A\n```mermaid\nx\n```\n```mermaid\ny\n```\n## B\n```mermaid\nz\n```\n";
        assert_eq!(names(text), names(text));
    }
}
