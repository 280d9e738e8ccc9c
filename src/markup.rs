//! Markup tag scanning for selector discovery.
//!
//! This module provides regex-based extraction of opening tags from raw
//! markup text, keeping byte spans into the original document so a cursor
//! offset can be matched against them.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern for an opening tag: `<` + tag name + attributes + `>`.
///
/// Self-closing tags match too since `/` is a valid attribute byte here.
/// Unterminated tags simply never match.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<([a-z0-9]+)([^>]*)>").unwrap());

/// A single opening tag found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// The tag name as written in the source.
    pub name: String,

    /// The raw attribute substring between the tag name and the closing `>`.
    pub attributes: String,

    /// Half-open byte span of the whole `<...>` match in the original text.
    pub span: Range<usize>,
}

impl TagSpan {
    /// Whether the span contains the given byte offset.
    ///
    /// Start-inclusive, end-exclusive: the cursor on the closing `>` itself
    /// is already outside the tag.
    pub fn contains(&self, offset: usize) -> bool {
        self.span.contains(&offset)
    }

    /// Derive the selector-relevant attributes from this tag.
    pub fn to_tag_data(&self) -> TagData {
        let id = extract_attribute(&self.attributes, "id");
        let classes = extract_attribute(&self.attributes, "class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        TagData {
            tag: self.name.clone(),
            id,
            classes,
        }
    }
}

/// Tag metadata offered to the user as selector candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagData {
    /// The tag name.
    pub tag: String,

    /// Value of the `id` attribute, if any.
    pub id: Option<String>,

    /// Class tokens from the `class` attribute; empty when the attribute
    /// is absent.
    pub classes: Vec<String>,
}

/// Scan the document for opening tags, in document order.
pub fn scan_tags(source: &str) -> Vec<TagSpan> {
    let mut tags = Vec::new();

    for caps in TAG_PATTERN.captures_iter(source) {
        let (Some(whole), Some(name), Some(attrs)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        tags.push(TagSpan {
            name: name.as_str().to_string(),
            attributes: attrs.as_str().to_string(),
            span: whole.range(),
        });
    }

    tags
}

/// Find the first tag whose span contains the offset.
///
/// Scan order is document order, so with overlapping matches in bogus
/// markup the earliest tag wins, not the innermost one.
pub fn tag_at_offset(tags: &[TagSpan], offset: usize) -> Option<TagData> {
    tags.iter()
        .find(|tag| tag.contains(offset))
        .map(TagSpan::to_tag_data)
}

/// Locate the tag enclosing `offset` in `source`.
pub fn locate_tag(source: &str, offset: usize) -> Option<TagData> {
    tag_at_offset(&scan_tags(source), offset)
}

/// Extract a `name = "value"` or `name = 'value'` attribute, case-insensitively.
///
/// Returns `None` when the attribute is missing or its value is empty.
pub fn extract_attribute(attributes: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"(?i){}\s*=\s*["']([^"']+)["']"#, regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(attributes)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tag_containing_offset() {
        let source = r#"<div id="main"><span>text</span></div>"#;
        // Offset 5 is inside `<div id="main">`
        let data = locate_tag(source, 5).unwrap();
        assert_eq!(data.tag, "div");
        assert_eq!(data.id.as_deref(), Some("main"));
    }

    #[test]
    fn offset_outside_every_tag_returns_none() {
        let source = "<div>text</div>";
        // "text" starts at offset 5
        assert_eq!(locate_tag(source, 6), None);
    }

    #[test]
    fn containment_is_end_exclusive() {
        let source = "<div>";
        assert!(locate_tag(source, 0).is_some());
        assert!(locate_tag(source, 4).is_some());
        assert_eq!(locate_tag(source, 5), None);
    }

    #[test]
    fn spans_index_the_original_text() {
        let source = "hello <button id=\"go\"> world";
        let tags = scan_tags(source);
        assert_eq!(tags.len(), 1);
        assert_eq!(&source[tags[0].span.clone()], "<button id=\"go\">");
    }

    #[test]
    fn extracts_id_and_classes() {
        let source = r#"<div id="foo" class="a b c">"#;
        let data = locate_tag(source, 1).unwrap();
        assert_eq!(data.id.as_deref(), Some("foo"));
        assert_eq!(data.classes, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_class_gives_empty_vec() {
        let source = r#"<div id="foo">"#;
        let data = locate_tag(source, 1).unwrap();
        assert_eq!(data.id.as_deref(), Some("foo"));
        assert!(data.classes.is_empty());
    }

    #[test]
    fn missing_id_gives_none() {
        let source = r#"<div class="x">"#;
        let data = locate_tag(source, 1).unwrap();
        assert_eq!(data.id, None);
        assert_eq!(data.classes, vec!["x"]);
    }

    #[test]
    fn class_splits_on_whitespace_runs() {
        let source = "<div class=\"a   b\tc\">";
        let data = locate_tag(source, 1).unwrap();
        assert_eq!(data.classes, vec!["a", "b", "c"]);
    }

    #[test]
    fn attribute_lookup_is_case_insensitive() {
        assert_eq!(
            extract_attribute(r#" ID="header" "#, "id").as_deref(),
            Some("header")
        );
        assert_eq!(
            extract_attribute(r#" Class='x y' "#, "class").as_deref(),
            Some("x y")
        );
    }

    #[test]
    fn single_quoted_attributes() {
        let source = "<span id='s1' class='big'>";
        let data = locate_tag(source, 1).unwrap();
        assert_eq!(data.id.as_deref(), Some("s1"));
        assert_eq!(data.classes, vec!["big"]);
    }

    #[test]
    fn tag_name_matching_is_case_insensitive() {
        let data = locate_tag("<DIV id=\"x\">", 1).unwrap();
        assert_eq!(data.tag, "DIV");
        assert_eq!(data.id.as_deref(), Some("x"));
    }

    #[test]
    fn unterminated_tag_does_not_match() {
        assert!(scan_tags("<div id=\"x\"").is_empty());
    }

    #[test]
    fn self_closing_tag_matches() {
        let data = locate_tag("<img id=\"logo\"/>", 1).unwrap();
        assert_eq!(data.tag, "img");
        assert_eq!(data.id.as_deref(), Some("logo"));
    }

    #[test]
    fn closing_tags_do_not_shadow_scan_order() {
        let source = "<div><p id=\"inner\">x</p></div>";
        // Offset inside `<p ...>` resolves to the p tag, not div: the div
        // span ended at its own `>`.
        let data = locate_tag(source, 8).unwrap();
        assert_eq!(data.tag, "p");
    }

    #[test]
    fn first_match_wins_for_overlapping_bogus_markup() {
        // `<a ... <b ... >` : the scanner sees one tag starting at `<a`
        // whose attribute blob swallows `<b`, so an offset inside what a
        // human reads as the b tag still reports `a`.
        let source = "<a href=\"x\" <b id=\"y\">";
        let data = locate_tag(source, 14).unwrap();
        assert_eq!(data.tag, "a");
    }

    #[test]
    fn multiple_tags_resolve_by_position() {
        let source = "<ul><li class=\"item\">one</li><li class=\"other\">two</li></ul>";
        let first = locate_tag(source, 6).unwrap();
        assert_eq!(first.classes, vec!["item"]);
        let second = locate_tag(source, 31).unwrap();
        assert_eq!(second.classes, vec!["other"]);
    }
}
