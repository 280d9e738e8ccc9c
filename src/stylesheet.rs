//! Section parsing and import splicing for the main stylesheet.
//!
//! The main stylesheet is organized into named sections, each introduced by
//! a marker line of the form `// Name`. Sections are recomputed from the
//! full text on every call; nothing is cached between edits.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// A whole line that is exactly `//` plus one word of letters, modulo
/// surrounding horizontal whitespace.
static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//[ \t]*([A-Za-z]+)[ \t]*\r?$").unwrap());

/// A line opening with `//`, marking where the previous section ends.
static SECTION_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*//").unwrap());

/// The requested section marker is absent from the stylesheet text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("section `{name}` not found in the main stylesheet")]
pub struct SectionNotFound {
    /// The section name that was searched for.
    pub name: String,
}

/// List section names in order of appearance, lower-cased.
///
/// Only whole-line markers count; `x // Base` and `// Base extra` are
/// ignored. Duplicate names are kept as-is so the chooser reflects the
/// stylesheet faithfully.
pub fn list_sections(source: &str) -> Vec<String> {
    SECTION_MARKER
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Find the byte span of a named section: its marker line through the
/// start of the next `//` line, or end of text.
fn find_section(source: &str, name: &str) -> Option<Range<usize>> {
    let pattern = format!(r"(?mi)^[ \t]*//[ \t]*{}[ \t]*\r?$", regex::escape(name));
    let marker = Regex::new(&pattern).ok()?;
    let m = marker.find(source)?;

    let end = SECTION_BOUNDARY
        .find_at(source, m.end())
        .map(|b| b.start())
        .unwrap_or(source.len());

    Some(m.start()..end)
}

/// Append an import line to the named section.
///
/// The section content (marker line included) is trimmed of trailing
/// whitespace, `@import "./<section>/<base_name>";` is appended on its own
/// line, and the section span is replaced in the full text. Every byte
/// outside the span is preserved exactly. Calling this twice with the same
/// arguments appends two import lines; duplicate prevention is up to the
/// caller.
pub fn insert_import(
    source: &str,
    section: &str,
    base_name: &str,
) -> Result<String, SectionNotFound> {
    let span = find_section(source, section).ok_or_else(|| SectionNotFound {
        name: section.to_string(),
    })?;

    let content = &source[span.clone()];
    let import_line = format!("\n@import \"./{}/{}\";\n", section, base_name);

    let mut updated = String::with_capacity(source.len() + import_line.len());
    updated.push_str(&source[..span.start]);
    updated.push_str(content.trim_end());
    updated.push_str(&import_line);
    updated.push_str(&source[span.end..]);

    Ok(updated)
}
