//! Document state management for the scssp server.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::{Position, Url};

use crate::markup::{self, TagData, TagSpan};

use super::text::LineIndex;

/// State for a single open document.
///
/// Tags are re-scanned on every full-text update; there is no incremental
/// state to keep consistent.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Pre-computed line index for position conversion.
    pub line_index: LineIndex,
    /// All opening tags found in the document, in document order.
    pub tags: Vec<TagSpan>,
    /// Document version from the client.
    pub version: i32,
    /// The original source text.
    pub source: String,
}

impl DocumentState {
    /// Create a new document state by scanning the source for tags.
    pub fn new(source: String, version: i32) -> Self {
        let line_index = LineIndex::new(&source);
        let tags = markup::scan_tags(&source);
        Self {
            line_index,
            tags,
            version,
            source,
        }
    }

    /// Find the tag enclosing the given cursor position.
    pub fn tag_at_position(&self, position: Position) -> Option<TagData> {
        let offset = self.line_index.offset_at(&self.source, position)?;
        markup::tag_at_offset(&self.tags, offset)
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<DocumentState>>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open or update a document with the given source text.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Arc<DocumentState> {
        let state = Arc::new(DocumentState::new(source, version));
        self.documents.insert(uri, Arc::clone(&state));
        state
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Get a document's state.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_scanned_on_open() {
        let state = DocumentState::new("<div id=\"x\">hi</div>".to_string(), 0);
        assert_eq!(state.tags.len(), 1);
    }

    #[test]
    fn tag_at_position_resolves_through_the_line_index() {
        let source = "<p>\n<button id=\"go\" class=\"big\">ok</button>\n";
        let state = DocumentState::new(source.to_string(), 0);

        let data = state.tag_at_position(Position::new(1, 4)).unwrap();
        assert_eq!(data.tag, "button");
        assert_eq!(data.id.as_deref(), Some("go"));
        assert_eq!(data.classes, vec!["big"]);
    }

    #[test]
    fn position_outside_any_tag_is_none() {
        let state = DocumentState::new("<p>text</p>".to_string(), 0);
        assert_eq!(state.tag_at_position(Position::new(0, 4)), None);
    }

    #[test]
    fn store_replaces_on_reopen() {
        let store = DocumentStore::new();
        let uri = Url::parse("file:///tmp/index.html").unwrap();

        store.open(uri.clone(), "<div>".to_string(), 0);
        store.open(uri.clone(), "<span>".to_string(), 1);

        let state = store.get(&uri).unwrap();
        assert_eq!(state.version, 1);
        assert_eq!(state.tags[0].name, "span");

        store.close(&uri);
        assert!(store.get(&uri).is_none());
    }
}
