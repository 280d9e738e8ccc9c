//! Document state management and text utilities.
//!
//! This module provides:
//! - `LineIndex` for LSP position -> byte offset conversion
//! - `DocumentState` and `DocumentStore` for document lifecycle management

mod state;
mod text;

pub use state::{DocumentState, DocumentStore};
pub use text::LineIndex;
