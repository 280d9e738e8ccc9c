//! Command names and argument types for `workspace/executeCommand`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{Position, Url};

/// Create a partial from the tag under the cursor.
pub const CREATE_PARTIAL: &str = "scssp.createPartial";

/// Persist the main stylesheet path for this workspace.
pub const SET_MAIN_STYLESHEET: &str = "scssp.setMainStylesheet";

/// All commands the server advertises.
pub const ALL: &[&str] = &[CREATE_PARTIAL, SET_MAIN_STYLESHEET];

/// Arguments for [`CREATE_PARTIAL`].
#[derive(Debug, Deserialize)]
pub struct CreatePartialArgs {
    /// Document the cursor is in.
    pub uri: Url,
    /// Cursor position.
    pub position: Position,
}

/// Arguments for [`SET_MAIN_STYLESHEET`].
#[derive(Debug, Deserialize)]
pub struct SetMainStylesheetArgs {
    /// File to record as the main stylesheet.
    pub uri: Url,
}

/// Deserialize a command's arguments from the first element of the
/// `executeCommand` argument array.
pub fn parse_args<T: DeserializeOwned>(arguments: Vec<Value>) -> jsonrpc::Result<T> {
    let value = arguments.into_iter().next().ok_or_else(|| jsonrpc::Error {
        code: jsonrpc::ErrorCode::InvalidParams,
        message: "missing command arguments".into(),
        data: None,
    })?;
    serde_json::from_value(value).map_err(|e| jsonrpc::Error {
        code: jsonrpc::ErrorCode::InvalidParams,
        message: format!("malformed command arguments: {}", e).into(),
        data: None,
    })
}
