//! SCSS partial scaffolding language server.
//!
//! The core logic is plain functions over text and offsets (`markup`,
//! `stylesheet`, `partial`); the `Backend` binds them to a host editor
//! over LSP. Interactive choices go through `window/showMessageRequest`,
//! notifications through `window/showMessage`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

mod commands;
mod document;
pub(crate) mod markup;
pub(crate) mod partial;
pub(crate) mod settings;
pub(crate) mod stylesheet;

pub use document::{DocumentState, DocumentStore, LineIndex};
pub use markup::{extract_attribute, locate_tag, scan_tags, tag_at_offset, TagData, TagSpan};
pub use partial::{
    create_partial, import_base_name, partial_contents, partial_file_name, sanitize_selector,
    selector_options, CreateOutcome, PartialError,
};
pub use settings::{
    load_settings, save_settings, Settings, SettingsError, DEFAULT_MAIN_STYLESHEET, SETTINGS_FILE,
};
pub use stylesheet::{insert_import, list_sections, SectionNotFound};

use commands::{CreatePartialArgs, SetMainStylesheetArgs};

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    workspace_root: OnceLock<PathBuf>,
    settings: RwLock<Settings>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            workspace_root: OnceLock::new(),
            settings: RwLock::new(Settings::default()),
        }
    }

    async fn notify_info(&self, message: String) {
        self.client.show_message(MessageType::INFO, message).await;
    }

    async fn notify_error(&self, message: String) {
        self.client.show_message(MessageType::ERROR, message).await;
    }

    /// Present options through `window/showMessageRequest` and return the
    /// chosen title. `None` means the user dismissed the request, which is
    /// a normal early-exit, not an error.
    async fn pick(&self, prompt: &str, options: &[String]) -> Option<String> {
        let actions: Vec<MessageActionItem> = options
            .iter()
            .map(|title| MessageActionItem {
                title: title.clone(),
                properties: Default::default(),
            })
            .collect();

        match self
            .client
            .show_message_request(MessageType::INFO, prompt.to_string(), Some(actions))
            .await
        {
            Ok(choice) => choice.map(|item| item.title),
            Err(e) => {
                tracing::error!("chooser request failed: {}", e);
                None
            }
        }
    }

    /// Ask the client to open a file. Best-effort; clients without
    /// `window/showDocument` support just skip it.
    async fn open_in_editor(&self, path: &Path) {
        let Ok(uri) = Url::from_file_path(path) else {
            return;
        };
        let _ = self
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: None,
                take_focus: Some(true),
                selection: None,
            })
            .await;
    }

    async fn run_create_partial(&self, args: CreatePartialArgs) {
        let Some(doc) = self.documents.get(&args.uri) else {
            self.notify_error(format!("No open document for {}", args.uri))
                .await;
            return;
        };
        let Some(tag) = doc.tag_at_position(args.position) else {
            self.notify_error("No matching markup tag found".to_string())
                .await;
            return;
        };

        let options = partial::selector_options(&tag);
        let Some(selector) = self
            .pick("Choose an attribute to base the SCSS file on", &options)
            .await
        else {
            return;
        };

        let Some(root) = self.workspace_root.get() else {
            self.notify_error("No workspace folder found".to_string())
                .await;
            return;
        };

        let relative = self.settings.read().await.main_stylesheet_path();
        let main_path = root.join(&relative);
        if !main_path.exists() {
            self.notify_error(format!(
                "Main stylesheet not found at {}; point {} at an existing file",
                main_path.display(),
                commands::SET_MAIN_STYLESHEET,
            ))
            .await;
            return;
        }

        let source = match std::fs::read_to_string(&main_path) {
            Ok(source) => source,
            Err(e) => {
                self.notify_error(format!("Failed to read {}: {}", main_path.display(), e))
                    .await;
                return;
            }
        };

        let sections = stylesheet::list_sections(&source);
        if sections.is_empty() {
            self.notify_error(format!(
                "No `// Name` sections found in {}",
                relative.display()
            ))
            .await;
            return;
        }
        let Some(section) = self
            .pick("Choose a directory for the new SCSS file", &sections)
            .await
        else {
            return;
        };

        match partial::create_partial(&main_path, &section, &selector) {
            Ok(CreateOutcome::Created { partial_path }) => {
                self.notify_info(format!("SCSS file created: {}", partial_path.display()))
                    .await;
                self.open_in_editor(&partial_path).await;
                self.notify_info(format!("SCSS file linked in {}", relative.display()))
                    .await;
            }
            Ok(CreateOutcome::AlreadyExists { partial_path }) => {
                self.open_in_editor(&partial_path).await;
                self.notify_info(format!(
                    "SCSS file already exists: {}",
                    partial_path.display()
                ))
                .await;
            }
            Ok(CreateOutcome::ImportSectionMissing {
                partial_path,
                section,
            }) => {
                self.open_in_editor(&partial_path).await;
                self.notify_error(format!(
                    "Could not find the {} section in {}",
                    section,
                    relative.display()
                ))
                .await;
            }
            Err(e) => {
                self.notify_error(format!("Failed to create SCSS file: {}", e))
                    .await;
            }
        }
    }

    async fn run_set_main_stylesheet(&self, args: SetMainStylesheetArgs) {
        let Some(root) = self.workspace_root.get() else {
            self.notify_error("No workspace folder found".to_string())
                .await;
            return;
        };
        let Ok(path) = args.uri.to_file_path() else {
            self.notify_error(format!("{} is not a file path", args.uri))
                .await;
            return;
        };
        let Ok(relative) = path.strip_prefix(root) else {
            self.notify_error(format!(
                "{} is outside the workspace root",
                path.display()
            ))
            .await;
            return;
        };
        let relative = relative.to_path_buf();

        let saved = {
            let mut settings = self.settings.write().await;
            settings.main_stylesheet = Some(relative.clone());
            settings::save_settings(&root.join(settings::SETTINGS_FILE), &settings)
        };

        match saved {
            Ok(()) => {
                self.notify_info(format!("Main SCSS file set to: {}", relative.display()))
                    .await;
            }
            Err(e) => self.notify_error(format!("Failed to save settings: {}", e)).await,
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        if let Some(root) = workspace_root {
            let loaded = settings::load_settings(&root.join(settings::SETTINGS_FILE));
            *self.settings.write().await = loaded;
            let _ = self.workspace_root.set(root);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: commands::ALL.iter().map(|c| c.to_string()).collect(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "scssp language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.documents.open(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.open(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        match params.command.as_str() {
            commands::CREATE_PARTIAL => {
                let args = commands::parse_args::<CreatePartialArgs>(params.arguments)?;
                self.run_create_partial(args).await;
            }
            commands::SET_MAIN_STYLESHEET => {
                let args = commands::parse_args::<SetMainStylesheetArgs>(params.arguments)?;
                self.run_set_main_stylesheet(args).await;
            }
            other => {
                return Err(tower_lsp::jsonrpc::Error {
                    code: tower_lsp::jsonrpc::ErrorCode::InvalidParams,
                    message: format!("unknown command: {}", other).into(),
                    data: None,
                });
            }
        }
        Ok(None)
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
