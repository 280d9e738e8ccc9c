//! Partial-file creation and registration.
//!
//! Given a chosen selector and a chosen section, this module derives the
//! partial's filename, writes the stub rule block, and registers an import
//! for it in the main stylesheet. Filesystem errors propagate immediately;
//! nothing is retried or rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::markup::TagData;
use crate::stylesheet;

/// A failure while creating or registering a partial.
#[derive(Debug, Error)]
pub enum PartialError {
    /// The main stylesheet or the partial could not be read or written.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// What `create_partial` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The partial was written and the import spliced into the main
    /// stylesheet.
    Created {
        /// Absolute path of the new partial.
        partial_path: PathBuf,
    },

    /// A partial with the derived name already exists. Nothing was
    /// written and the main stylesheet was not touched.
    AlreadyExists {
        /// Absolute path of the existing partial.
        partial_path: PathBuf,
    },

    /// The partial was written but the section marker is missing from the
    /// main stylesheet, so no import was registered. The file stays on
    /// disk.
    ImportSectionMissing {
        /// Absolute path of the new partial.
        partial_path: PathBuf,
        /// The section that could not be found.
        section: String,
    },
}

/// Strip selector sigils: every `#` and `.` in the selector, not just
/// leading ones.
pub fn sanitize_selector(selector: &str) -> String {
    selector.replace(['#', '.'], "")
}

/// Partial filename for a selector: `_<sanitized>.scss`.
pub fn partial_file_name(selector: &str) -> String {
    format!("_{}.scss", sanitize_selector(selector))
}

/// Import base name: the partial filename minus the leading underscore
/// and the extension.
pub fn import_base_name(selector: &str) -> String {
    sanitize_selector(selector)
}

/// Contents of a fresh partial: one empty rule block for the selector.
pub fn partial_contents(selector: &str) -> String {
    format!("{} {{\n\n}}", selector)
}

/// Chooser options for a located tag: `#id`, then each `.class`, then the
/// bare tag name.
pub fn selector_options(tag: &TagData) -> Vec<String> {
    let mut options = Vec::with_capacity(tag.classes.len() + 2);
    if let Some(id) = &tag.id {
        options.push(format!("#{}", id));
    }
    for class in &tag.classes {
        options.push(format!(".{}", class));
    }
    options.push(tag.tag.clone());
    options
}

/// Create the partial for `selector` under the section's directory and
/// register its import in the main stylesheet.
///
/// The target directory is `<dir of main stylesheet>/<section>`, with the
/// section name lower-cased before any filesystem use. An existing partial
/// short-circuits without touching anything.
pub fn create_partial(
    main_stylesheet: &Path,
    section: &str,
    selector: &str,
) -> Result<CreateOutcome, PartialError> {
    let section = section.to_lowercase();
    let main_dir = main_stylesheet.parent().unwrap_or_else(|| Path::new(""));
    let target_dir = main_dir.join(&section);
    let partial_path = target_dir.join(partial_file_name(selector));

    if partial_path.exists() {
        return Ok(CreateOutcome::AlreadyExists { partial_path });
    }

    fs::create_dir_all(&target_dir)?;
    fs::write(&partial_path, partial_contents(selector))?;

    let source = fs::read_to_string(main_stylesheet)?;
    match stylesheet::insert_import(&source, &section, &import_base_name(selector)) {
        Ok(updated) => {
            fs::write(main_stylesheet, updated)?;
            Ok(CreateOutcome::Created { partial_path })
        }
        Err(missing) => Ok(CreateOutcome::ImportSectionMissing {
            partial_path,
            section: missing.name,
        }),
    }
}
