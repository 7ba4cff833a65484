//! Editor option profiles.
//!
//! Options arrive from the background process and are replaced wholesale on
//! profile refresh, never merged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mode the editor auto-enters when a session initializes without a resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultEditorMode {
    #[default]
    None,
    Edit,
    Format,
    Cut,
    CutExternal,
}

/// Per-session editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    /// Reopen this session in the editor after save.
    pub open_editor: bool,
    /// Open the saved artifact after save.
    pub open_saved_page: bool,
    /// Suppress the format control; derived from the frame's reported
    /// capability, not user-set.
    pub disable_format_page: bool,
    /// Mode auto-entered on init unless the init event signals a reset.
    pub default_editor_mode: DefaultEditorMode,
    /// Passed through on the final content request.
    #[serde(rename = "compressHTML", alias = "compressHtml")]
    pub compress_html: bool,
    /// Selects the themed format command over the unthemed one.
    pub apply_system_theme: bool,
    /// Gate the unload confirmation on unsaved changes.
    pub warn_unsaved_page: bool,
}

/// The `config.getProfiles` response shape: options keyed by profile name.
pub type OptionProfiles = HashMap<String, EditorOptions>;
