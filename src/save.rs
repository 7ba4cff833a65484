//! Save coordination: final-content requests and the archival handoff.
//!
//! A save never blocks: the controller emits a `getContent` command and the
//! completed page arrives later as a `setContent` frame event, which is
//! handed to the archival engine behind the [`Archiver`] seam.

use crate::error::Result;
use crate::options::EditorOptions;
use crate::protocol::{FrameCommand, UpdatedResources};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Completed page payload handed to the archival engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// External collaborator that archives a finished page.
#[async_trait]
pub trait Archiver: Send + Sync {
    async fn save_page(&self, page: PageData, options: EditorOptions) -> Result<()>;
}

/// Build the final content request, carrying the compression flag and a
/// snapshot of the accumulated resource overrides.
#[must_use]
pub fn content_request(
    options: &EditorOptions,
    updated_resources: &UpdatedResources,
) -> FrameCommand {
    FrameCommand::GetContent {
        compress_html: options.compress_html,
        updated_resources: updated_resources.clone(),
    }
}

/// Options used for the archival handoff. This save path never reopens the
/// editor or the saved artifact automatically.
#[must_use]
pub fn archive_options(options: &EditorOptions) -> EditorOptions {
    let mut options = options.clone();
    options.open_editor = false;
    options.open_saved_page = false;
    options
}
