//! Session record and durable per-tab persistence.
//!
//! The in-memory [`TabData`] is the working copy mutated by the rest of the
//! controller; [`TabDataStore`] owns the durable copy, one JSON file per tab
//! id, so a session survives the hosting page being discarded and rebuilt.
//! The record is flushed opportunistically rather than on every mutation,
//! specifically right after a freshly delivered session payload is accepted.

use crate::error::{Error, Result};
use crate::options::EditorOptions;
use serde::{Deserialize, Serialize};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The canonical session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabData {
    /// Opaque tab/session identity assigned by the background process.
    pub tab_id: String,
    /// Captured page content handed to the editable frame, possibly large.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub options: EditorOptions,
    /// True once the document matches the last persisted or sent state.
    pub doc_saved: bool,
    /// RFC3339 stamp of the last durable write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}

impl TabData {
    /// Create an empty record for a tab.
    #[must_use]
    pub fn new(tab_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            ..Self::default()
        }
    }
}

/// Current wall-clock time as an RFC3339 millisecond timestamp.
#[must_use]
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Durable store holding one serialized [`TabData`] per tab id.
#[derive(Debug, Clone)]
pub struct TabDataStore {
    base_dir: PathBuf,
}

impl TabDataStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily
    /// on the first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Read the persisted record for `tab_id`.
    ///
    /// Fails with [`Error::TabDataNotFound`] if the session was never
    /// persisted; the caller supplies a default record in that case.
    pub async fn load(&self, tab_id: &str) -> Result<TabData> {
        let path = self.record_path(tab_id);
        if !path.exists() {
            return Err(Error::TabDataNotFound {
                tab_id: tab_id.to_string(),
            });
        }
        let contents = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Serialize and write the full record, overwriting any prior value for
    /// the same tab id.
    pub async fn save(&self, record: &TabData) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        write_json_atomic(&self.record_path(&record.tab_id), record)
    }

    fn record_path(&self, tab_id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", encode_tab_id(tab_id)))
    }
}

/// Encode a tab id for use as a file name.
fn encode_tab_id(tab_id: &str) -> String {
    tab_id.replace(['/', '\\', ':', '.'], "-")
}

fn write_json_atomic(path: &Path, record: &TabData) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let contents = serde_json::to_string(record)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| {
        Error::session(format!(
            "Failed to persist session data to {}: {}",
            path.display(),
            err.error
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DefaultEditorMode;

    fn store() -> (tempfile::TempDir, TabDataStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TabDataStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn save_then_load_round_trips_the_record() {
        let (_dir, store) = store();
        let record = TabData {
            tab_id: "42".to_string(),
            content: Some("<html><body>page</body></html>".to_string()),
            filename: Some("page.html".to_string()),
            options: EditorOptions {
                warn_unsaved_page: true,
                default_editor_mode: DefaultEditorMode::Edit,
                ..EditorOptions::default()
            },
            doc_saved: true,
            updated_date: Some(now_rfc3339()),
        };

        store.save(&record).await.expect("save");
        let restored = store.load("42").await.expect("load");
        assert_eq!(restored, record);
    }

    #[tokio::test]
    async fn load_of_never_persisted_tab_fails_not_found() {
        let (_dir, store) = store();
        match store.load("missing").await {
            Err(Error::TabDataNotFound { tab_id }) => assert_eq!(tab_id, "missing"),
            other => panic!("expected TabDataNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_overwrites_prior_record_for_same_tab() {
        let (_dir, store) = store();
        let mut record = TabData::new("7");
        record.content = Some("first".to_string());
        store.save(&record).await.expect("save");

        record.content = Some("second".to_string());
        record.doc_saved = true;
        store.save(&record).await.expect("save again");

        let restored = store.load("7").await.expect("load");
        assert_eq!(restored.content.as_deref(), Some("second"));
        assert!(restored.doc_saved);
    }

    #[tokio::test]
    async fn hostile_tab_ids_stay_inside_the_store_dir() {
        let (dir, store) = store();
        let record = TabData::new("../escape/http://x");
        store.save(&record).await.expect("save");
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(std::result::Result::ok)
            .collect();
        assert_eq!(entries.len(), 1);
        let restored = store.load("../escape/http://x").await.expect("load");
        assert_eq!(restored.tab_id, "../escape/http://x");
    }
}
