//! Test doubles and setup for editor session integration tests.

#![allow(dead_code)]

use arkedit::controller::{EditorSession, UiDelegate};
use arkedit::error::Result;
use arkedit::options::EditorOptions;
use arkedit::protocol::{BackgroundChannel, BackgroundRequest, FrameChannel, FrameCommand};
use arkedit::save::{Archiver, PageData};
use arkedit::tab_data::TabDataStore;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records every command sent toward the embedded frame.
#[derive(Default)]
pub struct RecordingFrame {
    sent: Mutex<Vec<FrameCommand>>,
}

impl RecordingFrame {
    /// Drain and return everything sent so far.
    pub fn take(&self) -> Vec<FrameCommand> {
        std::mem::take(&mut *self.sent.lock().expect("frame lock"))
    }

    pub fn method_names(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .expect("frame lock")
            .iter()
            .map(FrameCommand::method_name)
            .collect()
    }
}

impl FrameChannel for RecordingFrame {
    fn send(&self, command: &FrameCommand) -> Result<()> {
        self.sent.lock().expect("frame lock").push(command.clone());
        Ok(())
    }
}

/// Records background requests and answers `config.getProfiles` with a
/// scripted profile map.
#[derive(Default)]
pub struct ScriptedBackground {
    requests: Mutex<Vec<BackgroundRequest>>,
    profiles: Mutex<Value>,
}

impl ScriptedBackground {
    pub fn with_profiles(profiles: Value) -> Self {
        Self {
            requests: Mutex::default(),
            profiles: Mutex::new(profiles),
        }
    }

    pub fn take_requests(&self) -> Vec<BackgroundRequest> {
        std::mem::take(&mut *self.requests.lock().expect("background lock"))
    }
}

#[async_trait]
impl BackgroundChannel for ScriptedBackground {
    async fn request(&self, request: &BackgroundRequest) -> Result<Value> {
        self.requests
            .lock()
            .expect("background lock")
            .push(request.clone());
        match request {
            BackgroundRequest::ConfigGetProfiles => {
                Ok(self.profiles.lock().expect("profiles lock").clone())
            }
            _ => Ok(json!({})),
        }
    }
}

/// Records archival handoffs.
#[derive(Default)]
pub struct RecordingArchiver {
    pages: Mutex<Vec<(PageData, EditorOptions)>>,
}

impl RecordingArchiver {
    pub fn take(&self) -> Vec<(PageData, EditorOptions)> {
        std::mem::take(&mut *self.pages.lock().expect("archiver lock"))
    }
}

#[async_trait]
impl Archiver for RecordingArchiver {
    async fn save_page(&self, page: PageData, options: EditorOptions) -> Result<()> {
        self.pages
            .lock()
            .expect("archiver lock")
            .push((page, options));
        Ok(())
    }
}

/// Records chrome updates and reported errors.
#[derive(Default)]
pub struct RecordingUi {
    pub titles: Mutex<Vec<String>>,
    pub icons: Mutex<Vec<String>>,
    pub format_visible: Mutex<Vec<bool>>,
    pub errors: Mutex<Vec<(String, Option<String>)>>,
}

impl UiDelegate for RecordingUi {
    fn set_title(&self, title: &str) {
        self.titles.lock().expect("ui lock").push(title.to_string());
    }

    fn set_icon(&self, icon: &str) {
        self.icons.lock().expect("ui lock").push(icon.to_string());
    }

    fn set_format_control_visible(&self, visible: bool) {
        self.format_visible.lock().expect("ui lock").push(visible);
    }

    fn report_error(&self, error: &str, link: Option<&str>) {
        self.errors
            .lock()
            .expect("ui lock")
            .push((error.to_string(), link.map(str::to_string)));
    }
}

/// A fully wired session over recording doubles and a temp-dir store.
pub struct EditorHarness {
    pub frame: Arc<RecordingFrame>,
    pub background: Arc<ScriptedBackground>,
    pub archiver: Arc<RecordingArchiver>,
    pub ui: Arc<RecordingUi>,
    pub store: TabDataStore,
    pub session: EditorSession,
    _store_dir: TempDir,
}

impl EditorHarness {
    pub fn new() -> Self {
        Self::with_background(ScriptedBackground::default())
    }

    pub fn with_background(background: ScriptedBackground) -> Self {
        let store_dir = tempfile::tempdir().expect("store dir");
        let frame = Arc::new(RecordingFrame::default());
        let background = Arc::new(background);
        let archiver = Arc::new(RecordingArchiver::default());
        let ui = Arc::new(RecordingUi::default());
        let store = TabDataStore::new(store_dir.path());
        let session = EditorSession::new(
            frame.clone(),
            background.clone(),
            store.clone(),
            archiver.clone(),
            ui.clone(),
        );
        Self {
            frame,
            background,
            archiver,
            ui,
            store,
            session,
            _store_dir: store_dir,
        }
    }
}

/// A `editor.setTabData` delivery carrying a whole record in one message.
pub fn tab_data_message(tab_id: &str, record: &Value, options: &EditorOptions) -> Value {
    json!({
        "method": "editor.setTabData",
        "tabId": tab_id,
        "content": record.to_string(),
        "options": options,
    })
}

/// Drive a session to `Ready` with the given page content and options.
pub async fn init_session(harness: &mut EditorHarness, content: &str, options: &EditorOptions) {
    let record = json!({ "tabId": "", "content": content });
    let message = tab_data_message("tab-1", &record, options);
    let event = serde_json::from_value(message).expect("setTabData message");
    harness
        .session
        .handle_background_event(event)
        .await
        .expect("init delivery");
    // Drop the init command the delivery produced so tests start clean.
    harness.frame.take();
}
