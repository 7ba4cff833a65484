//! The editor session context.
//!
//! [`EditorSession`] owns all mutable session state and routes the three
//! input streams: toolbar intents from the host UI, events from the embedded
//! frame, and messages from the background process. All work runs as
//! reactions to those inputs; nothing blocks waiting for a reply, and a
//! command and its effect are never assumed adjacent in the event stream.
//!
//! Handler failures are per-message: a malformed or rejected message returns
//! an error to the caller and leaves the session processing subsequent
//! messages.

use crate::chunks::ChunkAssembler;
use crate::error::{Error, Result};
use crate::modes::ModeState;
use crate::options::OptionProfiles;
use crate::protocol::{
    BackgroundChannel, BackgroundEvent, BackgroundRequest, FrameChannel, FrameCommand, FrameEvent,
    UpdatedResource, UpdatedResources,
};
use crate::save::{self, Archiver, PageData};
use crate::tab_data::{self, TabData, TabDataStore};
use serde_json::{Value, json};
use std::sync::Arc;

/// Session readiness. Intents that need a populated record are rejected
/// with [`Error::NotReady`] until the lifecycle reaches `Ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Host-side chrome the controller cannot touch itself: page title, favicon,
/// format-control visibility, and the error reporter.
pub trait UiDelegate: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_icon(&self, icon: &str);
    fn set_format_control_visible(&self, visible: bool);
    fn report_error(&self, error: &str, link: Option<&str>);
}

/// One editing session over a captured page.
pub struct EditorSession {
    frame: Arc<dyn FrameChannel>,
    background: Arc<dyn BackgroundChannel>,
    store: TabDataStore,
    archiver: Arc<dyn Archiver>,
    ui: Arc<dyn UiDelegate>,
    lifecycle: Lifecycle,
    tab_data: TabData,
    modes: ModeState,
    chunks: ChunkAssembler,
    updated_resources: UpdatedResources,
}

impl EditorSession {
    pub fn new(
        frame: Arc<dyn FrameChannel>,
        background: Arc<dyn BackgroundChannel>,
        store: TabDataStore,
        archiver: Arc<dyn Archiver>,
        ui: Arc<dyn UiDelegate>,
    ) -> Self {
        Self {
            frame,
            background,
            store,
            archiver,
            ui,
            lifecycle: Lifecycle::Uninitialized,
            tab_data: TabData::default(),
            modes: ModeState::new(),
            chunks: ChunkAssembler::new(),
            updated_resources: UpdatedResources::new(),
        }
    }

    // ========================================================================
    // State access
    // ========================================================================

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn tab_data(&self) -> &TabData {
        &self.tab_data
    }

    #[must_use]
    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    #[must_use]
    pub fn updated_resources(&self) -> &UpdatedResources {
        &self.updated_resources
    }

    /// Whether teardown should be confirmed with the user: the session has
    /// unsaved changes and the options ask for the warning.
    #[must_use]
    pub fn should_confirm_unload(&self) -> bool {
        self.tab_data.options.warn_unsaved_page && !self.tab_data.doc_saved
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Announce the session to the background process; the session payload
    /// arrives later as `editor.setTabData` messages.
    pub async fn start(&self) -> Result<()> {
        self.background
            .request(&BackgroundRequest::EditorGetTabData)
            .await?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Ready {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    // ========================================================================
    // Toolbar intents
    // ========================================================================

    pub fn toggle_edit(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let commands = self.modes.toggle_edit();
        self.dispatch_mode_commands(&commands)
    }

    pub fn toggle_format(&mut self) -> Result<()> {
        self.ensure_ready()?;
        if self.tab_data.options.disable_format_page {
            tracing::debug!("format control is disabled for this page");
            return Ok(());
        }
        let apply_system_theme = self.tab_data.options.apply_system_theme;
        let commands = self.modes.toggle_format(apply_system_theme);
        self.dispatch_mode_commands(&commands)
    }

    pub fn toggle_cut_inner(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let commands = self.modes.toggle_cut_inner();
        self.dispatch_mode_commands(&commands)
    }

    pub fn toggle_cut_outer(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let commands = self.modes.toggle_cut_outer();
        self.dispatch_mode_commands(&commands)
    }

    pub fn toggle_highlight(&mut self, color: &str) -> Result<()> {
        self.ensure_ready()?;
        let commands = self.modes.toggle_highlight(color);
        self.dispatch_mode_commands(&commands)
    }

    pub fn toggle_remove_highlights(&mut self) -> Result<()> {
        self.ensure_ready()?;
        let commands = self.modes.toggle_remove_highlights();
        self.dispatch_mode_commands(&commands)
    }

    pub fn display_highlights(&self) -> Result<()> {
        self.ensure_ready()?;
        self.frame.send(&FrameCommand::DisplayHighlights)
    }

    // Cut history lives in the frame; these are pure pass-through.

    pub fn undo_cut(&self) -> Result<()> {
        self.ensure_ready()?;
        self.frame.send(&FrameCommand::UndoCutPage)
    }

    pub fn undo_all_cut(&self) -> Result<()> {
        self.ensure_ready()?;
        self.frame.send(&FrameCommand::UndoAllCutPage)
    }

    pub fn redo_cut(&self) -> Result<()> {
        self.ensure_ready()?;
        self.frame.send(&FrameCommand::RedoCutPage)
    }

    /// Ask the frame for final content. Completion arrives later as a
    /// `setContent` event.
    pub fn request_save(&self) -> Result<()> {
        self.ensure_ready()?;
        let command = save::content_request(&self.tab_data.options, &self.updated_resources);
        self.frame.send(&command)
    }

    /// Send a batch of state-machine commands, clearing the resource map on
    /// format transitions. The map only ever holds overrides for the current
    /// formatting operation.
    fn dispatch_mode_commands(&mut self, commands: &[FrameCommand]) -> Result<()> {
        for command in commands {
            if matches!(
                command,
                FrameCommand::FormatPage
                    | FrameCommand::FormatPageNoTheme
                    | FrameCommand::CancelFormatPage
            ) {
                self.updated_resources.clear();
            }
            self.frame.send(command)?;
        }
        Ok(())
    }

    // ========================================================================
    // Frame events
    // ========================================================================

    /// Parse and handle a raw window message from the frame.
    pub async fn handle_frame_message(&mut self, raw: &str) -> Result<()> {
        let event = FrameEvent::parse(raw)?;
        self.handle_frame_event(event).await
    }

    pub async fn handle_frame_event(&mut self, event: FrameEvent) -> Result<()> {
        self.ensure_ready()?;
        match event {
            FrameEvent::SetContent { content } => self.archive_content(content).await,
            FrameEvent::OnUpdate { saved } => {
                self.tab_data.doc_saved = saved;
                Ok(())
            }
            FrameEvent::OnInit {
                format_page_enabled,
                title,
                filename,
                icon,
                reset,
            } => self.finish_frame_init(format_page_enabled, &title, filename, icon, reset),
            FrameEvent::SavePage => self.request_save(),
        }
    }

    fn finish_frame_init(
        &mut self,
        format_page_enabled: bool,
        title: &str,
        filename: Option<String>,
        icon: Option<String>,
        reset: bool,
    ) -> Result<()> {
        self.tab_data.options.disable_format_page = !format_page_enabled;
        self.ui.set_format_control_visible(format_page_enabled);
        self.ui.set_title(title);
        if let Some(icon) = icon.as_deref() {
            self.ui.set_icon(icon);
        }
        if let Some(filename) = filename {
            self.tab_data.filename = Some(filename);
        }
        self.tab_data.doc_saved = true;
        if !reset {
            let commands = self.modes.apply_default_mode(
                self.tab_data.options.default_editor_mode,
                format_page_enabled,
                self.tab_data.options.apply_system_theme,
            );
            self.dispatch_mode_commands(&commands)?;
        }
        Ok(())
    }

    async fn archive_content(&self, content: String) -> Result<()> {
        let page = PageData {
            content,
            filename: self.tab_data.filename.clone(),
        };
        let options = save::archive_options(&self.tab_data.options);
        self.archiver.save_page(page, options).await
    }

    // ========================================================================
    // Background events
    // ========================================================================

    /// Handle one background message and produce its acknowledgement.
    pub async fn handle_background_event(&mut self, event: BackgroundEvent) -> Result<Value> {
        match event {
            BackgroundEvent::DevtoolsResourceCommitted {
                url,
                content,
                r#type,
                encoding,
            } => {
                self.updated_resources.insert(
                    url,
                    UpdatedResource {
                        content,
                        r#type,
                        encoding,
                    },
                );
                Ok(json!({}))
            }
            BackgroundEvent::ContentSave { options } => {
                self.ensure_ready()?;
                self.tab_data.options = options;
                self.request_save()?;
                self.background
                    .request(&BackgroundRequest::UiProcessInit)
                    .await?;
                Ok(json!({}))
            }
            BackgroundEvent::EditorSetTabData {
                content,
                truncated,
                finished,
                tab_id,
                options,
            } => {
                self.apply_tab_data(content, truncated, finished, tab_id, options)
                    .await?;
                Ok(json!({}))
            }
            BackgroundEvent::OptionsRefresh { profile_name } => {
                self.refresh_options(&profile_name).await
            }
            BackgroundEvent::ContentError { error, link } => {
                self.ui.report_error(&error, link.as_deref());
                Ok(json!({}))
            }
        }
    }

    /// Accept a session payload, freshly delivered or restored.
    ///
    /// A delivered payload may span several messages; nothing happens until
    /// the reassembler reports it complete. A message without content asks
    /// for a restore from durable storage instead.
    async fn apply_tab_data(
        &mut self,
        content: Option<String>,
        truncated: bool,
        finished: bool,
        tab_id: String,
        options: Option<crate::options::EditorOptions>,
    ) -> Result<()> {
        if let Some(content) = content {
            let Some(payload) = self.chunks.ingest(content, truncated, finished) else {
                return Ok(());
            };
            let mut record: TabData = serde_json::from_str(&payload)?;
            record.tab_id = tab_id;
            if let Some(options) = options {
                record.options = options;
            }
            self.tab_data = record;
            self.lifecycle = Lifecycle::Ready;
            self.send_frame_init()?;
            // Persist right away so the session survives the hosting page
            // being discarded before an explicit save.
            self.persist_tab_data().await
        } else {
            self.lifecycle = Lifecycle::Loading;
            self.tab_data = match self.store.load(&tab_id).await {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(
                        tab_id = %tab_id,
                        error = %err,
                        "failed to restore session data; starting empty"
                    );
                    TabData::new(tab_id)
                }
            };
            self.lifecycle = Lifecycle::Ready;
            self.send_frame_init()
        }
    }

    fn send_frame_init(&self) -> Result<()> {
        self.frame.send(&FrameCommand::Init {
            content: self.tab_data.content.clone().unwrap_or_default(),
        })
    }

    async fn persist_tab_data(&mut self) -> Result<()> {
        self.tab_data.updated_date = Some(tab_data::now_rfc3339());
        self.store.save(&self.tab_data).await
    }

    /// Replace the options wholesale from the named profile and reply with
    /// the updated options.
    async fn refresh_options(&mut self, profile_name: &str) -> Result<Value> {
        let reply = self
            .background
            .request(&BackgroundRequest::ConfigGetProfiles)
            .await?;
        let mut profiles: OptionProfiles = serde_json::from_value(reply)?;
        match profiles.remove(profile_name) {
            Some(options) => self.tab_data.options = options,
            None => {
                tracing::warn!(
                    profile = %profile_name,
                    "unknown options profile; keeping current options"
                );
            }
        }
        Ok(serde_json::to_value(&self.tab_data.options)?)
    }
}
