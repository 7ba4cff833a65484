//! Mutual-exclusion policy across the toolbar editing modes.
//!
//! The primary axis (edit, cut-inner, cut-outer) is exclusive: entering one
//! forcibly exits the other two. Formatting is independent and only toggles
//! against itself. Highlighting and remove-highlight are secondary axes that
//! cut modes reset on entry.
//!
//! Transition methods are pure: they mutate local state and return the frame
//! commands to emit, in order. The frame owns cut-history state, so undo and
//! redo never appear here.

use crate::options::DefaultEditorMode;
use crate::protocol::FrameCommand;

/// CSS class prefix the frame expects on highlight color ids.
pub const HIGHLIGHT_CLASS_PREFIX: &str = "arkedit-highlight-";

/// The exclusive primary mode axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExclusiveMode {
    #[default]
    Idle,
    Edit,
    CutInner,
    CutOuter,
}

/// Toolbar mode state for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeState {
    exclusive: ExclusiveMode,
    formatting: bool,
    highlight: Option<String>,
    remove_highlights: bool,
}

impl ModeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exclusive(&self) -> ExclusiveMode {
        self.exclusive
    }

    #[must_use]
    pub fn formatting(&self) -> bool {
        self.formatting
    }

    /// Active highlight color id, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    #[must_use]
    pub fn remove_highlights_active(&self) -> bool {
        self.remove_highlights
    }

    /// Flip edit mode, exiting any active cut mode first.
    pub fn toggle_edit(&mut self) -> Vec<FrameCommand> {
        let mut commands = Vec::new();
        self.exit_cut_modes(&mut commands);
        if self.exclusive == ExclusiveMode::Edit {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableEditPage);
        } else {
            commands.extend(self.enter_edit());
        }
        commands
    }

    /// Flip formatting. The caller clears the updated-resource map on both
    /// transitions.
    pub fn toggle_format(&mut self, apply_system_theme: bool) -> Vec<FrameCommand> {
        if self.formatting {
            self.formatting = false;
            vec![FrameCommand::CancelFormatPage]
        } else {
            self.enter_format(apply_system_theme)
        }
    }

    /// Flip cut-inner mode, exiting edit and cut-outer first.
    pub fn toggle_cut_inner(&mut self) -> Vec<FrameCommand> {
        let mut commands = Vec::new();
        self.exit_edit(&mut commands);
        if self.exclusive == ExclusiveMode::CutOuter {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableCutOuterPage);
        }
        if self.exclusive == ExclusiveMode::CutInner {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableCutInnerPage);
        } else {
            commands.extend(self.enter_cut_inner());
        }
        commands
    }

    /// Flip cut-outer mode, exiting edit and cut-inner first.
    pub fn toggle_cut_outer(&mut self) -> Vec<FrameCommand> {
        let mut commands = Vec::new();
        self.exit_edit(&mut commands);
        if self.exclusive == ExclusiveMode::CutInner {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableCutInnerPage);
        }
        if self.exclusive == ExclusiveMode::CutOuter {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableCutOuterPage);
        } else {
            commands.extend(self.enter_cut_outer());
        }
        commands
    }

    /// Flip the highlight selection for `color`.
    ///
    /// Any active cut mode and remove-highlight mode are disabled first. All
    /// color markers reset; if the requested color was inactive it becomes
    /// the single enabled color, otherwise the selection simply ends.
    pub fn toggle_highlight(&mut self, color: &str) -> Vec<FrameCommand> {
        let mut commands = Vec::new();
        self.exit_cut_modes(&mut commands);
        if self.remove_highlights {
            self.remove_highlights = false;
            commands.push(FrameCommand::DisableRemoveHighlights);
        }
        let was_active = self.highlight.as_deref() == Some(color);
        self.highlight = None;
        commands.push(FrameCommand::DisableHighlight);
        if !was_active {
            self.highlight = Some(color.to_string());
            commands.push(FrameCommand::EnableHighlight {
                color: format!("{HIGHLIGHT_CLASS_PREFIX}{color}"),
            });
        }
        commands
    }

    /// Flip remove-highlight mode. Only the disable transition has a wire
    /// command; enabling is a local marker.
    pub fn toggle_remove_highlights(&mut self) -> Vec<FrameCommand> {
        if self.remove_highlights {
            self.remove_highlights = false;
            vec![FrameCommand::DisableRemoveHighlights]
        } else {
            self.remove_highlights = true;
            Vec::new()
        }
    }

    /// Auto-entry on session init when the init event does not signal a
    /// reset. Format is entered only if the frame reported the capability.
    pub fn apply_default_mode(
        &mut self,
        mode: DefaultEditorMode,
        format_enabled: bool,
        apply_system_theme: bool,
    ) -> Vec<FrameCommand> {
        match mode {
            DefaultEditorMode::None => Vec::new(),
            DefaultEditorMode::Edit => self.enter_edit(),
            DefaultEditorMode::Format if format_enabled => self.enter_format(apply_system_theme),
            DefaultEditorMode::Format => Vec::new(),
            DefaultEditorMode::Cut => self.enter_cut_inner(),
            DefaultEditorMode::CutExternal => self.enter_cut_outer(),
        }
    }

    fn enter_edit(&mut self) -> Vec<FrameCommand> {
        self.exclusive = ExclusiveMode::Edit;
        vec![FrameCommand::EnableEditPage]
    }

    fn enter_format(&mut self, apply_system_theme: bool) -> Vec<FrameCommand> {
        self.formatting = true;
        vec![if apply_system_theme {
            FrameCommand::FormatPage
        } else {
            FrameCommand::FormatPageNoTheme
        }]
    }

    fn enter_cut_inner(&mut self) -> Vec<FrameCommand> {
        self.exclusive = ExclusiveMode::CutInner;
        let mut commands = self.reset_secondary_axes();
        commands.push(FrameCommand::EnableCutInnerPage);
        commands
    }

    fn enter_cut_outer(&mut self) -> Vec<FrameCommand> {
        self.exclusive = ExclusiveMode::CutOuter;
        let mut commands = self.reset_secondary_axes();
        commands.push(FrameCommand::EnableCutOuterPage);
        commands
    }

    /// Entering a cut mode always resets both secondary axes, emitting the
    /// disable commands whether or not they were active.
    fn reset_secondary_axes(&mut self) -> Vec<FrameCommand> {
        self.highlight = None;
        self.remove_highlights = false;
        vec![
            FrameCommand::DisableHighlight,
            FrameCommand::DisableRemoveHighlights,
        ]
    }

    fn exit_edit(&mut self, commands: &mut Vec<FrameCommand>) {
        if self.exclusive == ExclusiveMode::Edit {
            self.exclusive = ExclusiveMode::Idle;
            commands.push(FrameCommand::DisableEditPage);
        }
    }

    fn exit_cut_modes(&mut self, commands: &mut Vec<FrameCommand>) {
        match self.exclusive {
            ExclusiveMode::CutInner => {
                self.exclusive = ExclusiveMode::Idle;
                commands.push(FrameCommand::DisableCutInnerPage);
            }
            ExclusiveMode::CutOuter => {
                self.exclusive = ExclusiveMode::Idle;
                commands.push(FrameCommand::DisableCutOuterPage);
            }
            ExclusiveMode::Idle | ExclusiveMode::Edit => {}
        }
    }
}
