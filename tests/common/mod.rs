//! Shared test doubles for editor session integration tests.

pub mod editor;

#[allow(unused_imports)]
pub use editor::{
    EditorHarness, RecordingArchiver, RecordingFrame, RecordingUi, ScriptedBackground,
    init_session, tab_data_message,
};
