//! Editing-session controller for the Ark page archiver extension.
//!
//! The controller sits between three collaborators around a captured page
//! being edited: the toolbar UI of the editor page, the embedded editable
//! frame holding the captured document, and the extension background
//! process. It owns edit-mode toggling, toolbar drag tracking, reassembly of
//! oversized session payloads, durable per-tab persistence, and the save
//! handoff to the archival engine.
//!
//! Everything host-specific stays behind seams: messaging through
//! [`protocol::FrameChannel`] and [`protocol::BackgroundChannel`], archival
//! through [`save::Archiver`], and chrome updates through
//! [`controller::UiDelegate`]. The crate itself never touches a DOM or a
//! browser API, which keeps every policy in here testable against recorded
//! channels.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod chunks;
pub mod controller;
pub mod drag;
pub mod error;
pub mod modes;
pub mod options;
pub mod protocol;
pub mod save;
pub mod tab_data;

pub use controller::{EditorSession, Lifecycle, UiDelegate};
pub use error::{Error, Result};
pub use tab_data::{TabData, TabDataStore};
