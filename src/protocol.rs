//! Message vocabulary for the two session channels.
//!
//! The controller talks over two independent channels: a window-level message
//! channel to the embedded editable frame, and the extension runtime channel
//! to the background process. Every message is a `{method, ...params}` JSON
//! object; the enums here are the closed set of methods each channel carries,
//! so an unknown method fails deserialization at the boundary instead of
//! being silently ignored.
//!
//! Channels deliver in send order, but the two channels give no ordering
//! guarantee relative to each other.

use crate::error::Result;
use crate::options::EditorOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Updated resources
// ============================================================================

/// A resource override committed from the devtools side while the page is
/// being reformatted, keyed by resource URL in [`UpdatedResources`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResource {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// Resource overrides accumulated between the start and end of a formatting
/// operation, consumed read-only at save time.
pub type UpdatedResources = BTreeMap<String, UpdatedResource>;

// ============================================================================
// Frame channel
// ============================================================================

/// Commands sent to the embedded editable frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum FrameCommand {
    #[serde(rename_all = "camelCase")]
    EnableHighlight { color: String },
    DisableHighlight,
    DisableRemoveHighlights,
    DisplayHighlights,
    EnableEditPage,
    DisableEditPage,
    FormatPage,
    FormatPageNoTheme,
    CancelFormatPage,
    EnableCutInnerPage,
    DisableCutInnerPage,
    EnableCutOuterPage,
    DisableCutOuterPage,
    UndoCutPage,
    UndoAllCutPage,
    RedoCutPage,
    #[serde(rename_all = "camelCase")]
    GetContent {
        #[serde(rename = "compressHTML")]
        compress_html: bool,
        updated_resources: UpdatedResources,
    },
    #[serde(rename_all = "camelCase")]
    Init { content: String },
}

impl FrameCommand {
    /// Wire method name of the command.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::EnableHighlight { .. } => "enableHighlight",
            Self::DisableHighlight => "disableHighlight",
            Self::DisableRemoveHighlights => "disableRemoveHighlights",
            Self::DisplayHighlights => "displayHighlights",
            Self::EnableEditPage => "enableEditPage",
            Self::DisableEditPage => "disableEditPage",
            Self::FormatPage => "formatPage",
            Self::FormatPageNoTheme => "formatPageNoTheme",
            Self::CancelFormatPage => "cancelFormatPage",
            Self::EnableCutInnerPage => "enableCutInnerPage",
            Self::DisableCutInnerPage => "disableCutInnerPage",
            Self::EnableCutOuterPage => "enableCutOuterPage",
            Self::DisableCutOuterPage => "disableCutOuterPage",
            Self::UndoCutPage => "undoCutPage",
            Self::UndoAllCutPage => "undoAllCutPage",
            Self::RedoCutPage => "redoCutPage",
            Self::GetContent { .. } => "getContent",
            Self::Init { .. } => "init",
        }
    }

    /// Serialize the command for the window message channel.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Events originating from the embedded frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum FrameEvent {
    /// Final page content, in reply to a `getContent` command.
    #[serde(rename_all = "camelCase")]
    SetContent { content: String },

    /// The frame reports whether the document matches its last saved state.
    #[serde(rename_all = "camelCase")]
    OnUpdate { saved: bool },

    /// The frame finished loading the page handed to it via `init`.
    #[serde(rename_all = "camelCase")]
    OnInit {
        format_page_enabled: bool,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default)]
        reset: bool,
    },

    /// The frame asks for the page to be saved.
    SavePage,
}

impl FrameEvent {
    /// Parse a raw window message into a typed frame event.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

// ============================================================================
// Background channel
// ============================================================================

/// Messages received from the background process. Each one must be
/// acknowledged by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method")]
pub enum BackgroundEvent {
    /// A resource override was committed in devtools.
    #[serde(rename = "devtools.resourceCommitted", rename_all = "camelCase")]
    DevtoolsResourceCommitted {
        url: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r#type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encoding: Option<String>,
    },

    /// Externally triggered save carrying the options to save with.
    #[serde(rename = "content.save", rename_all = "camelCase")]
    ContentSave { options: EditorOptions },

    /// Session payload delivery, possibly split across several messages.
    #[serde(rename = "editor.setTabData", rename_all = "camelCase")]
    EditorSetTabData {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        truncated: bool,
        #[serde(default)]
        finished: bool,
        tab_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<EditorOptions>,
    },

    /// The option profile changed; the handler replies with the new options.
    #[serde(rename = "options.refresh", rename_all = "camelCase")]
    OptionsRefresh { profile_name: String },

    /// An error reported from the content side, forwarded to the host error
    /// reporter.
    #[serde(rename = "content.error", rename_all = "camelCase")]
    ContentError {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
}

/// Requests sent to the background process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method")]
pub enum BackgroundRequest {
    /// Ask for the session payload; the reply arrives later as one or more
    /// `editor.setTabData` messages, not as the request response.
    #[serde(rename = "editor.getTabData")]
    EditorGetTabData,

    /// Notify that an externally triggered save started processing.
    #[serde(rename = "ui.processInit")]
    UiProcessInit,

    /// Fetch the option profiles; the response is a profile-name map.
    #[serde(rename = "config.getProfiles")]
    ConfigGetProfiles,
}

// ============================================================================
// Channel seams
// ============================================================================

/// Outbound half of the window message channel to the embedded frame.
///
/// Sends are fire and forget; replies arrive later as independent
/// [`FrameEvent`]s on the same channel.
pub trait FrameChannel: Send + Sync {
    fn send(&self, command: &FrameCommand) -> Result<()>;
}

/// Request/response seam over the extension runtime channel.
#[async_trait]
pub trait BackgroundChannel: Send + Sync {
    async fn request(&self, request: &BackgroundRequest) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frame_commands_serialize_with_method_tag() {
        let raw = FrameCommand::EnableEditPage.to_json().unwrap();
        assert_eq!(raw, r#"{"method":"enableEditPage"}"#);

        let raw = FrameCommand::EnableHighlight {
            color: "arkedit-highlight-yellow".to_string(),
        }
        .to_json()
        .unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["method"], "enableHighlight");
        assert_eq!(value["color"], "arkedit-highlight-yellow");
    }

    #[test]
    fn get_content_keeps_wire_spelling() {
        let mut resources = UpdatedResources::new();
        resources.insert(
            "https://x/img.png".to_string(),
            UpdatedResource {
                content: "data".to_string(),
                r#type: Some("image/png".to_string()),
                encoding: None,
            },
        );
        let command = FrameCommand::GetContent {
            compress_html: true,
            updated_resources: resources,
        };
        let value: Value = serde_json::from_str(&command.to_json().unwrap()).unwrap();
        assert_eq!(value["method"], "getContent");
        assert_eq!(value["compressHTML"], true);
        assert_eq!(
            value["updatedResources"]["https://x/img.png"]["type"],
            "image/png"
        );
    }

    #[test]
    fn frame_events_parse_from_wire_shapes() {
        let event = FrameEvent::parse(
            &json!({
                "method": "onInit",
                "formatPageEnabled": true,
                "title": "Example Domain",
                "filename": "example.html"
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(
            event,
            FrameEvent::OnInit {
                format_page_enabled: true,
                title: "Example Domain".to_string(),
                filename: Some("example.html".to_string()),
                icon: None,
                reset: false,
            }
        );

        let event = FrameEvent::parse(r#"{"method":"onUpdate","saved":false}"#).unwrap();
        assert_eq!(event, FrameEvent::OnUpdate { saved: false });
    }

    #[test]
    fn unknown_frame_method_is_rejected() {
        assert!(FrameEvent::parse(r#"{"method":"explodePage"}"#).is_err());
    }

    #[test]
    fn background_events_use_dotted_method_names() {
        let event: BackgroundEvent = serde_json::from_value(json!({
            "method": "editor.setTabData",
            "tabId": "42",
            "content": "{}",
            "truncated": true,
        }))
        .unwrap();
        assert_eq!(
            event,
            BackgroundEvent::EditorSetTabData {
                content: Some("{}".to_string()),
                truncated: true,
                finished: false,
                tab_id: "42".to_string(),
                options: None,
            }
        );

        let raw = serde_json::to_value(BackgroundRequest::EditorGetTabData).unwrap();
        assert_eq!(raw, json!({ "method": "editor.getTabData" }));
    }
}
