//! Native dialog handling (alert, confirm, prompt).
//!
//! A dialog raised by the page blocks it until answered. Tests arm a one-shot
//! action before the interaction that opens the dialog; an unarmed dialog is
//! dismissed so the page never hangs.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Types of browser dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl DialogType {
    /// Parse the protocol's dialog type name
    #[must_use]
    pub fn from_protocol(name: &str) -> Self {
        match name {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

/// Action taken on a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Accept (OK/Yes/Leave)
    Accept,
    /// Accept with input text (for prompts)
    AcceptWith(String),
    /// Dismiss (Cancel/No/Stay)
    Dismiss,
}

impl DialogAction {
    /// Whether the dialog is accepted
    #[must_use]
    pub const fn accepts(&self) -> bool {
        matches!(self, Self::Accept | Self::AcceptWith(_))
    }

    /// Prompt text to send, if any
    #[must_use]
    pub fn prompt_text(&self) -> Option<&str> {
        match self {
            Self::AcceptWith(text) => Some(text),
            _ => None,
        }
    }
}

/// A dialog the page raised and how it was answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRecord {
    /// Type of dialog
    pub dialog_type: DialogType,
    /// Message displayed in the dialog
    pub message: String,
    /// Action taken
    pub action: DialogAction,
}

/// One-shot dialog arming shared between a driver and its event listener
#[derive(Debug, Clone, Default)]
pub struct DialogSlot {
    armed: Arc<Mutex<Option<DialogAction>>>,
    handled: Arc<Mutex<Vec<DialogRecord>>>,
}

impl DialogSlot {
    /// Create an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the action for the next dialog only
    pub fn arm(&self, action: DialogAction) {
        if let Ok(mut armed) = self.armed.lock() {
            *armed = Some(action);
        }
    }

    /// Whether an action is waiting for a dialog
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.lock().map(|a| a.is_some()).unwrap_or(false)
    }

    /// Decide how to answer a dialog, consuming the armed action
    pub fn resolve(&self, dialog_type: DialogType, message: impl Into<String>) -> DialogAction {
        let action = self
            .armed
            .lock()
            .ok()
            .and_then(|mut armed| armed.take())
            .unwrap_or(DialogAction::Dismiss);
        if let Ok(mut handled) = self.handled.lock() {
            handled.push(DialogRecord {
                dialog_type,
                message: message.into(),
                action: action.clone(),
            });
        }
        action
    }

    /// Dialogs answered so far
    #[must_use]
    pub fn handled(&self) -> Vec<DialogRecord> {
        self.handled.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armed_action_is_one_shot() {
        let slot = DialogSlot::new();
        slot.arm(DialogAction::Accept);
        assert!(slot.is_armed());

        let first = slot.resolve(DialogType::Confirm, "Press OK to proceed!");
        assert_eq!(first, DialogAction::Accept);
        assert!(!slot.is_armed());

        let second = slot.resolve(DialogType::Alert, "again");
        assert_eq!(second, DialogAction::Dismiss);
    }

    #[test]
    fn test_unarmed_dialog_is_dismissed() {
        let slot = DialogSlot::new();
        assert_eq!(
            slot.resolve(DialogType::Alert, "hello"),
            DialogAction::Dismiss
        );
    }

    #[test]
    fn test_history_is_shared_between_clones() {
        let slot = DialogSlot::new();
        let listener = slot.clone();
        slot.arm(DialogAction::AcceptWith("yes".to_string()));
        listener.resolve(DialogType::Prompt, "Sure?");

        let handled = slot.handled();
        assert_eq!(handled.len(), 1);
        assert_eq!(handled[0].dialog_type, DialogType::Prompt);
        assert_eq!(handled[0].action.prompt_text(), Some("yes"));
        assert!(handled[0].action.accepts());
    }

    #[test]
    fn test_protocol_names() {
        assert_eq!(DialogType::from_protocol("confirm"), DialogType::Confirm);
        assert_eq!(DialogType::from_protocol("beforeunload"), DialogType::BeforeUnload);
        assert_eq!(DialogType::from_protocol("alert"), DialogType::Alert);
        assert_eq!(DialogType::Prompt.to_string(), "prompt");
    }
}
