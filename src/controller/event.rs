use crate::{
    controller::state::Alert,
    error::Result,
    form::NumericField,
    models::{GenerationRequest, GenerationResult, PersistedSettings},
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Char(char),
    Other,
}

/// Everything the page can tell the controller.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Settings read from durable storage, if any were usable.
    Startup(Option<PersistedSettings>),
    PromptEdited(String),
    PromptKeyDown { key: KeyCode, ctrl: bool, meta: bool },
    GenerateClicked,
    /// Fill in the form and trigger in one step. Ignored entirely while a
    /// request is in flight; `settings: None` keeps the current values.
    Submit {
        prompt: String,
        settings: Option<PersistedSettings>,
    },
    /// Keystroke-level edit of a numeric field.
    FieldInput { field: NumericField, raw: String },
    /// The field lost focus or the edit was confirmed.
    FieldCommitted(NumericField),
    GenerationFinished(Result<GenerationResult>),
    DownloadClicked { timestamp_ms: i64 },
    ExportFinished(Result<PathBuf>),
    AlertExpired(u64),
}

/// Visible changes to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    SetPrompt(String),
    SetField { field: NumericField, value: u32 },
    SetTrigger { enabled: bool, label: &'static str },
    ShowAlert(Alert),
    HideAlert,
    /// Reveal the result section with the loading indicator, hiding any
    /// previous image.
    ShowLoading,
    HideLoading,
    ShowImage { uri: String, alt: String },
    HideResult,
    FocusPrompt,
}

/// Work the controller performs after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    View(ViewUpdate),
    Send(GenerationRequest),
    PersistSettings(PersistedSettings),
    Export { uri: String, filename: String },
    ScheduleDismiss { alert_id: u64, after: Duration },
    /// Resolves the pending `generate` call with its outcome.
    Complete(Result<GenerationResult>),
}
