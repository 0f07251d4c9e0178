use crate::models::PersistedSettings;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
}

/// What the form currently holds. Numeric values are always clamped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    pub prompt: String,
    pub settings: PersistedSettings,
}

#[derive(Debug, Clone)]
pub struct ControllerState {
    pub ui: UiState,
    /// Set while a generation request is in flight.
    pub busy: bool,
    /// Prompt of the request in flight, used as the result's alt text.
    pub in_flight_prompt: Option<String>,
    pub form: FormValues,
    /// URI of the last image shown this session; the export source.
    pub last_image: Option<String>,
    pub alert: Option<Alert>,
    pub backend_origin: String,
    pub alert_dismiss_after: Duration,
    next_alert_id: u64,
}

impl ControllerState {
    pub fn new(backend_origin: impl Into<String>, alert_dismiss_after: Duration) -> Self {
        Self {
            ui: UiState::Idle,
            busy: false,
            in_flight_prompt: None,
            form: FormValues::default(),
            last_image: None,
            alert: None,
            backend_origin: backend_origin.into(),
            alert_dismiss_after,
            next_alert_id: 1,
        }
    }

    pub(crate) fn new_alert(&mut self, kind: AlertKind, message: impl Into<String>) -> Alert {
        let alert = Alert {
            id: self.next_alert_id,
            kind,
            message: message.into(),
        };
        self.next_alert_id += 1;
        self.alert = Some(alert.clone());
        alert
    }
}
