use crate::controller::event::ViewUpdate;
use std::sync::Mutex;

/// The page the controller draws into.
pub trait View: Send + Sync {
    fn render(&self, update: &ViewUpdate);
}

/// Keeps every update it receives. Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingView {
    updates: Mutex<Vec<ViewUpdate>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ViewUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl View for RecordingView {
    fn render(&self, update: &ViewUpdate) {
        self.updates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(update.clone());
    }
}
