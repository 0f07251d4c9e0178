pub mod event;
pub mod reducer;
pub mod state;
pub mod view;

use crate::{
    backend::GenerationBackend,
    config::ClientConfig,
    error::Result,
    export::ImageExporter,
    form::NumericField,
    models::{GenerationResult, PersistedSettings},
    storage::SettingsManager,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub use event::{Effect, KeyCode, UiEvent, ViewUpdate};
pub use reducer::reduce;
pub use state::{Alert, AlertKind, ControllerState, FormValues, UiState};
pub use view::{RecordingView, View};

/// Binds the form to the generation backend.
///
/// Cloning is cheap and every clone drives the same state. The state lock is
/// only held while reducing, never across an `.await`.
#[derive(Clone)]
pub struct GenerationController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<ControllerState>,
    backend: Arc<dyn GenerationBackend>,
    settings: SettingsManager,
    exporter: Arc<dyn ImageExporter>,
    view: Arc<dyn View>,
}

impl GenerationController {
    pub fn new(
        config: &ClientConfig,
        backend: Arc<dyn GenerationBackend>,
        settings: SettingsManager,
        exporter: Arc<dyn ImageExporter>,
        view: Arc<dyn View>,
    ) -> Self {
        let state = ControllerState::new(config.backend_origin(), config.alert_dismiss_after);

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                backend,
                settings,
                exporter,
                view,
            }),
        }
    }

    /// Populate the form from stored settings.
    pub fn start(&self) {
        let stored = self.inner.settings.load();
        if stored.is_none() {
            log::debug!("No saved settings, keeping defaults");
        }

        for effect in self.reduce(UiEvent::Startup(stored)) {
            if let Effect::View(update) = effect {
                self.inner.view.render(&update);
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        self.lock_state().clone()
    }

    pub fn settings(&self) -> PersistedSettings {
        self.lock_state().form.settings
    }

    pub fn is_busy(&self) -> bool {
        self.lock_state().busy
    }

    pub fn last_image(&self) -> Option<String> {
        self.lock_state().last_image.clone()
    }

    /// Fill in the form and trigger generation.
    ///
    /// Returns `None` when a request is already in flight: the call is
    /// dropped, not queued, and the form keeps its values.
    pub async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        steps: u32,
    ) -> Option<Result<GenerationResult>> {
        self.dispatch(UiEvent::Submit {
            prompt: prompt.to_string(),
            settings: Some(PersistedSettings::new(width, height, steps)),
        })
        .await
    }

    /// Trigger generation for `prompt` with the current field values.
    pub async fn generate_prompt(&self, prompt: &str) -> Option<Result<GenerationResult>> {
        self.dispatch(UiEvent::Submit {
            prompt: prompt.to_string(),
            settings: None,
        })
        .await
    }

    /// Keystroke edit followed by commit, as when a field loses focus.
    pub async fn set_field(&self, field: NumericField, raw: &str) {
        self.dispatch(UiEvent::FieldInput {
            field,
            raw: raw.to_string(),
        })
        .await;
        self.dispatch(UiEvent::FieldCommitted(field)).await;
    }

    pub async fn download(&self) {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        self.dispatch(UiEvent::DownloadClicked { timestamp_ms }).await;
    }

    /// Reduce `event` and run every effect it leads to.
    ///
    /// Returns the outcome of a generation attempt if this event started and
    /// finished one (or was rejected by validation).
    pub async fn dispatch(&self, event: UiEvent) -> Option<Result<GenerationResult>> {
        let mut queue: VecDeque<Effect> = self.reduce(event).into();
        let mut outcome = None;

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::View(update) => self.inner.view.render(&update),
                Effect::Send(request) => {
                    let result = self.inner.backend.generate(&request).await;
                    if let Err(e) = &result {
                        log::error!("❌ Generation error: {}", e);
                    }
                    queue.extend(self.reduce(UiEvent::GenerationFinished(result)));
                }
                Effect::PersistSettings(settings) => {
                    if let Err(e) = self.inner.settings.save(&settings) {
                        log::warn!("⚠️  Failed to save settings: {}", e);
                    }
                }
                Effect::Export { uri, filename } => {
                    let result = self.inner.exporter.export(&uri, &filename).await;
                    queue.extend(self.reduce(UiEvent::ExportFinished(result)));
                }
                Effect::ScheduleDismiss { alert_id, after } => {
                    self.schedule_dismiss(alert_id, after)
                }
                Effect::Complete(result) => outcome = Some(result),
            }
        }

        outcome
    }

    fn schedule_dismiss(&self, alert_id: u64, after: Duration) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::debug!("No runtime to schedule alert {} dismissal", alert_id);
                return;
            }
        };

        let controller = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            controller.expire_alert(alert_id);
        });
    }

    fn expire_alert(&self, alert_id: u64) {
        for effect in self.reduce(UiEvent::AlertExpired(alert_id)) {
            if let Effect::View(update) = effect {
                self.inner.view.render(&update);
            }
        }
    }

    fn reduce(&self, event: UiEvent) -> Vec<Effect> {
        reducer::reduce(&mut self.lock_state(), event)
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GenerationError,
        models::{GenerationRequest, HealthStatus, SETTINGS_KEY},
        storage::{MemorySettingsStore, SettingsStore},
    };
    use async_trait::async_trait;
    use std::path::PathBuf;
    use tokio::sync::Notify;

    struct FakeBackend {
        calls: Mutex<Vec<GenerationRequest>>,
        reply: Result<GenerationResult>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn replying(reply: Result<GenerationResult>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
                gate: None,
            }
        }

        fn gated(reply: Result<GenerationResult>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::replying(reply)
            }
        }

        fn calls(&self) -> Vec<GenerationRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for FakeBackend {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus {
                status: "healthy".into(),
                model: None,
                api: None,
                token_configured: Some(true),
                note: None,
            })
        }
    }

    #[derive(Default)]
    struct FakeExporter {
        exports: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ImageExporter for FakeExporter {
        async fn export(&self, uri: &str, filename: &str) -> Result<PathBuf> {
            self.exports
                .lock()
                .unwrap()
                .push((uri.to_string(), filename.to_string()));
            Ok(PathBuf::from(filename))
        }
    }

    struct Harness {
        controller: GenerationController,
        backend: Arc<FakeBackend>,
        store: Arc<MemorySettingsStore>,
        exporter: Arc<FakeExporter>,
        view: Arc<RecordingView>,
    }

    fn harness_with(backend: FakeBackend, store: MemorySettingsStore) -> Harness {
        let backend = Arc::new(backend);
        let store = Arc::new(store);
        let exporter = Arc::new(FakeExporter::default());
        let view = Arc::new(RecordingView::new());

        let controller = GenerationController::new(
            &ClientConfig::default(),
            backend.clone(),
            SettingsManager::new(store.clone()),
            exporter.clone(),
            view.clone(),
        );
        controller.start();

        Harness {
            controller,
            backend,
            store,
            exporter,
            view,
        }
    }

    fn harness(reply: Result<GenerationResult>) -> Harness {
        harness_with(FakeBackend::replying(reply), MemorySettingsStore::new())
    }

    fn inline_image() -> GenerationResult {
        GenerationResult::Inline {
            base64: "iVBORw0K".into(),
        }
    }

    fn alerts(view: &RecordingView) -> Vec<Alert> {
        view.updates()
            .into_iter()
            .filter_map(|u| match u {
                ViewUpdate::ShowAlert(alert) => Some(alert),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_short_prompt_issues_no_request() {
        let h = harness(Ok(inline_image()));

        for prompt in ["", "ab"] {
            let outcome = h.controller.generate(prompt, 1024, 1024, 28).await;
            assert!(matches!(outcome, Some(Err(GenerationError::Validation(_)))));
        }
        assert!(h.backend.calls().is_empty());
        assert!(!h.controller.is_busy());
    }

    #[tokio::test]
    async fn test_generate_posts_once_with_clamped_values() {
        let h = harness(Ok(inline_image()));

        let outcome = h.controller.generate("a paper boat", 1000, 300, 99).await;

        assert_eq!(outcome, Some(Ok(inline_image())));
        let calls = h.backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], GenerationRequest::new("a paper boat", 1024, 320, 50).unwrap());
        assert_eq!(
            h.controller.last_image().as_deref(),
            Some("data:image/png;base64,iVBORw0K")
        );
        assert!(h.view.updates().contains(&ViewUpdate::ShowImage {
            uri: "data:image/png;base64,iVBORw0K".into(),
            alt: "a paper boat".into()
        }));
    }

    #[tokio::test]
    async fn test_malformed_response_restores_ui_with_error_alert() {
        let h = harness(Err(GenerationError::MalformedResponse(
            "No image data received from server".into(),
        )));

        let outcome = h.controller.generate("a paper boat", 1024, 1024, 28).await;

        assert!(matches!(outcome, Some(Err(GenerationError::MalformedResponse(_)))));
        let state = h.controller.state();
        assert!(!state.busy);
        assert_ne!(state.ui, UiState::Loading);
        assert_eq!(state.last_image, None);

        let shown = alerts(&h.view);
        assert_eq!(shown.last().unwrap().kind, AlertKind::Error);
        assert_eq!(shown.last().unwrap().message, "No image data received from server");
        assert_eq!(
            h.view.updates().last(),
            Some(&ViewUpdate::SetTrigger {
                enabled: true,
                label: reducer::GENERATE_LABEL
            })
        );
    }

    #[tokio::test]
    async fn test_second_trigger_while_pending_is_dropped() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeBackend::gated(Ok(inline_image()), gate.clone()),
            MemorySettingsStore::new(),
        );

        let first = h.controller.generate("a paper boat", 1024, 1024, 28);
        let second = async {
            // Let the first request reach the backend before triggering again.
            while h.backend.calls().is_empty() {
                tokio::task::yield_now().await;
            }
            let outcome = h.controller.generate("a paper plane", 512, 512, 10).await;
            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, Some(Ok(inline_image())));
        assert_eq!(second, None);
        assert_eq!(h.backend.calls().len(), 1);
        assert_eq!(h.backend.calls()[0].prompt(), "a paper boat");
        assert!(!h.controller.is_busy());
    }

    #[tokio::test]
    async fn test_second_generate_while_pending_keeps_form_and_alt_text() {
        let gate = Arc::new(Notify::new());
        let h = harness_with(
            FakeBackend::gated(Ok(inline_image()), gate.clone()),
            MemorySettingsStore::new(),
        );

        let first = h.controller.generate("a paper boat", 1024, 1024, 28);
        let second = async {
            while h.backend.calls().is_empty() {
                tokio::task::yield_now().await;
            }
            let before = h.view.updates().len();
            let outcome = h.controller.generate("a paper plane", 512, 512, 10).await;
            let rendered = h.view.updates().len() - before;
            gate.notify_one();
            (outcome, rendered)
        };

        let (_, (second, rendered)) = tokio::join!(first, second);

        assert_eq!(second, None);
        assert_eq!(rendered, 0);
        let state = h.controller.state();
        assert_eq!(state.form.prompt, "a paper boat");
        assert_eq!(state.form.settings, PersistedSettings::new(1024, 1024, 28));
        assert!(h.view.updates().contains(&ViewUpdate::ShowImage {
            uri: "data:image/png;base64,iVBORw0K".into(),
            alt: "a paper boat".into()
        }));
    }

    #[tokio::test]
    async fn test_committed_settings_survive_restart() {
        let h = harness(Ok(inline_image()));
        h.controller.set_field(NumericField::Width, "512").await;
        h.controller.set_field(NumericField::Height, "768").await;
        h.controller.set_field(NumericField::Steps, "20").await;

        let raw = h.store.get(SETTINGS_KEY).unwrap().unwrap();
        let store = MemorySettingsStore::new().with_entry(SETTINGS_KEY, raw);
        let restarted = harness_with(FakeBackend::replying(Ok(inline_image())), store);

        assert_eq!(
            restarted.controller.settings(),
            PersistedSettings::new(512, 768, 20)
        );
        assert!(restarted.view.updates().contains(&ViewUpdate::SetField {
            field: NumericField::Height,
            value: 768
        }));
    }

    #[tokio::test]
    async fn test_corrupted_settings_fall_back_to_defaults() {
        let store = MemorySettingsStore::new().with_entry(SETTINGS_KEY, "{\"width\": 5");
        let h = harness_with(FakeBackend::replying(Ok(inline_image())), store);

        assert_eq!(h.controller.settings(), PersistedSettings::new(1024, 1024, 28));
        assert!(alerts(&h.view).is_empty());
    }

    #[tokio::test]
    async fn test_download_without_image_saves_nothing() {
        let h = harness(Ok(inline_image()));

        h.controller.download().await;

        assert!(h.exporter.exports.lock().unwrap().is_empty());
        let shown = alerts(&h.view);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, AlertKind::Error);
        assert_eq!(shown[0].message, "No image to download");
    }

    #[tokio::test]
    async fn test_download_after_generation_exports_last_image() {
        let h = harness(Ok(GenerationResult::Remote {
            url: "http://x/y.png".into(),
        }));
        h.controller.generate("a paper boat", 1024, 1024, 28).await;

        h.controller.download().await;

        let exports = h.exporter.exports.lock().unwrap().clone();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].0, "http://x/y.png");
        assert!(exports[0].1.starts_with("flux-generated-"));
        assert!(exports[0].1.ends_with(".png"));
        assert_eq!(alerts(&h.view).last().unwrap().message, "Image downloaded!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_alert_auto_dismisses() {
        let h = harness(Ok(inline_image()));
        h.controller.generate("a paper boat", 1024, 1024, 28).await;
        assert!(h.controller.state().alert.is_some());

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(h.controller.state().alert.is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(h.controller.state().alert.is_none());
        assert_eq!(h.view.updates().last(), Some(&ViewUpdate::HideAlert));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_alert_persists() {
        let h = harness(Err(GenerationError::Network("refused".into())));
        h.controller.generate("a paper boat", 1024, 1024, 28).await;

        tokio::time::sleep(Duration::from_secs(60)).await;

        let alert = h.controller.state().alert.unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert!(alert.message.contains("Cannot connect to the server"));
    }
}
