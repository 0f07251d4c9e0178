//! Pure state transitions: `(state, event) -> effects`. No I/O, no clock.

use crate::{
    controller::{
        event::{Effect, KeyCode, UiEvent, ViewUpdate},
        state::{AlertKind, ControllerState, UiState},
    },
    error::Result,
    export::export_filename,
    form::NumericField,
    models::{GenerationRequest, GenerationResult, PersistedSettings},
};
use std::path::PathBuf;

pub const GENERATE_LABEL: &str = "✨ Generate Image";
pub const GENERATING_LABEL: &str = "Generating...";

pub fn reduce(state: &mut ControllerState, event: UiEvent) -> Vec<Effect> {
    match event {
        UiEvent::Startup(stored) => startup(state, stored),
        UiEvent::PromptEdited(text) => {
            state.form.prompt = text;
            Vec::new()
        }
        UiEvent::PromptKeyDown { key, ctrl, meta } => {
            if key == KeyCode::Enter && (ctrl || meta) {
                begin_generation(state)
            } else {
                Vec::new()
            }
        }
        UiEvent::GenerateClicked => begin_generation(state),
        UiEvent::Submit { prompt, settings } => submit(state, prompt, settings),
        UiEvent::FieldInput { field, raw } => {
            let value = field.clamp_input(&raw);
            state.form.settings.set(field, value);
            vec![Effect::View(ViewUpdate::SetField { field, value })]
        }
        UiEvent::FieldCommitted(_) => vec![Effect::PersistSettings(state.form.settings)],
        UiEvent::GenerationFinished(result) => finish_generation(state, result),
        UiEvent::DownloadClicked { timestamp_ms } => download(state, timestamp_ms),
        UiEvent::ExportFinished(result) => finish_export(state, result),
        UiEvent::AlertExpired(id) => {
            if state.alert.as_ref().map(|a| a.id) == Some(id) {
                state.alert = None;
                vec![Effect::View(ViewUpdate::HideAlert)]
            } else {
                Vec::new()
            }
        }
    }
}

fn startup(state: &mut ControllerState, stored: Option<PersistedSettings>) -> Vec<Effect> {
    if let Some(settings) = stored {
        state.form.settings = settings;
    }

    NumericField::ALL
        .iter()
        .map(|&field| {
            Effect::View(ViewUpdate::SetField {
                field,
                value: state.form.settings.get(field),
            })
        })
        .collect()
}

fn submit(
    state: &mut ControllerState,
    prompt: String,
    settings: Option<PersistedSettings>,
) -> Vec<Effect> {
    if state.busy {
        return Vec::new();
    }

    state.form.prompt = prompt;
    let mut effects = Vec::new();
    if let Some(settings) = settings {
        for field in NumericField::ALL {
            let value = field.clamp_value(Some(i64::from(settings.get(field))));
            state.form.settings.set(field, value);
            effects.push(Effect::View(ViewUpdate::SetField { field, value }));
        }
    }

    effects.extend(begin_generation(state));
    effects
}

fn begin_generation(state: &mut ControllerState) -> Vec<Effect> {
    if state.busy {
        return Vec::new();
    }

    let settings = state.form.settings;
    let request = match GenerationRequest::new(
        &state.form.prompt,
        settings.width,
        settings.height,
        settings.steps,
    ) {
        Ok(request) => request,
        Err(err) => {
            let empty = state.form.prompt.trim().is_empty();
            state.ui = UiState::Error;
            let alert = state.new_alert(AlertKind::Error, err.to_string());

            let mut effects = vec![Effect::View(ViewUpdate::ShowAlert(alert))];
            if empty {
                effects.push(Effect::View(ViewUpdate::FocusPrompt));
            }
            effects.push(Effect::Complete(Err(err)));
            return effects;
        }
    };

    state.busy = true;
    state.in_flight_prompt = Some(request.prompt().to_string());
    state.ui = UiState::Loading;
    state.alert = None;

    vec![
        Effect::View(ViewUpdate::HideAlert),
        Effect::View(ViewUpdate::ShowLoading),
        Effect::View(ViewUpdate::SetTrigger {
            enabled: false,
            label: GENERATING_LABEL,
        }),
        Effect::Send(request),
    ]
}

fn finish_generation(
    state: &mut ControllerState,
    result: Result<GenerationResult>,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let sent_prompt = state.in_flight_prompt.take();

    match &result {
        Ok(image) => {
            let uri = image.display_uri();
            state.last_image = Some(uri.clone());
            state.ui = UiState::Success;

            effects.push(Effect::View(ViewUpdate::HideLoading));
            effects.push(Effect::View(ViewUpdate::ShowImage {
                uri,
                alt: sent_prompt.unwrap_or_else(|| state.form.prompt.clone()),
            }));
            effects.extend(success_alert(state, "Image generated successfully!"));
        }
        Err(err) => {
            state.ui = UiState::Error;
            let message = err.user_message(&state.backend_origin);
            let alert = state.new_alert(AlertKind::Error, message);

            effects.push(Effect::View(ViewUpdate::ShowAlert(alert)));
            effects.push(Effect::View(ViewUpdate::HideLoading));
            effects.push(Effect::View(ViewUpdate::HideResult));
        }
    }

    state.busy = false;
    effects.push(Effect::View(ViewUpdate::SetTrigger {
        enabled: true,
        label: GENERATE_LABEL,
    }));
    effects.push(Effect::Complete(result));
    effects
}

fn download(state: &mut ControllerState, timestamp_ms: i64) -> Vec<Effect> {
    match state.last_image.clone() {
        Some(uri) => vec![Effect::Export {
            uri,
            filename: export_filename(timestamp_ms),
        }],
        None => {
            let alert = state.new_alert(AlertKind::Error, "No image to download");
            vec![Effect::View(ViewUpdate::ShowAlert(alert))]
        }
    }
}

fn finish_export(state: &mut ControllerState, result: Result<PathBuf>) -> Vec<Effect> {
    match result {
        Ok(_) => success_alert(state, "Image downloaded!"),
        Err(err) => {
            let message = err.user_message(&state.backend_origin);
            let alert = state.new_alert(AlertKind::Error, message);
            vec![Effect::View(ViewUpdate::ShowAlert(alert))]
        }
    }
}

fn success_alert(state: &mut ControllerState, message: &str) -> Vec<Effect> {
    let alert = state.new_alert(AlertKind::Success, message);
    let alert_id = alert.id;
    vec![
        Effect::View(ViewUpdate::ShowAlert(alert)),
        Effect::ScheduleDismiss {
            alert_id,
            after: state.alert_dismiss_after,
        },
    ]
}
