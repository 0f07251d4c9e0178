//! Line-oriented front end: commands typed on stdin, view updates printed
//! to stdout.

use crate::{
    backend::GenerationBackend,
    controller::{AlertKind, GenerationController, View, ViewUpdate},
    form::NumericField,
    models::PNG_DATA_URI_PREFIX,
    prompts,
};
use colored::*;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: use it as the prompt and generate.
    Generate(String),
    SetField(NumericField, String),
    Download,
    Random,
    Settings,
    Health,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Generate(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.collect::<Vec<_>>().join(" ");

    match name {
        "download" | "d" => Command::Download,
        "random" | "r" => Command::Random,
        "settings" => Command::Settings,
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.parse::<NumericField>() {
            Ok(field) => Command::SetField(field, arg),
            Err(_) => Command::Unknown(other.to_string()),
        },
    }
}

pub const HELP: &str = "\
Type a prompt and press Enter to generate an image.
  :width N | :height N | :steps N   change a setting (saved automatically)
  :random                           generate from an example prompt
  :download                         save the last image
  :settings                         show current settings
  :health                           check the backend
  :quit                             exit";

/// Read commands from `input` until it ends or `:quit`.
///
/// Generations run in the background so input keeps flowing; a prompt
/// entered while a request is pending is ignored by the controller. Every
/// started generation is awaited before returning.
pub async fn run<R>(
    input: R,
    controller: &GenerationController,
    backend: &dyn GenerationBackend,
    view: &dyn View,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut pending = JoinSet::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Generate(prompt) => spawn_generation(&mut pending, controller, prompt),
            Command::Random => {
                let prompt = prompts::random_prompt().to_string();
                view.render(&ViewUpdate::SetPrompt(prompt.clone()));
                spawn_generation(&mut pending, controller, prompt);
            }
            Command::SetField(field, raw) => controller.set_field(field, &raw).await,
            Command::Download => controller.download().await,
            Command::Settings => {
                let s = controller.settings();
                println!("width={} height={} steps={}", s.width, s.height, s.steps);
            }
            Command::Health => check_health(backend).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(name) => {
                log::warn!("⚠️  Unknown command ':{}', try :help", name)
            }
        }
    }

    if !pending.is_empty() {
        log::debug!("Waiting for {} pending generation(s)", pending.len());
    }
    while let Some(joined) = pending.join_next().await {
        if let Err(e) = joined {
            log::error!("❌ Generation task failed: {}", e);
        }
    }

    Ok(())
}

fn spawn_generation(pending: &mut JoinSet<()>, controller: &GenerationController, prompt: String) {
    let controller = controller.clone();
    pending.spawn(async move {
        controller.generate_prompt(&prompt).await;
    });
}

pub async fn check_health(backend: &dyn GenerationBackend) {
    match backend.health().await {
        Ok(health) if health.is_healthy() => {
            log::info!(
                "✅ Backend healthy: {}",
                health.model.as_deref().unwrap_or("unknown model")
            );
            if health.token_configured == Some(false) {
                log::warn!("⚠️  Backend reports no API token configured; generation will fail");
            }
        }
        Ok(health) => log::warn!("⚠️  Backend status: {}", health.status),
        Err(e) => log::warn!("⚠️  Health check failed: {}", e),
    }
}

/// Prints view updates as they happen.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    pub fn describe(update: &ViewUpdate) -> Option<String> {
        match update {
            ViewUpdate::ShowAlert(alert) => Some(match alert.kind {
                AlertKind::Success => format!("{}", alert.message.green().bold()),
                AlertKind::Error => format!("{}", alert.message.red().bold()),
            }),
            ViewUpdate::ShowLoading => Some(format!("{}", "⏳ Generating...".yellow())),
            ViewUpdate::ShowImage { uri, alt } => Some(format!(
                "🖼️  {} {}",
                describe_uri(uri).bright_cyan(),
                format!("({})", alt).bright_black()
            )),
            ViewUpdate::SetField { field, value } => {
                Some(format!("{}", format!("{} = {}", field, value).bright_black()))
            }
            ViewUpdate::SetPrompt(prompt) => Some(format!("{} {}", "prompt:".bright_black(), prompt)),
            ViewUpdate::SetTrigger { .. }
            | ViewUpdate::HideAlert
            | ViewUpdate::HideLoading
            | ViewUpdate::HideResult
            | ViewUpdate::FocusPrompt => None,
        }
    }
}

impl View for TerminalView {
    fn render(&self, update: &ViewUpdate) {
        if let Some(line) = Self::describe(update) {
            println!("{}", line);
        }
    }
}

fn describe_uri(uri: &str) -> String {
    match uri.strip_prefix(PNG_DATA_URI_PREFIX) {
        Some(payload) => format!("inline PNG, {} base64 chars", payload.len()),
        None => uri.to_string(),
    }
}
