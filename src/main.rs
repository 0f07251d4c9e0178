use clap::Parser;
use fluxgen::{
    logger::{self, LoggerConfig},
    terminal::{self, TerminalView},
    ClientConfig, FileExporter, GenerationController, HttpBackend, SettingsManager,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "fluxgen", version, about = "Generate images from a local FLUX backend")]
struct Cli {
    /// Generation endpoint (default: FLUX_API_ENDPOINT or http://localhost:5000/generate)
    #[arg(long)]
    endpoint: Option<String>,

    /// Where settings are persisted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory downloaded images are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Generate one image for this prompt, save it and exit
    #[arg(long)]
    prompt: Option<String>,

    /// Debug logging with source locations
    #[arg(short, long)]
    verbose: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<String>,

    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::new()
    };
    log_config = log_config.with_json_output(cli.json_logs);
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_file_output(path);
    }
    logger::init_with_config(log_config)?;

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }

    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(path) = cli.settings {
        config = config.with_settings_path(path);
    }
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    let backend = HttpBackend::new(&config)?;
    terminal::check_health(&backend).await;

    let view = Arc::new(TerminalView::new());
    let controller = GenerationController::new(
        &config,
        Arc::new(backend.clone()),
        SettingsManager::from_config(&config),
        Arc::new(FileExporter::new(config.resolved_output_dir())),
        view.clone(),
    );
    controller.start();

    if let Some(prompt) = cli.prompt {
        return match controller.generate_prompt(&prompt).await {
            Some(Ok(_)) => {
                controller.download().await;
                Ok(())
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok(()),
        };
    }

    println!("{}", terminal::HELP);
    let input = BufReader::new(tokio::io::stdin());
    terminal::run(input, &controller, &backend, view.as_ref()).await?;

    Ok(())
}
