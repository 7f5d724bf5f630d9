mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use scene_recognizer::app::{Application, OperatorCommand};
use scene_recognizer::catalog::{authoring, Catalog};
use scene_recognizer::config::Settings;
use scene_recognizer::error::AppError;
use scene_recognizer::intake::DirectoryFrameSource;
use scene_recognizer::pipeline::SceneEngine;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};

use crate::cli::{Cli, Command};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config_path(), cli.config_required())?;
    init_logging(settings.log_level()?);
    info!("Configuration loaded from {:?}", cli.config_path());

    match cli.command() {
        Command::Run => run(settings).await,
        Command::Encode(args) => encode(&settings, args.into_request()),
    }
}

async fn run(settings: Settings) -> Result<(), AppError> {
    let catalog = Catalog::load_with_dir(&settings.template_config, &settings.template_dir)?;
    let engine = SceneEngine::new(Arc::new(catalog));
    let source = DirectoryFrameSource::new(settings.frame_dir.clone());
    let app = Application::new(settings, engine, Box::new(source));

    let (command_tx, command_rx) = mpsc::channel(16);
    spawn_stdin_commands(command_tx);

    let cancel_token = app.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            cancel_token.cancel();
        }
    });

    let summary = app.run(command_rx).await?;
    println!(
        "{} ticks, {} with detections, final scene: {} ({})",
        summary.ticks, summary.detections, summary.final_scene, summary.final_state
    );
    Ok(())
}

fn spawn_stdin_commands(command_tx: mpsc::Sender<OperatorCommand>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<OperatorCommand>() {
                    Ok(command) => {
                        if command_tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
}

fn encode(
    settings: &Settings,
    request: authoring::EncodeRequest,
) -> Result<(), AppError> {
    let index_path: &Path = &settings.template_config;
    let name = authoring::encode_template(&request, &settings.template_dir, index_path)?;
    println!(
        "Encoded `{}` into {:?}",
        name,
        settings.template_dir.join(format!("{name}.json"))
    );
    Ok(())
}
