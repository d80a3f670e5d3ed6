//! figbot CLI: run the sticker bot, convert a local image to a sticker, inspect a sticker's pack
//! metadata. Config from env (and `.env`) plus optional CLI args.

use anyhow::{Context, Result};
use clap::Parser;
use dispatcher::{parse_size, BotSettings};
use figbot_bridge::run_bridge;
use figbot_cli::{convert_file, inspect_file, load_config, Cli, Commands};
use figbot_core::init_tracing;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { bridge_addr } => {
            let config = load_config(bridge_addr)?;
            init_tracing(config.log_file.as_deref())?;
            let settings = BotSettings::from_env().context("Load bot settings from env")?;
            run_bridge(config, settings).await
        }
        Commands::Sticker {
            input,
            output,
            size,
            quality,
        } => {
            init_tracing(None)?;
            handle_sticker(&input, &output, size.as_deref(), quality)
        }
        Commands::Inspect { file } => handle_inspect(&file),
    }
}

/// Handle the sticker command: env settings, with flags taking precedence.
fn handle_sticker(input: &Path, output: &Path, size: Option<&str>, quality: Option<f32>) -> Result<()> {
    let mut settings = BotSettings::from_env().context("Load bot settings from env")?;
    if let Some(size) = size {
        settings.transcode.size = parse_size(size)?;
    }
    if let Some(quality) = quality {
        settings.transcode.quality = quality;
    }
    settings.validate()?;

    let report = convert_file(input, output, &settings)?;
    println!(
        "{} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        report.width,
        report.height,
        report.bytes
    );
    Ok(())
}

fn handle_inspect(file: &Path) -> Result<()> {
    let metadata = inspect_file(file)?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}
