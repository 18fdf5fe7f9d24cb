use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use image_rename::cli::Cli;
use image_rename::config::AppConfig;
use image_rename::logging::{LogTarget, default_log_file, init_logger};
use image_rename::selection::collect_paths;
use image_rename::{EntryStatus, InferenceClient, OllamaClient, Orchestrator, tui};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config()?;

    let interactive = !cli.no_tui && !cli.check;
    let log_target = if interactive {
        LogTarget::File(config.log_file.clone().unwrap_or_else(default_log_file))
    } else {
        LogTarget::Stderr
    };
    init_logger(&log_target)?;

    if cli.check {
        return check_model(&config).await;
    }

    let paths = resolve_paths(&cli);

    if interactive {
        tui::run_tui(&config, paths).await
    } else {
        run_headless(&config, paths, cli.apply).await
    }
}

fn resolve_paths(cli: &Cli) -> Vec<PathBuf> {
    #[allow(unused_mut)]
    let mut inputs = cli.paths.clone();

    #[cfg(feature = "dialog")]
    if cli.pick {
        inputs.extend(image_rename::selection::pick_images());
    }

    let selection = collect_paths(&inputs);
    for skipped in &selection.skipped {
        warn!("{}", skipped);
    }
    selection.paths
}

async fn check_model(config: &AppConfig) -> Result<()> {
    let client = OllamaClient::new(&config.inference)?;
    let availability = client.check_availability().await;
    println!("{}", availability.detail);
    if !availability.available {
        bail!("model {} is not available at {}", client.model(), client.endpoint());
    }
    Ok(())
}

async fn run_headless(config: &AppConfig, paths: Vec<PathBuf>, apply: bool) -> Result<()> {
    if paths.is_empty() {
        bail!("No image files provided to rename");
    }

    let client = OllamaClient::new(&config.inference)?;
    let mut orchestrator = Orchestrator::new(config.mode, config.pattern.clone());
    orchestrator.add_paths(paths);

    println!("Image Rename ({})", config.mode.label());
    println!("===================");

    let summary = orchestrator
        .generate_names(&client, |progress| {
            info!("Progress: {}/{} ({}%)", progress.completed, progress.total, progress.percent());
        })
        .await
        .context("Generate phase failed")?;

    for entry in orchestrator.entries() {
        match entry.status() {
            EntryStatus::Error => println!(
                "✗ {}: {}",
                entry.original_name(),
                entry.error_message().unwrap_or("unknown error")
            ),
            _ => println!("  {} -> {}", entry.original_name(), entry.proposed_name()),
        }
    }
    println!();
    println!("Named {} of {} file(s)", summary.succeeded, summary.total);

    if !apply {
        println!("Preview only. Re-run with --apply to rename.");
        return Ok(());
    }

    let applied = orchestrator
        .apply_renames()
        .await
        .context("Apply phase failed")?;

    for entry in orchestrator.entries() {
        if let Some(message) = entry.error_message() {
            println!("✗ {}: {}", entry.original_name(), message);
        }
    }

    println!("===================");
    println!(
        "Summary: {} of {} files renamed successfully",
        applied.succeeded, applied.attempted
    );

    if applied.failed == 0 && applied.attempted > 0 {
        println!("✓ All files renamed successfully!");
    } else if applied.succeeded > 0 {
        println!("⚠ Some files were renamed, but there were errors with others.");
    } else {
        println!("✗ No files were renamed.");
    }

    Ok(())
}
