//! meshpick - pointer interaction for 3D scene graphs
//!
//! Headless demo executable: builds a small widget scene, replays a pointer
//! script against it and reports the interaction events.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use config::DemoConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless pointer interaction demo for meshpick", long_about = None)]
struct Args {
    /// Demo configuration (TOML); missing files fall back to defaults
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Pointer script (JSON) to replay instead of the built-in tour
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write every interaction event as JSON lines to this path
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Override the simulated frame time in milliseconds
    #[arg(long)]
    frame_ms: Option<f64>,

    /// Override the number of frames to run
    #[arg(long)]
    frames: Option<u64>,

    /// Write the effective configuration (after overrides) to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting meshpick v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut demo = DemoConfig::load_from_path(&args.config);
    if let Some(frame_ms) = args.frame_ms {
        if frame_ms.is_finite() && frame_ms >= 0.0 {
            demo.frame_ms = frame_ms;
        } else {
            tracing::warn!(frame_ms, "ignoring invalid --frame-ms");
        }
    }
    if let Some(frames) = args.frames {
        demo.frames = frames;
    }

    if let Some(path) = args.write_config {
        demo.save_to_path(&path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        demo,
        script: args.script,
        event_log: args.event_log,
    })?;

    for record in summary.log.records() {
        let selected = match record.is_selected {
            Some(true) => " (selected)",
            Some(false) => " (deselected)",
            None => "",
        };
        println!(
            "[{:>4}] {:<6} {}{}",
            record.frame,
            record.kind.as_str(),
            record.target,
            selected
        );
    }
    println!(
        "{} frames, {} events, {} clicks; checkbox {}, radio {}",
        summary.frames,
        summary.log.len(),
        summary.clicks(),
        if summary.checkbox_selected { "on" } else { "off" },
        summary.selected_radio.as_deref().unwrap_or("none"),
    );
    Ok(())
}
