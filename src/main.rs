//! Input Trace CLI
//!
//! Captures user input activity into tabular logs and labels exported logs.

use chrono::Utc;
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use input_trace::{
    config::{Config, SourceConfig},
    core::CaptureSession,
    export::{label_file, write_capture_log},
    source::{ChannelSource, SourceOptions},
    VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "input-trace")]
#[command(version = VERSION)]
#[command(about = "User input activity capture and labeling pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one capture window and export the activity log
    Collect {
        /// Capture window duration in seconds (overrides config)
        #[arg(long)]
        duration: Option<u64>,

        /// Input sources to capture (keyboard, mouse, or all)
        #[arg(long, default_value = "all")]
        sources: String,

        /// Output file for the capture log
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Label a previously exported activity log
    Label {
        /// Input capture log or event table
        #[arg(long, short)]
        input: PathBuf,

        /// Output file for the labeled log
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            duration,
            sources,
            output,
        } => {
            cmd_collect(duration, &sources, output);
        }
        Commands::Label { input, output } => {
            cmd_label(&input, output);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_collect(duration: Option<u64>, sources: &str, output: Option<PathBuf>) {
    println!("Input Trace v{VERSION}");
    println!();

    // Parse source configuration
    let source_config = SourceConfig::from_csv(sources);
    if !source_config.any_enabled() {
        eprintln!("Error: At least one source must be enabled (keyboard or mouse)");
        std::process::exit(1);
    }

    // Load or create configuration
    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    let window = duration
        .map(Duration::from_secs)
        .unwrap_or(config.window_duration);

    println!("Starting capture...");
    println!(
        "  Keyboard: {}",
        if source_config.keyboard {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Mouse: {}",
        if source_config.mouse {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Window duration: {}s", window.as_secs());

    // Create the event source. A platform input hook feeds events through
    // `source.handle()`; without one attached the window simply logs nothing.
    let mut source = ChannelSource::new(SourceOptions {
        keyboard: source_config.keyboard,
        mouse: source_config.mouse,
    });
    if let Err(e) = source.start() {
        eprintln!("Error starting event source: {e}");
        std::process::exit(1);
    }

    let session = CaptureSession::new(window);
    println!("  Session ID: {}", session.session_id());
    println!();
    println!("Press Ctrl+C to stop early");
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    // Drain events until the window ends or the user stops the capture
    let receiver = source.receiver().clone();
    let deadline = Instant::now() + window;

    while running.load(Ordering::SeqCst) && Instant::now() < deadline {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => session.handle(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                eprintln!("Event source disconnected unexpectedly");
                break;
            }
        }
    }

    // Stop delivery, then hand any already-queued events to the session
    println!("Stopping capture...");
    source.stop();
    while let Some(event) = source.try_recv() {
        session.handle(&event);
    }

    let report = match session.finish() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error finishing session: {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("Session complete:");
    println!("  Events logged: {}", report.events.len());
    println!("  Total keystrokes: {}", report.metrics.total_keystrokes);
    println!(
        "  Typing speed: {:.1} KPM ({:.1} WPM)",
        report.metrics.typing_speed_kpm, report.metrics.typing_speed_wpm
    );
    println!(
        "  Avg. keypress interval: {:.3}s",
        report.metrics.avg_keypress_interval
    );
    println!(
        "  Avg. click interval: {:.3}s",
        report.metrics.avg_click_interval
    );

    let export_path = output.unwrap_or_else(|| {
        config.export_path.join(format!(
            "activity_log_{}.csv",
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });

    match write_capture_log(&export_path, &report.metrics, &report.events) {
        Ok(()) => println!("Exported capture log to {export_path:?}"),
        Err(e) => {
            eprintln!("Error writing capture log: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_label(input: &PathBuf, output: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();

    let output = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("activity_log");
        input.with_file_name(format!("{stem}_labeled.csv"))
    });

    match label_file(input, &output, &config.thresholds) {
        Ok(()) => println!("Labeled log saved to {output:?}"),
        Err(e) => {
            eprintln!("Error labeling {input:?}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
