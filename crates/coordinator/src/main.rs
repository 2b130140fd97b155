//! Relief batch CLI.
//!
//! Usage:
//!   relief --input ./scans
//!   relief --input ./scans --config relief.toml
//!   relief --input ./scans --question "What areas flooded?"
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - reasoning service API key (recommended over
//!   storing it in the config file)
//! - `RUST_LOG` - tracing filter (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use relief_coordinator::{Coordinator, CoordinatorConfig};
use relief_reasoning::build_reasoning_client;
use relief_store::{RecordStore, StaticResidentDirectory, StaticZoneRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut input_dir: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut questions: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                if i + 1 < args.len() {
                    input_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--output-dir" | "-o" => {
                if i + 1 < args.len() {
                    output_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--question" | "-q" => {
                if i + 1 < args.len() {
                    questions.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Relief batch pipeline");
                println!();
                println!("Usage: relief --input <DIR> [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -i, --input <DIR>       Directory of scanned images to digitize");
                println!("  -c, --config <FILE>     Path to a TOML config file");
                println!("  -o, --output-dir <DIR>  Record store directory (default: ./output)");
                println!("  -q, --question <TEXT>   Question to answer over the digitized records");
                println!("                          (repeatable; overrides config questions)");
                println!("  -h, --help              Show this help message");
                println!();
                println!("Environment variables:");
                println!("  GEMINI_API_KEY          Reasoning service API key");
                println!("  RUST_LOG                Tracing filter (default: info)");
                return Ok(());
            }
            other => {
                anyhow::bail!("Unknown argument '{other}'. See --help.");
            }
        }
        i += 1;
    }

    let Some(input_dir) = input_dir else {
        anyhow::bail!("Missing required --input <DIR>. See --help.");
    };

    let mut config = if let Some(path) = config_path {
        tracing::info!(path = %path, "Loading configuration");
        CoordinatorConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        CoordinatorConfig::default()
    };

    if let Some(dir) = output_dir {
        config.store.output_dir = dir;
    }
    let questions = if questions.is_empty() {
        config.questions.clone()
    } else {
        questions
    };

    let reasoning = build_reasoning_client(&config.reasoning)?;
    let store = Arc::new(RecordStore::open(config.store.clone())?);

    let coordinator = Coordinator::new(
        reasoning,
        store,
        Arc::new(StaticResidentDirectory::fixture()),
        Arc::new(StaticZoneRegistry::fixture()),
        config.residents.clone(),
    );

    let report = coordinator.run(&input_dir, &questions).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
