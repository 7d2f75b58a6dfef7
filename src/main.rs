// src/main.rs
//
// CLI harness standing in for the control panel: loads the exported
// bundle configuration and transaction list, runs the stealth engine,
// and prints the scheduling plan plus effectiveness reports as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use stealth_bundler::config::{load_transactions, EnhancedBundleConfig};
use stealth_bundler::stealth::sampler::SeededRng;
use stealth_bundler::stealth::types::StealthConfig;
use stealth_bundler::utils::setup_logging;
use stealth_bundler::StealthEngine;

#[derive(Debug, Parser)]
#[command(name = "stealth-bundler", about = "Stealth scheduling engine for transaction bundles")]
struct Cli {
    /// Panel-exported bundle configuration (JSON)
    #[arg(long, default_value = "bundle_config.json")]
    config: PathBuf,

    /// Panel-exported transaction list (JSON)
    #[arg(long, default_value = "transactions.json")]
    transactions: PathBuf,

    /// Seed for a reproducible scheduling run
    #[arg(long)]
    seed: Option<u64>,

    /// Override the loaded config with every protection flag enabled
    #[arg(long)]
    preset_max: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let level = std::env::var("BUNDLER_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(log::LevelFilter::Info);
    setup_logging(level).context("Failed to initialize logging")?;

    let cli = Cli::parse();

    let bundle_config = EnhancedBundleConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    bundle_config.validate_and_log();

    let stealth_config = if cli.preset_max {
        StealthConfig::full_protection()
    } else {
        bundle_config.to_stealth_config()
    };

    let engine = match cli.seed {
        Some(seed) => {
            info!("🎲 seeded run: {}", seed);
            StealthEngine::with_random_source(stealth_config, Box::new(SeededRng::new(seed)))
        }
        None => StealthEngine::new(stealth_config),
    };

    let intents = load_transactions(&cli.transactions)
        .with_context(|| format!("loading {}", cli.transactions.display()))?;
    info!("📋 {} transactions loaded", intents.len());

    let plan = engine.build_bundle(&intents, bundle_config.total_budget());
    info!(
        "🚀 bundle {} ready: {}ms total planned delay",
        plan.bundle_id, plan.total_delay_ms
    );

    println!("{}", serde_json::to_string_pretty(&plan)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&engine.analyze_effectiveness())?
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&engine.protection_status())?
    );

    Ok(())
}
