use anyhow::{Context, Result};
use pet_recipe_optim::catalog::load_catalog_csv;
use pet_recipe_optim::cli::parse_args;
use pet_recipe_optim::config::{clamp_timeout_ms, Settings};
use pet_recipe_optim::engine::RecipeEngine;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

fn init_tracing(level: &str) {
    let level: LevelFilter = level.parse().unwrap_or(LevelFilter::INFO);
    // stdout carries the JSON response
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut settings = Settings::from_env()?;
    let cli_args = parse_args();
    if let Some(path) = &cli_args.catalog {
        settings.catalog_path = path.clone();
    }
    if let Some(ms) = cli_args.timeout_ms {
        settings.solver_timeout = clamp_timeout_ms(ms);
    }
    init_tracing(&settings.log_level);

    info!(path = ?settings.catalog_path, "loading ingredient catalog");
    let catalog = load_catalog_csv(&settings.catalog_path).with_context(|| {
        format!(
            "Failed to load ingredient catalog from '{}'",
            settings.catalog_path.display()
        )
    })?;

    let engine = RecipeEngine::new(Arc::new(catalog), settings.solver_timeout);
    let response = engine.generate(&cli_args.request()).await;

    let json = serde_json::to_string_pretty(&response)
        .context("Failed to serialize recipe response")?;
    println!("{}", json);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
