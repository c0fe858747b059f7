#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use applens::{
    build_app,
    catalog::load_brands,
    config::{Cli, Commands, Config},
    logging::init_logging,
    models::AppState,
    vision::OpenAiVisionClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        return handle_command(command, &cli.config);
    }

    let config = cli.config;

    // Keep guard alive so file logger flushes correctly
    let _log_guards = init_logging(&config);

    tracing::info!("=== Configuration ===");
    tracing::info!("Bind address: {}", config.bind);
    tracing::info!("Catalog: {}", config.catalog_path.display());
    tracing::info!(
        "Upload directory: {} (unused, uploads stay in memory)",
        config.upload_dir.display()
    );
    tracing::info!("Max upload size: {} bytes", config.max_upload_bytes);
    tracing::info!("Log file: {}", config.log_file.display());
    tracing::info!(
        "LLM API key: {}",
        if config.llm_api_key.trim().is_empty() {
            "<empty>"
        } else {
            "<set>"
        }
    );
    tracing::info!("LLM model: {}", config.llm_model);
    tracing::info!("LLM API URL: {}", config.llm_api_url);
    tracing::info!("LLM max tokens: {}", config.llm_max_tokens);
    tracing::info!("LLM timeout: {}s", config.llm_timeout_secs);
    tracing::info!("====================");

    if !config.catalog_path.exists() {
        tracing::warn!(
            "Catalog {} not found, /brands will fail until it exists",
            config.catalog_path.display()
        );
    }

    let state = AppState {
        vision: Arc::new(OpenAiVisionClient::from_config(&config)),
        config: config.clone(),
    };

    let app = build_app(state);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn handle_command(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Brands => {
            for brand in load_brands(&config.catalog_path)? {
                println!("{brand}");
            }
            Ok(())
        }
    }
}
