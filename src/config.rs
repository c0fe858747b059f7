use clap::{ArgAction, Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};

use crate::vision::{DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(name = "applens", version, about = "HTTP API server for appliance photo analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Commands {
    /// Print the distinct brands of the catalog CSV, one per line
    Brands,
}

/// applens server configuration
#[derive(Parser, Debug, Clone)]
pub struct Config {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (-q, -qq, -qqq)
    #[arg(short = 'q', action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Address to bind the HTTP server to
    #[arg(long, env = "APPLENS_BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// CSV file with a `brand` column, re-read on every lookup
    #[arg(long, env = "APPLENS_CATALOG_PATH", default_value = "eprel_products.csv")]
    pub catalog_path: PathBuf,

    /// Upload directory (uploads are kept in memory, nothing is written here)
    #[arg(long, env = "APPLENS_UPLOAD_DIR", default_value = "/tmp")]
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, env = "APPLENS_MAX_UPLOAD_BYTES", default_value_t = 8 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Log file path (logs are written to stdout + this file)
    #[arg(long, env = "APPLENS_LOG_FILE", default_value = "applens.logs")]
    pub log_file: PathBuf,

    /// API key for the vision model provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub llm_api_key: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "APPLENS_LLM_API_URL", default_value = "https://api.openai.com/v1")]
    pub llm_api_url: String,

    /// Vision model to use
    #[arg(long, env = "APPLENS_LLM_MODEL", default_value = "gpt-4o")]
    pub llm_model: String,

    /// Output token budget for one analysis
    #[arg(long, env = "APPLENS_LLM_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub llm_max_tokens: u32,

    /// Timeout of the outbound analysis request, in seconds
    #[arg(long, env = "APPLENS_LLM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub llm_timeout_secs: u64,
}

impl Config {
    #[must_use]
    pub fn verbosity_delta(&self) -> i16 {
        i16::from(self.verbose) - i16::from(self.quiet)
    }
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_delta() {
            d if d <= -2 => "error",
            -1 => "warn",
            0 => "info,applens=info,axum=info,tower_http=info",
            1 => "debug,applens=debug,axum=info,tower_http=info,reqwest=info",
            2 => "trace,applens=trace,axum=debug,tower_http=trace,reqwest=debug,hyper=info",
            _ => "trace,applens=trace,axum=trace,tower_http=trace,reqwest=trace,hyper=debug",
        }
    }
}
