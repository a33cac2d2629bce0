//! Tracing configuration.
//!
//! Output format is controlled by `TSGUARD_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `json`: one JSON object per event
//!
//! ```bash
//! TSGUARD_LOG=debug tsguard check --types types.json --root User < user.json
//! TSGUARD_LOG="tsguard_compiler=trace" TSGUARD_LOG_FORMAT=json tsguard emit ...
//! ```
//!
//! All output goes to stderr so it never mixes with reports or emitted code.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("TSGUARD_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `TSGUARD_LOG`, then `RUST_LOG`, then warnings only.
fn build_filter() -> EnvFilter {
    match std::env::var("TSGUARD_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_tracing() {
    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
}
