#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
mod error;
pub mod utils;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export commonly used types outside of crate (for main.rs and the tests)
pub use config::{ExplorerSettings, NetworkKind, PERSISTENCE};
pub use data::HttpExplorerApi;
pub use domain::{EntryContext, FiatCurrency};
pub use engine::{ExplorerEngine, TaskSpawner};
pub use error::ExplorerError;

// CLI argument parsing
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::config::API;
use crate::domain::CorrelationId;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account address to view
    pub address: String,

    /// View the account as of this instant (RFC 3339 or epoch milliseconds)
    #[arg(long)]
    pub at: Option<String>,

    #[arg(long, default_value_t = FiatCurrency::Usd, help = currency_help())]
    pub currency: FiatCurrency,

    #[arg(long, default_value_t = NetworkKind::Mainnet)]
    pub network: NetworkKind,

    /// Explorer API root (defaults to the public server)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Developer API token
    #[arg(long)]
    pub api_token: Option<String>,

    /// Correlation id of a sign session to resume
    #[arg(long)]
    pub resume: Option<String>,

    /// Where client state (currency, signed-in account) is kept
    #[arg(long, default_value = PERSISTENCE.file.state_path)]
    pub state_path: PathBuf,

    /// Seconds to wait for the network before giving up
    #[arg(long, default_value_t = 30)]
    pub wait_secs: u64,
}

fn currency_help() -> String {
    format!(
        "Fiat currency for converted balances [one of: {}]",
        FiatCurrency::codes().join(", ")
    )
}

impl Cli {
    pub fn settings(&self) -> ExplorerSettings {
        ExplorerSettings {
            api_base: self
                .api_base
                .clone()
                .unwrap_or_else(|| API.default_base_url()),
            api_token: self.api_token.clone(),
            network: self.network,
        }
    }

    /// The time machine instant is not part of this: it has to be validated against the
    /// account's inception first.
    pub fn entry_context(&self) -> Result<EntryContext> {
        let correlation_id = match &self.resume {
            Some(raw) => Some(
                CorrelationId::parse(raw)
                    .with_context(|| format!("--resume expects a UUID, got '{}'", raw))?,
            ),
            None => None,
        };
        Ok(EntryContext {
            address: Some(self.address.clone()),
            ledger_timestamp: None,
            correlation_id,
        })
    }
}
