//! Command-line interface definitions.
//!
//! Every command runs exactly one batch and exits; scheduling is left to
//! cron, systemd timers or whatever drives the deployment.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::domain::{AppId, Currency, MinorUnits};

/// Multi-source price reconciliation for tradable virtual items
#[derive(Parser, Debug)]
#[command(name = "pricesync")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [env: PRICESYNC_CONFIG]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile buy prices from every enabled source
    SyncPrices(AppArgs),

    /// Rebuild order books from depth histograms
    SyncOrders(AppArgs),

    /// Merge sales graphs into sales history
    SyncSales(AppArgs),

    /// Shift the rolling snapshot buffers by one period
    Shift(AppArgs),

    /// Convert an amount between currencies using the rate table
    Convert(ConvertArgs),
}

/// Selects the app whose items a batch runs over.
#[derive(Args, Debug)]
pub struct AppArgs {
    /// Application id
    #[arg(long)]
    pub app: u64,
}

impl AppArgs {
    #[must_use]
    pub const fn app_id(&self) -> AppId {
        AppId::new(self.app)
    }
}

/// Arguments for `pricesync convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Non-negative amount in minor units of the source currency
    #[arg(long, allow_negative_numbers = true, value_parser = clap::value_parser!(i64).range(0..))]
    pub amount: MinorUnits,

    /// Source currency code
    #[arg(long)]
    pub from: Currency,

    /// Target currency code
    #[arg(long)]
    pub to: Currency,

    /// Convert as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pricesync", "sync-prices", "--app", "730", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::SyncPrices(args) => assert_eq!(args.app_id(), AppId::new(730)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_convert_arguments() {
        let cli = Cli::try_parse_from([
            "pricesync",
            "convert",
            "--amount",
            "250",
            "--from",
            "eur",
            "--to",
            "USD",
            "--at",
            "2024-03-01T12:00:00Z",
        ])
        .unwrap();

        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.amount, 250);
        assert_eq!(args.from.as_str(), "EUR");
        assert!(args.at.is_some());
    }

    #[test]
    fn rejects_negative_amount() {
        let err = Cli::try_parse_from(["pricesync", "convert", "--amount", "-250", "--from", "EUR", "--to", "USD"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_bad_currency() {
        let result = Cli::try_parse_from(["pricesync", "convert", "--amount", "1", "--from", "EURO", "--to", "USD"]);
        assert!(result.is_err());
    }
}
