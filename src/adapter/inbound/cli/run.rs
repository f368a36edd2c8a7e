//! Command dispatch.

use chrono::Utc;
use tracing::info;

use super::command::{Cli, Commands, ConvertArgs};
use super::output::{self, OutputConfig};
use crate::application::summary::{BatchSummary, DetailSummary, SourceOutcome};
use crate::application::sync::load_converter;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::config::settings::Config;

/// Load configuration, run the selected batch and print its summary.
///
/// # Errors
///
/// Returns configuration errors and batch-fatal errors; the caller turns
/// them into a non-zero exit.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json));

    let path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(&path)?;
    config.init_logging();
    info!(config = %path.display(), "pricesync starting");

    let services = Services::from_config(&config);
    let now = Utc::now();

    match cli.command {
        Commands::SyncPrices(args) => {
            let summary = services.prices.run(args.app_id(), now).await?;
            print_batch(&summary)
        }
        Commands::SyncOrders(args) => {
            let summary = services.details.order_books(args.app_id(), now).await?;
            print_details("Order books", &summary)
        }
        Commands::SyncSales(args) => {
            let summary = services.details.sales(args.app_id(), now).await?;
            print_details("Sales history", &summary)
        }
        Commands::Shift(args) => {
            let saved = services.snapshots.run(args.app_id()).await?;
            output::result("shift", &serde_json::json!({ "app_id": args.app_id(), "saved": saved }))?;
            output::success(&format!("Shifted snapshots for {saved} items"));
            Ok(())
        }
        Commands::Convert(args) => convert(&services, &config, &args).await,
    }
}

async fn convert(services: &Services, config: &Config, args: &ConvertArgs) -> Result<()> {
    let at = args.at.unwrap_or_else(Utc::now);
    let converter = load_converter(services.rates.as_ref(), &config.engine.pivot_currency, at).await?;
    let converted = converter.convert(args.amount, &args.from, &args.to, at)?;

    output::result(
        "conversion",
        &serde_json::json!({
            "amount": args.amount,
            "from": args.from,
            "to": args.to,
            "at": at,
            "converted": converted,
        }),
    )?;
    if !output::is_json() {
        println!("{} {} = {} {}", args.amount, args.from, converted, args.to);
    }
    Ok(())
}

fn print_batch(summary: &BatchSummary) -> Result<()> {
    output::result("price_batch", summary)?;

    output::section("Price batch");
    output::field("Batch", summary.batch_id);
    output::field("App", summary.app_id);
    output::field("Items", summary.items);
    output::field("Saved", summary.saved);
    for outcome in &summary.sources {
        match outcome {
            SourceOutcome::Reconciled { source, report } => output::field(
                source.as_str(),
                format!(
                    "+{} ~{} -{} ({} rejected, {} failed)",
                    report.added,
                    report.updated,
                    report.removed,
                    report.rejected.len(),
                    report.failures.len()
                ),
            ),
            SourceOutcome::FetchFailed { source, error } => {
                output::warning(&format!("{source}: fetch failed, prices kept ({error})"));
            }
        }
    }
    Ok(())
}

fn print_details(title: &str, summary: &DetailSummary) -> Result<()> {
    output::result("detail_batch", summary)?;

    output::section(title);
    output::field("Updated", summary.updated);
    output::field("Anomalous", summary.anomalous);
    output::field("New sales", summary.inserted_sales);
    output::field("Saved", summary.saved);
    for failure in &summary.failures {
        output::warning(&format!("{}: {}", failure.key, failure.error));
    }
    Ok(())
}
