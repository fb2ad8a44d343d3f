//! meraki-templater: batch-assign Meraki networks to configuration templates
//!
//! Reads network → template assignments from an Excel workbook, applies them
//! through the Dashboard API (unbind, bind, restore VLAN 1), and writes an
//! outcome workbook. One shot, sequential, no retries.

mod api;
mod config;
mod excel;
mod executor;
mod inventory;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::api::MerakiClient;
use crate::config::Config;
use crate::report::{ConsoleReporter, NullReporter, Reporter};

/// Output filename when --output is not given
const DEFAULT_OUTPUT: &str = "Template Assignment Results.xlsx";

#[derive(Parser)]
#[command(
    name = "meraki-templater",
    version,
    about = "Batch-assign Meraki networks to configuration templates from an Excel workbook"
)]
struct Cli {
    /// Assignment workbook path (overrides the EXCEL_DOC environment variable)
    #[arg(long)]
    excel: Option<String>,

    /// Results workbook path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Suppress console progress output (log messages are still emitted)
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(excel) = cli.excel {
        config.excel_path = excel;
    }

    let reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(NullReporter)
    } else {
        Box::new(ConsoleReporter::new())
    };

    banner("Meraki Geo Templating", cli.quiet);

    banner("Step 1: read assignments from the workbook", cli.quiet);
    reporter.message(&format!("Parsing assignments from {}...", config.excel_path));
    let assignments = excel::read_assignments(&config.excel_path)?;
    reporter.message(&format!(
        "Parsed {} network/template assignments",
        assignments.len()
    ));

    banner("Step 2: rebind networks and restore VLAN 1", cli.quiet);
    let client = MerakiClient::new(&config.api_key)?;
    let inventory =
        inventory::fetch_inventory(&client, &config.org_id, &assignments, reporter.as_ref())
            .await?;
    let results =
        executor::apply_assignments(&client, &inventory, &assignments, reporter.as_ref()).await;

    banner("Step 3: document the changes", cli.quiet);
    excel::write_results(&results, &cli.output)
        .with_context(|| format!("Failed to write results to {}", cli.output))?;
    reporter.message(&format!("Results written to {}", cli.output));

    let bound = results
        .iter()
        .filter(|r| r.new_template != executor::NOT_APPLIED)
        .count();
    reporter.message(&format!(
        "{} of {} processed networks bound to their new template",
        bound,
        results.len()
    ));

    Ok(())
}

fn banner(text: &str, quiet: bool) {
    if !quiet {
        println!("\n{}", text.cyan().bold());
    }
}
