//! Handlers for the data commands: `latest`, `history`, `export`.

use std::path::Path;

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{load_config, output};
use crate::application::dashboard::export_csv;
use crate::domain::money::format_currency;
use crate::domain::quote::Quote;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;

#[derive(Tabled, Serialize)]
struct QuoteRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "ATR")]
    atr: String,
    #[tabled(rename = "Exit Price")]
    exit_price: String,
    #[tabled(rename = "Last Updated")]
    last_updated: String,
}

impl From<&Quote> for QuoteRow {
    fn from(quote: &Quote) -> Self {
        if output::is_json() {
            Self {
                symbol: quote.symbol.to_string(),
                price: quote.price.normalize().to_string(),
                atr: quote.atr.normalize().to_string(),
                exit_price: quote.exit_price().normalize().to_string(),
                last_updated: quote.display_timestamp(),
            }
        } else {
            Self {
                symbol: quote.symbol.to_string(),
                price: format_currency(quote.price),
                atr: format_currency(quote.atr),
                exit_price: format_currency(quote.exit_price()),
                last_updated: quote.display_timestamp(),
            }
        }
    }
}

fn print_quotes(quotes: &[Quote]) {
    let rows: Vec<QuoteRow> = quotes.iter().map(QuoteRow::from).collect();
    let rendered = Table::new(&rows).to_string();
    output::table(&rendered, &rows);
}

/// Execute `latest`.
pub async fn execute_latest(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let snapshot = build_services(&config)?.dashboard.snapshot().await?;

    output::section("Latest Quotes");
    let Some(summary) = snapshot.summary.as_ref() else {
        output::note("No data available yet. Waiting for TradingView webhooks...");
        return Ok(());
    };

    output::field("Total Symbols", summary.total_symbols);
    output::field("Avg Price", format_currency(summary.avg_price));
    output::field("Avg ATR", format_currency(summary.avg_atr));
    print_quotes(&snapshot.quotes);
    Ok(())
}

/// Execute `history`.
pub async fn execute_history(config_path: &Path, limit: u32) -> Result<()> {
    let config = load_config(config_path)?;
    let quotes = build_services(&config)?
        .dashboard
        .history(Some(limit))
        .await?;

    output::section("History");
    if quotes.is_empty() {
        output::note("No quotes stored");
        return Ok(());
    }
    print_quotes(&quotes);
    if limit > 0 && quotes.len() == limit as usize {
        output::hint("use --limit 0 to show every row");
    }
    Ok(())
}

/// Execute `export`. Writes CSV to `output_path`, or stdout when `None`.
pub async fn execute_export(config_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let snapshot = build_services(&config)?.dashboard.snapshot().await?;
    let csv = export_csv(&snapshot.quotes);

    match output_path {
        Some(path) => {
            std::fs::write(path, csv)?;
            output::success(&format!(
                "Exported {} symbols to {}",
                snapshot.quotes.len(),
                path.display()
            ));
        }
        None => print!("{csv}"),
    }
    Ok(())
}
