use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

use crate::cli::ui;
use crate::core::config::AppConfig;
use crate::core::currency::Currency;
use crate::core::rates::{RateSource, RateTable};
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;

/// Runs the `rates` command: one acquisition attempt, then the table.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            debug!("No usable config file, using defaults: {e:#}");
            AppConfig::default()
        }),
    };

    let provider = ExchangeRateApiProvider::new(config.rate_api_base_url());
    let spinner = ui::new_spinner("Updating exchange rates...");
    let rates = RateTable::acquire(&provider).await;
    spinner.finish_and_clear();

    println!("{}", display_rates(&rates));
    Ok(())
}

fn display_rates(rates: &RateTable) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Code"),
        ui::header_cell("Rate per USD"),
    ]);

    for currency in Currency::ALL {
        table.add_row(vec![
            Cell::new(currency.display_name()),
            Cell::new(currency.code()),
            ui::rate_cell(rates.rate(currency)),
        ]);
    }

    let source_line = match rates.source() {
        RateSource::Live { fetched_at } => {
            format!("Rates updated: {}", fetched_at.format("%Y-%m-%d %H:%M"))
        }
        RateSource::Fallback => "Using built-in fallback rates".to_string(),
    };

    format!(
        "{}\n{}",
        table,
        ui::style_text(&source_line, ui::StyleType::Subtle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::FetchedRates;
    use chrono::Local;

    #[test]
    fn test_display_fallback_rates() {
        let output = display_rates(&RateTable::fallback());

        assert!(output.contains("Mexican peso"));
        assert!(output.contains("20.1500"));
        assert!(output.contains("1.0000"));
        assert!(output.contains("Using built-in fallback rates"));
    }

    #[test]
    fn test_display_live_rates() {
        let fetched = FetchedRates::from([("PEN".to_string(), 3.55)]);
        let table = RateTable::from_fetched(&fetched, Local::now());

        let output = display_rates(&table);
        assert!(output.contains("3.5500"));
        assert!(output.contains("Rates updated:"));
    }
}
