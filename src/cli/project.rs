use anyhow::Result;
use comfy_table::Cell;
use std::str::FromStr;
use tracing::debug;

use crate::cli::ui;
use crate::core::config::{AppConfig, Scenario};
use crate::core::currency::{BonusPayout, Currency, format_amount, format_currency};
use crate::core::metrics::{DEVICE_UNIT_PRICE, DerivedMetrics, RawInputs};
use crate::core::rates::{RateSource, RateTable};
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;

/// Runs the `project` command.
///
/// With ad-hoc `inputs` a single projection is computed; otherwise every
/// scenario from the configuration file is projected. The exchange-rate fetch
/// is spawned before any computation so input handling never waits on the
/// network; the table is only awaited at the display step.
pub async fn run(
    inputs: Option<RawInputs>,
    currency: Option<&str>,
    config_path: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path, inputs.is_some())?;

    let base_url = config.rate_api_base_url().to_string();
    let fetch = tokio::spawn(async move {
        let provider = ExchangeRateApiProvider::new(&base_url);
        RateTable::acquire(&provider).await
    });

    let currency = match currency {
        Some(code) => Currency::from_str(code)?,
        None => Currency::from_str(&config.currency)?,
    };

    let scenarios = match inputs {
        Some(inputs) => vec![Scenario {
            name: "Projection".to_string(),
            inputs,
        }],
        None => config.scenarios,
    };

    if scenarios.is_empty() {
        println!(
            "No scenarios configured. Add one to the config file or pass inputs as flags; see --help."
        );
        return Ok(());
    }

    // Metrics are pure; they never wait on the in-flight fetch.
    let projections: Vec<(Scenario, DerivedMetrics)> = scenarios
        .into_iter()
        .map(|scenario| {
            let metrics = DerivedMetrics::compute(&scenario.inputs);
            (scenario, metrics)
        })
        .collect();

    let spinner = ui::new_spinner("Updating exchange rates...");
    let rates = match fetch.await {
        Ok(table) => table,
        Err(e) => {
            debug!("Rate fetch task failed, keeping fallback rates: {e}");
            RateTable::fallback()
        }
    };
    spinner.finish_and_clear();

    let num_projections = projections.len();
    for (i, (scenario, metrics)) in projections.into_iter().enumerate() {
        let payout = BonusPayout::convert(metrics.bonus, currency, &rates);
        println!("{}", display_projection(&scenario, &metrics, &payout, &rates));
        if i < num_projections - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}

fn load_config(config_path: Option<&str>, ad_hoc: bool) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => match AppConfig::load() {
            Ok(config) => Ok(config),
            // Ad-hoc projections work without a config file.
            Err(e) if ad_hoc => {
                debug!("No usable config file, using defaults: {e:#}");
                Ok(AppConfig::default())
            }
            Err(e) => Err(e),
        },
    }
}

fn display_projection(
    scenario: &Scenario,
    metrics: &DerivedMetrics,
    payout: &BonusPayout,
    rates: &RateTable,
) -> String {
    let inputs = &scenario.inputs;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell("Value"),
        ui::header_cell("Formula"),
    ]);

    table.add_row(vec![
        Cell::new("Prysm owners"),
        ui::metric_cell(metrics.owners),
        ui::formula_cell(&format!(
            "{} × {}%",
            format_amount(inputs.affiliates, 0),
            inputs.participation_rate
        )),
    ]);
    table.add_row(vec![
        Cell::new("Device sales volume"),
        ui::metric_cell(metrics.device_revenue),
        ui::formula_cell(&format!(
            "{} × {}",
            format_amount(metrics.owners, 0),
            DEVICE_UNIT_PRICE
        )),
    ]);
    table.add_row(vec![
        Cell::new("People scanned"),
        ui::metric_cell(metrics.total_scanned),
        ui::formula_cell(&format!(
            "{} × {}",
            format_amount(metrics.owners, 0),
            inputs.monthly_scans
        )),
    ]);
    table.add_row(vec![
        Cell::new("Converted buyers"),
        ui::metric_cell(metrics.buyers),
        ui::formula_cell(&format!(
            "{} × {}%",
            format_amount(metrics.total_scanned, 0),
            inputs.conversion_rate
        )),
    ]);
    table.add_row(vec![
        Cell::new("Monthly sales volume"),
        ui::metric_cell(metrics.monthly_sales),
        ui::formula_cell(&format!(
            "{} × {}",
            format_amount(metrics.buyers, 0),
            inputs.monthly_purchase
        )),
    ]);
    table.add_row(vec![
        Cell::new("Annualized sales volume"),
        ui::metric_cell(metrics.annual_sales),
        ui::formula_cell(&format!("{} × 12", format_amount(metrics.monthly_sales, 0))),
    ]);

    let mut output = format!(
        "Scenario: {}\n\n",
        ui::style_text(&scenario.name, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\nG1-6 breakaway bonus (5%): {}",
        ui::style_text(&format_amount(metrics.bonus, 0), ui::StyleType::Label)
    ));
    if payout.capped {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Note: earnings are capped at $10,000 USD",
                ui::StyleType::Warning
            )
        ));
    }
    output.push_str(&format!(
        "\nPayout ({}): {}",
        payout.currency.code(),
        ui::style_text(
            &format_currency(payout.converted, payout.currency),
            ui::StyleType::Amount
        )
    ));

    let source_line = match rates.source() {
        RateSource::Live { fetched_at } => {
            format!("Rates updated: {}", fetched_at.format("%Y-%m-%d %H:%M"))
        }
        RateSource::Fallback => "Using built-in fallback rates".to_string(),
    };
    output.push_str(&format!(
        "\n{}",
        ui::style_text(&source_line, ui::StyleType::Subtle)
    ));

    output
}
