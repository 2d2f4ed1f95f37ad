pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use tracing::info;

use crate::core::metrics::RawInputs;

/// Commands the binary dispatches into the library.
pub enum AppCommand {
    /// Project sales volume and bonus payout, either for ad-hoc inputs or for
    /// every scenario in the configuration file.
    Project {
        inputs: Option<RawInputs>,
        currency: Option<String>,
    },
    /// Display the current exchange-rate table.
    Rates,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Sales calculator starting...");

    match command {
        AppCommand::Project { inputs, currency } => {
            cli::project::run(inputs, currency.as_deref(), config_path).await
        }
        AppCommand::Rates => cli::rates::run(config_path).await,
    }
}
