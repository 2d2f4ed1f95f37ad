use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use prysmcalc::core::input::parse_numeric_input;
use prysmcalc::core::log::init_logging;
use prysmcalc::core::metrics::RawInputs;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for prysmcalc::AppCommand {
    fn from(cmd: Commands) -> prysmcalc::AppCommand {
        match cmd {
            Commands::Project {
                affiliates,
                participation_rate,
                monthly_scans,
                conversion_rate,
                monthly_purchase,
                currency,
            } => {
                let given = [
                    &affiliates,
                    &participation_rate,
                    &monthly_scans,
                    &conversion_rate,
                    &monthly_purchase,
                ]
                .iter()
                .any(|f| f.is_some());

                let inputs = given.then(|| RawInputs {
                    affiliates: coerce(&affiliates),
                    participation_rate: coerce(&participation_rate),
                    monthly_scans: coerce(&monthly_scans),
                    conversion_rate: coerce(&conversion_rate),
                    monthly_purchase: coerce(&monthly_purchase),
                });

                prysmcalc::AppCommand::Project { inputs, currency }
            }
            Commands::Rates => prysmcalc::AppCommand::Rates,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

/// Unset flags are the identity for their pipeline role, same as blank input.
fn coerce(raw: &Option<String>) -> f64 {
    raw.as_deref().map(parse_numeric_input).unwrap_or(0.0)
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Project sales volume and bonus payout
    Project {
        /// Monthly count of affiliates or sales leaders
        #[arg(long)]
        affiliates: Option<String>,

        /// Device participation rate, in percent (e.g. "25" or "25%")
        #[arg(long)]
        participation_rate: Option<String>,

        /// People scanned per device owner per month
        #[arg(long)]
        monthly_scans: Option<String>,

        /// Subscription conversion rate, in percent
        #[arg(long)]
        conversion_rate: Option<String>,

        /// Sales volume purchased per buyer per month
        #[arg(long)]
        monthly_purchase: Option<String>,

        /// Payout currency: USD, ARS, CLP, COP, MXN or PEN
        #[arg(long)]
        currency: Option<String>,
    },
    /// Display the current exchange rate table
    Rates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => prysmcalc::cli::setup::setup(),
        Some(cmd) => prysmcalc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
