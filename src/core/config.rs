use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::metrics::RawInputs;

/// Default public endpoint for the exchange-rate provider.
pub const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate-api.com";

/// A named set of projection inputs. Missing fields default to zero.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub inputs: RawInputs,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_RATE_API_URL.to_string(),
            }),
        }
    }
}

fn default_currency() -> String {
    "MXN".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Default payout currency for the breakaway bonus.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scenarios: Vec::new(),
            providers: ProvidersConfig::default(),
            currency: default_currency(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "nsk-latam", "prysmcalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Endpoint for the exchange-rate provider, defaulted when unconfigured.
    pub fn rate_api_base_url(&self) -> &str {
        self.providers
            .exchange_rate
            .as_ref()
            .map_or(DEFAULT_RATE_API_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
scenarios:
  - name: "Pre-launch"
    affiliates: 100
    participation_rate: 50
    monthly_scans: 15
    conversion_rate: 10
    monthly_purchase: 139
  - name: "Full launch"
    affiliates: 400
    participation_rate: 25
currency: "MXN"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[0].name, "Pre-launch");
        assert_eq!(config.scenarios[0].inputs.affiliates, 100.0);
        assert_eq!(config.scenarios[0].inputs.participation_rate, 50.0);
        assert_eq!(config.scenarios[0].inputs.monthly_purchase, 139.0);
        assert_eq!(config.currency, "MXN");

        // Unset scenario fields fall back to zero.
        assert_eq!(config.scenarios[1].inputs.monthly_scans, 0.0);
        assert_eq!(config.scenarios[1].inputs.conversion_rate, 0.0);
        assert_eq!(config.scenarios[1].inputs.monthly_purchase, 0.0);

        // Providers default when the section is absent.
        assert_eq!(config.rate_api_base_url(), DEFAULT_RATE_API_URL);
    }

    #[test]
    fn test_config_with_provider_override() {
        let yaml_str = r#"
scenarios: []
providers:
  exchange_rate:
    base_url: "http://example.com/rates"
currency: "PEN"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.rate_api_base_url(), "http://example.com/rates");
        assert_eq!(config.currency, "PEN");
    }

    #[test]
    fn test_currency_defaults_to_mxn() {
        let config: AppConfig = serde_yaml::from_str("scenarios: []").unwrap();
        assert_eq!(config.currency, "MXN");
    }
}
