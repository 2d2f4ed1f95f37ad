//! Exchange-rate acquisition with static fallback.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::debug;

use crate::core::currency::Currency;

/// Raw rate map as returned by a provider, keyed by ISO code, rate per USD.
pub type FetchedRates = HashMap<String, f64>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<FetchedRates>;
}

/// Where the current table came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RateSource {
    /// Static built-in rates; shown without an "updated" timestamp.
    Fallback,
    Live { fetched_at: DateTime<Local> },
}

/// Rate-per-USD for every payout currency.
///
/// The table is total by construction: both constructors fill an entry for
/// each [`Currency`], so lookups never miss and conversion can always run,
/// with or without network connectivity.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: [f64; Currency::ALL.len()],
    source: RateSource,
}

impl RateTable {
    /// The static table used until (and unless) a live fetch succeeds.
    pub fn fallback() -> Self {
        RateTable {
            rates: Currency::ALL.map(|c| c.fallback_rate()),
            source: RateSource::Fallback,
        }
    }

    /// Builds a live table from a provider response. Each currency missing
    /// from the response keeps its fallback rate; USD stays pinned at 1.0
    /// regardless of response content.
    pub fn from_fetched(fetched: &FetchedRates, fetched_at: DateTime<Local>) -> Self {
        let rates = Currency::ALL.map(|currency| match currency {
            Currency::Usd => 1.0,
            _ => fetched
                .get(currency.code())
                .copied()
                .unwrap_or_else(|| currency.fallback_rate()),
        });

        RateTable {
            rates,
            source: RateSource::Live { fetched_at },
        }
    }

    /// Acquires the table from `provider`, exactly once. Failure is recovered
    /// locally: the static fallback table is returned and the error goes to
    /// the debug log only.
    pub async fn acquire(provider: &dyn RateProvider) -> Self {
        match provider.fetch_rates().await {
            Ok(fetched) => Self::from_fetched(&fetched, Local::now()),
            Err(e) => {
                debug!("Rate fetch failed, keeping fallback rates: {e:#}");
                Self::fallback()
            }
        }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates[currency as usize]
    }

    pub fn source(&self) -> &RateSource {
        &self.source
    }

    pub fn is_live(&self) -> bool {
        matches!(self.source, RateSource::Live { .. })
    }
}
