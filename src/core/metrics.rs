//! The sales-volume derivation pipeline.

use serde::{Deserialize, Serialize};

/// Sales volume credited for each Prysm device placed with a new owner.
pub const DEVICE_UNIT_PRICE: f64 = 150.0;

/// G1-6 breakaway bonus share of monthly sales volume.
pub const BREAKAWAY_BONUS_RATE: f64 = 0.05;

/// The five projection inputs, as entered by the user.
///
/// Percentage fields hold percentage points (25 means 25%). A field the user
/// left blank is zero, which flows through the whole chain as zero-valued
/// metrics rather than an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RawInputs {
    /// Monthly count of affiliates or sales leaders.
    #[serde(default)]
    pub affiliates: f64,
    /// Share of affiliates expected to own a scanning device, in percent.
    #[serde(default)]
    pub participation_rate: f64,
    /// People scanned per device owner per month.
    #[serde(default)]
    pub monthly_scans: f64,
    /// Share of scanned people expected to buy, in percent.
    #[serde(default)]
    pub conversion_rate: f64,
    /// Sales volume purchased per buyer per month.
    #[serde(default)]
    pub monthly_purchase: f64,
}

/// Everything derived from [`RawInputs`], in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub owners: f64,
    pub device_revenue: f64,
    pub total_scanned: f64,
    pub buyers: f64,
    pub monthly_sales: f64,
    /// Breakaway bonus in sales-volume units, rounded to the nearest integer.
    pub bonus: f64,
    pub annual_sales: f64,
}

impl DerivedMetrics {
    /// Runs the full derivation chain. Pure and side-effect free; negative
    /// inputs are not clamped and produce negative metrics.
    pub fn compute(inputs: &RawInputs) -> Self {
        let owners = inputs.affiliates * (inputs.participation_rate / 100.0);
        let device_revenue = owners * DEVICE_UNIT_PRICE;
        let total_scanned = owners * inputs.monthly_scans;
        let buyers = total_scanned * (inputs.conversion_rate / 100.0);
        let monthly_sales = buyers * inputs.monthly_purchase;
        let bonus = (monthly_sales * BREAKAWAY_BONUS_RATE).round();
        let annual_sales = monthly_sales * 12.0;

        DerivedMetrics {
            owners,
            device_revenue,
            total_scanned,
            buyers,
            monthly_sales,
            bonus,
            annual_sales,
        }
    }
}
