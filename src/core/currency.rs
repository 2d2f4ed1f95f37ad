//! Payout currencies and the bonus conversion step.

use std::fmt::Display;
use std::str::FromStr;

use crate::core::rates::RateTable;

/// Sales-volume points to USD. A compensation-plan constant, not a market rate.
pub const VOLUME_TO_USD_FACTOR: f64 = 0.93506;

/// Hard ceiling on the payable breakaway bonus, in USD.
pub const BONUS_CAP_USD: f64 = 10_000.0;

/// The currencies a bonus can be paid out in. USD is the base for every rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    Usd,
    Ars,
    Clp,
    Cop,
    Mxn,
    Pen,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Usd,
        Currency::Ars,
        Currency::Clp,
        Currency::Cop,
        Currency::Mxn,
        Currency::Pen,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Ars => "ARS",
            Currency::Clp => "CLP",
            Currency::Cop => "COP",
            Currency::Mxn => "MXN",
            Currency::Pen => "PEN",
        }
    }

    /// Display symbol. The dollar sign is shared across the peso currencies;
    /// output always names the code alongside it.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Pen => "S/",
            _ => "$",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Usd => "US dollar",
            Currency::Ars => "Argentine peso",
            Currency::Clp => "Chilean peso",
            Currency::Cop => "Colombian peso",
            Currency::Mxn => "Mexican peso",
            Currency::Pen => "Peruvian sol",
        }
    }

    /// Static rate per USD, used whenever a live rate is unavailable.
    pub fn fallback_rate(&self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Ars => 1000.00,
            Currency::Clp => 950.00,
            Currency::Cop => 4200.00,
            Currency::Mxn => 20.15,
            Currency::Pen => 3.90,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "ARS" => Ok(Currency::Ars),
            "CLP" => Ok(Currency::Clp),
            "COP" => Ok(Currency::Cop),
            "MXN" => Ok(Currency::Mxn),
            "PEN" => Ok(Currency::Pen),
            _ => Err(anyhow::anyhow!(
                "Unsupported currency: {} (expected one of USD, ARS, CLP, COP, MXN, PEN)",
                s
            )),
        }
    }
}

/// A breakaway bonus converted into a payout currency.
///
/// The bonus arrives in sales-volume units, is translated to USD with the
/// fixed plan factor, capped, and only then converted at the market rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusPayout {
    pub currency: Currency,
    /// USD equivalent before the cap.
    pub usd_raw: f64,
    /// Payable USD amount, never above [`BONUS_CAP_USD`].
    pub usd: f64,
    pub capped: bool,
    /// Rate used for the conversion, per USD.
    pub rate: f64,
    pub converted: f64,
}

impl BonusPayout {
    pub fn convert(bonus: f64, currency: Currency, rates: &RateTable) -> Self {
        let usd_raw = bonus * VOLUME_TO_USD_FACTOR;
        let capped = usd_raw > BONUS_CAP_USD;
        let usd = usd_raw.min(BONUS_CAP_USD);
        let rate = rates.rate(currency);

        BonusPayout {
            currency,
            usd_raw,
            usd,
            capped,
            rate,
            converted: usd * rate,
        }
    }
}

/// Formats a value with thousands separators and a fixed number of decimals.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (integral, fraction) = match formatted.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integral.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integral),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Two-decimal currency string with the symbol for `currency`.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), format_amount(amount, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateTable;

    #[test]
    fn test_currency_from_str() {
        assert_eq!("MXN".parse::<Currency>().unwrap(), Currency::Mxn);
        assert_eq!("pen".parse::<Currency>().unwrap(), Currency::Pen);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::Pen.symbol(), "S/");
        for currency in [
            Currency::Usd,
            Currency::Ars,
            Currency::Clp,
            Currency::Cop,
            Currency::Mxn,
        ] {
            assert_eq!(currency.symbol(), "$");
        }
    }

    #[test]
    fn test_uncapped_conversion() {
        let rates = RateTable::fallback();
        let payout = BonusPayout::convert(521.0, Currency::Mxn, &rates);

        assert!(!payout.capped);
        assert_eq!(payout.usd_raw, 521.0 * VOLUME_TO_USD_FACTOR);
        assert_eq!(payout.usd, payout.usd_raw);
        assert_eq!(payout.rate, 20.15);
        assert_eq!(payout.converted, payout.usd * 20.15);
    }

    #[test]
    fn test_cap_applies_above_threshold() {
        let rates = RateTable::fallback();
        // 15000 volume units => 14,025.90 USD raw, well above the cap.
        let payout = BonusPayout::convert(15000.0, Currency::Usd, &rates);

        assert!(payout.capped);
        assert_eq!(payout.usd, BONUS_CAP_USD);
        assert_eq!(payout.converted, BONUS_CAP_USD);
    }

    #[test]
    fn test_cap_boundary() {
        let rates = RateTable::fallback();

        // 10694 * 0.93506 = 9999.53 USD, just under the cap.
        let under = BonusPayout::convert(10694.0, Currency::Usd, &rates);
        assert!(!under.capped);
        assert!(under.usd < BONUS_CAP_USD);

        // 10695 * 0.93506 = 10000.47 USD, just over.
        let over = BonusPayout::convert(10695.0, Currency::Usd, &rates);
        assert!(over.capped);
        assert_eq!(over.usd, BONUS_CAP_USD);
    }

    #[test]
    fn test_currency_switch_is_idempotent() {
        let rates = RateTable::fallback();
        let bonus = 521.0;

        let first = BonusPayout::convert(bonus, Currency::Clp, &rates);
        let _other = BonusPayout::convert(bonus, Currency::Pen, &rates);
        let second = BonusPayout::convert(bonus, Currency::Clp, &rates);

        assert_eq!(first, second);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, 0), "0");
        assert_eq!(format_amount(1234.0, 0), "1,234");
        assert_eq!(format_amount(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_amount(-9500.5, 0), "-9,500");
        assert_eq!(format_amount(999.999, 2), "1,000.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(9816.4, Currency::Mxn), "$9,816.40");
        assert_eq!(format_currency(1899.95, Currency::Pen), "S/1,899.95");
        assert_eq!(format_currency(0.0, Currency::Usd), "$0.00");
    }
}
