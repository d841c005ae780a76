//! Service configuration.

use crate::domain::money::{Money, Percent};
use crate::domain::settlement::FeeConfig;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Top-level configuration, loadable from TOML or the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the client app; checkout redirects are built from it.
    pub app_base_url: String,

    /// Currency used when a request does not name one.
    pub default_currency: String,

    /// Processor fee model and platform commission.
    pub fees: FeeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_base_url: "http://localhost:5000".to_string(),
            default_currency: "pkr".to_string(),
            fees: FeeConfig::default(),
        }
    }
}

type Lookup<'a> = &'a dyn Fn(&str) -> std::result::Result<String, std::env::VarError>;

fn parse_env<T>(
    lookup: Lookup<'_>,
    key: &str,
    parse: impl FnOnce(&str) -> Result<T>,
) -> Result<Option<T>> {
    match lookup(key) {
        Ok(value) => parse(value.trim()).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(PaymentError::ConfigError(format!("{key}: {e}"))),
    }
}

fn parse_percent(value: &str) -> Result<Percent> {
    let decimal = Decimal::from_str(value)
        .map_err(|e| PaymentError::ConfigError(format!("'{value}' is not a number: {e}")))?;
    Percent::new(decimal)
}

impl Config {
    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| PaymentError::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults overridden by `PAYSPLIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| std::env::var(key))
    }

    fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(url) = parse_env(lookup, "PAYSPLIT_APP_BASE_URL", |v| Ok(v.to_string()))? {
            config.app_base_url = url;
        }
        if let Some(currency) = parse_env(lookup, "PAYSPLIT_CURRENCY", |v| Ok(v.to_lowercase()))? {
            config.default_currency = currency;
        }
        if let Some(rate) = parse_env(lookup, "PAYSPLIT_PROCESSOR_RATE", parse_percent)? {
            config.fees.processor.percent_rate = rate;
        }
        if let Some(fee) = parse_env(lookup, "PAYSPLIT_PROCESSOR_FIXED_FEE", |v| {
            v.parse::<u64>()
                .map(Money::new)
                .map_err(|e| PaymentError::ConfigError(format!("'{v}' is not an amount: {e}")))
        })? {
            config.fees.processor.fixed_fee = fee;
        }
        if let Some(rate) = parse_env(lookup, "PAYSPLIT_COMMISSION_PERCENT", parse_percent)? {
            config.fees.commission_percent = rate;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_base_url.is_empty() {
            return Err(PaymentError::ConfigError(
                "app_base_url must not be empty".to_string(),
            ));
        }
        if self.default_currency.is_empty() {
            return Err(PaymentError::ConfigError(
                "default_currency must not be empty".to_string(),
            ));
        }
        self.fees.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_currency, "pkr");
        assert_eq!(config.fees.processor.percent_rate.value(), dec!(2.9));
        assert_eq!(config.fees.processor.fixed_fee, Money::new(1100));
        assert_eq!(config.fees.commission_percent.value(), dec!(5));
        assert!(config.fees.waive_fee_on_empty_order);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app_base_url = \"https://speakdine.app\"").unwrap();
        writeln!(file, "[fees]").unwrap();
        writeln!(file, "commission_percent = \"7.5\"").unwrap();
        writeln!(file, "[fees.processor]").unwrap();
        writeln!(file, "fixed_fee = 3000").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.app_base_url, "https://speakdine.app");
        assert_eq!(config.default_currency, "pkr");
        assert_eq!(config.fees.commission_percent.value(), dec!(7.5));
        assert_eq!(config.fees.processor.fixed_fee, Money::new(3000));
        assert_eq!(config.fees.processor.percent_rate.value(), dec!(2.9));
    }

    #[test]
    fn test_from_file_rejects_bad_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fees]").unwrap();
        writeln!(file, "commission_percent = \"120\"").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(PaymentError::ConfigError(_))
        ));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, std::env::VarError> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
    }

    #[test]
    fn test_from_env_overrides() {
        let lookup = vars(&[
            ("PAYSPLIT_APP_BASE_URL", "https://speakdine.app"),
            ("PAYSPLIT_CURRENCY", " USD "),
            ("PAYSPLIT_PROCESSOR_RATE", "3.4"),
            ("PAYSPLIT_PROCESSOR_FIXED_FEE", "2500"),
            ("PAYSPLIT_COMMISSION_PERCENT", "10"),
        ]);
        let config = Config::from_lookup(&lookup).unwrap();
        assert_eq!(config.app_base_url, "https://speakdine.app");
        assert_eq!(config.default_currency, "usd");
        assert_eq!(config.fees.processor.percent_rate.value(), dec!(3.4));
        assert_eq!(config.fees.processor.fixed_fee, Money::new(2500));
        assert_eq!(config.fees.commission_percent.value(), dec!(10));
    }

    #[test]
    fn test_from_env_without_variables_is_default() {
        let config = Config::from_lookup(&vars(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_env_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(&vars(&[("PAYSPLIT_PROCESSOR_FIXED_FEE", "eleven")])),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(&vars(&[("PAYSPLIT_PROCESSOR_FIXED_FEE", "-5")])),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(&vars(&[("PAYSPLIT_PROCESSOR_RATE", "100")])),
            Err(PaymentError::InvalidRate(_))
        ));
        assert!(matches!(
            Config::from_lookup(&vars(&[("PAYSPLIT_COMMISSION_PERCENT", "five")])),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            Config::from_lookup(&vars(&[("PAYSPLIT_CURRENCY", "  ")])),
            Err(PaymentError::ConfigError(_))
        ));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("3.4").unwrap().value(), dec!(3.4));
        assert!(matches!(
            parse_percent("abc"),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            parse_percent("101"),
            Err(PaymentError::InvalidRate(_))
        ));
    }
}
