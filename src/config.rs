//! Bank configuration
//!
//! Product parameters (interest rates, the savings opening fee, the
//! investment minimum) and the branch code used in account numbers. Values
//! come from an optional TOML file followed by `BANK__*` environment
//! variables, e.g. `BANK__SAVINGS__OPENING_FEE=25`. Anything not set falls
//! back to the defaults below.

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// How the savings opening fee is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsFeePolicy {
    /// The fee comes out of the initial deposit, which must cover it
    #[default]
    DeductFromFirstDeposit,
    /// The account opens at minus the fee; the initial deposit is then
    /// posted as an ordinary deposit
    ChargeAtOpening,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    pub monthly_rate: Decimal,
    pub opening_fee: Decimal,
    pub fee_policy: SavingsFeePolicy,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        SavingsConfig {
            // 4% a year
            monthly_rate: Decimal::new(3333, 6),
            opening_fee: Decimal::new(50, 0),
            fee_policy: SavingsFeePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvestmentConfig {
    pub monthly_rate: Decimal,
    pub minimum_balance: Decimal,
}

impl Default for InvestmentConfig {
    fn default() -> Self {
        InvestmentConfig {
            // 8% a year
            monthly_rate: Decimal::new(6667, 6),
            minimum_balance: Decimal::new(1000, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ChequeConfig {
    /// Overdraft for cheque accounts whose request does not say
    pub overdraft_by_default: bool,
}

/// Top-level configuration for a [`BankEngine`](crate::core::BankEngine)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Branch prefix of generated account numbers
    pub branch_code: String,
    pub savings: SavingsConfig,
    pub investment: InvestmentConfig,
    pub cheque: ChequeConfig,
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            branch_code: "001".to_string(),
            savings: SavingsConfig::default(),
            investment: InvestmentConfig::default(),
            cheque: ChequeConfig::default(),
        }
    }
}

impl BankConfig {
    /// Load configuration from `path` (if given) and the environment
    ///
    /// A path that is given must exist. The result is validated before it
    /// is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(Environment::with_prefix("BANK").separator("__"))
            .build()?;

        let config: BankConfig = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Reject rates outside `[0, 1]`, negative fees or minimums, and an
    /// empty branch code
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branch_code.trim().is_empty() {
            return Err(ConfigError::Message("branch_code must not be empty".into()));
        }
        let rates = [
            ("savings.monthly_rate", self.savings.monthly_rate),
            ("investment.monthly_rate", self.investment.monthly_rate),
        ];
        for (key, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigError::Message(format!(
                    "{} must be between 0 and 1, got {}",
                    key, rate
                )));
            }
        }
        if self.savings.opening_fee < Decimal::ZERO {
            return Err(ConfigError::Message(format!(
                "savings.opening_fee must not be negative, got {}",
                self.savings.opening_fee
            )));
        }
        if self.investment.minimum_balance < Decimal::ZERO {
            return Err(ConfigError::Message(format!(
                "investment.minimum_balance must not be negative, got {}",
                self.investment.minimum_balance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::Builder;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = BankConfig::default();
        assert_eq!(config.branch_code, "001");
        assert_eq!(config.savings.monthly_rate, Decimal::from_str("0.003333").unwrap());
        assert_eq!(config.savings.opening_fee, Decimal::new(50, 0));
        assert_eq!(config.savings.fee_policy, SavingsFeePolicy::DeductFromFirstDeposit);
        assert_eq!(config.investment.minimum_balance, Decimal::new(1000, 0));
        assert!(!config.cheque.overdraft_by_default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_toml(
            r#"
branch_code = "007"

[savings]
opening_fee = "0"
fee_policy = "charge_at_opening"

[cheque]
overdraft_by_default = true
"#,
        );

        let config = BankConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.branch_code, "007");
        assert_eq!(config.savings.opening_fee, Decimal::ZERO);
        assert_eq!(config.savings.fee_policy, SavingsFeePolicy::ChargeAtOpening);
        assert_eq!(config.savings.monthly_rate, SavingsConfig::default().monthly_rate);
        assert_eq!(config.investment, InvestmentConfig::default());
        assert!(config.cheque.overdraft_by_default);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = BankConfig::load(Some(Path::new("/nonexistent/bank.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_rate() {
        let file = write_toml(
            r#"
[investment]
monthly_rate = "1.5"
"#,
        );
        let error = BankConfig::load(Some(file.path())).unwrap_err();
        assert!(error.to_string().contains("investment.monthly_rate"));
    }

    #[test]
    fn test_validate_rejects_negative_fee() {
        let mut config = BankConfig::default();
        config.savings.opening_fee = Decimal::new(-1, 0);
        assert!(config.validate().is_err());
    }
}
