//! Session configuration loaded from YAML.
//!
//! Every key is optional:
//!
//! ```yaml
//! title: Thursday club night
//! pricing:
//!   unit_shuttle_cost: 20
//!   walk_in_fee: 60
//!   court_fee: 0
//!   actual_unit_shuttle_cost: 0
//! rules:
//!   token: l
//!   tokens_per_unit: 4
//! ```

use crate::error::CourtTallyError;
use crate::ledger::{PricingParameters, TallyRules};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Title printed above rendered tables unless configured otherwise.
pub const DEFAULT_TITLE: &str = "Badminton session";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("tokens_per_unit must be at least 1")]
    InvalidTokensPerUnit,

    #[error("{0} must be a finite number, got {1}")]
    InvalidAmount(&'static str, f64),

    #[error("the usage token must not be whitespace")]
    InvalidToken,
}

/// Pricing values given on the command line; each one set replaces the configured value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PricingOverrides {
    pub unit_shuttle_cost: Option<f64>,
    pub walk_in_fee: Option<f64>,
    pub court_fee: Option<f64>,
    pub actual_unit_shuttle_cost: Option<f64>,
}

/// Everything a calculation needs besides the table itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    pub title: String,
    pub pricing: PricingParameters,
    pub rules: TallyRules,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            title: DEFAULT_TITLE.to_owned(),
            pricing: PricingParameters::default(),
            rules: TallyRules::default(),
        }
    }
}

impl LedgerConfig {
    /// Parses and validates a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self, CourtTallyError> {
        let config = if raw.trim().is_empty() {
            LedgerConfig::default()
        } else {
            serde_yaml::from_str::<LedgerConfig>(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML file.
    pub fn load(path: &str) -> Result<Self, CourtTallyError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Replaces the configured values that have an override, leaving the others alone.
    /// The result is not validated.
    pub fn apply_overrides(&mut self, pricing: PricingOverrides, token: Option<char>) {
        let fields = [
            (&mut self.pricing.unit_shuttle_cost, pricing.unit_shuttle_cost),
            (&mut self.pricing.walk_in_fee, pricing.walk_in_fee),
            (&mut self.pricing.court_fee, pricing.court_fee),
            (&mut self.pricing.actual_unit_shuttle_cost, pricing.actual_unit_shuttle_cost),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(token) = token {
            self.rules.token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let amounts = [
            ("unit_shuttle_cost", self.pricing.unit_shuttle_cost),
            ("walk_in_fee", self.pricing.walk_in_fee),
            ("court_fee", self.pricing.court_fee),
            ("actual_unit_shuttle_cost", self.pricing.actual_unit_shuttle_cost),
        ];
        if let Some((name, value)) = amounts.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::InvalidAmount(name, value));
        }
        if self.rules.tokens_per_unit == 0 {
            return Err(ConfigError::InvalidTokensPerUnit);
        }
        if self.rules.token.is_whitespace() {
            return Err(ConfigError::InvalidToken);
        }
        Ok(())
    }
}
