//! # Configuration
//!
//! Tunables for the in-memory ledger runtime. Every field has a default; `from_env`
//! overrides them from `LEDGER_*` environment variables. Log verbosity is not part of
//! this struct and stays with `RUST_LOG` (see [`setup_tracing`](crate::runtime::setup_tracing)).

use serde::Deserialize;
use thiserror::Error;

pub const CHANNEL_CAPACITY_VAR: &str = "LEDGER_CHANNEL_CAPACITY";
pub const QUERY_LIMIT_VAR: &str = "LEDGER_QUERY_LIMIT";
pub const RESOURCE_TYPES_CONTRACT_VAR: &str = "LEDGER_RESOURCE_TYPES_CONTRACT";
pub const RESOURCES_CONTRACT_VAR: &str = "LEDGER_RESOURCES_CONTRACT";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bound of the ledger actor's request queue.
    pub channel_capacity: usize,
    /// Upper bound on rows returned by an unpaginated rich query.
    pub query_limit: usize,
    /// Name (and namespace) the resource type registry is deployed under.
    pub resource_types_contract: String,
    pub resources_contract: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            query_limit: 100_000,
            resource_types_contract: crate::resource_type_contract::CONTRACT_NAME.to_string(),
            resources_contract: crate::resource_contract::CONTRACT_NAME.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by any `LEDGER_*` variables present in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CHANNEL_CAPACITY_VAR) {
            config.channel_capacity = parse_count(CHANNEL_CAPACITY_VAR, &raw)?;
        }
        if let Some(raw) = lookup(QUERY_LIMIT_VAR) {
            config.query_limit = parse_count(QUERY_LIMIT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RESOURCE_TYPES_CONTRACT_VAR) {
            config.resource_types_contract = raw.trim().to_string();
        }
        if let Some(raw) = lookup(RESOURCES_CONTRACT_VAR) {
            config.resources_contract = raw.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the runtime relies on, however the config was built.
    ///
    /// Called by [`Peer::new`](crate::runtime::Peer::new), so a deserialized config with
    /// a zero capacity is rejected instead of reaching the channel constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(zero(CHANNEL_CAPACITY_VAR));
        }
        if self.query_limit == 0 {
            return Err(zero(QUERY_LIMIT_VAR));
        }
        if self.resource_types_contract.is_empty() {
            return Err(empty(RESOURCE_TYPES_CONTRACT_VAR));
        }
        if self.resources_contract.is_empty() {
            return Err(empty(RESOURCES_CONTRACT_VAR));
        }
        if self.resource_types_contract == self.resources_contract {
            return Err(ConfigError::InvalidValue {
                var: RESOURCES_CONTRACT_VAR,
                reason: format!("collides with {RESOURCE_TYPES_CONTRACT_VAR}"),
            });
        }
        Ok(())
    }
}

fn parse_count(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        })
}

fn zero(var: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        reason: "must be greater than zero".into(),
    }
}

fn empty(var: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        reason: "must not be empty".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.resource_types_contract, "resource_types");
        assert_eq!(config.resources_contract, "resources");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (CHANNEL_CAPACITY_VAR, "8"),
            (QUERY_LIMIT_VAR, " 50 "),
            (RESOURCE_TYPES_CONTRACT_VAR, "types_v2"),
        ]))
        .unwrap();

        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.query_limit, 50);
        assert_eq!(config.resource_types_contract, "types_v2");
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        let err = Config::from_lookup(lookup(&[(CHANNEL_CAPACITY_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: CHANNEL_CAPACITY_VAR, .. }));

        let err = Config::from_lookup(lookup(&[(QUERY_LIMIT_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: QUERY_LIMIT_VAR, .. }));
    }

    #[test]
    fn test_rejects_colliding_contract_names() {
        let err = Config::from_lookup(lookup(&[(RESOURCES_CONTRACT_VAR, "resource_types")]))
            .unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn test_deserializes_partial_documents() {
        let config: Config = serde_json::from_str(r#"{"query_limit": 10}"#).unwrap();
        assert_eq!(config.query_limit, 10);
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_catches_deserialized_zero_capacity() {
        let config: Config = serde_json::from_str(r#"{"channel_capacity": 0}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { var: CHANNEL_CAPACITY_VAR, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_contract_names() {
        let config = Config {
            resources_contract: String::new(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { var: RESOURCES_CONTRACT_VAR, .. })
        ));
    }
}
