//! Rule registry for selecting a rule set by name.

use crate::{
    EmaRsiConfig, EmaRsiRule, SmaCrossoverConfig, SmaCrossoverRule, TrendAtrConfig, TrendAtrRule,
};
use scalper_core::{error::StrategyError, traits::SignalRule};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Information about a registered rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Registry key
    pub key: String,
    /// Display name
    pub name: String,
    /// Rule description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available signal rules.
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleInfo>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules.
    pub fn new() -> Self {
        let mut rules = BTreeMap::new();

        let mut register =
            |key: &str, name: &str, description: &str, default_config: serde_json::Value| {
                rules.insert(
                    key.to_string(),
                    RuleInfo {
                        key: key.to_string(),
                        name: name.to_string(),
                        description: description.to_string(),
                        default_config,
                    },
                );
            };

        register(
            "ma_crossover",
            "SMA Crossover",
            "Buys while the short SMA is above the long SMA, sells otherwise",
            serde_json::to_value(SmaCrossoverConfig::default()).unwrap_or_default(),
        );
        register(
            "ema_rsi",
            "EMA + RSI Band",
            "Buys on an EMA uptrend with RSI inside the band, sells when either fails",
            serde_json::to_value(EmaRsiConfig::default()).unwrap_or_default(),
        );
        register(
            "trend_atr",
            "Trend + ATR Bands",
            "EMA/RSI band entries confirmed by VWAP and trend SMA, exits on ATR stop or target",
            serde_json::to_value(TrendAtrConfig::default()).unwrap_or_default(),
        );

        Self { rules }
    }

    /// List all available rules, ordered by key.
    pub fn list(&self) -> Vec<&RuleInfo> {
        self.rules.values().collect()
    }

    /// Get rule info by key.
    pub fn get(&self, key: &str) -> Option<&RuleInfo> {
        self.rules.get(key)
    }

    /// Create a rule instance from configuration.
    ///
    /// Missing fields fall back to the rule's defaults; `null` means all defaults.
    pub fn create(
        &self,
        key: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn SignalRule>, StrategyError> {
        match key {
            "ma_crossover" => Ok(Box::new(SmaCrossoverRule::new(parse_config(config)?)?)),
            "ema_rsi" => Ok(Box::new(EmaRsiRule::new(parse_config(config)?)?)),
            "trend_atr" => Ok(Box::new(TrendAtrRule::new(parse_config(config)?)?)),
            _ => Err(StrategyError::NotFound(key.to_string())),
        }
    }

    /// Create a rule with default configuration.
    pub fn create_default(&self, key: &str) -> Result<Box<dyn SignalRule>, StrategyError> {
        let info = self
            .get(key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        self.create(key, info.default_config.clone())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_config<C: DeserializeOwned + Default>(
    config: serde_json::Value,
) -> Result<C, StrategyError> {
    if config.is_null() {
        return Ok(C::default());
    }
    serde_json::from_value(config).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}
