//! Aggregate bar sizes understood by the market-data provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of an aggregate bar. A bar covers `multiplier` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Second,
    #[default]
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    /// Path segment used by the aggregates endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Second => "second",
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "second" => Ok(Timespan::Second),
            "m" | "min" | "minute" => Ok(Timespan::Minute),
            "h" | "hour" => Ok(Timespan::Hour),
            "d" | "day" | "daily" => Ok(Timespan::Day),
            "w" | "week" | "weekly" => Ok(Timespan::Week),
            "month" | "monthly" => Ok(Timespan::Month),
            "quarter" => Ok(Timespan::Quarter),
            "year" | "yearly" => Ok(Timespan::Year),
            _ => Err(format!("Invalid timespan: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timespan_parse() {
        assert_eq!(Timespan::from_str("minute").unwrap(), Timespan::Minute);
        assert_eq!(Timespan::from_str("Day").unwrap(), Timespan::Day);
        assert_eq!(Timespan::from_str("h").unwrap(), Timespan::Hour);
        assert!(Timespan::from_str("fortnight").is_err());
    }

    #[test]
    fn test_timespan_display() {
        assert_eq!(Timespan::Minute.to_string(), "minute");
        assert_eq!(Timespan::Quarter.to_string(), "quarter");
    }

    #[test]
    fn test_timespan_serde() {
        let parsed: Timespan = serde_json::from_str("\"hour\"").unwrap();
        assert_eq!(parsed, Timespan::Hour);
        assert_eq!(serde_json::to_string(&Timespan::Minute).unwrap(), "\"minute\"");
    }
}
