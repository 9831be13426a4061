use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

#[cfg(test)]
use proptest::prelude::*;

/// Runtime configuration for the session services.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, default)]
pub struct ArbiterConfig {
    /// How many times a transition is attempted before giving up on concurrent writers.
    ///
    /// At least one attempt is always made.
    #[cfg_attr(test, strategy(1usize..=16))]
    pub attempts: usize,

    /// How often the clock of a running match ticks.
    #[serde(with = "humantime_serde")]
    #[cfg_attr(test, strategy((1u64..=60).prop_map(Duration::from_secs)))]
    pub tick: Duration,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        ArbiterConfig {
            attempts: 3,
            tick: Duration::from_secs(1),
        }
    }
}

/// The reason why parsing [`ArbiterConfig`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse arbiter configuration")]
pub struct ParseArbiterConfigError;

impl fmt::Display for ArbiterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for ArbiterConfig {
    type Err = ParseArbiterConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ron::de::from_str(s).map_err(|_| ParseArbiterConfigError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn clock_ticks_every_second_by_default() {
        let config = ArbiterConfig::default();
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.attempts, 3);
    }

    #[test]
    fn tick_period_is_spelled_in_human_time() {
        let config: ArbiterConfig = r#"(tick: "250ms")"#.parse().unwrap();
        assert_eq!(config.tick, Duration::from_millis(250));
        assert_eq!(config.attempts, ArbiterConfig::default().attempts);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert_eq!("(retries: 1)".parse::<ArbiterConfig>(), Err(ParseArbiterConfigError));
    }

    #[proptest]
    fn parsing_printed_config_is_an_identity(c: ArbiterConfig) {
        assert_eq!(c.to_string().parse(), Ok(c));
    }
}
