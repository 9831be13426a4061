use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The cosmetic theme of the board.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[display(fmt = "wood")]
    Wood,
    #[default]
    #[display(fmt = "dark")]
    Dark,
    #[display(fmt = "green")]
    Green,
    #[display(fmt = "minimal")]
    Minimal,
}

/// The configuration of a match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, default)]
pub struct MatchConfig {
    /// The time each side has for the whole match, in minutes.
    #[cfg_attr(test, strategy(1u16..=180))]
    pub time_limit_minutes: u16,

    /// The time added to the mover's clock after every move, in seconds.
    #[cfg_attr(test, strategy(0u16..=60))]
    pub increment_seconds: u16,

    /// The theme the board is rendered with.
    pub board_theme: Theme,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            time_limit_minutes: 5,
            increment_seconds: 2,
            board_theme: Theme::Dark,
        }
    }
}

impl MatchConfig {
    /// The time each side starts with, in seconds.
    pub fn time_limit(&self) -> u32 {
        u32::from(self.time_limit_minutes) * 60
    }

    /// The increment, in seconds.
    pub fn increment(&self) -> u32 {
        self.increment_seconds.into()
    }
}

/// The reason why parsing [`MatchConfig`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse match configuration")]
pub struct ParseMatchConfigError;

impl fmt::Display for MatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for MatchConfig {
    type Err = ParseMatchConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ron::de::from_str(s).map_err(|_| ParseMatchConfigError)
    }
}
