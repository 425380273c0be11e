use crate::constants::seasons::{DEFAULT_SEASON, FIRST_SEASON, LAST_SEASON};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A season identified by its starting year: `Season(2023)` is 2023-24.
///
/// Construction is validated against the range the provider serves, so a
/// `Season` in hand is always queryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Season(u16);

impl Season {
    pub fn new(start_year: u16) -> Result<Self, AppError> {
        if (FIRST_SEASON..=LAST_SEASON).contains(&start_year) {
            Ok(Season(start_year))
        } else {
            Err(AppError::invalid_season(start_year.to_string()))
        }
    }

    pub fn start_year(&self) -> u16 {
        self.0
    }

    /// Provider query form, e.g. `2023-24`.
    pub fn query_label(&self) -> String {
        format!("{}-{:02}", self.0, (self.0 + 1) % 100)
    }

    /// Selector form, e.g. `2023-2024`.
    pub fn display_label(&self) -> String {
        format!("{}-{}", self.0, self.0 + 1)
    }

    /// Every selectable season, oldest first.
    pub fn all() -> impl DoubleEndedIterator<Item = Season> {
        (FIRST_SEASON..=LAST_SEASON).map(Season)
    }
}

impl Default for Season {
    fn default() -> Self {
        Season(DEFAULT_SEASON)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}

impl TryFrom<u16> for Season {
    type Error = AppError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Season::new(value)
    }
}

impl From<Season> for u16 {
    fn from(season: Season) -> Self {
        season.0
    }
}

/// Accepts `2023`, `2023-24` and `2023-2024`. The trailing year, when present,
/// must follow the starting year.
impl FromStr for Season {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (start, end) = match input.split_once('-') {
            Some((start, end)) => (start, Some(end)),
            None => (input, None),
        };

        let start_year: u16 = start
            .parse()
            .map_err(|_| AppError::invalid_season(input))?;

        if let Some(end) = end {
            let expected = start_year.saturating_add(1);
            let matches = match end.len() {
                2 => end.parse::<u16>().ok() == Some(expected % 100),
                4 => end.parse::<u16>().ok() == Some(expected),
                _ => false,
            };
            if !matches {
                return Err(AppError::invalid_season(input));
            }
        }

        Season::new(start_year).map_err(|_| AppError::invalid_season(input))
    }
}
