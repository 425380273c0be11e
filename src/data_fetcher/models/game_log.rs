use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::season::Season;
use super::team::{Team, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinLoss {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl fmt::Display for WinLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinLoss::Win => write!(f, "W"),
            WinLoss::Loss => write!(f, "L"),
        }
    }
}

/// One row of a team's game log as the provider returns it.
/// `win_loss` is `None` for games that have not finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogEntry {
    #[serde(rename = "Team_ID")]
    pub team_id: TeamId,
    #[serde(rename = "Game_ID")]
    pub game_id: String,
    #[serde(rename = "GAME_DATE", with = "game_date")]
    pub game_date: NaiveDate,
    #[serde(rename = "MATCHUP")]
    pub matchup: String,
    #[serde(rename = "WL", default)]
    pub win_loss: Option<WinLoss>,
}

/// A completed game joined with its team and tagged with the season it was
/// requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonLogEntry {
    pub season: Season,
    pub team: Team,
    pub game_id: String,
    pub game_date: NaiveDate,
    pub matchup: String,
    pub win_loss: WinLoss,
}

impl SeasonLogEntry {
    /// Inner join of a log row with its team. Rows without a result are
    /// rejected here so the dataset can never hold an unplayed game.
    pub fn join(entry: GameLogEntry, team: &Team, season: Season) -> Option<Self> {
        let win_loss = entry.win_loss?;
        Some(Self {
            season,
            team: team.clone(),
            game_id: entry.game_id,
            game_date: entry.game_date,
            matchup: entry.matchup,
            win_loss,
        })
    }

    pub fn team_id(&self) -> TeamId {
        self.team.id
    }
}

/// Win/loss tally of one team inside a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub team_name: String,
    pub wins: usize,
    pub losses: usize,
}

impl TeamRecord {
    pub fn games(&self) -> usize {
        self.wins + self.losses
    }
}

/// Every completed game of a season across the whole directory, in directory
/// order and, within a team, in the order the provider listed the games.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonDataset {
    pub season: Season,
    pub entries: Vec<SeasonLogEntry>,
    /// Log rows whose team id was not in the directory snapshot
    pub unmatched_rows: usize,
    /// Log rows without a win/loss result
    pub unplayed_rows: usize,
}

impl SeasonDataset {
    pub fn empty(season: Season) -> Self {
        Self {
            season,
            entries: Vec::new(),
            unmatched_rows: 0,
            unplayed_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonLogEntry> {
        self.entries.iter()
    }

    /// Per-team tallies in the order teams first appear in the dataset.
    pub fn team_records(&self) -> Vec<TeamRecord> {
        let mut records: Vec<TeamRecord> = Vec::new();
        for entry in &self.entries {
            let index = match records.iter().position(|r| r.team_id == entry.team.id) {
                Some(index) => index,
                None => {
                    records.push(TeamRecord {
                        team_id: entry.team.id,
                        team_name: entry.team.full_name.clone(),
                        wins: 0,
                        losses: 0,
                    });
                    records.len() - 1
                }
            };
            match entry.win_loss {
                WinLoss::Win => records[index].wins += 1,
                WinLoss::Loss => records[index].losses += 1,
            }
        }
        records
    }
}

/// `GAME_DATE` arrives as `APR 14, 2024`; ISO dates and datetimes are
/// accepted too. Serialized back as ISO.
pub(crate) mod game_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const PROVIDER_FORMAT: &str = "%b %d, %Y";
    const ISO_FORMAT: &str = "%Y-%m-%d";
    const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, PROVIDER_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, ISO_FORMAT))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, ISO_DATETIME_FORMAT).map(|dt| dt.date()))
            .ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(ISO_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized game date '{raw}'")))
    }
}
