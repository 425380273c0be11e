use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::East => write!(f, "East"),
            Conference::West => write!(f, "West"),
        }
    }
}

/// The standings columns kept from the provider's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    #[serde(rename = "TeamName")]
    pub team_name: String,
    #[serde(rename = "Conference")]
    pub conference: Conference,
    #[serde(rename = "PlayoffRank")]
    pub playoff_rank: u32,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "Record")]
    pub record: String,
    #[serde(rename = "L10")]
    pub last_10: String,
    #[serde(
        rename = "ConferenceGamesBack",
        default,
        deserialize_with = "games_back"
    )]
    pub conference_games_back: Option<f64>,
}

/// Games back arrives as a number, a numeric string, or `-`/empty for the
/// conference leader.
fn games_back<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "-" {
                Ok(Some(0.0))
            } else {
                s.parse::<f64>()
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("invalid games back '{s}'")))
            }
        }
        other => Err(de::Error::custom(format!("invalid games back {other}"))),
    }
}

/// One line of a conference leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position within the conference
    pub position: usize,
    pub team_name: String,
    pub record: String,
    pub is_leader: bool,
}

/// Standings split by conference, each side ordered by ascending playoff rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConferenceStandings {
    pub east: Vec<StandingsRow>,
    pub west: Vec<StandingsRow>,
}

impl ConferenceStandings {
    pub fn from_rows(rows: &[StandingsRow]) -> Self {
        let (mut east, mut west): (Vec<StandingsRow>, Vec<StandingsRow>) = rows
            .iter()
            .cloned()
            .partition(|row| row.conference == Conference::East);

        // Stable, so ties keep the provider's order
        east.sort_by_key(|row| row.playoff_rank);
        west.sort_by_key(|row| row.playoff_rank);

        Self { east, west }
    }

    pub fn conference(&self, conference: Conference) -> &[StandingsRow] {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    pub fn leader(&self, conference: Conference) -> Option<&StandingsRow> {
        self.conference(conference).first()
    }

    pub fn is_empty(&self) -> bool {
        self.east.is_empty() && self.west.is_empty()
    }

    /// `{position, team_name, record}` projection with the top row flagged.
    pub fn leaderboard(&self, conference: Conference) -> Vec<LeaderboardRow> {
        self.conference(conference)
            .iter()
            .enumerate()
            .map(|(index, row)| LeaderboardRow {
                position: index + 1,
                team_name: row.team_name.clone(),
                record: row.record.clone(),
                is_leader: index == 0,
            })
            .collect()
    }
}
