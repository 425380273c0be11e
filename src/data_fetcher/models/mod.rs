pub mod game_log;
pub mod result_set;
pub mod season;
pub mod standings;
pub mod team;

pub use game_log::{GameLogEntry, SeasonDataset, SeasonLogEntry, TeamRecord, WinLoss};
pub use result_set::{ResultSet, StatsResponse};
pub use season::Season;
pub use standings::{Conference, ConferenceStandings, LeaderboardRow, StandingsRow};
pub use team::{Team, TeamId};
