pub mod http_client;
pub mod urls;
mod fetch_utils;
pub mod season_log;
pub mod source;
pub mod standings;
pub mod team_directory;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use season_log::{aggregate_season, fetch_team_game_log};
pub use source::{HttpStatsSource, StatsSource};
pub use standings::{fetch_standings, get_standings};
pub use team_directory::{bundled_teams, fetch_teams};
