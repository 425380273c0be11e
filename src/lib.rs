//! Basketball standings and season game logs
//!
//! This library fetches team directories, per-team game logs and league
//! standings from a stats provider, joins the game logs of a whole season
//! into one dataset and memoizes every provider-backed result.
//!
//! # Examples
//!
//! ```rust,no_run
//! use court_standings::config::Config;
//! use court_standings::data_fetcher::{Season, StatsService};
//! use court_standings::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let service = StatsService::from_config(&config)?;
//!
//!     let season: Season = "2023-24".parse()?;
//!     let standings = service.get_conference_standings(season).await?;
//!     if let Some(leader) = standings.east.first() {
//!         println!("East leader: {} ({})", leader.team_name, leader.record);
//!     }
//!
//!     let dataset = service.aggregate_season(season).await?;
//!     println!("{} completed games", dataset.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::models::{
    Conference, ConferenceStandings, Season, SeasonDataset, SeasonLogEntry, StandingsRow, Team,
};
pub use data_fetcher::{HttpStatsSource, StatsService, StatsSource};
pub use error::AppError;

// Re-export cache monitoring types for external tools
pub use data_fetcher::cache::{CacheInfo, CacheStats, StatsCache};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
