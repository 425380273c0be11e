pub mod api;
pub mod cache;
pub mod models;
pub mod service;

pub use api::{HttpStatsSource, StatsSource};
pub use cache::{CacheInfo, CacheStats, StatsCache};
pub use models::{ConferenceStandings, Season, SeasonDataset, StandingsRow, Team};
pub use service::StatsService;
