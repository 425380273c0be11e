//! Memo caches for the three provider-backed operations.

use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use super::memo::MemoCache;
use super::types::CacheStats;
use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::data_fetcher::models::{Season, SeasonDataset, StandingsRow, Team};

static GLOBAL_STATS_CACHE: OnceLock<Arc<StatsCache>> = OnceLock::new();

/// Team directory, season datasets and standings, each memoized by its
/// arguments. Nothing expires on its own.
pub struct StatsCache {
    teams: MemoCache<(), Vec<Team>>,
    season_logs: MemoCache<Season, SeasonDataset>,
    standings: MemoCache<Season, Vec<StandingsRow>>,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCache {
    /// A private cache, e.g. one per session.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            teams: MemoCache::new("teams", 1),
            season_logs: MemoCache::new("season_logs", capacity),
            standings: MemoCache::new("standings", capacity),
        }
    }

    /// The process-wide cache, created with the default capacity on first use.
    pub fn global() -> Arc<StatsCache> {
        Arc::clone(GLOBAL_STATS_CACHE.get_or_init(|| Arc::new(StatsCache::new())))
    }

    /// Creates the process-wide cache with `capacity`. Has no effect on the
    /// capacity if the global cache already exists.
    pub fn init_global(capacity: usize) -> Arc<StatsCache> {
        let mut created = false;
        let cache = GLOBAL_STATS_CACHE.get_or_init(|| {
            created = true;
            Arc::new(StatsCache::with_capacity(capacity))
        });
        if !created {
            warn!("Global stats cache already initialized, ignoring capacity={capacity}");
        }
        Arc::clone(cache)
    }

    pub fn teams(&self) -> &MemoCache<(), Vec<Team>> {
        &self.teams
    }

    pub fn season_logs(&self) -> &MemoCache<Season, SeasonDataset> {
        &self.season_logs
    }

    pub fn standings(&self) -> &MemoCache<Season, Vec<StandingsRow>> {
        &self.standings
    }

    /// Drops the season dataset and standings of `season`.
    pub async fn invalidate_season(&self, season: Season) {
        let logs = self.season_logs.invalidate(&season).await;
        let standings = self.standings.invalidate(&season).await;
        info!("Invalidated season {season}: season_logs={logs}, standings={standings}");
    }

    /// Forgets the team directory so the next lookup fetches it again.
    /// Datasets already built from the old directory are kept.
    pub async fn refresh_teams(&self) {
        self.teams.invalidate(&()).await;
    }

    pub async fn clear_all(&self) {
        tokio::join!(
            self.teams.clear(),
            self.season_logs.clear(),
            self.standings.clear()
        );
    }

    pub async fn stats(&self) -> CacheStats {
        let (teams, season_logs, standings) = tokio::join!(
            self.teams.info(),
            self.season_logs.info(),
            self.standings.info()
        );
        CacheStats {
            teams,
            season_logs,
            standings,
        }
    }
}
