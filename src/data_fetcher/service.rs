//! Memoized entry points over a [`StatsSource`].

use std::sync::Arc;
use tracing::{info, instrument};

use super::api::{HttpStatsSource, StatsSource, aggregate_season, get_standings};
use super::cache::{CacheStats, StatsCache};
use super::models::{ConferenceStandings, Season, SeasonDataset, StandingsRow, Team};
use crate::config::Config;
use crate::constants::DEFAULT_FETCH_CONCURRENCY;
use crate::error::AppError;

/// The team directory, season datasets and standings, each computed at most
/// once per key for the lifetime of the cache.
///
/// Services built with [`StatsService::global`] share the process-wide
/// cache; [`StatsService::new`] gives a private one.
pub struct StatsService<S> {
    source: S,
    cache: Arc<StatsCache>,
    fetch_concurrency: usize,
}

impl StatsService<HttpStatsSource> {
    /// HTTP-backed service on the process-wide cache, sized and tuned from
    /// `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let source = HttpStatsSource::from_config(config)?;
        Ok(Self::with_cache(source, StatsCache::init_global(config.cache_capacity))
            .with_fetch_concurrency(config.fetch_concurrency))
    }
}

impl<S: StatsSource> StatsService<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(StatsCache::new()))
    }

    pub fn global(source: S) -> Self {
        Self::with_cache(source, StatsCache::global())
    }

    pub fn with_cache(source: S, cache: Arc<StatsCache>) -> Self {
        Self {
            source,
            cache,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Game-log fetches in flight while aggregating; 1 fetches sequentially.
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<StatsCache> {
        &self.cache
    }

    /// The team directory, fetched once and then served from the cache.
    pub async fn list_teams(&self) -> Result<Arc<Vec<Team>>, AppError> {
        self.cache
            .teams()
            .get_or_try_init((), || self.source.list_teams())
            .await
    }

    /// Every completed game of `season` joined with its team. The directory
    /// used for the join comes from [`list_teams`](Self::list_teams).
    #[instrument(skip(self))]
    pub async fn aggregate_season(&self, season: Season) -> Result<Arc<SeasonDataset>, AppError> {
        self.cache
            .season_logs()
            .get_or_try_init(season, || async {
                let teams = self.list_teams().await?;
                aggregate_season(&self.source, &teams, season, self.fetch_concurrency).await
            })
            .await
    }

    /// Standings rows of `season` in provider order.
    #[instrument(skip(self))]
    pub async fn get_standings(&self, season: Season) -> Result<Arc<Vec<StandingsRow>>, AppError> {
        self.cache
            .standings()
            .get_or_try_init(season, || get_standings(&self.source, season))
            .await
    }

    pub async fn get_conference_standings(
        &self,
        season: Season,
    ) -> Result<ConferenceStandings, AppError> {
        let rows = self.get_standings(season).await?;
        Ok(ConferenceStandings::from_rows(&rows))
    }

    /// Drops the cached directory and fetches it again.
    pub async fn refresh_teams(&self) -> Result<Arc<Vec<Team>>, AppError> {
        self.cache.refresh_teams().await;
        let teams = self.list_teams().await?;
        info!("Team directory refreshed: teams={}", teams.len());
        Ok(teams)
    }

    pub async fn invalidate_season(&self, season: Season) {
        self.cache.invalidate_season(season).await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::Conference;
    use crate::testing_utils::{StubStatsSource, TestDataBuilder};

    fn stub_with_logs(team_count: usize) -> StubStatsSource {
        let teams = TestDataBuilder::teams(team_count);
        teams.iter().fold(StubStatsSource::new(teams.clone()), |stub, team| {
            stub.with_game_log(team.id, TestDataBuilder::game_log(team.id, "WL-W"))
        })
    }

    #[tokio::test]
    async fn test_aggregate_season_is_memoized() {
        let service = StatsService::new(stub_with_logs(3));
        let season = Season::new(2023).unwrap();

        let first = service.aggregate_season(season).await.unwrap();
        let calls_after_first = service.source().total_calls();
        let second = service.aggregate_season(season).await.unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.source().total_calls(), calls_after_first);
        assert_eq!(service.source().game_log_calls(), 3);
        assert_eq!(first.len(), 9);
    }

    #[tokio::test]
    async fn test_team_directory_fetched_once_across_seasons() {
        let service = StatsService::new(stub_with_logs(2));

        service.aggregate_season(Season::new(2022).unwrap()).await.unwrap();
        service.aggregate_season(Season::new(2023).unwrap()).await.unwrap();
        service.list_teams().await.unwrap();

        assert_eq!(service.source().team_calls(), 1);
        assert_eq!(service.source().game_log_calls(), 4);
    }

    #[tokio::test]
    async fn test_refresh_teams_refetches_directory() {
        let service = StatsService::new(stub_with_logs(2));

        service.list_teams().await.unwrap();
        let teams = service.refresh_teams().await.unwrap();

        assert_eq!(teams.len(), 2);
        assert_eq!(service.source().team_calls(), 2);
    }

    #[tokio::test]
    async fn test_conference_standings_from_cache() {
        let stub = StubStatsSource::new(Vec::new()).with_standings(vec![
            TestDataBuilder::standings_row("Knicks", Conference::East, 2),
            TestDataBuilder::standings_row("Thunder", Conference::West, 1),
            TestDataBuilder::standings_row("Celtics", Conference::East, 1),
        ]);
        let service = StatsService::new(stub);
        let season = Season::default();

        let standings = service.get_conference_standings(season).await.unwrap();
        service.get_conference_standings(season).await.unwrap();

        assert_eq!(standings.leader(Conference::East).unwrap().team_name, "Celtics");
        assert_eq!(standings.west.len(), 1);
        assert_eq!(service.source().standings_calls(), 1);
        assert_eq!(service.cache_stats().await.standings.hits, 1);
    }

    #[tokio::test]
    async fn test_invalidate_season_refetches() {
        let service = StatsService::new(stub_with_logs(1)).with_fetch_concurrency(0);
        let season = Season::default();

        service.aggregate_season(season).await.unwrap();
        service.invalidate_season(season).await;
        service.aggregate_season(season).await.unwrap();

        assert_eq!(service.source().game_log_calls(), 2);
        assert_eq!(service.source().team_calls(), 1);
    }
}
