//! The upstream seam: everything the pipeline needs from the stats provider.

use reqwest::Client;
use std::future::Future;

use super::http_client::create_http_client_with_timeout;
use super::season_log::fetch_team_game_log;
use super::standings::fetch_standings;
use super::team_directory::{bundled_teams, fetch_teams};
use crate::config::{Config, TeamSource};
use crate::data_fetcher::models::{GameLogEntry, Season, StandingsRow, Team, TeamId};
use crate::error::AppError;

/// Raw access to the provider's three endpoints.
///
/// Implementations do no caching and no joining; that is the job of
/// [`StatsService`](crate::data_fetcher::StatsService).
pub trait StatsSource: Send + Sync {
    /// Team directory in its canonical order.
    fn list_teams(&self) -> impl Future<Output = Result<Vec<Team>, AppError>> + Send;

    /// Every game-log row for one team and season, completed or not.
    fn team_game_log(
        &self,
        team_id: TeamId,
        season: Season,
    ) -> impl Future<Output = Result<Vec<GameLogEntry>, AppError>> + Send;

    /// Raw standings rows in provider order.
    fn standings(
        &self,
        season: Season,
    ) -> impl Future<Output = Result<Vec<StandingsRow>, AppError>> + Send;
}

/// [`StatsSource`] backed by the provider's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: Client,
    api_domain: String,
    max_retries: u32,
    team_source: TeamSource,
}

impl HttpStatsSource {
    pub fn new(client: Client, api_domain: impl Into<String>, team_source: TeamSource) -> Self {
        Self {
            client,
            api_domain: api_domain.into(),
            max_retries: crate::constants::retry::MAX_RETRIES,
            team_source,
        }
    }

    /// Builds a source with the client timeout, retry budget, domain and
    /// team source taken from `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self {
            client,
            api_domain: config.normalized_api_domain(),
            max_retries: config.max_retries,
            team_source: config.team_source,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    pub fn team_source(&self) -> TeamSource {
        self.team_source
    }
}

impl StatsSource for HttpStatsSource {
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        match self.team_source {
            TeamSource::Bundled => Ok(bundled_teams()),
            TeamSource::Remote => {
                fetch_teams(&self.client, &self.api_domain, self.max_retries).await
            }
        }
    }

    async fn team_game_log(
        &self,
        team_id: TeamId,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, AppError> {
        fetch_team_game_log(
            &self.client,
            &self.api_domain,
            team_id,
            season,
            self.max_retries,
        )
        .await
    }

    async fn standings(&self, season: Season) -> Result<Vec<StandingsRow>, AppError> {
        fetch_standings(&self.client, &self.api_domain, season, self.max_retries).await
    }
}
