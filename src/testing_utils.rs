use chrono::{Duration as DateDuration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::data_fetcher::api::{StatsSource, bundled_teams};
use crate::data_fetcher::models::{
    Conference, GameLogEntry, Season, StandingsRow, Team, TeamId, WinLoss,
};
use crate::error::AppError;

/// Failure budget meaning "fail every call"
const ALWAYS: usize = usize::MAX;

/// In-memory [`StatsSource`] with call counters, injected failures and
/// artificial latency.
#[derive(Default)]
pub struct StubStatsSource {
    teams: Vec<Team>,
    game_logs: HashMap<TeamId, Vec<GameLogEntry>>,
    standings: Vec<StandingsRow>,
    team_failures: AtomicUsize,
    game_log_failures: HashMap<TeamId, AtomicUsize>,
    standings_failures: AtomicUsize,
    game_log_delays: HashMap<TeamId, Duration>,
    latency: Option<Duration>,
    team_calls: AtomicUsize,
    game_log_calls: AtomicUsize,
    standings_calls: AtomicUsize,
}

impl StubStatsSource {
    pub fn new(teams: Vec<Team>) -> Self {
        Self {
            teams,
            ..Self::default()
        }
    }

    pub fn with_game_log(mut self, team_id: TeamId, rows: Vec<GameLogEntry>) -> Self {
        self.game_logs.insert(team_id, rows);
        self
    }

    pub fn with_standings(mut self, rows: Vec<StandingsRow>) -> Self {
        self.standings = rows;
        self
    }

    /// Every game-log fetch for `team_id` fails.
    pub fn with_failing_team(self, team_id: TeamId) -> Self {
        self.with_transient_team_failure(team_id, ALWAYS)
    }

    /// The first `times` game-log fetches for `team_id` fail.
    pub fn with_transient_team_failure(mut self, team_id: TeamId, times: usize) -> Self {
        self.game_log_failures
            .insert(team_id, AtomicUsize::new(times));
        self
    }

    pub fn with_team_directory_failures(self, times: usize) -> Self {
        self.team_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn with_standings_failures(self, times: usize) -> Self {
        self.standings_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Delays the game-log fetch of one team.
    pub fn with_delay(mut self, team_id: TeamId, delay: Duration) -> Self {
        self.game_log_delays.insert(team_id, delay);
        self
    }

    /// Delays every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn team_calls(&self) -> usize {
        self.team_calls.load(Ordering::SeqCst)
    }

    pub fn game_log_calls(&self) -> usize {
        self.game_log_calls.load(Ordering::SeqCst)
    }

    pub fn standings_calls(&self) -> usize {
        self.standings_calls.load(Ordering::SeqCst)
    }

    /// Remote calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.team_calls() + self.game_log_calls() + self.standings_calls()
    }

    async fn simulate_latency(&self, extra: Option<Duration>) {
        if let Some(delay) = self.latency.into_iter().chain(extra).reduce(|a, b| a + b) {
            tokio::time::sleep(delay).await;
        }
    }
}

fn take_failure(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| match remaining {
            0 => None,
            ALWAYS => Some(ALWAYS),
            n => Some(n - 1),
        })
        .is_ok()
}

fn unavailable(url: String) -> AppError {
    AppError::api_service_unavailable(503, "Service Unavailable", url)
}

impl StatsSource for StubStatsSource {
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.team_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency(None).await;
        if take_failure(&self.team_failures) {
            return Err(unavailable("stub://teams".to_string()));
        }
        Ok(self.teams.clone())
    }

    async fn team_game_log(
        &self,
        team_id: TeamId,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, AppError> {
        self.game_log_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency(self.game_log_delays.get(&team_id).copied())
            .await;
        if self.game_log_failures.get(&team_id).is_some_and(take_failure) {
            return Err(unavailable(format!(
                "stub://teamgamelog/{team_id}/{}",
                season.query_label()
            )));
        }
        Ok(self.game_logs.get(&team_id).cloned().unwrap_or_default())
    }

    async fn standings(&self, season: Season) -> Result<Vec<StandingsRow>, AppError> {
        self.standings_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency(None).await;
        if take_failure(&self.standings_failures) {
            return Err(unavailable(format!(
                "stub://standings/{}",
                season.query_label()
            )));
        }
        Ok(self.standings.clone())
    }
}

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// The first `count` bundled teams (at most 30).
    pub fn teams(count: usize) -> Vec<Team> {
        bundled_teams().into_iter().take(count).collect()
    }

    /// A game log for one team from a result pattern: `W` win, `L` loss,
    /// anything else a game without a result. Games are a day apart.
    pub fn game_log(team_id: TeamId, results: &str) -> Vec<GameLogEntry> {
        let opening_night = NaiveDate::from_ymd_opt(2023, 10, 24).unwrap_or_default();
        results
            .chars()
            .enumerate()
            .map(|(index, result)| {
                let win_loss = match result {
                    'W' => Some(WinLoss::Win),
                    'L' => Some(WinLoss::Loss),
                    _ => None,
                };
                let mut entry = Self::game_log_entry(
                    team_id,
                    &format!("00223{:05}", (team_id % 1000) * 100 + index as TeamId),
                    win_loss,
                );
                entry.game_date = opening_night + DateDuration::days(index as i64);
                entry
            })
            .collect()
    }

    pub fn game_log_entry(team_id: TeamId, game_id: &str, win_loss: Option<WinLoss>) -> GameLogEntry {
        GameLogEntry {
            team_id,
            game_id: game_id.to_string(),
            game_date: NaiveDate::from_ymd_opt(2023, 10, 24).unwrap_or_default(),
            matchup: format!("{team_id} vs. OPP"),
            win_loss,
        }
    }

    pub fn standings_row(team_name: &str, conference: Conference, playoff_rank: u32) -> StandingsRow {
        StandingsRow {
            team_name: team_name.to_string(),
            conference,
            playoff_rank,
            division: match conference {
                Conference::East => "Atlantic".to_string(),
                Conference::West => "Pacific".to_string(),
            },
            record: format!("{}-{}", 60 - playoff_rank, 22 + playoff_rank),
            last_10: "6-4".to_string(),
            conference_games_back: Some(f64::from(playoff_rank.saturating_sub(1)) * 2.5),
        }
    }

    /// A full 30-team standings table in provider order: West then East,
    /// 15 teams each, ranks 1..=15.
    pub fn league_standings() -> Vec<StandingsRow> {
        let teams = bundled_teams();
        let (west, east) = teams.split_at(15);
        west.iter()
            .enumerate()
            .map(|(i, team)| Self::standings_row(&team.nickname, Conference::West, i as u32 + 1))
            .chain(east.iter().enumerate().map(|(i, team)| {
                Self::standings_row(&team.nickname, Conference::East, i as u32 + 1)
            }))
            .collect()
    }
}
