//! Season game-log aggregation across the whole team directory.

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use super::fetch_utils::fetch_result_set;
use super::source::StatsSource;
use super::urls::build_team_game_log_url;
use crate::constants::provider::GAME_LOG_RESULT_SET;
use crate::data_fetcher::models::{
    GameLogEntry, Season, SeasonDataset, SeasonLogEntry, Team, TeamId,
};
use crate::error::AppError;

/// Fetches one team's regular season game log.
#[instrument(skip(client))]
pub async fn fetch_team_game_log(
    client: &Client,
    api_domain: &str,
    team_id: TeamId,
    season: Season,
    max_retries: u32,
) -> Result<Vec<GameLogEntry>, AppError> {
    let url = build_team_game_log_url(api_domain, team_id, season);
    let rows: Vec<GameLogEntry> =
        fetch_result_set(client, &url, GAME_LOG_RESULT_SET, max_retries).await?;
    debug!("Fetched game log: team_id={team_id}, season={season}, rows={}", rows.len());
    Ok(rows)
}

/// Fetches every team's game log for `season` and joins the rows with
/// `teams`.
///
/// Up to `concurrency` fetches run at once but results are consumed in
/// directory order, so the dataset lists teams in the order given and each
/// team's games in provider order. The first failed fetch aborts the whole
/// aggregation.
///
/// Rows are joined on their own `Team_ID`. Rows whose id is not in `teams`
/// and rows without a result are dropped and counted on the dataset.
#[instrument(skip(source, teams), fields(teams = teams.len()))]
pub async fn aggregate_season<S: StatsSource>(
    source: &S,
    teams: &[Team],
    season: Season,
    concurrency: usize,
) -> Result<SeasonDataset, AppError> {
    let mut dataset = SeasonDataset::empty(season);
    if teams.is_empty() {
        info!("No teams in directory, season {season} dataset is empty");
        return Ok(dataset);
    }

    let directory: HashMap<TeamId, &Team> = teams.iter().map(|team| (team.id, team)).collect();

    let team_ids: Vec<TeamId> = teams.iter().map(|team| team.id).collect();
    let logs: Vec<Vec<GameLogEntry>> = stream::iter(team_ids)
        .map(|team_id| source.team_game_log(team_id, season))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for row in logs.into_iter().flatten() {
        let Some(team) = directory.get(&row.team_id) else {
            warn!(
                "Dropping game log row with unknown team: team_id={}, game_id={}, season={}",
                row.team_id, row.game_id, season
            );
            dataset.unmatched_rows += 1;
            continue;
        };

        match SeasonLogEntry::join(row, team, season) {
            Some(entry) => dataset.entries.push(entry),
            None => dataset.unplayed_rows += 1,
        }
    }

    info!(
        "Aggregated season {}: teams={}, games={}, unplayed={}, unmatched={}",
        season,
        teams.len(),
        dataset.len(),
        dataset.unplayed_rows,
        dataset.unmatched_rows
    );

    Ok(dataset)
}
