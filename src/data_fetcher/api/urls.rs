//! URL building utilities for the stats provider endpoints

use crate::constants::provider::{LEAGUE_ID, SEASON_TYPE};
use crate::data_fetcher::models::{Season, TeamId};

fn season_type_param() -> String {
    SEASON_TYPE.replace(' ', "+")
}

/// Builds the team directory URL.
///
/// # Example
/// ```
/// use court_standings::data_fetcher::api::build_teams_url;
///
/// let url = build_teams_url("https://stats.example.com");
/// assert_eq!(url, "https://stats.example.com/teams");
/// ```
pub fn build_teams_url(api_domain: &str) -> String {
    format!("{api_domain}/teams")
}

/// Builds the URL for one team's regular season game log.
///
/// # Example
/// ```
/// use court_standings::data_fetcher::api::build_team_game_log_url;
/// use court_standings::data_fetcher::models::Season;
///
/// let season = Season::new(2023).unwrap();
/// let url = build_team_game_log_url("https://stats.example.com", 1610612738, season);
/// assert_eq!(
///     url,
///     "https://stats.example.com/teamgamelog?TeamID=1610612738&Season=2023-24&SeasonType=Regular+Season"
/// );
/// ```
pub fn build_team_game_log_url(api_domain: &str, team_id: TeamId, season: Season) -> String {
    format!(
        "{api_domain}/teamgamelog?TeamID={team_id}&Season={}&SeasonType={}",
        season.query_label(),
        season_type_param()
    )
}

/// Builds the league standings URL for a season.
///
/// # Example
/// ```
/// use court_standings::data_fetcher::api::build_standings_url;
/// use court_standings::data_fetcher::models::Season;
///
/// let season = Season::new(1999).unwrap();
/// let url = build_standings_url("https://stats.example.com", season);
/// assert_eq!(
///     url,
///     "https://stats.example.com/leaguestandingsv3?LeagueID=00&Season=1999-00&SeasonType=Regular+Season"
/// );
/// ```
pub fn build_standings_url(api_domain: &str, season: Season) -> String {
    format!(
        "{api_domain}/leaguestandingsv3?LeagueID={LEAGUE_ID}&Season={}&SeasonType={}",
        season.query_label(),
        season_type_param()
    )
}
