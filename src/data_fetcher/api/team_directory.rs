//! Team directory: the bundled franchise list and the remote `teams` endpoint.

use reqwest::Client;
use tracing::{info, instrument};

use super::fetch_utils::fetch_result_set;
use super::urls::build_teams_url;
use crate::constants::provider::TEAMS_RESULT_SET;
use crate::data_fetcher::models::{Team, TeamId};
use crate::error::AppError;

// (id, abbreviation, nickname, city, year founded)
const BUNDLED_TEAMS: [(TeamId, &str, &str, &str, i32); 30] = [
    (1610612737, "ATL", "Hawks", "Atlanta", 1949),
    (1610612738, "BOS", "Celtics", "Boston", 1946),
    (1610612739, "CLE", "Cavaliers", "Cleveland", 1970),
    (1610612740, "NOP", "Pelicans", "New Orleans", 2002),
    (1610612741, "CHI", "Bulls", "Chicago", 1966),
    (1610612742, "DAL", "Mavericks", "Dallas", 1980),
    (1610612743, "DEN", "Nuggets", "Denver", 1976),
    (1610612744, "GSW", "Warriors", "Golden State", 1946),
    (1610612745, "HOU", "Rockets", "Houston", 1967),
    (1610612746, "LAC", "Clippers", "Los Angeles", 1970),
    (1610612747, "LAL", "Lakers", "Los Angeles", 1948),
    (1610612748, "MIA", "Heat", "Miami", 1988),
    (1610612749, "MIL", "Bucks", "Milwaukee", 1968),
    (1610612750, "MIN", "Timberwolves", "Minnesota", 1989),
    (1610612751, "BKN", "Nets", "Brooklyn", 1976),
    (1610612752, "NYK", "Knicks", "New York", 1946),
    (1610612753, "ORL", "Magic", "Orlando", 1989),
    (1610612754, "IND", "Pacers", "Indiana", 1976),
    (1610612755, "PHI", "76ers", "Philadelphia", 1949),
    (1610612756, "PHX", "Suns", "Phoenix", 1968),
    (1610612757, "POR", "Trail Blazers", "Portland", 1970),
    (1610612758, "SAC", "Kings", "Sacramento", 1948),
    (1610612759, "SAS", "Spurs", "San Antonio", 1976),
    (1610612760, "OKC", "Thunder", "Oklahoma City", 1967),
    (1610612761, "TOR", "Raptors", "Toronto", 1995),
    (1610612762, "UTA", "Jazz", "Utah", 1974),
    (1610612763, "MEM", "Grizzlies", "Memphis", 1995),
    (1610612764, "WAS", "Wizards", "Washington", 1961),
    (1610612765, "DET", "Pistons", "Detroit", 1948),
    (1610612766, "CHA", "Hornets", "Charlotte", 1988),
];

/// The 30 current franchises in canonical id order.
pub fn bundled_teams() -> Vec<Team> {
    BUNDLED_TEAMS
        .iter()
        .map(|&(id, abbreviation, nickname, city, year_founded)| Team {
            id,
            full_name: format!("{city} {nickname}"),
            abbreviation: abbreviation.to_string(),
            nickname: nickname.to_string(),
            city: city.to_string(),
            year_founded,
        })
        .collect()
}

/// Fetches the directory from the provider, keeping its order.
#[instrument(skip(client))]
pub async fn fetch_teams(
    client: &Client,
    api_domain: &str,
    max_retries: u32,
) -> Result<Vec<Team>, AppError> {
    let url = build_teams_url(api_domain);
    let teams: Vec<Team> = fetch_result_set(client, &url, TEAMS_RESULT_SET, max_retries).await?;
    info!("Fetched team directory: teams={}", teams.len());
    Ok(teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::data_fetcher::models::{ResultSet, StatsResponse};
    use serde_json::json;
    use std::collections::HashSet;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[test]
    fn test_bundled_teams_are_unique_and_ordered() {
        let teams = bundled_teams();

        assert_eq!(teams.len(), 30);
        let ids: HashSet<TeamId> = teams.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 30);
        assert!(teams.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_bundled_full_names() {
        let teams = bundled_teams();
        let blazers = teams.iter().find(|t| t.abbreviation == "POR").unwrap();
        assert_eq!(blazers.full_name, "Portland Trail Blazers");

        let sixers = teams.iter().find(|t| t.id == 1610612755).unwrap();
        assert_eq!(sixers.full_name, "Philadelphia 76ers");
        assert_eq!(sixers.year_founded, 1949);
    }

    #[tokio::test]
    async fn test_fetch_teams_from_provider() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        let body = StatsResponse::new(vec![ResultSet::new(
            "Teams",
            &["id", "full_name", "abbreviation", "nickname", "city", "year_founded"],
            vec![
                vec![
                    json!(1610612738),
                    json!("Boston Celtics"),
                    json!("BOS"),
                    json!("Celtics"),
                    json!("Boston"),
                    json!(1946),
                ],
                vec![
                    json!(1610612747),
                    json!("Los Angeles Lakers"),
                    json!("LAL"),
                    json!("Lakers"),
                    json!("Los Angeles"),
                    json!(1948),
                ],
            ],
        )]);

        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let teams = fetch_teams(&client, &mock_server.uri(), 0).await.unwrap();

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].full_name, "Boston Celtics");
        assert_eq!(teams[1].id, 1610612747);
    }

    #[tokio::test]
    async fn test_fetch_teams_unavailable() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = fetch_teams(&client, &mock_server.uri(), 0)
            .await
            .unwrap_err();
        assert!(err.is_remote_unavailable());
    }
}
