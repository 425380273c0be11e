use reqwest::Client;
use tracing::{info, instrument};

use super::fetch_utils::fetch_result_set;
use super::source::StatsSource;
use super::urls::build_standings_url;
use crate::constants::provider::STANDINGS_RESULT_SET;
use crate::data_fetcher::models::{Season, StandingsRow};
use crate::error::AppError;

/// Fetches the league standings table, projected to [`StandingsRow`] columns.
#[instrument(skip(client))]
pub async fn fetch_standings(
    client: &Client,
    api_domain: &str,
    season: Season,
    max_retries: u32,
) -> Result<Vec<StandingsRow>, AppError> {
    let url = build_standings_url(api_domain, season);
    fetch_result_set(client, &url, STANDINGS_RESULT_SET, max_retries).await
}

/// Standings for `season` in source order. No merging or filtering.
#[instrument(skip(source))]
pub async fn get_standings<S: StatsSource>(
    source: &S,
    season: Season,
) -> Result<Vec<StandingsRow>, AppError> {
    let rows = source.standings(season).await?;
    info!("Fetched standings for season {season}: rows={}", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::data_fetcher::models::{Conference, ConferenceStandings, ResultSet, StatsResponse};
    use crate::testing_utils::{StubStatsSource, TestDataBuilder};
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn provider_row(name: &str, conference: &str, rank: u32, gb: Value) -> Vec<Value> {
        vec![
            json!(1610612700 + rank),
            json!(name),
            json!(conference),
            json!(rank),
            json!("Atlantic"),
            json!("50-32"),
            json!("6-4"),
            gb,
        ]
    }

    #[tokio::test]
    async fn test_fetch_standings_projects_columns() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        let body = StatsResponse::new(vec![ResultSet::new(
            "Standings",
            &[
                "TeamID",
                "TeamName",
                "Conference",
                "PlayoffRank",
                "Division",
                "Record",
                "L10",
                "ConferenceGamesBack",
            ],
            vec![
                provider_row("Celtics", "East", 1, json!(0.0)),
                provider_row("Thunder", "West", 1, json!("-")),
                provider_row("Knicks", "East", 2, json!(14.0)),
            ],
        )]);

        Mock::given(method("GET"))
            .and(path("/leaguestandingsv3"))
            .and(query_param("LeagueID", "00"))
            .and(query_param("Season", "2023-24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let season = Season::new(2023).unwrap();
        let rows = fetch_standings(&client, &mock_server.uri(), season, 0)
            .await
            .unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, ["Celtics", "Thunder", "Knicks"]);
        assert_eq!(rows[1].conference, Conference::West);
        assert_eq!(rows[2].conference_games_back, Some(14.0));
    }

    #[tokio::test]
    async fn test_get_standings_keeps_source_order() {
        let rows = vec![
            TestDataBuilder::standings_row("Knicks", Conference::East, 2),
            TestDataBuilder::standings_row("Thunder", Conference::West, 1),
            TestDataBuilder::standings_row("Celtics", Conference::East, 1),
        ];
        let source = StubStatsSource::new(Vec::new()).with_standings(rows.clone());

        let fetched = get_standings(&source, Season::new(2023).unwrap())
            .await
            .unwrap();
        assert_eq!(fetched, rows);

        let standings = ConferenceStandings::from_rows(&fetched);
        assert_eq!(standings.east[0].team_name, "Celtics");
    }

    #[tokio::test]
    async fn test_get_standings_empty_is_not_an_error() {
        let source = StubStatsSource::new(Vec::new());
        let rows = get_standings(&source, Season::new(1970).unwrap())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
