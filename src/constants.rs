//! Application-wide constants and configuration values
//!
//! Centralizes defaults, provider query values and environment variable names
//! so they are not scattered through the fetch and cache code.

/// Default stats provider base URL
pub const DEFAULT_API_DOMAIN: &str = "https://stats.nba.com/stats";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Number of team game logs fetched at once while aggregating a season.
/// A value of 1 fetches one team at a time.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Upper bound accepted for `fetch_concurrency`; the provider throttles
/// aggressively above a handful of parallel requests.
pub const MAX_FETCH_CONCURRENCY: usize = 16;

/// Per-operation memo cache capacity. Larger than the number of valid seasons,
/// so no season is ever evicted.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Season range served by the provider, as starting years
pub mod seasons {
    /// First season with game logs available
    pub const FIRST_SEASON: u16 = 1970;

    /// Latest selectable season
    pub const LAST_SEASON: u16 = 2024;

    /// Season selected when none is given (the last completed one)
    pub const DEFAULT_SEASON: u16 = 2023;
}

/// Fixed query parameter values sent to the provider
pub mod provider {
    /// League identifier for the NBA
    pub const LEAGUE_ID: &str = "00";

    /// Only regular season games are aggregated
    pub const SEASON_TYPE: &str = "Regular Season";

    /// Result set holding the team directory
    pub const TEAMS_RESULT_SET: &str = "Teams";

    /// Result set holding a team game log
    pub const GAME_LOG_RESULT_SET: &str = "TeamGameLog";

    /// Result set holding the league standings
    pub const STANDINGS_RESULT_SET: &str = "Standings";

    /// Headers the provider expects from a browser-like client
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    pub const REFERER: &str = "https://www.nba.com/";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for API domain override
    pub const API_DOMAIN: &str = "COURT_API_DOMAIN";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "COURT_LOG_FILE";

    /// Environment variable for HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "COURT_HTTP_TIMEOUT";

    /// Environment variable for season aggregation concurrency
    pub const FETCH_CONCURRENCY: &str = "COURT_FETCH_CONCURRENCY";

    /// Environment variable selecting the team directory source (`bundled` or `remote`)
    pub const TEAM_SOURCE: &str = "COURT_TEAM_SOURCE";
}

/// Retry configuration
pub mod retry {
    /// Retries after the first request, so a call sends at most four requests
    pub const MAX_RETRIES: u32 = 3;

    /// Initial backoff delay, doubled after every attempt (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Retry delay for rate limit errors (seconds)
    pub const RATE_LIMIT_DELAY_SECONDS: u64 = 60;

    /// Retry delay for server errors (seconds)
    pub const SERVER_ERROR_DELAY_SECONDS: u64 = 5;

    /// Retry delay for service unavailable errors (seconds)
    pub const SERVICE_UNAVAILABLE_DELAY_SECONDS: u64 = 30;

    /// Retry delay for network timeout errors (seconds)
    pub const NETWORK_TIMEOUT_DELAY_SECONDS: u64 = 2;

    /// Retry delay for network connection errors (seconds)
    pub const NETWORK_CONNECTION_DELAY_SECONDS: u64 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_constants_are_consistent() {
        let first = seasons::FIRST_SEASON;
        let last = seasons::LAST_SEASON;
        let default = seasons::DEFAULT_SEASON;

        assert!(first < last);
        assert!((first..=last).contains(&default));
    }

    #[test]
    fn test_cache_capacity_covers_every_season() {
        let season_count = usize::from(seasons::LAST_SEASON - seasons::FIRST_SEASON + 1);
        let capacity = DEFAULT_CACHE_CAPACITY;
        assert!(capacity >= season_count);
    }

    #[test]
    fn test_fetch_concurrency_defaults_are_reasonable() {
        let default = DEFAULT_FETCH_CONCURRENCY;
        let max = MAX_FETCH_CONCURRENCY;
        assert!(default >= 1);
        assert!(default <= max);
    }

    #[test]
    fn test_retry_constants_are_reasonable() {
        let max_retries = retry::MAX_RETRIES;
        let rate_limit_delay = retry::RATE_LIMIT_DELAY_SECONDS;
        let timeout_delay = retry::NETWORK_TIMEOUT_DELAY_SECONDS;
        let server_error_delay = retry::SERVER_ERROR_DELAY_SECONDS;

        assert!(max_retries > 0);
        assert!(retry::BASE_DELAY_MS > 0);
        assert!(rate_limit_delay >= server_error_delay);
        assert!(timeout_delay <= server_error_delay);
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [
            env_vars::API_DOMAIN,
            env_vars::LOG_FILE,
            env_vars::HTTP_TIMEOUT,
            env_vars::FETCH_CONCURRENCY,
            env_vars::TEAM_SOURCE,
        ] {
            assert!(name.starts_with("COURT_"), "{name} lacks prefix");
        }
    }
}
