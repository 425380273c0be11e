use crate::cli::Args;
use crate::config::Config;
use crate::data_fetcher::models::{Conference, ConferenceStandings, LeaderboardRow, Season, SeasonDataset};
use crate::data_fetcher::StatsService;
use crate::error::AppError;
use std::fmt::Write as _;
use tracing::{info, warn};

const TEAM_COLUMN_WIDTH: usize = 22;
const COLUMN_GAP: &str = "    ";

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--config, --set-log-file, --clear-log-file).
///
/// Updates configuration based on the provided arguments, validates it and
/// saves it to the default location.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Handles the --list-seasons command.
pub fn handle_list_seasons_command() {
    for season in Season::all().rev() {
        let marker = if season == Season::default() { " (default)" } else { "" };
        println!("{}  {}{marker}", season.query_label(), season.display_label());
    }
}

/// Prints the standings of `args.season` and, with --games, the season
/// summary. Provider outages are reported as a notice instead of an error.
pub async fn handle_standings_command(args: &Args, config: &Config) -> Result<(), AppError> {
    let service = StatsService::from_config(config)?;
    let season = args.season;

    match service.get_conference_standings(season).await {
        Ok(standings) => println!("{}", render_standings(season, &standings)),
        Err(e) if e.is_remote_unavailable() => {
            warn!("Standings unavailable for season {season}: {e}");
            println!("{}", remote_failure_notice(&e));
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    if args.games {
        match service.aggregate_season(season).await {
            Ok(dataset) => println!("{}", render_season_summary(&dataset)),
            Err(e) if e.is_remote_unavailable() => {
                warn!("Season games unavailable for season {season}: {e}");
                println!("{}", remote_failure_notice(&e));
            }
            Err(e) => return Err(e),
        }
    }

    info!("{}", service.cache_stats().await);
    Ok(())
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

fn leaderboard_cell(row: Option<&LeaderboardRow>) -> String {
    match row {
        Some(row) => format!(
            "{:>2}{} {} {:>7}",
            row.position,
            if row.is_leader { "*" } else { " " },
            fit(&row.team_name, TEAM_COLUMN_WIDTH),
            row.record
        ),
        None => " ".repeat(TEAM_COLUMN_WIDTH + 12),
    }
}

/// West and East side by side, leaders marked with `*`.
pub fn render_standings(season: Season, standings: &ConferenceStandings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Regular Season Standings", season.display_label());
    let _ = writeln!(out);

    if standings.is_empty() {
        let _ = write!(out, "No standings available.");
        return out;
    }

    let west = standings.leaderboard(Conference::West);
    let east = standings.leaderboard(Conference::East);

    let _ = writeln!(
        out,
        "{}{COLUMN_GAP}{}",
        fit("WEST", TEAM_COLUMN_WIDTH + 12),
        "EAST"
    );
    for index in 0..west.len().max(east.len()) {
        let line = format!(
            "{}{COLUMN_GAP}{}",
            leaderboard_cell(west.get(index)),
            leaderboard_cell(east.get(index))
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }

    out.trim_end().to_string()
}

/// Per-team games played and win/loss tally plus the dropped-row counters.
pub fn render_season_summary(dataset: &SeasonDataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Completed Games", dataset.season.display_label());
    let _ = writeln!(out);

    for record in dataset.team_records() {
        let _ = writeln!(
            out,
            "{} {:>3} GP  {:>2}-{:<2}",
            fit(&record.team_name, TEAM_COLUMN_WIDTH + 4),
            record.games(),
            record.wins,
            record.losses
        );
    }

    let _ = write!(
        out,
        "\nGames: {}  Unplayed rows skipped: {}  Unknown-team rows skipped: {}",
        dataset.len(),
        dataset.unplayed_rows,
        dataset.unmatched_rows
    );
    out
}

/// What to tell the user when the provider could not be reached.
pub fn remote_failure_notice(error: &AppError) -> String {
    if error.is_not_found() {
        return format!(
            "The stats provider has no data for this request: {error}\n\
             Check the configured API domain (--list-config)."
        );
    }
    let retry_hint = match error.retry_delay_seconds() {
        Some(seconds) => format!("Try again in about {seconds} seconds."),
        None => "Try again later.".to_string(),
    };
    format!("Could not reach the stats provider: {error}\n{retry_hint}")
}
