use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

use crate::data_fetcher::models::Season;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Whether the arguments only manage configuration and fetch nothing.
pub fn is_config_operation(args: &Args) -> bool {
    args.new_api_domain.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// Basketball conference standings and season game logs.
///
/// Prints the West and East standings of a regular season side by side,
/// with the conference leaders marked. With --games the whole season's
/// completed games are fetched for every team and summarized per team.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Season to show, by starting year (2023), short label (2023-24) or
    /// full label (2023-2024).
    #[arg(short, long, default_value_t = Season::default())]
    pub season: Season,

    /// Also aggregate every team's game log for the season and print a
    /// per-team win/loss summary.
    #[arg(short, long)]
    pub games: bool,

    /// List the seasons that can be shown and exit.
    #[arg(long = "list-seasons")]
    pub list_seasons: bool,

    /// Update API domain in config.
    #[arg(long = "config", help_heading = "Configuration", value_name = "API_DOMAIN")]
    pub new_api_domain: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also print logs to the terminal.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["court_standings"]).unwrap();
        assert_eq!(args.season, Season::default());
        assert!(!args.games);
        assert!(!is_config_operation(&args));
    }

    #[test]
    fn test_season_label_forms() {
        for label in ["1999", "1999-00", "1999-2000"] {
            let args = Args::try_parse_from(["court_standings", "-s", label]).unwrap();
            assert_eq!(args.season.start_year(), 1999);
        }
    }

    #[test]
    fn test_out_of_range_season_rejected() {
        assert!(Args::try_parse_from(["court_standings", "--season", "1969"]).is_err());
        assert!(Args::try_parse_from(["court_standings", "--season", "next"]).is_err());
    }

    #[test]
    fn test_config_operations() {
        let args =
            Args::try_parse_from(["court_standings", "--config", "stats.example.com"]).unwrap();
        assert!(is_config_operation(&args));
        assert_eq!(args.new_api_domain.as_deref(), Some("stats.example.com"));

        let args = Args::try_parse_from(["court_standings", "--list-config"]).unwrap();
        assert!(is_config_operation(&args));
    }
}
