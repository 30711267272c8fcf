//! Command-line arguments

use chrono::{DateTime, FixedOffset};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timeline", version)]
#[command(about = "Query a TOML schedule of possibly overlapping events")]
pub struct Args {
    /// Schedule file with [[event]] tables
    pub schedule: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List events, optionally only those overlapping a window
    List {
        /// Window start (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        from: Option<DateTime<FixedOffset>>,

        /// Window end (RFC 3339); defaults to the window start
        #[arg(long, value_parser = parse_instant, requires = "from")]
        to: Option<DateTime<FixedOffset>>,

        /// Show the timeline fragments instead of whole events
        #[arg(long, conflicts_with_all = ["from", "to"])]
        fragments: bool,
    },

    /// Report whether anything is scheduled in a window
    Busy {
        /// Window start (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        from: DateTime<FixedOffset>,

        /// Window end (RFC 3339); without it the start instant is checked
        #[arg(long, value_parser = parse_instant)]
        to: Option<DateTime<FixedOffset>>,
    },

    /// Load the schedule and verify the index
    Check,
}

fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(text).map_err(|e| format!("expected an RFC 3339 instant: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_busy() {
        let args = Args::try_parse_from([
            "timeline",
            "plan.toml",
            "busy",
            "--from",
            "2024-01-01T10:00:00+01:00",
            "--json",
        ])
        .unwrap();

        assert!(args.json);
        assert_eq!(args.schedule, PathBuf::from("plan.toml"));
        match args.command {
            Command::Busy { from, to } => {
                assert_eq!(from.to_rfc3339(), "2024-01-01T10:00:00+01:00");
                assert!(to.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_counts() {
        let args = Args::try_parse_from(["timeline", "-vv", "plan.toml", "check"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.command, Command::Check);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Args::try_parse_from(["timeline", "plan.toml", "busy", "--from", "tomorrow"]).is_err());
        assert!(Args::try_parse_from(["timeline", "plan.toml", "list", "--to", "2024-01-01T10:00:00Z"]).is_err());
        assert!(Args::try_parse_from([
            "timeline",
            "plan.toml",
            "list",
            "--fragments",
            "--from",
            "2024-01-01T10:00:00Z"
        ])
        .is_err());
    }
}
