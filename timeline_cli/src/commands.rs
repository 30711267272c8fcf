//! Subcommand execution and output formatting

use crate::args::{Args, Command};
use crate::error::CliResult;
use crate::schedule::ScheduleFile;
use chrono::{DateTime, FixedOffset};
use serde_json::json;
use std::io::Write;
use timeline_scheduler::{EventInfo, Scheduler, SchedulerConfig};

/// Load the schedule named by `args` and run its subcommand
pub fn run(args: &Args, out: &mut impl Write) -> CliResult<()> {
    let schedule = ScheduleFile::from_path(&args.schedule)?;
    let scheduler = schedule.build(SchedulerConfig::default())?;
    log::info!(
        "Loaded {} events from {}",
        scheduler.len(),
        args.schedule.display()
    );

    execute(&args.command, &scheduler, args.json, out)
}

/// Run one subcommand against an already built scheduler
pub fn execute(command: &Command, scheduler: &Scheduler, json: bool, out: &mut impl Write) -> CliResult<()> {
    match command {
        Command::List { from, to, fragments } => {
            let events = match (from, fragments) {
                (_, true) => scheduler.events(None)?,
                (Some(from), false) => scheduler.events_between(*from, to.unwrap_or(*from))?,
                (None, false) => scheduler.all_events()?,
            };
            write_events(&events, *fragments, json, out)
        }
        Command::Busy { from, to } => {
            let to = to.unwrap_or(*from);
            let busy = scheduler.is_busy(*from, to)?;
            write_busy(*from, to, busy, json, out)
        }
        Command::Check => {
            scheduler.check_invariants()?;
            let fragments = scheduler.index().fragment_count();
            if json {
                let report = json!({ "ok": true, "events": scheduler.len(), "fragments": fragments });
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "ok: {} events in {} fragments", scheduler.len(), fragments)?;
            }
            Ok(())
        }
    }
}

fn write_events(events: &[EventInfo], fragments: bool, json: bool, out: &mut impl Write) -> CliResult<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(events)?)?;
        return Ok(());
    }

    for event in events {
        let label = event.label.as_deref().unwrap_or("-");
        if fragments {
            writeln!(
                out,
                "{:>5}  {} .. {}  {}  (event {} .. {})",
                event.id,
                event.fragment_start.to_rfc3339(),
                event.fragment_end.to_rfc3339(),
                label,
                event.start.to_rfc3339(),
                event.end.to_rfc3339()
            )?;
        } else {
            writeln!(
                out,
                "{:>5}  {} .. {}  {}",
                event.id,
                event.start.to_rfc3339(),
                event.end.to_rfc3339(),
                label
            )?;
        }
    }
    Ok(())
}

fn write_busy(
    from: DateTime<FixedOffset>,
    to: DateTime<FixedOffset>,
    busy: bool,
    json: bool,
    out: &mut impl Write,
) -> CliResult<()> {
    if json {
        let report = json!({
            "from": from.to_rfc3339(),
            "to": to.to_rfc3339(),
            "busy": busy,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{}", if busy { "busy" } else { "free" })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use assert_matches::assert_matches;
    use timeline_index::IndexPreferences;

    const PLAN: &str = r#"
[[event]]
label = "workshop"
start = "2024-06-03T09:00:00Z"
end = "2024-06-03T17:00:00Z"

[[event]]
label = "lunch"
start = "2024-06-03T12:00:00Z"
duration = { hours = 1 }

[[event]]
label = "call"
start = "2024-06-04T08:00:00Z"
duration = { minutes = 30 }
"#;

    fn scheduler() -> Scheduler {
        ScheduleFile::from_toml_str(PLAN)
            .unwrap()
            .build(SchedulerConfig::new().with_index_preferences(IndexPreferences::quiet()))
            .unwrap()
    }

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn output(command: Command, json: bool) -> String {
        let mut out = Vec::new();
        execute(&command, &scheduler(), json, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_all() {
        let text = output(
            Command::List {
                from: None,
                to: None,
                fragments: false,
            },
            false,
        );
        let labels: Vec<&str> = text.lines().filter_map(|line| line.split_whitespace().nth(4)).collect();
        assert_eq!(labels, vec!["workshop", "lunch", "call"]);
    }

    #[test]
    fn test_list_window_json() {
        let text = output(
            Command::List {
                from: Some(at("2024-06-03T12:30:00Z")),
                to: Some(at("2024-06-03T12:45:00Z")),
                fragments: false,
            },
            true,
        );
        let events: Vec<EventInfo> = serde_json::from_str(&text).unwrap();
        let labels: Vec<_> = events.iter().filter_map(|e| e.label.as_deref()).collect();
        assert_eq!(labels, vec!["workshop", "lunch"]);
    }

    #[test]
    fn test_list_fragments() {
        let text = output(
            Command::List {
                from: None,
                to: None,
                fragments: true,
            },
            false,
        );
        // workshop is cut into three pieces around lunch
        assert_eq!(text.lines().filter(|line| line.contains("workshop")).count(), 3);
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_busy() {
        let busy = |from: &str, to: Option<&str>| {
            output(
                Command::Busy {
                    from: at(from),
                    to: to.map(at),
                },
                false,
            )
        };

        assert_eq!(busy("2024-06-03T16:00:00Z", Some("2024-06-03T18:00:00Z")), "busy\n");
        assert_eq!(busy("2024-06-03T17:00:00Z", Some("2024-06-04T08:00:00Z")), "free\n");
        assert_eq!(busy("2024-06-04T08:10:00Z", None), "busy\n");
    }

    #[test]
    fn test_busy_json() {
        let text = output(
            Command::Busy {
                from: at("2024-06-05T00:00:00Z"),
                to: None,
            },
            true,
        );
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["busy"], json!(false));
    }

    #[test]
    fn test_check() {
        assert_eq!(output(Command::Check, false), "ok: 3 events in 4 fragments\n");
    }

    #[test]
    fn test_run_reads_schedule_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toml");
        std::fs::write(&path, PLAN).unwrap();

        let args = Args {
            schedule: path,
            json: false,
            verbose: 0,
            command: Command::Check,
        };
        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("ok: 3 events"));

        let args = Args {
            schedule: dir.path().join("missing.toml"),
            ..args
        };
        assert_matches!(run(&args, &mut Vec::new()), Err(CliError::Read { .. }));
    }
}
