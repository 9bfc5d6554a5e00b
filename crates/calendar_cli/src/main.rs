//! CLI entry point over `calendar_core`.
//!
//! # Responsibility
//! - Resolve configuration, open the SQLite store and dispatch subcommands.
//! - Keep output deterministic and line-oriented for scripting.

mod cli_args;

use calendar_core::{
    core_version, init_logging_from_config, month_grid, open_db, ping, sort_for_display,
    CalendarConfig, CalendarService, Event, MoveOutcome, Occurrence, ServiceError,
    SqliteEventRepository,
};
use chrono::{Datelike, Local, NaiveDateTime};
use clap::Parser;
use cli_args::{Cli, Command, EventArgs};
use log::info;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), String> {
    let command = match cli.command {
        None | Some(Command::Ping) => {
            println!("calendar_core ping={}", ping());
            println!("calendar_core version={}", core_version());
            return Ok(());
        }
        Some(command) => command,
    };

    let mut config = CalendarConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(months) = cli.horizon_months {
        config.horizon_months = months;
    }
    init_logging_from_config(&config)?;

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteEventRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut service =
        CalendarService::open(repo, config.horizon_months).map_err(|err| err.to_string())?;
    let now = Local::now().naive_local();
    info!(
        "event=cli_command module=cli status=start horizon_months={}",
        config.horizon_months
    );

    match command {
        Command::Ping => Ok(()),
        Command::Day(args) => {
            let mut found = service.events_for_day(args.date);
            sort_for_display(&mut found);
            print_occurrences(&found);
            Ok(())
        }
        Command::Range(args) => {
            let mut found = service.occurrences_between(args.start, args.end);
            sort_for_display(&mut found);
            print_occurrences(&found);
            Ok(())
        }
        Command::Grid(args) => {
            for week in month_grid(args.date).chunks(7) {
                let cells: Vec<String> = week
                    .iter()
                    .map(|day| {
                        let count = service.events_for_day(*day).len();
                        let marker = if day.month() == args.date.month() { ' ' } else { '.' };
                        format!("{marker}{:>2}:{count:<2}", day.day())
                    })
                    .collect();
                println!("{}", cells.join(" "));
            }
            Ok(())
        }
        Command::Add(args) => {
            let created = service
                .create_event(draft_from(&args), now)
                .map_err(describe_service_error)?;
            println!("created id={}", created.id);
            Ok(())
        }
        Command::Check(args) => {
            match service.check_conflict(&draft_from(&args), None, now) {
                Some(pair) => println!(
                    "conflict existing_id={} day={} existing_start={}",
                    pair.existing.id,
                    pair.day(),
                    pair.existing.start
                ),
                None => println!("no conflict"),
            }
            Ok(())
        }
        Command::Move(args) => {
            match service
                .move_event(&args.id, args.start, now)
                .map_err(describe_service_error)?
            {
                MoveOutcome::Moved(event) => println!(
                    "moved id={} start={} end={}",
                    event.id, event.start, event.end
                ),
                MoveOutcome::Rejected => println!("rejected id={} reason=conflict", args.id),
                MoveOutcome::NotFound => println!("not_found id={}", args.id),
            }
            Ok(())
        }
        Command::Delete(args) => {
            if service
                .delete_event(&args.id)
                .map_err(describe_service_error)?
            {
                println!("deleted id={}", args.id);
            } else {
                println!("not_found id={}", args.id);
            }
            Ok(())
        }
    }
}

fn draft_from(args: &EventArgs) -> Event {
    let mut event = Event::new(args.title.clone(), args.start, args.end)
        .with_color(args.color.into())
        .with_recurrence(args.recurrence());
    if let Some(description) = &args.description {
        event = event.with_description(description.clone());
    }
    event
}

fn describe_service_error(err: ServiceError) -> String {
    match err {
        ServiceError::Conflict { existing_id, day } => {
            format!("conflicts with `{existing_id}` on {day}")
        }
        other => other.to_string(),
    }
}

fn print_occurrences(found: &[Occurrence]) {
    if found.is_empty() {
        println!("No events.");
        return;
    }
    for occurrence in found {
        println!(
            "{}  {}  {:<6}  {}  [{}]  id={}",
            format_instant(occurrence.start),
            format_instant(occurrence.end),
            occurrence.color.as_str(),
            occurrence.title,
            occurrence.recurrence_summary(),
            occurrence.id
        );
    }
}

fn format_instant(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
