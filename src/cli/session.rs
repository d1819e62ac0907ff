use std::io::{self, BufRead, IsTerminal, Write};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;

use crate::cli::commands::{FilterCmd, SessionCommand, SessionLine, SubCmd};
use crate::cli::output;
use crate::interact::Interact;
use crate::model::config::Config;
use crate::model::task::{Column, Priority};
use crate::model::view::{Scope, ViewMode, ViewState};
use crate::parse::{parse_quick_add, split_line};
use crate::query;
use crate::schedule;
use crate::store::{TaskStore, Toggle};

/// Terminal-backed interaction: notifications print to stdout, confirmation
/// prompts read one line from the session's input.
pub struct Terminal<R> {
    input: R,
    interactive: bool,
}

impl<R: BufRead> Terminal<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.input.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl<R: BufRead> Interact for Terminal<R> {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        io::stdout().flush().ok();
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.trim(), "y" | "Y" | "yes"),
            _ => false,
        }
    }

    fn notify(&mut self, message: &str) {
        println!("[!] {}", message);
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive session until `quit` or end of input.
///
/// Scheduler passes run between commands, rate-limited by the configured
/// tick interval; `tick` runs one on demand.
pub fn run(config: &Config, json: bool) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut term = Terminal {
        input: io::stdin().lock(),
        interactive,
    };
    let mut store = TaskStore::with_seed_lists(&config.lists.seed);
    let mut view = ViewState::default();

    info!(
        seed_lists = config.lists.seed.len(),
        tick_secs = config.schedule.tick_secs,
        "session start"
    );
    if interactive {
        println!(
            "[=] trellis v{} - type 'help' to list commands",
            env!("CARGO_PKG_VERSION")
        );
    }

    let tick_every = Duration::from_secs(config.schedule.tick_secs);
    let mut last_tick = Instant::now();

    loop {
        if last_tick.elapsed() >= tick_every {
            schedule::tick(&mut store, Local::now().naive_local(), &mut term);
            last_tick = Instant::now();
        }

        if term.interactive {
            print!("tre> ");
            io::stdout().flush()?;
        }
        let Some(line) = term.read_line()? else {
            break;
        };
        let words = split_line(&line);
        if words.is_empty() {
            continue;
        }

        match SessionLine::try_parse_from(&words) {
            Ok(SessionLine { command }) => {
                match dispatch(command, &mut store, &mut view, &mut term, json) {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            // The built-in `help` subcommand (and -h/--version) surface as
            // "errors" from clap; those belong on stdout
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) =>
            {
                print!("{}", err);
            }
            Err(err) => eprintln!("{}", err),
        }
    }

    info!("session end");
    Ok(())
}

fn dispatch<R: BufRead>(
    command: SessionCommand,
    store: &mut TaskStore,
    view: &mut ViewState,
    term: &mut Terminal<R>,
    json: bool,
) -> Flow {
    let today = Local::now().date_naive();

    match command {
        SessionCommand::Add(args) => match parse_quick_add(&args.tokens, today) {
            Ok(draft) => match store.add_task(draft, today) {
                Ok(id) => {
                    if json {
                        print_json(&output::task_to_json(store.task(id).expect("just added")));
                    } else {
                        println!("added task {}", id);
                    }
                }
                Err(e) => eprintln!("error: {}", e),
            },
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::List => {
            view.mode = ViewMode::List;
            print_view(store, view, today, json);
        }

        SessionCommand::Board => {
            view.mode = ViewMode::Kanban;
            print_board(store, json);
        }

        SessionCommand::View => match view.mode {
            ViewMode::List => print_view(store, view, today, json),
            ViewMode::Kanban => print_board(store, json),
        },

        SessionCommand::Planned => {
            let groups = query::group_by_date(store.tasks(), view, today);
            if json {
                print_json(&output::groups_to_json(&groups));
            } else {
                print!("{}", output::render_groups(&groups));
            }
        }

        SessionCommand::Dashboard => {
            let pending = query::pending_by_priority(store.tasks(), today);
            let completion = query::completion_by_priority(store.tasks(), today);
            let overall = query::overall_completion(store.tasks(), today);
            if json {
                print_json(&output::dashboard_to_json(pending, completion, overall));
            } else {
                print!("{}", output::render_dashboard(pending, completion, overall));
            }
        }

        SessionCommand::Scope(args) => match parse_scope(&args.parts) {
            Ok(scope) => {
                view.scope = scope;
                view.search.clear();
                println!("scope: {}", view.scope.label());
                print_view(store, view, today, json);
            }
            Err(msg) => eprintln!("error: {}", msg),
        },

        SessionCommand::Search(args) => {
            if args.words.is_empty() {
                view.search.clear();
                view.filters.clear();
                println!("search cleared");
            } else {
                view.search = args.words.join(" ");
                print_view(store, view, today, json);
            }
        }

        SessionCommand::Filter(args) => {
            match apply_filter(args.which, view) {
                Ok(()) => print_view(store, view, today, json),
                Err(msg) => eprintln!("error: {}", msg),
            }
        }

        SessionCommand::Done(arg) => match store.toggle_complete(arg.id, term) {
            Ok(Toggle::Completed) => println!("completed task {}", arg.id),
            Ok(Toggle::Reopened) => println!("reopened task {}", arg.id),
            Ok(Toggle::Blocked) => {} // the notification already went out
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::Move(args) => match Column::parse(&args.column) {
            Some(column) => match store.move_task_to_column(args.id, column) {
                Ok(()) => println!("moved task {} to {}", args.id, column.name()),
                Err(e) => eprintln!("error: {}", e),
            },
            None => eprintln!("error: unknown column: {} (expected todo, inprogress, or done)", args.column),
        },

        SessionCommand::Important(arg) => match store.toggle_important(arg.id) {
            Ok(true) => println!("task {} is important", arg.id),
            Ok(false) => println!("task {} is no longer important", arg.id),
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::Sub(args) => match args.which {
            SubCmd::Add { id, text } => match store.add_subtask(id, &text.join(" ")) {
                Ok(sub_id) => println!("added subtask {} to task {}", sub_id, id),
                Err(e) => eprintln!("error: {}", e),
            },
            SubCmd::Done { id, sub_id } => match store.toggle_subtask_complete(id, sub_id) {
                Ok(true) => println!("completed subtask {}", sub_id),
                Ok(false) => println!("reopened subtask {}", sub_id),
                Err(e) => eprintln!("error: {}", e),
            },
            SubCmd::Rm { id, sub_id } => match store.delete_subtask(id, sub_id) {
                Ok(()) => println!("deleted subtask {}", sub_id),
                Err(e) => eprintln!("error: {}", e),
            },
        },

        SessionCommand::Rm(arg) => match store.delete_task(arg.id, term) {
            Ok(true) => println!("deleted task {}", arg.id),
            Ok(false) => println!("kept task {}", arg.id),
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::Show(arg) => match store.task(arg.id) {
            Some(task) => {
                // Showing a task pins it expanded in the list view; showing
                // it again collapses it
                view.expanded = if view.expanded == Some(arg.id) {
                    None
                } else {
                    Some(arg.id)
                };
                if json {
                    print_json(&output::task_to_json(task));
                } else {
                    print!("{}", output::render_task_detail(task));
                }
            }
            None => eprintln!("error: task not found: {}", arg.id),
        },

        SessionCommand::Lists => {
            if json {
                let entries: Vec<serde_json::Value> = std::iter::once(
                    serde_json::json!({ "name": crate::model::list::DEFAULT_LIST }),
                )
                .chain(
                    store
                        .lists()
                        .iter()
                        .map(|l| serde_json::json!({ "id": l.id, "name": l.name })),
                )
                .collect();
                print_json(&entries);
            } else {
                println!("default");
                for list in store.lists() {
                    println!("{:>3} {}", list.id, list.name);
                }
            }
        }

        SessionCommand::Newlist(arg) => match store.add_list(&arg.name) {
            Ok(_) => println!("added list {}", arg.name.trim()),
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::Rmlist(arg) => match store.list_id_by_name(&arg.name) {
            Ok(id) => match store.delete_list(id) {
                Ok(name) => {
                    view.on_list_deleted(&name);
                    println!("deleted list {} (its tasks moved to default)", name);
                }
                Err(e) => eprintln!("error: {}", e),
            },
            Err(e) => eprintln!("error: {}", e),
        },

        SessionCommand::Tags => {
            let tags = query::all_tags(store.tasks());
            if json {
                print_json(&tags);
            } else if tags.is_empty() {
                println!("no tags");
            } else {
                for tag in tags {
                    println!("#{}", tag);
                }
            }
        }

        SessionCommand::Remind(args) => {
            match NaiveDateTime::parse_from_str(&args.when, "%Y-%m-%dT%H:%M") {
                Ok(when) => match store.set_reminder(args.id, when) {
                    Ok(()) => println!("reminder set for task {}", args.id),
                    Err(e) => eprintln!("error: {}", e),
                },
                Err(_) => eprintln!(
                    "error: invalid reminder: {} (expected YYYY-MM-DDTHH:MM)",
                    args.when
                ),
            }
        }

        SessionCommand::Tick(args) => {
            let now = match args.now.as_deref() {
                Some(text) => match NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
                    Ok(now) => now,
                    Err(_) => {
                        eprintln!("error: invalid instant: {} (expected YYYY-MM-DDTHH:MM)", text);
                        return Flow::Continue;
                    }
                },
                None => Local::now().naive_local(),
            };
            let report = schedule::tick(store, now, term);
            if report.is_empty() {
                println!("tick: nothing due");
            } else {
                println!(
                    "tick: spawned {}, reminded {}",
                    report.spawned.len(),
                    report.reminded.len()
                );
            }
        }

        SessionCommand::Quit => return Flow::Quit,
    }

    Flow::Continue
}

fn print_view(store: &TaskStore, view: &ViewState, today: NaiveDate, json: bool) {
    let tasks = query::filter_tasks(store.tasks(), view, today);
    if json {
        let tasks: Vec<_> = tasks.iter().map(|t| output::task_to_json(t)).collect();
        print_json(&tasks);
    } else {
        print!("{}", output::render_task_list(&tasks, view.expanded));
    }
}

fn print_board(store: &TaskStore, json: bool) {
    let columns = query::board(store.tasks());
    if json {
        print_json(&output::board_to_json(&columns));
    } else {
        print!("{}", output::render_board(&columns));
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: {}", e),
    }
}

fn parse_scope(parts: &[String]) -> Result<Scope, String> {
    const USAGE: &str =
        "usage: scope all|today|important|planned|assigned | scope list <name> | scope range <start> <end>";

    match parts {
        [one] => match one.as_str() {
            "all" => Ok(Scope::All),
            "today" => Ok(Scope::Today),
            "important" => Ok(Scope::Important),
            "planned" => Ok(Scope::Planned),
            "assigned" => Ok(Scope::Assigned),
            _ => Err(USAGE.to_string()),
        },
        [kind, name] if kind == "list" => Ok(Scope::List(name.clone())),
        [kind, start, end] if kind == "range" => {
            let start = parse_scope_date(start)?;
            let end = parse_scope_date(end)?;
            // A range picked backwards is swapped, not rejected
            if end < start {
                Ok(Scope::DateRange {
                    start: end,
                    end: start,
                })
            } else {
                Ok(Scope::DateRange { start, end })
            }
        }
        _ => Err(USAGE.to_string()),
    }
}

fn parse_scope_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {} (expected YYYY-MM-DD)", text))
}

fn apply_filter(which: FilterCmd, view: &mut ViewState) -> Result<(), String> {
    match which {
        FilterCmd::Pri { value } => {
            let priority = Priority::parse(&value)
                .ok_or_else(|| format!("unknown priority: {} (expected high, medium, or low)", value))?;
            view.filters.toggle_priority(priority);
        }
        FilterCmd::List { name } => view.filters.toggle_list(name),
        FilterCmd::Tag { tag } => view.filters.toggle_tag(tag),
        FilterCmd::Done { value } => view.filters.toggle_completed(parse_bool(&value)?),
        FilterCmd::Recurring { value } => view.filters.toggle_recurring(parse_bool(&value)?),
        FilterCmd::Clear => view.filters.clear(),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "yes" | "true" | "y" => Ok(true),
        "no" | "false" | "n" => Ok(false),
        _ => Err(format!("expected yes or no, got: {}", value)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
