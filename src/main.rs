mod cli;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rusqlite::Connection;

use sched::model::Task;
use sched::ops::{self, Completion};
use sched::{db, output, paths, recur};

use cli::{Cli, Command};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_db_path(cli_db: Option<String>) -> String {
    cli_db.unwrap_or_else(paths::db_path)
}

fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_db(db_path: &str) -> Result<Connection> {
    let conn = db::open(db_path)?;
    db::init(&conn)?;
    Ok(conn)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db);
    ensure_db_dir(&db_path)?;

    match cli.command {
        Command::Init => {
            let _conn = open_db(&db_path)?;
            eprintln!("Initialized database at {db_path}");
        }

        Command::Add {
            title,
            date,
            comment,
            repeat,
        } => {
            let conn = open_db(&db_path)?;
            let mut task = Task {
                id: 0,
                date,
                title,
                comment,
                repeat,
            };
            let id = ops::add_task(&conn, &mut task, today())?;
            eprintln!("Added task {id} due {}", task.date);
        }

        Command::List {
            search,
            limit,
            json,
        } => {
            let conn = open_db(&db_path)?;
            let tasks = ops::list_tasks(&conn, limit, &search)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", output::format_task_list(&tasks));
            }
        }

        Command::Show { id, json } => {
            let conn = open_db(&db_path)?;
            let task = ops::get_task(&conn, id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print!("{}", output::format_task_detail(&task));
            }
        }

        Command::Edit {
            id,
            title,
            date,
            comment,
            repeat,
        } => {
            let conn = open_db(&db_path)?;
            let mut task = ops::get_task(&conn, id)?;
            if let Some(t) = title {
                task.title = t;
            }
            if let Some(d) = date {
                task.date = d;
            }
            if let Some(c) = comment {
                task.comment = c;
            }
            if let Some(r) = repeat {
                task.repeat = r;
            }
            ops::update_task(&conn, &mut task, today())?;
            eprintln!("Updated task {id}");
        }

        Command::Done { id } => {
            let conn = open_db(&db_path)?;
            match ops::complete_task(&conn, id, today())? {
                Completion::Removed => eprintln!("Completed and removed task {id}"),
                Completion::Rescheduled(next) => eprintln!("Completed task {id}, next due {next}"),
            }
        }

        Command::Rm { id } => {
            let conn = open_db(&db_path)?;
            ops::delete_task(&conn, id)?;
            eprintln!("Removed task {id}");
        }

        Command::Next { date, repeat, now } => {
            let now = match now {
                Some(s) => recur::parse_date(&s)?,
                None => today(),
            };
            println!("{}", recur::next_date(now, &date, &repeat)?);
        }
    }

    Ok(())
}
