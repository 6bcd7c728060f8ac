use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::{Result, SchedError};
use crate::model::Task;
use crate::normalize::normalize_task;
use crate::recur::{format_date, next_date};

/// Display-format date accepted by the list search filter (`15.01.2024`).
const SEARCH_DATE_FMT: &str = "%d.%m.%Y";

const DEFAULT_LIMIT: usize = 50;

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        comment: row.get(3)?,
        repeat: row.get(4)?,
    })
}

pub fn add_task(conn: &Connection, task: &mut Task, today: NaiveDate) -> Result<i64> {
    if task.title.trim().is_empty() {
        return Err(SchedError::EmptyTitle);
    }
    normalize_task(task, today)?;
    conn.execute(
        "INSERT INTO tasks (date, title, comment, repeat) VALUES (?1, ?2, ?3, ?4)",
        params![task.date, task.title, task.comment, task.repeat],
    )?;
    task.id = conn.last_insert_rowid();
    Ok(task.id)
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task> {
    conn.query_row(
        "SELECT id, date, title, comment, repeat FROM tasks WHERE id = ?1",
        [id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => SchedError::NotFound(id),
        other => SchedError::Storage(other),
    })
}

pub fn update_task(conn: &Connection, task: &mut Task, today: NaiveDate) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(SchedError::EmptyTitle);
    }
    normalize_task(task, today)?;
    let changed = conn.execute(
        "UPDATE tasks SET date = ?1, title = ?2, comment = ?3, repeat = ?4 WHERE id = ?5",
        params![task.date, task.title, task.comment, task.repeat, task.id],
    )?;
    if changed == 0 {
        return Err(SchedError::NotFound(task.id));
    }
    Ok(())
}

/// Overwrite only the `date` column, leaving every other field untouched.
pub fn update_date(conn: &Connection, id: i64, date: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE tasks SET date = ?1 WHERE id = ?2",
        params![date, id],
    )?;
    if changed == 0 {
        return Err(SchedError::NotFound(id));
    }
    Ok(())
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(SchedError::NotFound(id));
    }
    Ok(())
}

/// Outcome of marking a task complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// One-off task: the row was deleted.
    Removed,
    /// Recurring task: `date` was advanced to the contained next occurrence.
    Rescheduled(String),
}

/// Mark a task complete. One-off tasks are removed; recurring tasks get
/// their `date` moved strictly past `today`, with title, comment, and rule
/// untouched. On a rule failure the stored row is unchanged.
pub fn complete_task(conn: &Connection, id: i64, today: NaiveDate) -> Result<Completion> {
    let task = get_task(conn, id)?;
    if task.repeat.trim().is_empty() {
        delete_task(conn, id)?;
        return Ok(Completion::Removed);
    }
    let next = next_date(today, &task.date, &task.repeat)
        .map_err(|e| SchedError::InvalidRepeat(e.to_string()))?;
    update_date(conn, id, &next)?;
    Ok(Completion::Rescheduled(next))
}

/// List tasks ordered by date ascending. `search` is either empty (no
/// filter), a `DD.MM.YYYY` date (exact-date filter), or free text matched
/// as a substring of title or comment.
pub fn list_tasks(conn: &Connection, limit: usize, search: &str) -> Result<Vec<Task>> {
    let limit = if limit == 0 { DEFAULT_LIMIT } else { limit } as i64;

    let mut tasks = Vec::new();
    if search.is_empty() {
        let mut stmt = conn.prepare(
            "SELECT id, date, title, comment, repeat FROM tasks ORDER BY date LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], row_to_task)?;
        for row in rows {
            tasks.push(row?);
        }
    } else if let Ok(day) = NaiveDate::parse_from_str(search, SEARCH_DATE_FMT) {
        let mut stmt = conn.prepare(
            "SELECT id, date, title, comment, repeat FROM tasks
             WHERE date = ?1 ORDER BY date LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![format_date(day), limit], row_to_task)?;
        for row in rows {
            tasks.push(row?);
        }
    } else {
        let pattern = format!("%{search}%");
        let mut stmt = conn.prepare(
            "SELECT id, date, title, comment, repeat FROM tasks
             WHERE title LIKE ?1 OR comment LIKE ?2 ORDER BY date LIMIT ?3",
        )?;
        let rows = stmt.query_map(params![pattern, pattern, limit], row_to_task)?;
        for row in rows {
            tasks.push(row?);
        }
    }
    Ok(tasks)
}
