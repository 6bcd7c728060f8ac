use chrono::NaiveDate;

use crate::error::{Result, SchedError};
use crate::model::Task;
use crate::recur::{format_date, next_date, parse_date};

/// Resolve a task's `date` before it is persisted.
///
/// An empty date defaults to `today`. A date in the past moves forward: to
/// `today` for one-off tasks, to the next occurrence after `today` for
/// recurring ones. A date on or after `today` is kept as-is, rule or not.
/// A non-empty `repeat` is validated here, so an unparsable rule never
/// reaches the store.
pub fn normalize_task(task: &mut Task, today: NaiveDate) -> Result<()> {
    if task.date.is_empty() {
        task.date = format_date(today);
    }
    let date = parse_date(&task.date)?;

    let mut next = None;
    if !task.repeat.is_empty() {
        let n = next_date(today, &task.date, &task.repeat)
            .map_err(|e| SchedError::InvalidRepeat(e.to_string()))?;
        next = Some(n);
    }

    if date < today {
        task.date = match next {
            Some(n) => n,
            None => format_date(today),
        };
    }
    Ok(())
}
