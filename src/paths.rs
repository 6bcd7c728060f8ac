/// Resolve the scheduler database path.
/// Checks `SCHED_DB` env var, falls back to `$HOME/.sched/sched.db`.
pub fn db_path() -> String {
    std::env::var("SCHED_DB").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/.sched/sched.db")
    })
}
