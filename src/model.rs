use serde::{Deserialize, Serialize};

/// One scheduled item from the `tasks` table.
///
/// `date` is always a fully-resolved `YYYYMMDD` string, never a rule
/// expression. `repeat` is empty for one-off tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}
