use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("repeat rule is empty")]
    EmptyRepeat,

    #[error("unsupported repeat rule '{0}'")]
    UnsupportedRepeat(String),

    #[error("bad repeat interval: {0}")]
    BadInterval(String),

    #[error("bad date '{0}': expected YYYYMMDD")]
    InvalidDate(String),

    #[error("invalid repeat rule: {0}")]
    InvalidRepeat(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("task {0} not found")]
    NotFound(i64),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, SchedError>;
