//! HTTP interface for the `sched` task scheduler: REST task API, the
//! next-date endpoint, an optional password gate, and static frontend
//! serving.

pub mod auth;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
