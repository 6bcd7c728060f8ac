//! Single-user task scheduler: a recurring-date engine and a SQLite-backed
//! task store, shared by the `sched` CLI and the `sched-web` HTTP server.

pub mod db;
pub mod error;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod output;
pub mod paths;
pub mod recur;
