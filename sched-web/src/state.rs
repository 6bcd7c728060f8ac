use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::auth::AuthGate;

/// Shared application state: the SQLite connection serialized behind a
/// mutex, plus the optional sign-in gate.
pub struct AppState {
    conn: Mutex<Connection>,
    pub auth: Option<AuthGate>,
}

impl AppState {
    pub fn new(conn: Connection, auth: Option<AuthGate>) -> Self {
        Self {
            conn: Mutex::new(conn),
            auth,
        }
    }

    /// Recovers the guard if a previous holder panicked; the connection
    /// itself stays usable.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}
