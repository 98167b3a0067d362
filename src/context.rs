//! Shared session state, passed explicitly instead of living in globals.

use crate::environment::Environment;
use crate::history::History;

/// Everything a dispatched command may read or mutate: the variable table
/// and the in-memory command history. Components that need it take a
/// `&mut ShellContext` rather than reaching for ambient process state.
#[derive(Debug, Default)]
pub struct ShellContext {
    pub env: Environment,
    pub history: History,
}

impl ShellContext {
    /// Context for an interactive session, with the environment seeded from
    /// the inherited process environment plus shell defaults.
    pub fn new() -> Self {
        ShellContext {
            env: Environment::new(),
            history: History::new(),
        }
    }

    /// Status of the most recently dispatched command, as stored under `"?"`.
    pub fn last_status(&self) -> i32 {
        self.env.get("?").parse().unwrap_or(0)
    }

    pub fn set_status(&mut self, status: i32) {
        self.env.set("?", &status.to_string());
    }
}
