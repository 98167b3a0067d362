//! The shell's variable table.
//!
//! Single source of truth for variable expansion and for the environment
//! handed to every spawned child. The child-facing `NAME=VALUE` block is
//! rebuilt by [`Environment::materialize`] at each spawn so intervening
//! `set`/`unset`/`cd` calls are always reflected.

use std::collections::HashMap;
use std::ffi::{CString, NulError};

use nix::unistd::{self, User};

/// Template for the prompt; re-expanded on every draw.
pub const DEFAULT_PS1: &str = "$USER@$HOSTNAME:$PWD > ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Seeded table for an interactive session. Order matters and later
    /// steps override earlier ones: a `USER` default, then every inherited
    /// process variable, then `USER` from the OS identity again, then the
    /// shell's own defaults.
    pub fn new() -> Self {
        let mut env = Environment::empty();

        env.set("USER", &os_username());
        for (key, value) in std::env::vars() {
            env.set(&key, &value);
        }
        env.set("USER", &os_username());

        if let Ok(cwd) = std::env::current_dir() {
            env.set("PWD", &cwd.display().to_string());
        }
        if let Ok(host) = unistd::gethostname() {
            env.set("HOSTNAME", &host.to_string_lossy());
        }
        env.set("PS1", DEFAULT_PS1);
        env.set("?", "0");

        env
    }

    /// Bare table with nothing imported.
    pub fn empty() -> Self {
        Environment {
            vars: HashMap::new(),
        }
    }

    /// Absent keys read as the empty string, matching expansion conventions.
    pub fn get(&self, key: &str) -> &str {
        self.vars.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    pub fn unset(&mut self, key: &str) {
        self.vars.remove(key);
    }

    /// The `NAME=VALUE` block expected by process creation, rebuilt from the
    /// current table contents. Never cached across mutations.
    pub fn materialize(&self) -> Result<Vec<CString>, NulError> {
        self.vars
            .iter()
            .map(|(key, value)| CString::new(format!("{key}={value}")))
            .collect()
    }
}

/// The user the shell runs as: passwd entry for our uid, falling back to the
/// inherited `USER`, then `"unknown"`.
fn os_username() -> String {
    User::from_uid(unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.name)
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string())
}
