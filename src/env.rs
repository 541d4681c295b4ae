use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable view of the process context threaded through every command.
///
/// The environment holds:
/// - `vars`: the variable table that every launched child receives. It is
///   captured from the process environment once at startup and afterwards
///   written only by the profile loader; setting an existing key overwrites
///   it.
/// - `current_dir`: the working directory for command execution, mutated by
///   `cd` and read by every launch.
///
/// Keeping this explicit, rather than reaching for `std::env` at each use
/// site, lets tests run interpreters against a fabricated context.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
            current_dir: stdenv::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override an environment variable. Last write wins.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overrides_and_get_reads_back() {
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from("/"),
        };

        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "first");
        env.set_var("KEY", "second");

        assert_eq!(env.get_var("KEY"), Some("second"));
    }

    #[test]
    fn new_captures_the_process_environment() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(!env.current_dir.as_os_str().is_empty());
    }
}
