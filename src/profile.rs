use crate::env::Environment;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the startup environment file, resolved against the working
/// directory the interpreter was started in.
pub const PROFILE_FILE: &str = ".minshrc";

/// Variables a profile must define before the interpreter may start.
const REQUIRED_VARS: [&str; 2] = ["HOME", "PATH"];

/// Startup-profile failures. All of them are fatal: the interpreter
/// refuses to start without a usable profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("profile {} does not define {name}", path.display())]
    MissingVar { path: PathBuf, name: &'static str },
}

/// Parsed startup profile: one `key=value` pair per line, in file order.
///
/// Lines are split once on the first `=`, so values may contain further
/// `=` characters. The trailing newline of each line is stripped and
/// nothing else; duplicate keys are resolved last-write-wins when the
/// profile is applied.
#[derive(Debug)]
pub struct Profile {
    vars: Vec<(String, String)>,
}

impl Profile {
    /// Reads and parses the profile file at `path`.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Unreadable {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ProfileError> {
        let mut vars = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once('=') {
                Some((name, value)) => vars.push((name.to_string(), value.to_string())),
                None => warn!(line = lineno + 1, "profile line has no '=', skipped"),
            }
        }
        for name in REQUIRED_VARS {
            if !vars.iter().any(|(key, _)| key == name) {
                return Err(ProfileError::MissingVar {
                    path: path.to_owned(),
                    name,
                });
            }
        }
        Ok(Self { vars })
    }

    /// Installs every pair into the environment, later lines overriding
    /// earlier ones.
    pub fn apply(&self, env: &mut Environment) {
        for (key, value) in &self.vars {
            env.set_var(key.as_str(), value.as_str());
        }
        debug!(count = self.vars.len(), "profile applied");
    }
}
