use crate::command::{CommandFactory, ExecutableCommand, LoopStatus};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{self, ExitStatus};
use tracing::debug;

/// Terminal disposition of a launched child process.
///
/// A stopped/suspended child is not terminal; the launcher keeps waiting
/// until one of these two outcomes is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// The child exited on its own with this code.
    Exited(i32),
    /// The child was terminated by this signal.
    Signaled(i32),
}

#[cfg(unix)]
impl From<ExitStatus> for ProcessResult {
    fn from(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;
        match status.code() {
            Some(code) => ProcessResult::Exited(code),
            None => ProcessResult::Signaled(status.signal().unwrap_or(0)),
        }
    }
}

#[cfg(not(unix))]
impl From<ExitStatus> for ProcessResult {
    fn from(status: ExitStatus) -> Self {
        ProcessResult::Exited(status.code().unwrap_or(-1))
    }
}

/// A command that is not a builtin: a program launched as a child process.
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.get_var("PATH").unwrap_or_default().to_owned();
        let program = resolve(OsStr::new(&search_paths), Path::new(name))?;
        Some(Box::new(ExternalCommand {
            program: program.into_owned(),
            args: args.iter().map(OsString::from).collect(),
        }))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Spawns the program and blocks until the child reaches a terminal
    /// state. A merely stopped child keeps the wait in place. The launch
    /// outcome never stops the interactive loop.
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<LoopStatus> {
        let mut child = process::Command::new(&self.program)
            .args(&self.args)
            .env_clear()
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .with_context(|| format!("{}: cannot execute", self.program.display()))?;
        debug!(program = %self.program.display(), pid = child.id(), "spawned child");

        let status = child
            .wait()
            .with_context(|| format!("{}: wait failed", self.program.display()))?;
        let result = ProcessResult::from(status);
        debug!(?result, "child reached a terminal state");
        Ok(LoopStatus::Continue)
    }
}

/// Resolve a program name the way a shell would.
///
/// A name with more than one path component (or an absolute one) is used
/// as-is if it exists; a bare name is searched through the entries of
/// `search_paths`, first match wins. An empty name resolves to nothing.
pub fn resolve<'a>(search_paths: &OsStr, name: &'a Path) -> Option<Cow<'a, Path>> {
    if name.as_os_str().is_empty() {
        return None;
    }
    if name.is_absolute() || name.components().count() > 1 {
        return name.exists().then_some(Cow::Borrowed(name));
    }
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
        .map(Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;

    fn env_with_path(path: &str) -> Environment {
        let mut vars = HashMap::new();
        vars.insert("PATH".to_string(), path.to_string());
        Environment {
            vars,
            current_dir: std::env::temp_dir(),
        }
    }

    #[test]
    #[cfg(unix)]
    fn resolves_absolute_path_only_if_it_exists() {
        let found = resolve(OsStr::new("/bin"), Path::new("/bin/sh")).unwrap();
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));

        assert!(resolve(OsStr::new("/bin"), Path::new("/bin/nonexisting")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn searches_bare_names_through_path_entries() {
        let found = resolve(OsStr::new("/nonexistent:/bin"), Path::new("sh")).unwrap();
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));

        assert!(resolve(OsStr::new("/bin"), Path::new("no-such-tool-xyz")).is_none());
    }

    #[test]
    fn path_shaped_names_are_used_directly() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("bin");
        std::fs::create_dir(&nested).unwrap();
        File::create(nested.join("tool")).unwrap();

        let name = temp.path().join("bin/tool");
        let found = resolve(OsStr::new("/does/not/matter"), &name).unwrap();
        assert_eq!(found.as_ref(), name.as_path());
    }

    #[test]
    fn empty_name_resolves_to_nothing() {
        assert!(resolve(OsStr::new("/bin"), Path::new("")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn factory_launches_and_waits_for_a_real_program() {
        let mut env = env_with_path("/bin:/usr/bin");
        let factory = Factory::<ExternalCommand>::default();
        let cmd = factory.try_create(&env, "true", &[]).expect("true in PATH");

        let status = cmd.execute(&mut Vec::new(), &mut env).unwrap();
        assert_eq!(status, LoopStatus::Continue);
    }

    #[test]
    fn factory_rejects_unresolvable_names() {
        let env = env_with_path("/nonexistent");
        let factory = Factory::<ExternalCommand>::default();
        assert!(factory.try_create(&env, "no-such-tool-xyz", &[]).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn spawn_failure_is_an_error_not_a_crash() {
        let temp = tempfile::tempdir().unwrap();
        let plain_file = temp.path().join("not-executable");
        File::create(&plain_file).unwrap();

        let mut env = env_with_path("/bin");
        let cmd = Box::new(ExternalCommand {
            program: plain_file,
            args: Vec::new(),
        });
        assert!(cmd.execute(&mut Vec::new(), &mut env).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn process_result_distinguishes_exit_from_signal() {
        let exited = process::Command::new("sh")
            .args(["-c", "exit 3"])
            .status()
            .unwrap();
        assert_eq!(ProcessResult::from(exited), ProcessResult::Exited(3));

        let signaled = process::Command::new("sh")
            .args(["-c", "kill -KILL $$"])
            .status()
            .unwrap();
        assert_eq!(ProcessResult::from(signaled), ProcessResult::Signaled(9));
    }
}
