use crate::command::{CommandFactory, ExecutableCommand, LoopStatus};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process. Each one reports
/// whether the interactive loop should keep going.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Executes the command using the provided output stream and environment.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<LoopStatus>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<LoopStatus> {
        BuiltinCommand::execute(*self, stdout, env)
    }
}

/// Fallback command produced when argument parsing fails or `--help` is
/// requested: prints argh's output and keeps the loop running.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<LoopStatus> {
        if self.is_error {
            eprintln!("{}", self.output.trim_end());
        } else {
            writeln!(stdout, "{}", self.output.trim_end())?;
        }
        Ok(LoopStatus::Continue)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Change the working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, absolute or relative to the current one
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<LoopStatus> {
        let target = PathBuf::from(&self.target);
        let requested = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&requested)
            .with_context(|| format!("cd: {}", requested.display()))?;
        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(LoopStatus::Continue)
    }
}

#[derive(FromArgs)]
/// Show the builtin commands and how to use the shell.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<LoopStatus> {
        writeln!(stdout, "minsh, a minimal shell.")?;
        writeln!(
            stdout,
            "Type a program name with its arguments and press enter."
        )?;
        writeln!(stdout, "Builtin commands:")?;
        writeln!(stdout, "  cd <dir>   change the working directory")?;
        writeln!(stdout, "  help       show this text")?;
        writeln!(stdout, "  debug      dump the interpreter state")?;
        writeln!(stdout, "  exit       leave the shell")?;
        Ok(LoopStatus::Continue)
    }
}

#[derive(FromArgs)]
/// Dump the interpreter state: working directory and environment table.
pub struct Debug {}

impl BuiltinCommand for Debug {
    fn name() -> &'static str {
        "debug"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<LoopStatus> {
        writeln!(stdout, "working directory: {}", env.current_dir.display())?;
        let mut vars: Vec<(&String, &String)> = env.vars.iter().collect();
        vars.sort();
        for (key, value) in vars {
            writeln!(stdout, "{key}={value}")?;
        }
        Ok(LoopStatus::Continue)
    }
}

#[derive(FromArgs)]
/// Leave the shell. Arguments are accepted and ignored.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; the shell always exits with status 0
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<LoopStatus> {
        Ok(LoopStatus::Exit)
    }
}
