use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Continuation flag produced by every dispatched command.
///
/// Only the `exit` builtin yields the terminal value; every other command,
/// including a failed external launch, continues the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    /// Show the prompt again and read the next line.
    Continue,
    /// Leave the interactive loop.
    Exit,
}

impl LoopStatus {
    /// True for the terminal value that stops the interpreter.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopStatus::Exit)
    }
}

/// A borrowed view over one tokenized line: the first token names the
/// command, the remaining tokens are its arguments.
///
/// Created fresh for every loop iteration and dropped with it.
#[derive(Debug)]
pub struct Command<'a> {
    pub name: &'a str,
    pub args: Vec<&'a str>,
}

/// Object-safe trait for any command the interpreter can execute.
///
/// Builtins implement it through a blanket impl; the external launcher
/// implements it directly. Recoverable failures are returned as errors and
/// reported by the dispatcher without stopping the loop.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<LoopStatus>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the environment to resolve executables (e.g.,
/// using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
