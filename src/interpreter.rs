use crate::builtin::{Cd, Debug, Exit, Help};
use crate::command::{CommandFactory, LoopStatus};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::profile::{Profile, ProfileError};
use crate::reader::LineReader;
use crate::token;
use anyhow::Result;
use std::io::{self, Read, Write};
use std::path::Path;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the commands defined in this crate: the builtins and
/// [`ExternalCommand`].
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The interactive interpreter: a prompt-read-dispatch loop over an
/// injectable [`Environment`] and an ordered list of command factories.
///
/// Factories are queried in order, so builtins shadow external programs of
/// the same name. See [`Default`] for the stock command set.
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// The interpreter's view of the process context.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Loads the startup profile and installs its variables.
    ///
    /// Must complete before [`repl`](Self::repl); every failure is fatal to
    /// the caller.
    pub fn load_profile(&mut self, path: &Path) -> Result<(), ProfileError> {
        let profile = Profile::load(path)?;
        profile.apply(&mut self.env);
        Ok(())
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's continuation flag, or an error if the command
    /// cannot be created or fails to execute.
    ///
    /// Example
    /// ```
    /// use minsh::{Interpreter, LoopStatus};
    /// let mut sh = Interpreter::default();
    /// let status = sh.run("help", &[]).unwrap();
    /// assert_eq!(status, LoopStatus::Continue);
    /// ```
    pub fn run(&mut self, name: &str, args: &[&str]) -> Result<LoopStatus> {
        self.dispatch(name, args, &mut io::stdout())
    }

    fn dispatch(
        &mut self,
        name: &str,
        args: &[&str],
        stdout: &mut dyn Write,
    ) -> Result<LoopStatus> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name))
    }

    /// The read-tokenize-dispatch loop.
    ///
    /// One command executes to completion per iteration before the prompt
    /// is shown again. A line with no tokens is a no-op iteration; a
    /// recoverable command failure is reported on standard error and the
    /// loop keeps running. The loop ends on `exit` or at end of input. The
    /// line and its tokens are owned by the iteration and dropped with it.
    pub fn repl<R: Read>(&mut self, input: R) -> io::Result<()> {
        let mut reader = LineReader::new(input);
        loop {
            self.show_prompt()?;
            let Some(line) = reader.read_line()? else {
                break;
            };
            let tokens = token::split(&line);
            let Some(command) = tokens.as_command() else {
                continue;
            };
            match self.dispatch(command.name, &command.args, &mut io::stdout()) {
                Ok(LoopStatus::Exit) => break,
                Ok(LoopStatus::Continue) => {}
                Err(err) => eprintln!("minsh: {err:#}"),
            }
        }
        Ok(())
    }

    /// Prompt: the working directory and a fixed separator glyph.
    fn show_prompt(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}> ", self.env.current_dir.display())?;
        stdout.flush()
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `cd`, `help`, `debug`, `exit`
    /// - the external command launcher
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Debug>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
