//! A minimal interactive shell: read one line, split it into tokens, run a
//! builtin or an external program, repeat until `exit`.
//!
//! The crate is a small library plus the `minsh` binary. [`Interpreter`]
//! owns the prompt-read-dispatch loop; [`reader`] and [`token`] hold the
//! growable line and token buffers; the builtin commands and the external
//! launcher plug into the loop through the factory traits in [`command`];
//! [`profile`] loads the mandatory startup environment file.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
pub mod profile;
pub mod reader;
pub mod token;

pub use command::LoopStatus;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
