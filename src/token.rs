use crate::command::Command;
use crate::reader::{Line, alloc_failure};

/// Bytes that separate tokens: blanks, tab, carriage return, newline and
/// the bell character.
const DELIMITERS: &[u8] = b" \t\r\n\x07";

/// Initial capacity of a [`TokenList`], in entries.
pub const TOKEN_CAPACITY: usize = 64;

/// The ordered tokens of one input line.
///
/// Token storage follows the same growth policy as the line buffer: a fixed
/// initial capacity, then an increment that doubles on every growth step,
/// with allocation failure aborting the process.
#[derive(Debug)]
pub struct TokenList {
    tokens: Vec<String>,
    step: usize,
}

impl TokenList {
    fn new() -> Self {
        let mut tokens = Vec::new();
        if tokens.try_reserve_exact(TOKEN_CAPACITY).is_err() {
            alloc_failure("the token list");
        }
        Self {
            tokens,
            step: TOKEN_CAPACITY,
        }
    }

    fn push(&mut self, token: String) {
        if self.tokens.len() == self.tokens.capacity() {
            self.step *= 2;
            if self.tokens.try_reserve_exact(self.step).is_err() {
                alloc_failure("the token list");
            }
        }
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First token, if any. An all-delimiter line has none.
    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Views the list as a command: first token as the name, the rest as
    /// arguments. `None` is the empty-command case the loop answers with a
    /// no-op iteration.
    pub fn as_command(&self) -> Option<Command<'_>> {
        let (name, rest) = self.tokens.split_first()?;
        Some(Command {
            name,
            args: rest.iter().map(String::as_str).collect(),
        })
    }
}

/// Splits a line into delimiter-separated tokens.
///
/// Any run of delimiters counts as a single separator, so no empty tokens
/// are produced.
pub fn split(line: &Line) -> TokenList {
    let mut tokens = TokenList::new();
    for run in line.as_bytes().split(|byte| DELIMITERS.contains(byte)) {
        if run.is_empty() {
            continue;
        }
        tokens.push(String::from_utf8_lossy(run).into_owned());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(text: &str) -> Vec<String> {
        split(&Line::from(text))
            .iter()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn mixed_delimiter_runs_collapse() {
        assert_eq!(tokens_of("  a\tb   c\n"), ["a", "b", "c"]);
    }

    #[test]
    fn bell_and_carriage_return_are_delimiters() {
        assert_eq!(tokens_of("a\x07b\rc"), ["a", "b", "c"]);
    }

    #[test]
    fn all_delimiter_line_yields_no_tokens() {
        let list = split(&Line::from(" \t \r\n"));
        assert!(list.is_empty());
        assert_eq!(list.first(), None);
        assert!(list.as_command().is_none());
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(split(&Line::new()).is_empty());
    }

    #[test]
    fn as_command_splits_name_and_args() {
        let list = split(&Line::from("ls -l /tmp"));
        let command = list.as_command().unwrap();
        assert_eq!(command.name, "ls");
        assert_eq!(command.args, ["-l", "/tmp"]);
    }

    #[test]
    fn token_storage_grows_past_initial_capacity() {
        let words: Vec<String> = (0..TOKEN_CAPACITY * 3).map(|i| format!("w{i}")).collect();
        let line = Line::from(words.join(" ").as_str());
        let list = split(&line);
        assert_eq!(list.len(), words.len());
        assert!(list.iter().eq(words.iter().map(String::as_str)));
    }
}
