use std::io::{self, ErrorKind, Read};
use std::process;

/// Initial capacity of a [`Line`] buffer, in bytes.
pub const LINE_CAPACITY: usize = 1024;

/// Reports an allocation failure and terminates the whole process.
///
/// Buffer growth treats out-of-memory as unrecoverable; there is no retry.
pub(crate) fn alloc_failure(what: &str) -> ! {
    eprintln!("minsh: out of memory while growing {what}");
    process::exit(1);
}

/// One logical line of input, with the terminating newline already stripped.
///
/// The buffer starts at [`LINE_CAPACITY`] bytes and, whenever it fills up,
/// reserves an increment that doubles on every growth step. Already-read
/// bytes are never lost; a failed reservation aborts the process.
#[derive(Debug)]
pub struct Line {
    bytes: Vec<u8>,
    step: usize,
}

impl Line {
    pub fn new() -> Self {
        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(LINE_CAPACITY).is_err() {
            alloc_failure("the input line buffer");
        }
        Self {
            bytes,
            step: LINE_CAPACITY,
        }
    }

    /// Appends one byte, growing the buffer if it is full.
    pub fn push(&mut self, byte: u8) {
        if self.bytes.len() == self.bytes.capacity() {
            self.step *= 2;
            if self.bytes.try_reserve_exact(self.step).is_err() {
                alloc_failure("the input line buffer");
            }
        }
        self.bytes.push(byte);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        let mut line = Line::new();
        for &byte in text.as_bytes() {
            line.push(byte);
        }
        line
    }
}

/// Reads logical lines from a byte stream, one byte at a time.
///
/// There is no line-length limit other than available memory.
pub struct LineReader<R> {
    input: R,
}

impl<R: Read> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Reads the next line, up to a newline or the end of the stream.
    ///
    /// Returns `Ok(None)` when the stream ends before any byte of a new
    /// line is seen. A blank line is `Ok(Some(line))` with an empty buffer,
    /// so end-of-input and an empty command stay distinguishable.
    pub fn read_line(&mut self) -> io::Result<Option<Line>> {
        let mut line = Line::new();
        let mut byte = [0u8; 1];
        let mut seen_any = false;
        loop {
            let n = match self.input.read(&mut byte) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                return Ok(seen_any.then_some(line));
            }
            seen_any = true;
            if byte[0] == b'\n' {
                return Ok(Some(line));
            }
            line.push(byte[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(line: &Line) -> String {
        String::from_utf8(line.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn reads_lines_in_order() {
        let mut reader = LineReader::new(Cursor::new("first\nsecond\n"));
        assert_eq!(text(&reader.read_line().unwrap().unwrap()), "first");
        assert_eq!(text(&reader.read_line().unwrap().unwrap()), "second");
        assert!(reader.read_line().unwrap().is_none());
    }

    #[test]
    fn blank_line_is_distinct_from_end_of_input() {
        let mut reader = LineReader::new(Cursor::new("\nafter\n"));

        let blank = reader.read_line().unwrap().unwrap();
        assert!(blank.is_empty());

        assert_eq!(text(&reader.read_line().unwrap().unwrap()), "after");
        assert!(reader.read_line().unwrap().is_none());
    }

    #[test]
    fn final_line_without_newline_is_returned() {
        let mut reader = LineReader::new(Cursor::new("tail"));
        assert_eq!(text(&reader.read_line().unwrap().unwrap()), "tail");
        assert!(reader.read_line().unwrap().is_none());
    }

    #[test]
    fn line_longer_than_initial_capacity_round_trips() {
        let long: String = "abcdefgh".repeat(LINE_CAPACITY);
        let mut reader = LineReader::new(Cursor::new(format!("{long}\nnext\n")));

        let line = reader.read_line().unwrap().unwrap();
        assert_eq!(line.len(), long.len());
        assert_eq!(line.as_bytes(), long.as_bytes());

        assert_eq!(text(&reader.read_line().unwrap().unwrap()), "next");
    }

    #[test]
    fn push_preserves_content_across_growth() {
        let mut line = Line::new();
        for i in 0..(LINE_CAPACITY * 5) {
            line.push((i % 251) as u8);
        }
        assert_eq!(line.len(), LINE_CAPACITY * 5);
        for (i, &byte) in line.as_bytes().iter().enumerate() {
            assert_eq!(byte, (i % 251) as u8);
        }
    }
}
