//! Output-related errors

use std::fmt;
use std::error::Error;

pub enum OutputError {
    /// The named file could not be written
    Write(String),
    /// The named file could not be opened or read
    Read(String),
    /// A row of the named file is malformed: file, line number, cause
    Parse(String, usize, String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputError::Write(s) => write!(f, "failed to write probe table to '{}'", s),
            OutputError::Read(s) => write!(f, "failed to read probe table from '{}'", s),
            OutputError::Parse(s, line, cause) => write!(f, "'{}', line {}: {}", s, line, cause),
        }
    }
}

impl fmt::Debug for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for OutputError {}

impl OutputError {
    pub fn parse(filename: &str, line: usize, cause: &str) -> Self {
        Self::Parse(filename.to_owned(), line, cause.to_owned())
    }
}
