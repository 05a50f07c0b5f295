use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which way the data pointer was moving when it left the tape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// How the bracket structure of a program failed to balance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Imbalance {
    #[error("unmatched ']' at index {index}")]
    UnmatchedClose { index: usize },
    #[error("{open} '[' left unclosed at end of program")]
    UnclosedOpen { open: usize },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program exceeds the {capacity}-byte capacity")]
    TooLarge { capacity: usize },
    #[error("unbalanced brackets: {0}")]
    UnbalancedBrackets(Imbalance),
    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
}

/// The data pointer was moved off either end of the tape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("data pointer moved {direction} off the tape at instruction {ip} (dp = {dp})")]
pub struct TapeBoundsError {
    /// Index of the offending `<` or `>`.
    pub ip: usize,
    /// Data pointer before the move.
    pub dp: usize,
    pub direction: Direction,
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    TapeBounds(#[from] TapeBoundsError),
    #[error("i/o error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: io::Error,
    },
    #[error("engine already faulted at instruction {ip}")]
    Faulted { ip: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("execution error: {0}")]
    Exec(#[from] ExecError),
}
