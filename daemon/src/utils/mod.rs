pub mod ini;
pub mod message;
pub mod playlist;
pub mod subprocess;

use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    /// Indicates that this line is neither a section header nor a `key = value` entry.
    #[error("line {0}: unrecognised syntax")]
    InvalidLine(usize),
    /// An entry appeared before any `[section]` header.
    #[error("line {0}: entry outside of any section")]
    OrphanEntry(usize),
    /// The value requires more components than provided, e.g. a color with only two channels.
    #[error("not enough components")]
    NotEnoughComponents,
    /// A value cannot be parsed into the required type.
    #[error("invalid value")]
    InvalidValue,
}
