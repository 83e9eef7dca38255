use std::{fmt, io};

/// Outcome of a clip operation that reached the engine but could not be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipError {
    /// Negative clip value, rejected before any critical section.
    InvalidArgument(i32),
    /// Writer admitted but every slot is occupied.
    Full,
    /// Writer admitted but there is nothing to paste.
    Empty,
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::InvalidArgument(v) => write!(f, "Item cannot be negative value, item: '{}'", v),
            ClipError::Full => write!(f, "Ring buffer is full"),
            ClipError::Empty => write!(f, "Ring buffer is empty"),
        }
    }
}

impl std::error::Error for ClipError {}

#[derive(Debug)]
pub enum KboardError {
    Clip(ClipError),
    // Raw endpoint input longer than the writer buffer.
    ArgumentTooLong { length: usize, max: usize },
    // Raw endpoint input without a leading integer.
    Malformed(String),
    Config(confy::ConfyError),
    Io(io::Error),
}

impl fmt::Display for KboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KboardError::Clip(e) => write!(f, "Clip error: {}", e),
            KboardError::ArgumentTooLong { length, max } => {
                write!(f, "Data length is too long, length: '{}', max: '{}'", length, max)
            }
            KboardError::Malformed(s) => write!(f, "Invalid argument, must input 1 integer: '{}'", s),
            KboardError::Config(e) => write!(f, "Config error: {}", e),
            KboardError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for KboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KboardError::Clip(e) => Some(e),
            KboardError::ArgumentTooLong { .. } => None,
            KboardError::Malformed(_) => None,
            KboardError::Config(e) => Some(e),
            KboardError::Io(e) => Some(e),
        }
    }
}

impl From<ClipError> for KboardError {
    fn from(err: ClipError) -> Self {
        KboardError::Clip(err)
    }
}

impl From<confy::ConfyError> for KboardError {
    fn from(err: confy::ConfyError) -> Self {
        KboardError::Config(err)
    }
}

impl From<io::Error> for KboardError {
    fn from(err: io::Error) -> Self {
        KboardError::Io(err)
    }
}
