use std::fmt;

use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning SIP text into header objects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required input (buffer or destination) was not supplied
    #[error("Missing required input: {0}")]
    NullPointer(&'static str),

    /// An arena page could not be obtained or could not grow
    #[error("Out of resources: {0}")]
    OutOfResources(String),

    /// The input does not match the grammar, or a value is out of range
    #[error("Illegal syntax at line {line}, column {column}")]
    IllegalSyntax {
        /// Line number supplied by the caller
        line: u32,
        /// Byte offset into the parsed buffer
        column: usize,
    },

    /// A caller-supplied discriminant or selector is not recognised
    #[error("Bad parameter: {0}")]
    BadParam(String),

    /// Internal inconsistency: mismatched target, list push failure, stack exhaustion
    #[error("Parser error: {0}")]
    Unknown(String),
}

/// The category of an [`Error`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullPointer,
    OutOfResources,
    IllegalSyntax,
    BadParam,
    Unknown,
}

impl Error {
    /// Creates a syntax error for the given position
    pub fn syntax(line: u32, column: usize) -> Self {
        Error::IllegalSyntax { line, column }
    }

    /// Creates an internal error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Error::Unknown(msg.into())
    }

    /// Creates an out-of-resources error
    pub fn out_of_resources(msg: impl Into<String>) -> Self {
        Error::OutOfResources(msg.into())
    }

    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NullPointer(_) => ErrorKind::NullPointer,
            Error::OutOfResources(_) => ErrorKind::OutOfResources,
            Error::IllegalSyntax { .. } => ErrorKind::IllegalSyntax,
            Error::BadParam(_) => ErrorKind::BadParam,
            Error::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Returns true for grammar and range failures
    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::IllegalSyntax
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NullPointer => "null-pointer",
            ErrorKind::OutOfResources => "out-of-resources",
            ErrorKind::IllegalSyntax => "illegal-syntax",
            ErrorKind::BadParam => "bad-param",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(Error::NullPointer("buffer").kind(), ErrorKind::NullPointer);
        assert_eq!(Error::syntax(3, 7).kind(), ErrorKind::IllegalSyntax);
        assert_eq!(Error::unknown("x").kind(), ErrorKind::Unknown);
        assert!(Error::syntax(1, 0).is_syntax());
        assert!(!Error::out_of_resources("page").is_syntax());
    }

    #[test]
    fn test_error_display() {
        let err = Error::syntax(4, 12);
        assert_eq!(err.to_string(), "Illegal syntax at line 4, column 12");
        assert_eq!(ErrorKind::BadParam.to_string(), "bad-param");
    }
}
