use thiserror::Error;

/// Why a line did not become a sentence record.
///
/// All of these are transient: the line is dropped, the error is counted, and ingest continues.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("line of {0} bytes exceeds the maximum line length")]
    Overlong(usize),
    #[error("malformed sentence {0:?}")]
    Malformed(String),
    #[error("checksum mismatch on {message:?}, given {given:02X}, calculated {calculated:02X}")]
    Checksum {
        message: String,
        given: u8,
        calculated: u8,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ParseError {
    /// Label used for the parse error metric
    pub fn reason(&self) -> &'static str {
        match self {
            ParseError::Overlong(_) => "overlong",
            ParseError::Malformed(_) => "malformed",
            ParseError::Checksum { .. } => "checksum",
            ParseError::Field(_) => "field_count",
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FieldError {
    #[error("{address} has {found} fields, expected {expected}")]
    Count {
        address: String,
        expected: String,
        found: usize,
    },
}
