//! Error types for pydebug-core

use thiserror::Error;

/// Main error type for the pydebug-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Reader was positioned on a different tag than the decoder expects
    #[error("expected {}, found <{found}>", tag_list(.expected))]
    UnexpectedNode {
        expected: Vec<String>,
        found: String,
    },

    /// Required attribute absent from the current node
    #[error("attribute not found: {name}")]
    MissingAttribute { name: String },

    /// Integer attribute that does not parse
    #[error("unable to decode {attribute}={value:?} as an integer")]
    MalformedNumber { attribute: String, value: String },

    /// Percent-decoding failure
    #[error("unable to decode {raw:?}: {reason}")]
    Encoding { raw: String, reason: String },

    /// Unrecognized `type` or `event` discriminator
    #[error("unknown {kind} {value:?}")]
    UnknownVariant { kind: String, value: String },

    /// Non-positive array dimensions
    #[error("array xml: bad rows or columns number: ({rows}, {cols})")]
    InvalidDimensions { rows: i32, cols: i32 },

    /// Row index or column fill mismatch while rebuilding an array
    #[error("array xml: {0}")]
    Sequence(String),

    /// Payload has no root node where one was required
    #[error("empty frame: {0}")]
    EmptyMessage(String),

    /// Payload text the tree reader cannot tokenize
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unexpected(expected: &[&str], found: impl Into<String>) -> Self {
        Error::UnexpectedNode {
            expected: expected.iter().map(|tag| tag.to_string()).collect(),
            found: found.into(),
        }
    }
}

fn tag_list(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("<{}>", tag))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Result type alias for pydebug-core
pub type Result<T> = std::result::Result<T, Error>;
