//! Error types for capacity decoding.
//!
//! `DecodeError` covers every fatal condition and is what `decode` returns.
//! `UnknownTagError` is the one recoverable condition: the descriptor logs it
//! and moves on to the next element.

use thiserror::Error;

/// Main error type for the capacity decoder.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A range table entry does not match `key:value` or `low~high:value`.
    #[error("Malformed range table entry '{token}' in \"{text}\"")]
    MalformedTable { token: String, text: String },

    /// A numeric array entry is not a finite number.
    #[error("Malformed array entry '{token}' in \"{text}\"")]
    MalformedArray { token: String, text: String },

    /// Attribute value outside its closed set.
    #[error("Invalid value '{value}' for {element}@{attribute}. Expected one of: {}", .expected.join(", "))]
    InvalidEnum {
        element: String,
        attribute: String,
        value: String,
        expected: &'static [&'static str],
    },

    /// Missing required element.
    #[error("Missing required element <{element}> in {context}")]
    MissingElement { element: String, context: String },

    /// Missing required attribute.
    #[error("Missing required attribute {element}@{attribute}")]
    MissingAttribute { element: String, attribute: String },

    /// Attribute text is not a finite number.
    #[error("Invalid number '{value}' for {element}@{attribute}")]
    InvalidNumber {
        element: String,
        attribute: String,
        value: String,
    },

    /// A table or array attribute failed to parse.
    #[error("Invalid {element}@{attribute}: {source}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        #[source]
        source: Box<DecodeError>,
    },

    /// Any fatal error raised while decoding one capacity.
    #[error("Capacity '{name}': {source}")]
    Capacity {
        name: String,
        #[source]
        source: Box<DecodeError>,
    },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

impl DecodeError {
    /// Strip `Capacity` and `InvalidAttribute` wrappers and return the
    /// underlying error.
    #[must_use]
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            Self::Capacity { source, .. } | Self::InvalidAttribute { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// No substructure decoder is registered for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No capacity substructure registered for <{tag}>")]
pub struct UnknownTagError {
    pub tag: String,
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
