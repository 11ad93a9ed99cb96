//! Error types for xsd2jsonschema
//!
//! This module defines all error types used throughout the library.
//! Conversion failures abort the file being converted; the orchestrator
//! decides whether the remaining files of a batch are still processed.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// The XSD source could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The traversal reached a tag no handler knows about
    #[error("unhandled construct <{tag}> at {path}")]
    UnhandledConstruct {
        /// Tag name of the offending element, prefix included
        tag: String,
        /// Slash separated tag path from the schema root
        path: String,
    },

    /// A document-model mutator was misused (conversion logic bug)
    #[error("contract violation: {0}")]
    Contract(String),

    /// Types referenced but never defined by the end of a conversion
    #[error("unresolved type reference(s): {}", .0.join(", "))]
    UnresolvedTypes(Vec<String>),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Parsing state stack misuse
    #[error("parsing state error: {0}")]
    State(String),

    /// Value error (malformed attribute or facet value)
    #[error("value error: {0}")]
    Value(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid filename mask
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Shorthand for a contract violation
    pub fn contract(message: impl Into<String>) -> Self {
        Error::Contract(message.into())
    }

    /// Shorthand for a malformed value
    pub fn value(message: impl Into<String>) -> Self {
        Error::Value(message.into())
    }
}

/// XSD source parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema file
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected end of file")
            .with_location("Financing_1_000.xsd:128");

        let msg = format!("{}", err);
        assert!(msg.contains("unexpected end of file"));
        assert!(msg.contains("Location: Financing_1_000.xsd:128"));
    }

    #[test]
    fn test_unhandled_construct_names_tag_and_path() {
        let err = Error::UnhandledConstruct {
            tag: "union".to_string(),
            path: "schema/simpleType/union".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unhandled construct <union> at schema/simpleType/union"
        );
    }

    #[test]
    fn test_unresolved_types_lists_names() {
        let err = Error::UnresolvedTypes(vec!["AType".into(), "BType".into()]);
        assert_eq!(err.to_string(), "unresolved type reference(s): AType, BType");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
