//! Error types for `unrelated-gql-engine-adapter`.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Schema text is not syntactically valid GraphQL SDL.
    #[error("Schema parse error: {}", join(.errors))]
    SchemaParse { errors: Vec<SchemaDiagnostic> },

    /// Schema parses but fails normalization or validation rules.
    #[error("Schema validation error: {}", join(.errors))]
    SchemaValidation { errors: Vec<SchemaDiagnostic> },

    /// A GraphQL data source template was asked to generate a REST call without an operation.
    #[error("graphql data source config is missing an operation")]
    MissingOperation,

    /// Request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Configuration errors (unsupported mode, missing fields, undecodable data source config).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Header names or values rejected by the HTTP layer.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// A single schema problem with its source positions (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDiagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SchemaDiagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
        }
    }
}

impl fmt::Display for SchemaDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(loc) = self.locations.first() {
            write!(f, " at {}:{}", loc.line, loc.column)?;
        }
        Ok(())
    }
}

fn join(errors: &[SchemaDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
