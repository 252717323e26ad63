//! Schema parsing + normalization.
//!
//! Normalization happens in three steps, each with its own failure class:
//! 1. syntax: the SDL must parse ([`AdapterError::SchemaParse`])
//! 2. build: extensions are merged into their base types, built-in scalars and introspection
//!    types are registered, implicit root operation types are resolved
//! 3. validation: type references, directive usage, interface implementations, ...
//!
//! Failures in (2) and (3) are reported as [`AdapterError::SchemaValidation`].

use crate::config::TypeFields;
use crate::error::{AdapterError, Result, SchemaDiagnostic, SourceLocation};
use apollo_compiler::Schema;
use apollo_compiler::ast::{Document, OperationType};
use apollo_compiler::validation::{DiagnosticList, Valid};
use serde::{Serialize, Serializer};

const SCHEMA_SOURCE_NAME: &str = "schema.graphql";

/// A schema that parsed, built, and validated successfully.
///
/// This is the only schema representation handed to the execution engine.
#[derive(Debug, Clone)]
pub struct NormalizedSchema {
    schema: Valid<Schema>,
}

impl NormalizedSchema {
    /// The validated schema, for engine-side collaborators.
    #[must_use]
    pub fn as_schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    /// Printed SDL (built-in definitions omitted).
    #[must_use]
    pub fn sdl(&self) -> String {
        self.schema.to_string()
    }

    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.schema.types.contains_key(name)
    }

    #[must_use]
    pub fn query_type(&self) -> Option<&str> {
        self.root(OperationType::Query)
    }

    #[must_use]
    pub fn mutation_type(&self) -> Option<&str> {
        self.root(OperationType::Mutation)
    }

    #[must_use]
    pub fn subscription_type(&self) -> Option<&str> {
        self.root(OperationType::Subscription)
    }

    /// Every field of every root operation type, in definition order.
    #[must_use]
    pub fn root_fields(&self) -> Vec<TypeFields> {
        [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .into_iter()
        .filter_map(|op| self.root(op))
        .filter_map(|type_name| {
            let object = self.schema.get_object(type_name)?;
            Some(TypeFields {
                type_name: type_name.to_string(),
                fields: object.fields.keys().map(ToString::to_string).collect(),
            })
        })
        .collect()
    }

    fn root(&self, op: OperationType) -> Option<&str> {
        self.schema.root_operation(op).map(|name| name.as_str())
    }
}

impl Serialize for NormalizedSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.sdl())
    }
}

/// Parse, normalize, and validate schema text.
///
/// # Errors
///
/// Returns [`AdapterError::SchemaParse`] for syntax errors and
/// [`AdapterError::SchemaValidation`] when the schema cannot be built or fails validation.
pub fn normalize(schema_text: &str) -> Result<NormalizedSchema> {
    let document = Document::parse(schema_text, SCHEMA_SOURCE_NAME).map_err(|e| {
        AdapterError::SchemaParse {
            errors: fail_closed(diagnostics(&e.errors)),
        }
    })?;

    let schema = document
        .to_schema()
        .map_err(|e| validation_error(&e.errors))?;

    let schema = schema.validate().map_err(|e| validation_error(&e.errors))?;

    tracing::debug!(types = schema.types.len(), "schema normalized");
    Ok(NormalizedSchema { schema })
}

fn validation_error(errors: &DiagnosticList) -> AdapterError {
    AdapterError::SchemaValidation {
        errors: fail_closed(diagnostics(errors)),
    }
}

fn diagnostics(errors: &DiagnosticList) -> Vec<SchemaDiagnostic> {
    errors
        .iter()
        .map(|diagnostic| {
            let error = diagnostic.to_json();
            SchemaDiagnostic {
                message: error.message,
                locations: error
                    .locations
                    .into_iter()
                    .map(|loc| SourceLocation {
                        line: loc.line,
                        column: loc.column,
                    })
                    .collect(),
            }
        })
        .collect()
}

// An unsuccessful result is never turned into success, even without diagnostics.
fn fail_closed(errors: Vec<SchemaDiagnostic>) -> Vec<SchemaDiagnostic> {
    if errors.is_empty() {
        return vec![SchemaDiagnostic::new(
            "schema normalization failed without reporting a reason",
        )];
    }
    errors
}
