//! JSON Schema validation of response bodies.
//!
//! Schemas live on disk, one document per endpoint and verb, at
//! `<root>/<category>/<name>_schema.json`. A validation reports every violated
//! constraint at once rather than stopping at the first one.
//!
//! ```rust,no_run
//! use apicheck_core::SchemaValidator;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = SchemaValidator::new("resources/response-schemas");
//!
//! // reads resources/response-schemas/conduit/tags/GET_tags_schema.json
//! validator
//!     .validate("conduit/tags", "GET_tags", &json!({ "tags": ["rust"] }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::logger::to_pretty_json;

/// Default directory holding the schema documents.
pub const DEFAULT_SCHEMA_ROOT: &str = "resources/response-schemas";

/// Errors raised while loading a schema or validating against it.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum SchemaError {
    /// The schema document is missing or is not JSON.
    #[display("Failed to load schema from {}: {cause}", path.display())]
    Load {
        /// Resolved location of the schema document.
        path: PathBuf,
        /// Underlying I/O or parse error message.
        cause: String,
    },

    /// The document is JSON but not a usable JSON Schema.
    #[display("Invalid JSON Schema at {}: {message}", path.display())]
    InvalidSchema {
        /// Resolved location of the schema document.
        path: PathBuf,
        /// Compilation error message.
        message: String,
    },

    /// The response body violates the schema.
    #[display(
        "Response schema validation failed {schema}: {}\n\nActual response body:\n{}",
        to_pretty_json(violations),
        to_pretty_json(body)
    )]
    Validation {
        /// Schema file name, e.g. `GET_tags_schema.json`.
        schema: String,
        /// Every violated constraint.
        violations: Vec<SchemaViolation>,
        /// The validated body, for a self-contained report.
        body: Value,
    },
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    /// JSON pointer to the offending value in the body (empty for the root).
    pub instance_path: String,
    /// JSON pointer to the constraint in the schema, e.g. `/required`.
    pub schema_path: String,
    /// Human readable description.
    pub message: String,
    /// The offending value.
    pub actual: Value,
}

impl From<jsonschema::ValidationError<'_>> for SchemaViolation {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        Self {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
            actual: error.instance.into_owned(),
        }
    }
}

/// Loads schemas by `(category, name)` and validates bodies against them.
///
/// Schemas are read and compiled on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    root: PathBuf,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_ROOT)
    }
}

impl SchemaValidator {
    /// Creates a validator reading schemas under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The schema root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the schema for `(category, name)` is expected.
    pub fn schema_path(&self, category: &str, name: &str) -> PathBuf {
        self.root.join(category).join(schema_file_name(name))
    }

    /// Reads and parses the schema document for `(category, name)`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] when the file is missing or is not JSON.
    pub async fn load(&self, category: &str, name: &str) -> Result<Value, SchemaError> {
        let path = self.schema_path(category, name);
        info!(path = %path.display(), "loading schema");

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) => {
                error!(path = %path.display(), %err, "failed to load schema");
                return Err(SchemaError::Load {
                    path,
                    cause: err.to_string(),
                });
            }
        };

        serde_json::from_str(&contents).map_err(|err| {
            error!(path = %path.display(), %err, "failed to parse schema");
            SchemaError::Load {
                path,
                cause: err.to_string(),
            }
        })
    }

    /// Validates `body` against the schema for `(category, name)`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Load`] / [`SchemaError::InvalidSchema`] before any validation happens,
    /// - [`SchemaError::Validation`] listing every violation.
    pub async fn validate(&self, category: &str, name: &str, body: &Value) -> Result<(), SchemaError> {
        info!("validating schema for {category}/{name}");
        let schema = self.load(category, name).await?;

        let validator = jsonschema::validator_for(&schema).map_err(|err| SchemaError::InvalidSchema {
            path: self.schema_path(category, name),
            message: err.to_string(),
        })?;

        let violations = validator
            .iter_errors(body)
            .map(SchemaViolation::from)
            .collect::<Vec<_>>();
        if violations.is_empty() {
            debug!("{category}/{name}: body conforms");
            return Ok(());
        }

        error!(count = violations.len(), "JSON Schema validation failed for {category}/{name}");
        Err(SchemaError::Validation {
            schema: schema_file_name(name),
            violations,
            body: body.clone(),
        })
    }
}

/// Validates `body` with a [`SchemaValidator`] rooted at [`DEFAULT_SCHEMA_ROOT`].
///
/// # Errors
///
/// See [`SchemaValidator::validate`].
pub async fn validate_schema(category: &str, name: &str, body: &Value) -> Result<(), SchemaError> {
    SchemaValidator::default().validate(category, name, body).await
}

fn schema_file_name(name: &str) -> String {
    format!("{name}_schema.json")
}
