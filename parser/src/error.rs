//! Error types for argument binding.

use std::io;

use argbind_core::{FieldError, ValidationError, ValueError, ValueType};
use thiserror::Error;

/// Errors raised while binding arguments to a target.
///
/// Binding stops at the first error. Every variant that concerns a single
/// parameter carries its display name (first option name or positional name).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The target's schema is structurally invalid.
    #[error("invalid schema: {0}")]
    Schema(#[from] ValidationError),

    #[error("Parameter missing: {name}")]
    MissingRequiredParameter { name: String },

    /// A raw value could not be coerced to the declared type.
    #[error(
        "Formatting error for parameter {name}. Unable to cast value \"{value}\" to type {expected}"
    )]
    ParameterFormat {
        name: String,
        value: String,
        expected: ValueType,
    },

    #[error("Parameter {name}: value \"{value}\" did not match the regular expression \"{pattern}\"")]
    ParameterMatch {
        name: String,
        value: String,
        pattern: String,
    },

    #[error("Parameter {name}: value \"{value}\" was rejected by validator {validator}")]
    ParameterValidation {
        name: String,
        value: String,
        validator: String,
    },

    /// A declared validator id has no registered validator.
    #[error("Parameter {name}: {id} is not a registered parameter validator")]
    ValidatorType { name: String, id: String },

    /// A declared formatter id has no registered formatter.
    #[error("Parameter {name}: {id} is not a registered parameter formatter")]
    FormatterType { name: String, id: String },

    /// The target declares subcommands and none was given.
    #[error("missing command, expected one of: {}", .expected.join(", "))]
    CommandMissing { expected: Vec<String> },

    /// The target's setter refused a resolved value.
    #[error("field {field} rejected value: {source}")]
    FieldRejected {
        field: String,
        #[source]
        source: FieldError,
    },

    /// A command was found but the target does not route it.
    #[error("command {alias} (field {field}) is not handled by the target")]
    UnhandledCommand { field: String, alias: String },

    /// The parent's command slot was empty right after storing into it.
    #[error("command field {field} did not keep the bound command")]
    CommandNotStored { field: String },
}

impl ParseError {
    /// Display name of the offending parameter, when the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ParseError::MissingRequiredParameter { name }
            | ParseError::ParameterFormat { name, .. }
            | ParseError::ParameterMatch { name, .. }
            | ParseError::ParameterValidation { name, .. }
            | ParseError::ValidatorType { name, .. }
            | ParseError::FormatterType { name, .. } => Some(name),
            ParseError::FieldRejected { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors from [`LinePrompt`](crate::LinePrompt).
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors loading a binding document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but its schema does not build.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] ValidationError),

    /// A default does not fit the type its field declares.
    #[error("invalid default for {field}: {source}")]
    InvalidDefault {
        field: String,
        #[source]
        source: ValueError,
    },
}
