//! Parameter-name normalization and schema validation.
//!
//! Catches malformed names, duplicate names or field keys, duplicate
//! positional indices and broken command aliases when a schema is built,
//! before any argument is bound against it.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! let schema = Schema::new("tool")
//!     .with_option(OptionSpec::flag("verbose", ["-v", "--verbose"]));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: a long name must use two dashes
//! let bad = Schema::new("tool")
//!     .with_option(OptionSpec::flag("verbose", ["-verbose"]));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{Schema, option_key};

static SHORT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[A-Za-z0-9_]$").expect("valid short name regex"));
static LONG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--[A-Za-z0-9_][A-Za-z0-9_-]+$").expect("valid long name regex")
});
static BARE_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]$").expect("valid bare short regex"));
static BARE_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]+$").expect("valid bare long regex")
});

/// Schema validation errors.
///
/// Each variant describes one structural problem. The `Display` impl gives a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A declared option name is neither `-x`/`x` nor `--xy`/`xy`.
    #[error("invalid parameter name: {0}")]
    InvalidParameterName(String),
    /// An option declares no names at all.
    #[error("option bound to '{0}' declares no names")]
    MissingParameterName(String),
    /// A spec has an empty binding key.
    #[error("parameter field key cannot be empty")]
    EmptyFieldName,
    /// Two specs bind the same field.
    #[error("duplicate field binding: {0}")]
    DuplicateField(String),
    /// Two options share a name.
    #[error("duplicate parameter name: {0}")]
    DuplicateParameterName(String),
    /// Two positional specs share an index.
    #[error("duplicate positional index: {0}")]
    DuplicatePositionalIndex(usize),
    /// A command alias is empty, contains whitespace, or looks like an option.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),
    /// A command field declares no aliases.
    #[error("command bound to '{0}' declares no names")]
    MissingCommandName(String),
    /// Two commands share an alias.
    #[error("duplicate command name: {0}")]
    DuplicateCommandName(String),
    /// A regex constraint failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Normalizes one declared option name.
///
/// Accepts `-x`, `x`, `--name` and `name`; bare names gain one dash when they
/// are a single character and two dashes otherwise.
///
/// # Examples
///
/// ```
/// use argbind_core::normalize_name;
///
/// assert_eq!(normalize_name("r").unwrap(), "-r");
/// assert_eq!(normalize_name("row").unwrap(), "--row");
/// assert_eq!(normalize_name("--extra-args").unwrap(), "--extra-args");
/// assert!(normalize_name("-row").is_err());
/// assert!(normalize_name("na me").is_err());
/// ```
pub fn normalize_name(name: &str) -> Result<String, ValidationError> {
    if SHORT_NAME.is_match(name) || LONG_NAME.is_match(name) {
        Ok(name.to_string())
    } else if BARE_SHORT.is_match(name) {
        Ok(format!("-{name}"))
    } else if BARE_LONG.is_match(name) {
        Ok(format!("--{name}"))
    } else {
        Err(ValidationError::InvalidParameterName(name.to_string()))
    }
}

/// Returns `true` when `name` is already in normalized `-x` / `--xy` form.
pub fn is_normalized_name(name: &str) -> bool {
    SHORT_NAME.is_match(name) || LONG_NAME.is_match(name)
}

/// Validates a schema, returning every structural problem found.
///
/// Option names must already be normalized (see [`Schema::build`]). An empty
/// list means the schema is valid.
pub fn validate_schema(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut fields: HashSet<&str> = HashSet::new();
    let mut keys: HashSet<&str> = HashSet::new();
    for option in &schema.options {
        errors.extend(check_field(&mut fields, &option.field));
        if option.names.is_empty() {
            errors.push(ValidationError::MissingParameterName(option.field.clone()));
        }
        for name in &option.names {
            if !is_normalized_name(name) {
                errors.push(ValidationError::InvalidParameterName(name.clone()));
            } else if !keys.insert(option_key(name)) {
                errors.push(ValidationError::DuplicateParameterName(name.clone()));
            }
        }
    }

    let mut indices: HashSet<usize> = HashSet::new();
    for positional in &schema.positionals {
        errors.extend(check_field(&mut fields, &positional.field));
        if !indices.insert(positional.index) {
            errors.push(ValidationError::DuplicatePositionalIndex(positional.index));
        }
    }

    if let Some(list) = &schema.positional_list {
        errors.extend(check_field(&mut fields, &list.field));
    }

    let mut aliases: HashSet<&str> = HashSet::new();
    for command in &schema.commands {
        errors.extend(check_field(&mut fields, &command.field));
        if command.names.is_empty() {
            errors.push(ValidationError::MissingCommandName(command.field.clone()));
        }
        for alias in &command.names {
            if alias.is_empty() || alias.starts_with('-') || alias.chars().any(char::is_whitespace)
            {
                errors.push(ValidationError::InvalidCommandName(alias.clone()));
            } else if !aliases.insert(alias) {
                errors.push(ValidationError::DuplicateCommandName(alias.clone()));
            }
        }
    }

    errors
}

fn check_field<'a>(fields: &mut HashSet<&'a str>, field: &'a str) -> Option<ValidationError> {
    if field.trim().is_empty() {
        return Some(ValidationError::EmptyFieldName);
    }
    if !fields.insert(field) {
        return Some(ValidationError::DuplicateField(field.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::{CommandSpec, OptionSpec, PositionalSpec, ValueType};

    use super::*;

    #[test]
    fn test_build_rejects_malformed_name() {
        let err = Schema::new("tool")
            .with_option(OptionSpec::new("name", ["n", "na me"], ValueType::String))
            .build()
            .unwrap_err();

        assert_eq!(err, ValidationError::InvalidParameterName("na me".to_string()));
    }

    #[test]
    fn test_validate_rejects_duplicate_names_across_options() {
        let schema = Schema::new("tool")
            .with_option(OptionSpec::new("name", ["n", "name"], ValueType::String))
            .with_option(OptionSpec::flag("nope", ["n"]))
            .build();

        assert_eq!(
            schema.unwrap_err(),
            ValidationError::DuplicateParameterName("-n".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_positional_index() {
        let schema = Schema::new("cp")
            .with_positional(PositionalSpec::new("src", 0, "src", ValueType::String))
            .with_positional(PositionalSpec::new("dest", 0, "dest", ValueType::String));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicatePositionalIndex(0)]
        );
    }

    #[test]
    fn test_validate_allows_index_gaps() {
        let schema = Schema::new("cp")
            .with_positional(PositionalSpec::new("src", 0, "src", ValueType::String))
            .with_positional(PositionalSpec::new("dest", 3, "dest", ValueType::String));

        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn test_validate_rejects_shared_field_keys() {
        let schema = Schema::new("tool")
            .with_option(OptionSpec::new("target", ["-t"], ValueType::String))
            .with_positional(PositionalSpec::new("target", 0, "target", ValueType::String));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateField("target".to_string())]
        );

        let unbuilt = Schema::new("tool")
            .with_option(OptionSpec::new("target", ["t"], ValueType::String))
            .with_positional(PositionalSpec::new("target", 0, "target", ValueType::String))
            .build();
        assert_eq!(
            unbuilt.unwrap_err(),
            ValidationError::DuplicateField("target".to_string())
        );
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let schema = Schema::new("tool")
            .with_option(OptionSpec::new("", ["-x"], ValueType::String))
            .with_option(OptionSpec::flag("quiet", Vec::<String>::new()))
            .with_positional(PositionalSpec::new("src", 1, "src", ValueType::String))
            .with_positional(PositionalSpec::new("dest", 1, "dest", ValueType::String))
            .with_command(CommandSpec::new("run", ["run", "run"]));

        assert_eq!(
            validate_schema(&schema),
            vec![
                ValidationError::EmptyFieldName,
                ValidationError::MissingParameterName("quiet".to_string()),
                ValidationError::DuplicatePositionalIndex(1),
                ValidationError::DuplicateCommandName("run".to_string()),
            ]
        );
    }

    #[test]
    fn test_validate_rejects_bad_command_aliases() {
        let dup = Schema::new("git")
            .with_command(CommandSpec::new("push", ["push"]))
            .with_command(CommandSpec::new("upload", ["push"]));
        assert_eq!(
            validate_schema(&dup),
            vec![ValidationError::DuplicateCommandName("push".to_string())]
        );

        let dashed = Schema::new("git").with_command(CommandSpec::new("push", ["--push"]));
        assert_eq!(
            validate_schema(&dashed),
            vec![ValidationError::InvalidCommandName("--push".to_string())]
        );
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = crate::Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern(_)));
    }
}
