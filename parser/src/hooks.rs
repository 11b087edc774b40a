//! Validator and formatter hooks.
//!
//! Specs refer to hooks by id (`Constraints::validator`,
//! `Constraints::formatter`); the [`HookRegistry`] owned by a
//! [`Parser`](crate::Parser) maps those ids to implementations. Plain
//! closures implement both traits.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use argbind_core::Value;

use crate::error::{ParseError, Result};

/// Accepts or rejects a raw value before it is converted.
pub trait ParameterValidator: Send + Sync {
    /// `name` is the parameter's display name, `value` the raw string.
    fn validate(&self, name: &str, value: &str) -> bool;
}

/// Turns a raw value into the stored value, replacing type coercion.
pub trait ParameterFormatter: Send + Sync {
    fn format(&self, name: &str, value: &str) -> Value;
}

impl<F> ParameterValidator for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn validate(&self, name: &str, value: &str) -> bool {
        self(name, value)
    }
}

impl<F> ParameterFormatter for F
where
    F: Fn(&str, &str) -> Value + Send + Sync,
{
    fn format(&self, name: &str, value: &str) -> Value {
        self(name, value)
    }
}

/// Hook implementations keyed by id. Cheap to clone.
///
/// # Examples
///
/// ```
/// use argbind::HookRegistry;
/// use argbind_core::Value;
///
/// let mut hooks = HookRegistry::new();
/// hooks.register_validator("non-empty", |_: &str, v: &str| !v.is_empty());
/// hooks.register_formatter("upper", |_: &str, v: &str| Value::Str(v.to_uppercase()));
///
/// assert!(hooks.validator("non-empty", "name").is_ok());
/// assert!(hooks.validator("upper", "name").is_err());
/// ```
#[derive(Clone, Default)]
pub struct HookRegistry {
    validators: HashMap<String, Arc<dyn ParameterValidator>>,
    formatters: HashMap<String, Arc<dyn ParameterFormatter>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_validator(
        &mut self,
        id: impl Into<String>,
        validator: impl ParameterValidator + 'static,
    ) {
        self.validators.insert(id.into(), Arc::new(validator));
    }

    pub fn register_formatter(
        &mut self,
        id: impl Into<String>,
        formatter: impl ParameterFormatter + 'static,
    ) {
        self.formatters.insert(id.into(), Arc::new(formatter));
    }

    /// Looks up validator `id` on behalf of parameter `name`.
    ///
    /// # Errors
    ///
    /// [`ParseError::ValidatorType`] when no validator is registered under `id`.
    pub fn validator(&self, id: &str, name: &str) -> Result<&dyn ParameterValidator> {
        self.validators
            .get(id)
            .map(|v| v.as_ref())
            .ok_or_else(|| ParseError::ValidatorType {
                name: name.to_string(),
                id: id.to_string(),
            })
    }

    /// Looks up formatter `id` on behalf of parameter `name`.
    ///
    /// # Errors
    ///
    /// [`ParseError::FormatterType`] when no formatter is registered under `id`.
    pub fn formatter(&self, id: &str, name: &str) -> Result<&dyn ParameterFormatter> {
        self.formatters
            .get(id)
            .map(|f| f.as_ref())
            .ok_or_else(|| ParseError::FormatterType {
                name: name.to_string(),
                id: id.to_string(),
            })
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validators: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        let mut formatters: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        validators.sort_unstable();
        formatters.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("validators", &validators)
            .field("formatters", &formatters)
            .finish()
    }
}
