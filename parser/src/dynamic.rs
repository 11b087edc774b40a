//! Schema-driven binding without a Rust target type.

use std::collections::BTreeMap;

use argbind_core::{FieldError, Value};
use serde::Serialize;

use crate::target::Fields;

/// Field values keyed by binding key, plus the command that was invoked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DynamicTarget {
    pub values: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<InvokedCommand>,
}

/// A command recorded by [`Parser::parse_dynamic`](crate::Parser::parse_dynamic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvokedCommand {
    pub field: String,
    pub alias: String,
    /// Tokens after the command token.
    pub args: Vec<String>,
    /// The nested binding, when the command spec carries a schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<Box<DynamicTarget>>,
}

impl DynamicTarget {
    /// A target pre-filled with default field values.
    pub fn with_defaults<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            command: None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

impl Fields for DynamicTarget {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        self.values.get(field).cloned()
    }
}
