//! Structured parameter summaries for usage output.
//!
//! Rendering is left to callers; [`describe`] only gathers, per parameter,
//! its names, type, effective requiredness and default.

use argbind_core::{Schema, ValidationError};
use serde::Serialize;

use crate::target::{Fields, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Option,
    Flag,
    Positional,
    PositionalList,
    Command,
}

/// One line of usage information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSummary {
    pub kind: ParameterKind,
    pub field: String,
    /// Option names, the positional name, or command aliases.
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    pub required: bool,
    /// Default value, shown only for optional parameters that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Summarizes every parameter of `schema`, consulting `defaults` for
/// requiredness and default values.
///
/// Positionals come first in index order, then options in declaration
/// order, then the positional list and commands.
pub fn describe(schema: &Schema, defaults: &dyn Fields) -> Vec<ParameterSummary> {
    let mut summaries = Vec::new();

    for positional in schema.positionals_by_index() {
        let current = defaults.current(&positional.field);
        let required = positional.required.resolve(current.is_some());
        summaries.push(ParameterSummary {
            kind: ParameterKind::Positional,
            field: positional.field.clone(),
            names: vec![positional.name.clone()],
            value_type: Some(positional.value_type.to_string()),
            required,
            default: if required { None } else { current.map(|v| v.to_string()) },
            description: positional.description.clone(),
        });
    }

    for option in &schema.options {
        let current = defaults.current(&option.field);
        let (kind, required) = if option.is_flag() {
            (ParameterKind::Flag, false)
        } else {
            (
                ParameterKind::Option,
                option.required.resolve(current.is_some()),
            )
        };
        summaries.push(ParameterSummary {
            kind,
            field: option.field.clone(),
            names: option.names.clone(),
            value_type: (!option.is_flag()).then(|| option.value_type.to_string()),
            required,
            default: if required { None } else { current.map(|v| v.to_string()) },
            description: option.description.clone(),
        });
    }

    if let Some(list) = &schema.positional_list {
        summaries.push(ParameterSummary {
            kind: ParameterKind::PositionalList,
            field: list.field.clone(),
            names: Vec::new(),
            value_type: None,
            required: false,
            default: None,
            description: list.description.clone(),
        });
    }

    for command in &schema.commands {
        summaries.push(ParameterSummary {
            kind: ParameterKind::Command,
            field: command.field.clone(),
            names: command.names.clone(),
            value_type: None,
            required: false,
            default: None,
            description: command.description.clone(),
        });
    }

    summaries
}

/// [`describe`] for a target type, against its default instance.
pub fn describe_target<T: Target>() -> Result<Vec<ParameterSummary>, ValidationError> {
    let schema = T::schema()?;
    Ok(describe(&schema, &T::default()))
}

