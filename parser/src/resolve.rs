//! Binding classified arguments onto a target.
//!
//! Every raw value goes through the same pipeline: the parameter's regex (each
//! element separately for arrays), then its validator hook, then either its
//! formatter hook or type coercion. Options are bound first, then positional
//! slots, then the positional list.

use argbind_core::{Constraints, Requiredness, Schema, Value, ValueType};
use tracing::trace;

use crate::classify::RawArguments;
use crate::error::{ParseError, Result};
use crate::hooks::HookRegistry;
use crate::target::Fields;

/// The parts of an option or positional spec the pipeline needs.
struct Param<'s> {
    name: &'s str,
    field: &'s str,
    value_type: &'s ValueType,
    required: Requiredness,
    constraints: &'s Constraints,
}

pub(crate) struct Resolver<'a> {
    schema: &'a Schema,
    hooks: &'a HookRegistry,
    defaults: &'a dyn Fields,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(schema: &'a Schema, hooks: &'a HookRegistry, defaults: &'a dyn Fields) -> Self {
        Self {
            schema,
            hooks,
            defaults,
        }
    }

    /// Binds options, positionals and the positional list. Stops at the
    /// first error; fields assigned before it keep their new values.
    pub(crate) fn bind(&self, raw: &RawArguments, target: &mut dyn Fields) -> Result<()> {
        for option in &self.schema.options {
            if option.is_flag() {
                let set = option.keys().any(|key| raw.is_set(key));
                trace!(field = %option.field, set, "Binding flag");
                assign(target, &option.field, Value::Bool(set))?;
                continue;
            }

            let param = Param {
                name: option.display_name(),
                field: &option.field,
                value_type: &option.value_type,
                required: option.required,
                constraints: &option.constraints,
            };
            let found = raw.first_value(option.keys()).map(|(_, value)| value);
            self.bind_param(&param, found, target)?;
        }

        for positional in &self.schema.positionals {
            let param = Param {
                name: &positional.name,
                field: &positional.field,
                value_type: &positional.value_type,
                required: positional.required,
                constraints: &positional.constraints,
            };
            let found = raw.positionals.get(positional.index).map(String::as_str);
            self.bind_param(&param, found, target)?;
        }

        if let Some(list) = &self.schema.positional_list {
            let rest: Vec<&str> = raw
                .positionals
                .iter()
                .enumerate()
                .filter(|(i, _)| !self.schema.positionals.iter().any(|p| p.index == *i))
                .map(|(_, value)| value.as_str())
                .collect();
            trace!(field = %list.field, count = rest.len(), "Binding positional list");
            assign(target, &list.field, Value::strings(rest))?;
        }

        Ok(())
    }

    fn bind_param(&self, param: &Param<'_>, found: Option<&str>, target: &mut dyn Fields) -> Result<()> {
        match found {
            Some(raw) => {
                let value = self.resolve(param, raw)?;
                trace!(field = param.field, %value, "Binding value");
                assign(target, param.field, value)
            }
            None if self.is_required(param) => Err(ParseError::MissingRequiredParameter {
                name: param.name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn is_required(&self, param: &Param<'_>) -> bool {
        param
            .required
            .resolve(self.defaults.current(param.field).is_some())
    }

    fn resolve(&self, param: &Param<'_>, raw: &str) -> Result<Value> {
        let constraints = param.constraints;

        if let Some(pattern) = &constraints.pattern {
            let mismatch = if param.value_type.element().is_some() {
                raw.split(',').find(|element| !pattern.is_match(element))
            } else if pattern.is_match(raw) {
                None
            } else {
                Some(raw)
            };
            if let Some(value) = mismatch {
                return Err(ParseError::ParameterMatch {
                    name: param.name.to_string(),
                    value: value.to_string(),
                    pattern: pattern.to_string(),
                });
            }
        }

        if let Some(id) = &constraints.validator {
            let validator = self.hooks.validator(id, param.name)?;
            if !validator.validate(param.name, raw) {
                return Err(ParseError::ParameterValidation {
                    name: param.name.to_string(),
                    value: raw.to_string(),
                    validator: id.clone(),
                });
            }
        }

        if let Some(id) = &constraints.formatter {
            let formatter = self.hooks.formatter(id, param.name)?;
            return Ok(formatter.format(param.name, raw));
        }

        coerce(param.value_type, raw).map_err(|(value, expected)| ParseError::ParameterFormat {
            name: param.name.to_string(),
            value,
            expected,
        })
    }
}

fn assign(target: &mut dyn Fields, field: &str, value: Value) -> Result<()> {
    target
        .assign(field, value)
        .map_err(|source| ParseError::FieldRejected {
            field: field.to_string(),
            source,
        })
}

/// Converts a raw string to `value_type`.
///
/// Arrays split on `,` and convert each element. On failure returns the
/// offending text and the type it could not be converted to.
///
/// # Examples
///
/// ```
/// use argbind::coerce;
/// use argbind_core::{Value, ValueType};
///
/// assert_eq!(coerce(&ValueType::Int, "42"), Ok(Value::Int(42)));
/// assert_eq!(
///     coerce(&ValueType::array_of(ValueType::Int), "1,2"),
///     Ok(Value::Array(vec![Value::Int(1), Value::Int(2)]))
/// );
/// assert!(coerce(&ValueType::Int, "ab").is_err());
/// ```
pub fn coerce(value_type: &ValueType, raw: &str) -> std::result::Result<Value, (String, ValueType)> {
    if let ValueType::Array(element) = value_type {
        return raw
            .split(',')
            .map(|item| coerce(element, item))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    let text = raw.trim();
    let parsed = match value_type {
        ValueType::Bool => text.parse().ok().map(Value::Bool),
        ValueType::Int => text.parse().ok().map(Value::Int),
        ValueType::UInt => text.parse().ok().map(Value::UInt),
        ValueType::Long => text.parse().ok().map(Value::Long),
        ValueType::Float => text.parse().ok().map(Value::Float),
        ValueType::Double => text.parse().ok().map(Value::Double),
        ValueType::String => Some(Value::Str(raw.to_string())),
        ValueType::Array(_) => None,
    };
    parsed.ok_or_else(|| (raw.to_string(), value_type.clone()))
}
