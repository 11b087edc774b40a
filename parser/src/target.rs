//! Capabilities a bindable type exposes to the resolver.
//!
//! The resolver never touches a target's storage directly. It calls
//! [`Fields::assign`] with a field key from the schema, and reads
//! [`Fields::current`] on a default instance to decide requiredness.

use argbind_core::{FieldError, Schema, ValidationError, Value};

use crate::dispatch::Invocation;
use crate::error::{ParseError, Result};

/// Keyed setter/getter access to a target's fields.
pub trait Fields {
    /// Stores `value` in the field bound to `field`.
    ///
    /// # Errors
    ///
    /// [`FieldError::Unknown`] for a key the target does not have and
    /// [`FieldError::Mismatch`] for a value of the wrong shape.
    fn assign(&mut self, field: &str, value: Value) -> std::result::Result<(), FieldError>;

    /// The field's current value, `None` when it holds nothing.
    fn current(&self, field: &str) -> Option<Value>;
}

/// A type arguments can be bound to.
///
/// # Examples
///
/// ```
/// use argbind::{Fields, Parser, Target};
/// use argbind_core::*;
///
/// #[derive(Default)]
/// struct Greet {
///     name: Option<String>,
///     loud: bool,
/// }
///
/// impl Fields for Greet {
///     fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
///         match field {
///             "name" => self.name = Some(value.try_into()?),
///             "loud" => self.loud = value.try_into()?,
///             other => return Err(FieldError::Unknown(other.to_string())),
///         }
///         Ok(())
///     }
///
///     fn current(&self, field: &str) -> Option<Value> {
///         match field {
///             "name" => self.name.clone().map(Value::from),
///             "loud" => Some(Value::Bool(self.loud)),
///             _ => None,
///         }
///     }
/// }
///
/// impl Target for Greet {
///     fn schema() -> Result<Schema, ValidationError> {
///         Schema::new("greet")
///             .with_option(OptionSpec::new("name", ["n", "name"], ValueType::String))
///             .with_option(OptionSpec::flag("loud", ["l", "loud"]))
///             .build()
///     }
/// }
///
/// let greet: Greet = Parser::new().parse(&["--name", "Ada", "-l"]).unwrap();
/// assert_eq!(greet.name.as_deref(), Some("Ada"));
/// assert!(greet.loud);
/// ```
pub trait Target: Fields + Default {
    /// The binding schema for this type.
    fn schema() -> std::result::Result<Schema, ValidationError>;

    /// Routes a command found on the command line to the matching field.
    ///
    /// The default rejects every command; targets that declare commands
    /// match on [`Invocation::field`] and call [`Invocation::bind`].
    fn dispatch(&mut self, invocation: Invocation<'_>) -> Result<()> {
        Err(invocation.unhandled())
    }
}

/// Binding schema of `T`, with schema errors lifted into [`ParseError`].
pub fn schema_of<T: Target>() -> Result<Schema> {
    T::schema().map_err(ParseError::from)
}
