//! Schema and value model for declarative argument binding.
//!
//! This crate defines the data a binding engine needs to know about a target
//! type, without knowing how that type stores its fields:
//!
//! - [`Schema`]: every bindable field of one target type.
//! - [`OptionSpec`]: a named option (`-x`, `--xyz`) with its value type,
//!   requiredness, regex constraint and hook identifiers.
//! - [`PositionalSpec`] / [`PositionalListSpec`]: positional slots and the
//!   catch-all remainder list.
//! - [`CommandSpec`]: aliases that activate a nested subcommand type.
//! - [`Value`] / [`ValueType`]: coerced values and declared types.
//! - [`Separators`]: which `key value` / `key=value` / `key:value` forms are
//!   enabled.
//!
//! [`Schema::build`] normalizes option names and runs [`validate_schema`],
//! which reports problems such as malformed names or duplicate positional
//! indices before any argument is parsed.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let schema = Schema::new("git")
//!     .with_option(OptionSpec::flag("verbose", ["v", "verbose"]).with_description("Verbose output"))
//!     .with_command(CommandSpec::new("push", ["push"]))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.options[0].names, vec!["-v", "--verbose"]);
//! assert_eq!(schema.command_names(), vec!["push"]);
//! assert!(validate_schema(&schema).is_empty());
//! ```

mod separators;
mod types;
mod validate;
mod value;

pub use separators::{Separator, Separators};
pub use types::*;
pub use validate::{ValidationError, is_normalized_name, normalize_name, validate_schema};
pub use value::{FieldError, Value, ValueError, ValueType};
