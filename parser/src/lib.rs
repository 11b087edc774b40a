//! Declarative command-line argument binding.
//!
//! This crate binds argument lists to typed targets described by an
//! [`argbind_core::Schema`]. Parsing runs in three stages:
//!
//! 1. **Tokenize**: [`split_line`] turns a single line into tokens, either
//!    quote-delimited ([`TokenizeMode::Quoted`]) or following process
//!    command-line rules ([`TokenizeMode::Argv`]).
//! 2. **Classify**: [`classify`] sorts tokens into option values, flags,
//!    positional values and the first command name.
//! 3. **Resolve**: each spec's value is checked against its regex and
//!    validator hook, then formatted or coerced, and handed to the target's
//!    [`Fields::assign`]. A command found in stage 2 is then routed through
//!    [`Target::dispatch`].
//!
//! # Main entry points
//!
//! - [`Parser::parse`] / [`Parser::parse_into`] bind a token list to a
//!   [`Target`].
//! - [`Parser::parse_line`] and [`Parser::parse_command_line`] tokenize first.
//! - [`Parser::parse_dynamic`] binds against a schema alone, producing a
//!   [`DynamicTarget`].
//! - [`BindingDocument::load`] reads a schema and parser settings from YAML
//!   or JSON.
//!
//! # Example
//!
//! ```
//! use argbind::{Fields, Parser, Target};
//! use argbind_core::*;
//!
//! #[derive(Default)]
//! struct Basic {
//!     row: i32,
//!     force: bool,
//!     files: Vec<String>,
//! }
//!
//! impl Fields for Basic {
//!     fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
//!         match field {
//!             "row" => self.row = value.try_into()?,
//!             "force" => self.force = value.try_into()?,
//!             "files" => self.files = value.try_into()?,
//!             other => return Err(FieldError::Unknown(other.to_string())),
//!         }
//!         Ok(())
//!     }
//!
//!     fn current(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "row" => Some(Value::Int(self.row)),
//!             "force" => Some(Value::Bool(self.force)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Target for Basic {
//!     fn schema() -> Result<Schema, ValidationError> {
//!         Schema::new("basic")
//!             .with_option(OptionSpec::new("row", ["r", "row"], ValueType::Int))
//!             .with_option(OptionSpec::flag("force", ["f", "force"]))
//!             .with_positional_list(PositionalListSpec::new("files"))
//!             .build()
//!     }
//! }
//!
//! let basic: Basic = Parser::new().parse_line("-f --row 3 a.txt 'b c.txt'").unwrap();
//! assert_eq!(basic.row, 3);
//! assert!(basic.force);
//! assert_eq!(basic.files, vec!["a.txt", "b c.txt"]);
//! ```

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod dynamic;
pub mod error;
pub mod hooks;
mod parser;
pub mod prompt;
mod resolve;
pub mod target;
pub mod tokenizer;
pub mod usage;

pub use classify::{CommandMatch, RawArguments, classify};
pub use config::ParserConfig;
pub use dispatch::{CommandField, Invocation, Subcommand};
pub use document::BindingDocument;
pub use dynamic::{DynamicTarget, InvokedCommand};
pub use error::{DocumentError, ParseError, PromptError, Result};
pub use hooks::{HookRegistry, ParameterFormatter, ParameterValidator};
pub use parser::Parser;
pub use prompt::LinePrompt;
pub use resolve::coerce;
pub use target::{Fields, Target, schema_of};
pub use tokenizer::{TokenizeMode, split_argv, split_line, split_quoted};
pub use usage::{ParameterKind, ParameterSummary, describe, describe_target};
