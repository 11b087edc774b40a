//! The [`Parser`] entry points.

use argbind_core::{Schema, Separators};
use tracing::debug;

use crate::classify::{RawArguments, classify};
use crate::config::ParserConfig;
use crate::dispatch::Invocation;
use crate::dynamic::{DynamicTarget, InvokedCommand};
use crate::error::{ParseError, Result};
use crate::hooks::{HookRegistry, ParameterFormatter, ParameterValidator};
use crate::resolve::Resolver;
use crate::target::{Fields, Target, schema_of};
use crate::tokenizer::{TokenizeMode, split_argv, split_line};

/// Binds argument lists to targets.
///
/// A parser holds the separator and tokenizer settings plus the registered
/// validator and formatter hooks. It is immutable while parsing and can be
/// shared across threads.
///
/// # Examples
///
/// ```
/// use argbind::Parser;
/// use argbind_core::{OptionSpec, Schema, Separators, Value, ValueType};
///
/// let schema = Schema::new("tool")
///     .with_option(OptionSpec::new("level", ["l", "level"], ValueType::Int))
///     .build()
///     .unwrap();
///
/// let parser = Parser::new().with_separators(Separators::SPACE | Separators::EQUALS);
/// let bound = parser.parse_dynamic(&schema, &["--level=3"]).unwrap();
/// assert_eq!(bound.get("level"), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
    hooks: HookRegistry,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.config.separators = separators;
        self
    }

    pub fn with_tokenize_mode(mut self, mode: TokenizeMode) -> Self {
        self.config.tokenize_mode = mode;
        self
    }

    /// Registers a validator hook under `id`.
    pub fn with_validator(
        mut self,
        id: impl Into<String>,
        validator: impl ParameterValidator + 'static,
    ) -> Self {
        self.hooks.register_validator(id, validator);
        self
    }

    /// Registers a formatter hook under `id`.
    pub fn with_formatter(
        mut self,
        id: impl Into<String>,
        formatter: impl ParameterFormatter + 'static,
    ) -> Self {
        self.hooks.register_formatter(id, formatter);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Binds `args` to a fresh `T`.
    ///
    /// # Errors
    ///
    /// The first [`ParseError`] met while binding, including errors from
    /// nested commands.
    pub fn parse<T: Target, S: AsRef<str>>(&self, args: &[S]) -> Result<T> {
        let mut target = T::default();
        self.parse_into(&mut target, args)?;
        Ok(target)
    }

    /// Binds `args` to an existing `T`. Fields without a matching argument
    /// keep their values, except flags, which are always reassigned.
    pub fn parse_into<T: Target, S: AsRef<str>>(&self, target: &mut T, args: &[S]) -> Result<()> {
        let schema = schema_of::<T>()?;
        self.parse_with_schema(&schema, target, args)
    }

    /// Like [`parse_into`](Self::parse_into), with a schema the caller built
    /// (and may cache) beforehand.
    pub fn parse_with_schema<T: Target, S: AsRef<str>>(
        &self,
        schema: &Schema,
        target: &mut T,
        args: &[S],
    ) -> Result<()> {
        let defaults = T::default();
        self.run(schema, &defaults, target, args, |target, invocation| {
            target.dispatch(invocation)
        })
    }

    /// Splits `line` with the configured [`TokenizeMode`] and binds the tokens.
    pub fn parse_line<T: Target>(&self, line: &str) -> Result<T> {
        let tokens = split_line(line, self.config.tokenize_mode);
        self.parse(&tokens)
    }

    /// Binds a whole process command line. The line is split with
    /// [`TokenizeMode::Argv`] and its first token, the program path, is
    /// dropped.
    pub fn parse_command_line<T: Target>(&self, line: &str) -> Result<T> {
        let tokens = split_argv(line);
        self.parse(tokens.get(1..).unwrap_or_default())
    }

    /// Binds `args` against `schema` without a Rust target type.
    ///
    /// Every parameter with [`Requiredness::Default`](argbind_core::Requiredness)
    /// is required, since there are no defaults to consult; see
    /// [`parse_dynamic_with`](Self::parse_dynamic_with).
    pub fn parse_dynamic<S: AsRef<str>>(&self, schema: &Schema, args: &[S]) -> Result<DynamicTarget> {
        self.parse_dynamic_with(schema, &DynamicTarget::default(), args)
    }

    /// Binds `args` against `schema`, starting from (and consulting) `defaults`.
    ///
    /// A command whose spec carries a nested schema is bound recursively,
    /// starting from the command's own `defaults`; otherwise only its alias
    /// and remaining tokens are recorded.
    pub fn parse_dynamic_with<S: AsRef<str>>(
        &self,
        schema: &Schema,
        defaults: &DynamicTarget,
        args: &[S],
    ) -> Result<DynamicTarget> {
        let mut target = defaults.clone();
        self.run(schema, defaults, &mut target, args, |target, invocation| {
            let bound = match invocation.spec().schema.as_deref() {
                Some(nested) => {
                    let nested_defaults =
                        DynamicTarget::with_defaults(invocation.spec().defaults.clone());
                    let bound = self.parse_dynamic_with(nested, &nested_defaults, invocation.args())?;
                    Some(Box::new(bound))
                }
                None => None,
            };
            target.command = Some(InvokedCommand {
                field: invocation.field().to_string(),
                alias: invocation.alias().to_string(),
                args: invocation.args().to_vec(),
                bound,
            });
            Ok(())
        })?;
        Ok(target)
    }

    /// Classifies `args` against `schema`'s boolean keys and command names.
    pub fn classify<S: AsRef<str>>(&self, schema: &Schema, args: &[S]) -> RawArguments {
        classify(
            args,
            &schema.boolean_keys(),
            &schema.command_names(),
            self.config.separators,
        )
    }

    fn run<F, S, D>(
        &self,
        schema: &Schema,
        defaults: &dyn Fields,
        target: &mut F,
        args: &[S],
        dispatch: D,
    ) -> Result<()>
    where
        F: Fields,
        S: AsRef<str>,
        D: FnOnce(&mut F, Invocation<'_>) -> Result<()>,
    {
        debug!(schema = %schema.name, args = args.len(), "Binding arguments");
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let raw = self.classify(schema, &args);

        Resolver::new(schema, &self.hooks, defaults).bind(&raw, target)?;

        let Some(found) = &raw.command else {
            if schema.commands.is_empty() {
                return Ok(());
            }
            return Err(ParseError::CommandMissing {
                expected: schema.command_names().into_iter().map(String::from).collect(),
            });
        };
        let Some(spec) = schema.find_command(&found.name) else {
            return Ok(());
        };

        debug!(command = %found.name, field = %spec.field, "Dispatching command");
        let invocation = Invocation::new(self, spec, &found.name, &args[found.index + 1..]);
        dispatch(target, invocation)
    }
}
