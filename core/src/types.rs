//! Schema type definitions for declarative argument binding.
//!
//! A [`Schema`] describes every bindable field of one target type: named
//! options ([`OptionSpec`]), positional slots ([`PositionalSpec`]), an optional
//! catch-all list ([`PositionalListSpec`]) and nested subcommands
//! ([`CommandSpec`]). Every spec carries a `field` key, which is how the
//! binding engine addresses the target's setter; the schema never touches
//! field storage itself.
//!
//! Schemas are plain data: they serialize with [`serde`] so the same model can
//! be declared in Rust or loaded from a JSON/YAML document.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validate::{ValidationError, normalize_name, validate_schema};
use crate::value::{Value, ValueType};

/// Requiredness mode of a parameter.
///
/// `Default` defers to the target's freshly constructed default instance: the
/// parameter is required exactly when that instance holds no value for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    /// Always required.
    Yes,
    /// Never required.
    No,
    /// Required when the default instance leaves the field unset.
    #[default]
    Default,
}

impl Requiredness {
    /// Resolves the mode against whether the default instance holds a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::Requiredness;
    ///
    /// assert!(Requiredness::Yes.resolve(true));
    /// assert!(!Requiredness::No.resolve(false));
    /// assert!(Requiredness::Default.resolve(false));
    /// assert!(!Requiredness::Default.resolve(true));
    /// ```
    pub fn resolve(self, default_has_value: bool) -> bool {
        match self {
            Requiredness::Yes => true,
            Requiredness::No => false,
            Requiredness::Default => !default_has_value,
        }
    }
}

/// A compiled regex constraint that serializes as its source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles a pattern. Matching is unanchored, like a regex search.
    pub fn new(source: &str) -> Result<Self, ValidationError> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|err| ValidationError::InvalidPattern(err.to_string()))
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Hooks and constraints applied to a raw value before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Regex every raw value (or every array element) must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    /// Identifier of a registered validator hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Identifier of a registered formatter hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

/// Schema for a named option (`-x`, `--xyz`).
///
/// Names are normalized by [`Schema::build`]: `"v"` becomes `"-v"` and
/// `"verbose"` becomes `"--verbose"`. The first declared name is the display
/// name used in error messages.
///
/// # Examples
///
/// ```
/// use argbind_core::{OptionSpec, Requiredness, ValueType};
///
/// let row = OptionSpec::new("row", ["r", "row"], ValueType::Int)
///     .with_description("Row to start from")
///     .with_required(Requiredness::No);
/// assert_eq!(row.display_name(), "r");
/// assert!(!row.is_flag());
///
/// let force = OptionSpec::flag("force", ["-f", "--force"]);
/// assert!(force.is_flag());
/// assert_eq!(force.keys().collect::<Vec<_>>(), vec!["f", "force"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Binding key passed to the target's setter.
    pub field: String,
    /// Option names, case-sensitive, in declaration order.
    pub names: Vec<String>,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub required: Requiredness,
    #[serde(flatten)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionSpec {
    /// Creates an option bound to `field`.
    pub fn new<I, S>(field: &str, names: I, value_type: ValueType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.to_string(),
            names: names.into_iter().map(Into::into).collect(),
            value_type,
            required: Requiredness::Default,
            constraints: Constraints::default(),
            description: None,
        }
    }

    /// Creates a boolean presence flag.
    pub fn flag<I, S>(field: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(field, names, ValueType::Bool)
    }

    pub fn with_required(mut self, required: Requiredness) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    pub fn with_validator(mut self, id: &str) -> Self {
        self.constraints.validator = Some(id.to_string());
        self
    }

    pub fn with_formatter(mut self, id: &str) -> Self {
        self.constraints.formatter = Some(id.to_string());
        self
    }

    pub fn is_flag(&self) -> bool {
        self.value_type.is_bool()
    }

    /// First declared name.
    pub fn display_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("unknown")
    }

    /// Names with their leading dashes stripped, as the classifier records them.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| option_key(name))
    }

    /// Checks whether `name` (with or without dashes) is one of this option's names.
    pub fn matches(&self, name: &str) -> bool {
        let key = option_key(name);
        self.keys().any(|k| k == key)
    }
}

/// Schema for a positional slot.
///
/// # Examples
///
/// ```
/// use argbind_core::{PositionalSpec, ValueType};
///
/// let target = PositionalSpec::new("host", 1, "target", ValueType::String)
///     .with_description("The host to connect to.");
/// assert_eq!(target.index, 1);
/// assert_eq!(target.name, "target");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalSpec {
    /// Binding key passed to the target's setter.
    pub field: String,
    /// Zero-based position among the non-option tokens.
    pub index: usize,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub required: Requiredness,
    #[serde(flatten)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PositionalSpec {
    pub fn new(field: &str, index: usize, name: &str, value_type: ValueType) -> Self {
        Self {
            field: field.to_string(),
            index,
            name: name.to_string(),
            value_type,
            required: Requiredness::Default,
            constraints: Constraints::default(),
            description: None,
        }
    }

    pub fn with_required(mut self, required: Requiredness) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    pub fn with_validator(mut self, id: &str) -> Self {
        self.constraints.validator = Some(id.to_string());
        self
    }

    pub fn with_formatter(mut self, id: &str) -> Self {
        self.constraints.formatter = Some(id.to_string());
        self
    }
}

/// Field that collects every positional value no [`PositionalSpec`] claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalListSpec {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PositionalListSpec {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            description: None,
        }
    }
}

/// Schema for a nested subcommand field.
///
/// # Examples
///
/// ```
/// use argbind_core::CommandSpec;
///
/// let push = CommandSpec::new("push", ["push", "p"]).with_description("Upload refs");
/// assert!(push.matches("p"));
/// assert!(!push.matches("pull"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Binding key routed to the target's dispatcher.
    pub field: String,
    /// Alias names that activate this command.
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema of the nested command, for schema-driven parsing without a
    /// Rust target type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<Schema>>,
    /// Field values the nested schema's parameters fall back to. Only
    /// schema-driven parsing reads these; typed targets use their own
    /// `Default`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Value>,
}

impl CommandSpec {
    pub fn new<I, S>(field: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.to_string(),
            names: names.into_iter().map(Into::into).collect(),
            description: None,
            schema: None,
            defaults: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    pub fn with_default(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(field.to_string(), value.into());
        self
    }

    pub fn matches(&self, token: &str) -> bool {
        self.names.iter().any(|name| name == token)
    }
}

/// Complete binding schema for one target type.
///
/// Build one with the `with_*` methods and finish with [`Schema::build`],
/// which normalizes option names and rejects structurally invalid schemas.
/// A built schema is immutable and may be shared across parses.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// let schema = Schema::new("basic")
///     .with_option(OptionSpec::new("row", ["r", "row"], ValueType::Int))
///     .with_option(OptionSpec::flag("flag", ["f", "for-sure"]))
///     .with_positional(PositionalSpec::new("positional", 0, "positional", ValueType::Double))
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.options[0].names, vec!["-r", "--row"]);
/// assert!(schema.boolean_keys().contains("for-sure"));
/// assert!(schema.find_option("--row").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Name of the target type, informational.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub positionals: Vec<PositionalSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positional_list: Option<PositionalListSpec>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

impl Schema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_positional(mut self, positional: PositionalSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    pub fn with_positional_list(mut self, list: PositionalListSpec) -> Self {
        self.positional_list = Some(list);
        self
    }

    pub fn with_command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    /// Normalizes option names and validates the schema, nested command
    /// schemas included.
    ///
    /// Returns the first structural problem found. Building an already built
    /// schema is a no-op.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidParameterName`] for a malformed option name,
    /// and the other [`ValidationError`] variants for duplicates or empty keys.
    pub fn build(mut self) -> Result<Self, ValidationError> {
        for option in &mut self.options {
            option.names = option
                .names
                .iter()
                .map(|name| normalize_name(name))
                .collect::<Result<_, _>>()?;
        }
        if let Some(err) = validate_schema(&self).into_iter().next() {
            return Err(err);
        }
        for command in &mut self.commands {
            if let Some(nested) = command.schema.take() {
                command.schema = Some(Box::new((*nested).build()?));
            }
        }
        Ok(self)
    }

    /// Keys (dash-stripped names) of every boolean option.
    pub fn boolean_keys(&self) -> HashSet<&str> {
        self.options
            .iter()
            .filter(|o| o.is_flag())
            .flat_map(|o| o.keys())
            .collect()
    }

    /// All command aliases, in declaration order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .flat_map(|c| c.names.iter().map(String::as_str))
            .collect()
    }

    /// Finds a command by any of its aliases.
    pub fn find_command(&self, alias: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.matches(alias))
    }

    /// Finds an option by any of its names, with or without dashes.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Declared type of the value bound to `field`. The positional list is
    /// an array of strings; command fields have no value type.
    pub fn field_type(&self, field: &str) -> Option<ValueType> {
        if let Some(option) = self.options.iter().find(|o| o.field == field) {
            return Some(option.value_type.clone());
        }
        if let Some(positional) = self.positionals.iter().find(|p| p.field == field) {
            return Some(positional.value_type.clone());
        }
        self.positional_list
            .as_ref()
            .filter(|list| list.field == field)
            .map(|_| ValueType::array_of(ValueType::String))
    }

    /// Positional slots ordered by index.
    pub fn positionals_by_index(&self) -> Vec<&PositionalSpec> {
        let mut slots: Vec<&PositionalSpec> = self.positionals.iter().collect();
        slots.sort_by_key(|p| p.index);
        slots
    }
}

/// Strips the leading dashes of an option name (`--row` -> `row`).
pub fn option_key(name: &str) -> &str {
    name.trim_start_matches('-')
}
