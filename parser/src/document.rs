//! Binding documents: a schema plus parser settings, loaded from YAML or JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! parser:
//!   separators: [space, equals]
//! defaults:
//!   row: 0
//! schema:
//!   name: basic
//!   options:
//!     - field: row
//!       names: [r, row]
//!       value_type: int
//!     - field: force
//!       names: [f, for-sure]
//!       value_type: bool
//!   positionals:
//!     - field: positional
//!       index: 0
//!       name: positional
//!       value_type: double
//!       required: "no"
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use argbind_core::{Schema, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Parser;
use crate::config::ParserConfig;
use crate::dynamic::DynamicTarget;
use crate::error::DocumentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingDocument {
    #[serde(default)]
    pub parser: ParserConfig,
    /// Field values parameters fall back to; a parameter with a default
    /// here is optional unless declared `required: yes`. Nested command
    /// schemas take theirs from the command's own `defaults`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Value>,
    pub schema: Schema,
}

impl BindingDocument {
    /// Loads a document, choosing JSON for a `.json` extension and YAML
    /// otherwise, and builds its schema.
    ///
    /// # Errors
    ///
    /// [`IoError`](DocumentError::IoError) when the file cannot be read,
    /// [`JsonError`](DocumentError::JsonError) or
    /// [`YamlError`](DocumentError::YamlError) when it does not parse, and
    /// [`InvalidSchema`](DocumentError::InvalidSchema) when the schema does
    /// not build, and [`InvalidDefault`](DocumentError::InvalidDefault) when a
    /// default does not fit its field's declared type.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let document: BindingDocument = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(path = %path.display(), schema = %document.schema.name, "Loaded binding document");
        document.built()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        let document: BindingDocument = serde_yaml::from_str(text)?;
        document.built()
    }

    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let document: BindingDocument = serde_json::from_str(text)?;
        document.built()
    }

    fn built(mut self) -> Result<Self, DocumentError> {
        self.schema = self.schema.build()?;
        conform_defaults(&mut self.defaults, &self.schema)?;
        conform_command_defaults(&mut self.schema)?;
        Ok(self)
    }

    /// A parser configured with the document's settings.
    pub fn parser(&self) -> Parser {
        Parser::new().with_config(self.parser)
    }

    /// The document's defaults as a starting target.
    pub fn defaults(&self) -> DynamicTarget {
        DynamicTarget::with_defaults(self.defaults.clone())
    }

    /// Binds `args` against the document's schema and defaults.
    pub fn bind<S: AsRef<str>>(&self, args: &[S]) -> crate::Result<DynamicTarget> {
        self.parser()
            .parse_dynamic_with(&self.schema, &self.defaults(), args)
    }
}

/// Settles each default on its field's declared type, so a document's
/// `0.5` becomes a `float` or `double` as the schema says. Keys that name no
/// field are kept as written.
fn conform_defaults(
    defaults: &mut BTreeMap<String, Value>,
    schema: &Schema,
) -> Result<(), DocumentError> {
    for (field, value) in defaults.iter_mut() {
        let Some(value_type) = schema.field_type(field) else {
            debug!(field = %field, schema = %schema.name, "Default names no declared field");
            continue;
        };
        *value = value
            .clone()
            .conform(&value_type)
            .map_err(|source| DocumentError::InvalidDefault {
                field: field.clone(),
                source,
            })?;
    }
    Ok(())
}

fn conform_command_defaults(schema: &mut Schema) -> Result<(), DocumentError> {
    for command in &mut schema.commands {
        if let Some(nested) = command.schema.as_deref_mut() {
            conform_defaults(&mut command.defaults, nested)?;
            conform_command_defaults(nested)?;
        }
    }
    Ok(())
}
