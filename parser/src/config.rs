//! Parser settings.

use argbind_core::Separators;
use serde::{Deserialize, Serialize};

use crate::tokenizer::TokenizeMode;

/// Settings shared by every parse made with one [`Parser`](crate::Parser).
///
/// # Example YAML
///
/// ```yaml
/// separators: [space, equals]
/// tokenize_mode: quoted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// How an option name and its value may be joined.
    #[serde(default)]
    pub separators: Separators,
    /// Tokenizer used by [`Parser::parse_line`](crate::Parser::parse_line).
    #[serde(default)]
    pub tokenize_mode: TokenizeMode,
}

impl ParserConfig {
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_tokenize_mode(mut self, mode: TokenizeMode) -> Self {
        self.tokenize_mode = mode;
        self
    }
}
