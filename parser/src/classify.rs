//! Raw classification of argument tokens.
//!
//! Turns a token list into [`RawArguments`] without looking at value types
//! beyond the set of boolean keys: embedded `--key=value` pairs, named
//! options that may consume the following token, combined short flags, the
//! first command name, and everything else as positional values.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

use argbind_core::{Separator, Separators, option_key};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(-[A-Za-z0-9_]|--[A-Za-z0-9_-]{2,})([=:])(.*)$")
        .expect("valid embedded pair regex")
});
static NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-[A-Za-z0-9_]|--[A-Za-z0-9_-]{2,})$").expect("valid named option regex")
});
static COMBINED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-[A-Za-z0-9_]{2,}$").expect("valid combined flags regex"));

/// The command token found during classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandMatch {
    /// Alias as it appeared on the command line.
    pub name: String,
    /// Index of the command token in the classified list.
    pub index: usize,
}

/// Untyped view of a token list.
///
/// Keys are option names with their leading dashes stripped. When a key is
/// given more than once, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawArguments {
    pub pairs: BTreeMap<String, String>,
    pub flags: BTreeSet<String>,
    pub positionals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandMatch>,
}

impl RawArguments {
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// First key (in the given order) that has a recorded value.
    pub fn first_value<'a, I>(&self, keys: I) -> Option<(&'a str, &str)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .find_map(|key| self.value(key).map(|value| (key, value)))
    }

    /// A key is set when it appeared as a flag or carried a value.
    pub fn is_set(&self, key: &str) -> bool {
        self.flags.contains(key) || self.pairs.contains_key(key)
    }

    fn insert_pair(&mut self, key: &str, value: &str) {
        self.pairs
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
}

/// Classifies `args`.
///
/// `boolean_keys` are dash-stripped option names that never take a value.
/// Classification stops at the first token equal to one of `command_names`;
/// the tokens after it belong to the subcommand.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use argbind::classify;
/// use argbind_core::Separators;
///
/// let booleans: HashSet<&str> = ["f"].into_iter().collect();
/// let raw = classify(&["-f", "--row", "5", "file.txt"], &booleans, &[], Separators::SPACE);
///
/// assert!(raw.flags.contains("f"));
/// assert_eq!(raw.value("row"), Some("5"));
/// assert_eq!(raw.positionals, vec!["file.txt"]);
/// ```
pub fn classify<S: AsRef<str>>(
    args: &[S],
    boolean_keys: &HashSet<&str>,
    command_names: &[&str],
    separators: Separators,
) -> RawArguments {
    let mut raw = RawArguments::default();
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_ref();

        if arg.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some((key, value)) = embedded_pair(arg, separators) {
            trace!(key, value, "Embedded pair");
            raw.insert_pair(key, value);
        } else if NAMED.is_match(arg) {
            let key = option_key(arg);
            let next = args.get(i + 1).map(AsRef::as_ref);
            let consumes = !boolean_keys.contains(key)
                && separators.contains(Separator::Space)
                && next.is_some_and(takes_as_value);
            match next {
                Some(value) if consumes => {
                    trace!(key, value, "Named option with value");
                    raw.insert_pair(key, value);
                    i += 1;
                }
                _ => {
                    trace!(key, "Flag");
                    raw.flags.insert(key.to_string());
                }
            }
        } else if COMBINED.is_match(arg) {
            trace!(flags = &arg[1..], "Combined flags");
            raw.flags.extend(arg[1..].chars().map(String::from));
        } else if command_names.contains(&arg) {
            debug!(command = arg, index = i, "Found command");
            raw.command = Some(CommandMatch {
                name: arg.to_string(),
                index: i,
            });
            break;
        } else {
            raw.positionals.push(arg.to_string());
        }
        i += 1;
    }

    debug!(
        pairs = raw.pairs.len(),
        flags = raw.flags.len(),
        positionals = raw.positionals.len(),
        command = raw.command.as_ref().map(|c| c.name.as_str()),
        "Classified arguments"
    );
    raw
}

fn embedded_pair(arg: &str, separators: Separators) -> Option<(&str, &str)> {
    let caps = EMBEDDED.captures(arg)?;
    let sep = caps.get(2)?.as_str().chars().next()?;
    let enabled = separators
        .iter()
        .any(|s| s.embedded_char() == Some(sep));
    if !enabled {
        return None;
    }
    let key = option_key(caps.get(1)?.as_str());
    Some((key, caps.get(3)?.as_str()))
}

/// A following token is a value unless it looks like an option; negative
/// integers count as values.
fn takes_as_value(next: &str) -> bool {
    !next.starts_with('-') || next.parse::<i64>().is_ok()
}
