//! Key/value separator configuration.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// One way of attaching a value to an option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// `--key value`
    Space,
    /// `--key=value`
    Equals,
    /// `--key:value`
    Colon,
}

impl Separator {
    const fn bit(self) -> u8 {
        match self {
            Separator::Space => 1 << 0,
            Separator::Equals => 1 << 1,
            Separator::Colon => 1 << 2,
        }
    }

    /// The character that joins key and value in the embedded form.
    pub fn embedded_char(self) -> Option<char> {
        match self {
            Separator::Space => None,
            Separator::Equals => Some('='),
            Separator::Colon => Some(':'),
        }
    }
}

/// Combinable set of enabled [`Separator`]s. Defaults to [`Separators::SPACE`].
///
/// # Examples
///
/// ```
/// use argbind_core::{Separator, Separators};
///
/// let seps = Separators::SPACE | Separators::EQUALS;
/// assert!(seps.contains(Separator::Equals));
/// assert!(!seps.contains(Separator::Colon));
/// assert_eq!(Separators::default(), Separators::SPACE);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Separator>", into = "Vec<Separator>")]
pub struct Separators(u8);

impl Separators {
    pub const NONE: Separators = Separators(0);
    pub const SPACE: Separators = Separators(Separator::Space.bit());
    pub const EQUALS: Separators = Separators(Separator::Equals.bit());
    pub const COLON: Separators = Separators(Separator::Colon.bit());
    pub const ALL: Separators = Separators(
        Separator::Space.bit() | Separator::Equals.bit() | Separator::Colon.bit(),
    );

    pub fn contains(self, separator: Separator) -> bool {
        self.0 & separator.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Enabled separators in `Space`, `Equals`, `Colon` order.
    pub fn iter(self) -> impl Iterator<Item = Separator> {
        [Separator::Space, Separator::Equals, Separator::Colon]
            .into_iter()
            .filter(move |s| self.contains(*s))
    }
}

impl Default for Separators {
    fn default() -> Self {
        Separators::SPACE
    }
}

impl From<Separator> for Separators {
    fn from(separator: Separator) -> Self {
        Separators(separator.bit())
    }
}

impl FromIterator<Separator> for Separators {
    fn from_iter<I: IntoIterator<Item = Separator>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Separators::NONE, |acc, s| acc | Separators::from(s))
    }
}

impl From<Vec<Separator>> for Separators {
    fn from(list: Vec<Separator>) -> Self {
        list.into_iter().collect()
    }
}

impl From<Separators> for Vec<Separator> {
    fn from(set: Separators) -> Self {
        set.iter().collect()
    }
}

impl BitOr for Separators {
    type Output = Separators;

    fn bitor(self, rhs: Separators) -> Separators {
        Separators(self.0 | rhs.0)
    }
}

impl BitOrAssign for Separators {
    fn bitor_assign(&mut self, rhs: Separators) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Separators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
