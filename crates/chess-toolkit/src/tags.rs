//! PGN tag pairs.
//!
//! [`GameTags`] always holds the seven-tag roster (Event, Site, Date, Round,
//! White, Black, Result) and any number of extra keys. Output order is the
//! roster first, then the extra keys in the order they were first set.

use std::fmt;
use thiserror::Error;

/// The seven-tag roster, in output order.
pub const ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

const RESULT: usize = 6;

/// Values accepted for the `Result` tag.
pub const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("undefined tag key: {0}")]
    UndefinedKey(String),
    #[error("invalid tag key: {0:?}")]
    InvalidKey(String),
    #[error("invalid game result: {0:?}")]
    InvalidResult(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTags {
    roster: [String; 7],
    extra: Vec<(String, String)>,
}

impl GameTags {
    pub fn new() -> Self {
        GameTags {
            roster: ROSTER.map(|key| default_value(key).to_string()),
            extra: Vec::new(),
        }
    }

    /// Restores every roster default and forgets the extra keys.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Value for `key`. Roster keys always have one; extra keys only once set.
    pub fn get(&self, key: &str) -> Result<&str, TagError> {
        if let Some(index) = roster_index(key) {
            return Ok(&self.roster[index]);
        }
        self.extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| TagError::UndefinedKey(key.to_string()))
    }

    /// Stores `value` under `key`.
    ///
    /// Control characters in the value become spaces. An empty value on a
    /// roster key restores its default. `Result` only takes the four game
    /// termination markers.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), TagError> {
        if !is_valid_key(key) {
            return Err(TagError::InvalidKey(key.to_string()));
        }
        let value: String = value
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        match roster_index(key) {
            Some(RESULT) => {
                if !RESULTS.contains(&value.as_str()) {
                    return Err(TagError::InvalidResult(value));
                }
                self.roster[RESULT] = value;
            }
            Some(index) if value.is_empty() => self.roster[index] = default_value(key).to_string(),
            Some(index) => self.roster[index] = value,
            None => match self.extra.iter_mut().find(|(k, _)| k == key) {
                Some((_, slot)) => *slot = value,
                None => self.extra.push((key.to_string(), value)),
            },
        }
        Ok(())
    }

    /// Every tag in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        ROSTER
            .iter()
            .copied()
            .zip(self.roster.iter().map(String::as_str))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// The `[Key "Value"]` lines of a PGN header, one per tag.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Default for GameTags {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            f.write_str("[")?;
            f.write_str(key)?;
            f.write_str(" \"")?;
            for c in value.chars() {
                if c == '\\' || c == '"' {
                    f.write_str("\\")?;
                }
                write!(f, "{}", c)?;
            }
            f.write_str("\"]\n")?;
        }
        Ok(())
    }
}

fn roster_index(key: &str) -> Option<usize> {
    ROSTER.iter().position(|k| *k == key)
}

fn default_value(key: &str) -> &'static str {
    if key == ROSTER[RESULT] {
        "*"
    } else {
        "?"
    }
}

/// PGN symbol characters: letters, digits and `_ + # = : -`, starting with a
/// letter or digit.
pub(crate) fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || "_+#=:-".contains(c))
}
