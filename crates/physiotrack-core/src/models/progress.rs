//! Progress log models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a progress entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Author {
    /// Entered from the clinician detail view
    Doctor,
    /// Submitted through the public patient link
    Patient,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Doctor => f.write_str("Doctor"),
            Author::Patient => f.write_str("Patient"),
        }
    }
}

impl FromStr for Author {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Doctor" => Ok(Author::Doctor),
            "Patient" => Ok(Author::Patient),
            _ => Err(format!("unknown author: {}", s)),
        }
    }
}

/// Self-reported pain on a 0-10 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct PainLevel(u8);

impl PainLevel {
    pub const MAX: u8 = 10;

    /// Returns `None` when the value is above 10.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for PainLevel {
    /// The slider's starting position.
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for PainLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("pain level {} is outside 0-{}", value, Self::MAX))
    }
}

impl From<PainLevel> for u8 {
    fn from(level: PainLevel) -> Self {
        level.0
    }
}

impl fmt::Display for PainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// An immutable progress record. Never edited or removed once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub id: String,
    /// Creation timestamp (ISO-8601)
    pub date: String,
    pub pain_level: PainLevel,
    pub completed: bool,
    pub notes: String,
    pub author: Author,
}

impl ProgressLog {
    /// Stamp an entry with a fresh id, the current time and its author.
    pub fn from_entry(entry: ProgressEntry, author: Author) -> Self {
        Self {
            id: format!("p-{}", uuid::Uuid::new_v4()),
            date: super::now_timestamp(),
            pain_level: entry.pain_level,
            completed: entry.completed,
            notes: entry.notes,
            author,
        }
    }

    /// Parsed timestamp, `None` if the stored string is not a recognised date.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        super::parse_timestamp(&self.date)
    }
}

/// The submitted part of a progress log, before it is stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressEntry {
    pub pain_level: PainLevel,
    pub completed: bool,
    pub notes: String,
}

impl ProgressEntry {
    pub fn new(pain_level: PainLevel, completed: bool, notes: String) -> Self {
        Self {
            pain_level,
            completed,
            notes,
        }
    }

    /// Submission forms require notes or a completed mark before appending.
    pub fn validate(&self) -> Result<(), crate::store::StoreError> {
        if self.notes.is_empty() && !self.completed {
            return Err(crate::store::StoreError::EmptySubmission);
        }
        Ok(())
    }
}
