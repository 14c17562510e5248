//! Exercise chart entries.

use serde::{Deserialize, Serialize};

/// A single prescribed exercise. All dosage fields are free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    /// Identifier, unique within the owning patient
    pub id: String,
    pub name: String,
    pub sets: String,
    pub reps: String,
    /// Duration or hold (e.g. "5s hold", "-")
    pub duration: String,
    pub notes: String,
}

impl Exercise {
    /// Create a new exercise with a generated identifier.
    pub fn new(name: String, sets: String, reps: String, duration: String, notes: String) -> Self {
        Self {
            id: format!("ex-{}", uuid::Uuid::new_v4().simple()),
            name,
            sets,
            reps,
            duration,
            notes,
        }
    }
}
