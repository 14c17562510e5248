//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Exercise, ProgressLog};

/// Treatment status of a patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Recovered")]
    Recovered,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl PatientStatus {
    /// All statuses, in the order the edit form lists them.
    pub const ALL: [PatientStatus; 3] = [
        PatientStatus::InProgress,
        PatientStatus::Recovered,
        PatientStatus::OnHold,
    ];

    /// Display label, also used in CSV rows and for status sorting.
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::InProgress => "In Progress",
            PatientStatus::Recovered => "Recovered",
            PatientStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PatientStatus {
    type Err = String;

    /// Accepts the exact label or a loose spelling ("in-progress", "on_hold").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(status) = Self::ALL.iter().find(|st| st.label() == s) {
            return Ok(*status);
        }
        let loose: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match loose.as_str() {
            "inprogress" => Ok(PatientStatus::InProgress),
            "recovered" => Ok(PatientStatus::Recovered),
            "onhold" => Ok(PatientStatus::OnHold),
            _ => Err(format!("unknown patient status: {}", s)),
        }
    }
}

/// A patient on the clinic roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Opaque identifier, immutable once created
    pub id: String,
    /// Patient name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Creation timestamp (ISO-8601)
    pub date_added: String,
    /// Treatment status
    pub status: PatientStatus,
    /// Free-text tags, in display order
    pub tags: Vec<String>,
    /// Prescribed exercise chart
    pub exercises: Vec<Exercise>,
    /// Append-only progress history
    pub progress: Vec<ProgressLog>,
}

impl Patient {
    /// Create a new patient with a generated identifier.
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: generate_patient_id(),
            name,
            email,
            date_added: super::now_timestamp(),
            status: PatientStatus::InProgress,
            tags: Vec::new(),
            exercises: Vec::new(),
            progress: Vec::new(),
        }
    }

    /// The placeholder record created by the "add patient" action.
    pub fn new_blank() -> Self {
        Self::new("New Patient".into(), String::new())
    }

    /// Check whether a tag is present (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Append an exercise to the chart.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.exercises.push(exercise);
    }

    /// Remove an exercise by id. Returns whether anything was removed.
    pub fn remove_exercise(&mut self, exercise_id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != exercise_id);
        self.exercises.len() != before
    }

    /// Replace an exercise with the same id. Returns whether it was found.
    pub fn update_exercise(&mut self, exercise: Exercise) -> bool {
        match self.exercises.iter_mut().find(|e| e.id == exercise.id) {
            Some(slot) => {
                *slot = exercise;
                true
            }
            None => false,
        }
    }

    /// Progress history ordered newest first, for display.
    pub fn progress_newest_first(&self) -> Vec<&ProgressLog> {
        let mut logs: Vec<&ProgressLog> = self.progress.iter().collect();
        logs.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        logs
    }
}

/// Generate a patient identifier of the form `PID-xxxxxxxxx`.
pub fn generate_patient_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("PID-{}", &raw[..9])
}

/// Split a comma separated tag list as typed into the edit form.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, PainLevel};

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Jane Smith".into(), "jane@example.com".into());
        assert_eq!(patient.name, "Jane Smith");
        assert_eq!(patient.status, PatientStatus::InProgress);
        assert!(patient.id.starts_with("PID-"));
        assert_eq!(patient.id.len(), 13);
        assert!(patient.tags.is_empty());
    }

    #[test]
    fn test_blank_patient() {
        let patient = Patient::new_blank();
        assert_eq!(patient.name, "New Patient");
        assert_eq!(patient.email, "");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PatientStatus::OnHold.to_string(), "On Hold");
        assert_eq!("In Progress".parse::<PatientStatus>(), Ok(PatientStatus::InProgress));
        assert_eq!("on-hold".parse::<PatientStatus>(), Ok(PatientStatus::OnHold));
        assert!("Discharged".parse::<PatientStatus>().is_err());
    }

    #[test]
    fn test_json_shape() {
        let mut patient = Patient::new("Max".into(), "max@example.com".into());
        patient.status = PatientStatus::OnHold;
        let json = serde_json::to_string(&patient).unwrap();
        assert!(json.contains("\"dateAdded\""));
        assert!(json.contains("\"status\":\"On Hold\""));
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(
            parse_tag_list("Neck Pain, Posture Correction ,,"),
            vec!["Neck Pain".to_string(), "Posture Correction".to_string()]
        );
        assert!(parse_tag_list("").is_empty());
    }

    #[test]
    fn test_exercise_editing() {
        let mut patient = Patient::new_blank();
        let ex = Exercise::new("Quad Sets".into(), "4".into(), "10".into(), "10s hold".into(), String::new());
        let ex_id = ex.id.clone();
        patient.add_exercise(ex);

        let mut edited = patient.exercises[0].clone();
        edited.reps = "12".into();
        assert!(patient.update_exercise(edited));
        assert_eq!(patient.exercises[0].reps, "12");

        assert!(patient.remove_exercise(&ex_id));
        assert!(!patient.remove_exercise(&ex_id));
        assert!(patient.exercises.is_empty());
    }

    #[test]
    fn test_progress_newest_first() {
        let mut patient = Patient::new_blank();
        for (id, date) in [("a", "2023-10-01T10:00:00.000Z"), ("b", "2023-10-03T10:00:00.000Z"), ("c", "2023-10-02T10:00:00.000Z")] {
            patient.progress.push(ProgressLog {
                id: id.into(),
                date: date.into(),
                pain_level: PainLevel::new(3).unwrap(),
                completed: true,
                notes: String::new(),
                author: Author::Patient,
            });
        }
        let ids: Vec<&str> = patient.progress_newest_first().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        // stored order is untouched
        assert_eq!(patient.progress[0].id, "a");
    }
}
