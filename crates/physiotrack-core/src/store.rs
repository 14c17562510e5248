//! Application state and the pure transitions applied to it.
//!
//! Every mutation goes through [`AppState::apply`], which returns a new state
//! and leaves the receiver untouched. Hosts swap the whole value on success.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::models::{initial_clinic_info, Author, ClinicInfo, Patient, ProgressEntry, ProgressLog};

/// State transition errors.
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Please provide some feedback or mark exercises as completed.")]
    EmptySubmission,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single state change requested by a host surface.
#[derive(Debug, Clone)]
pub enum Action {
    /// Prepend a new patient to the roster
    AddPatient(Patient),
    /// Replace the patient with the same id
    UpdatePatient(Patient),
    /// Remove a patient by id
    DeletePatient(String),
    /// Append one progress log to a patient
    AppendProgress {
        patient_id: String,
        entry: ProgressEntry,
        author: Author,
    },
    /// Merge imported records by id, imported data winning
    Import(Vec<Patient>),
    /// Replace the clinic details
    UpdateClinicInfo(ClinicInfo),
}

/// The record store plus the clinic singleton.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub patients: Vec<Patient>,
    pub clinic: ClinicInfo,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            patients: Vec::new(),
            clinic: initial_clinic_info(),
        }
    }
}

impl AppState {
    pub fn new(patients: Vec<Patient>, clinic: ClinicInfo) -> Self {
        Self { patients, clinic }
    }

    /// Find a patient by id.
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Sorted, deduplicated union of every tag in the store.
    pub fn all_tags(&self) -> Vec<String> {
        self.patients
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Compute the state that results from `action`.
    pub fn apply(&self, action: Action) -> StoreResult<AppState> {
        let mut next = self.clone();
        match action {
            Action::AddPatient(patient) => {
                tracing::debug!(patient_id = %patient.id, "adding patient");
                next.patients.insert(0, patient);
            }
            Action::UpdatePatient(patient) => {
                let slot = next
                    .patients
                    .iter_mut()
                    .find(|p| p.id == patient.id)
                    .ok_or_else(|| StoreError::PatientNotFound(patient.id.clone()))?;
                tracing::debug!(patient_id = %patient.id, "updating patient");
                *slot = patient;
            }
            Action::DeletePatient(id) => {
                let before = next.patients.len();
                next.patients.retain(|p| p.id != id);
                if next.patients.len() == before {
                    return Err(StoreError::PatientNotFound(id));
                }
                tracing::debug!(patient_id = %id, "deleted patient");
            }
            Action::AppendProgress {
                patient_id,
                entry,
                author,
            } => {
                let patient = next
                    .patients
                    .iter_mut()
                    .find(|p| p.id == patient_id)
                    .ok_or_else(|| StoreError::PatientNotFound(patient_id.clone()))?;
                let log = ProgressLog::from_entry(entry, author);
                tracing::debug!(patient_id = %patient_id, log_id = %log.id, %author, "appending progress");
                patient.progress.push(log);
            }
            Action::Import(imported) => {
                let count = imported.len();
                next.patients = merge_imported(next.patients, imported);
                tracing::debug!(imported = count, total = next.patients.len(), "merged import");
            }
            Action::UpdateClinicInfo(clinic) => {
                next.clinic = clinic;
            }
        }
        Ok(next)
    }
}

/// Merge imported patients into an existing roster by id.
///
/// Existing records keep their position; an imported record with a known id
/// replaces it in place, and unknown ids are appended in import order.
pub fn merge_imported(existing: Vec<Patient>, imported: Vec<Patient>) -> Vec<Patient> {
    let mut merged = existing;
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    for patient in imported {
        match index.get(&patient.id) {
            Some(&i) => merged[i] = patient,
            None => {
                index.insert(patient.id.clone(), merged.len());
                merged.push(patient);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PainLevel, PatientStatus};

    fn named(id: &str, name: &str) -> Patient {
        let mut p = Patient::new(name.into(), String::new());
        p.id = id.into();
        p
    }

    fn entry(notes: &str) -> ProgressEntry {
        ProgressEntry::new(PainLevel::new(3).unwrap(), true, notes.into())
    }

    #[test]
    fn test_add_prepends() {
        let state = AppState::new(vec![named("P1", "A")], initial_clinic_info());
        let next = state.apply(Action::AddPatient(named("P2", "B"))).unwrap();
        assert_eq!(next.patients[0].id, "P2");
        assert_eq!(next.patients.len(), 2);
        // receiver is untouched
        assert_eq!(state.patients.len(), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let state = AppState::new(vec![named("P1", "A")], initial_clinic_info());

        let mut edited = named("P1", "A");
        edited.status = PatientStatus::Recovered;
        let next = state.apply(Action::UpdatePatient(edited)).unwrap();
        assert_eq!(next.patient("P1").unwrap().status, PatientStatus::Recovered);

        let next = next.apply(Action::DeletePatient("P1".into())).unwrap();
        assert!(next.patients.is_empty());

        assert_eq!(
            next.apply(Action::DeletePatient("P1".into())),
            Err(StoreError::PatientNotFound("P1".into()))
        );
        assert!(matches!(
            state.apply(Action::UpdatePatient(named("P9", "Z"))),
            Err(StoreError::PatientNotFound(_))
        ));
    }

    #[test]
    fn test_merge_precedence() {
        let existing = vec![named("P1", "A"), named("P3", "D")];
        let merged = merge_imported(existing, vec![named("P1", "B"), named("P2", "C")]);

        let names: Vec<(&str, &str)> = merged.iter().map(|p| (p.id.as_str(), p.name.as_str())).collect();
        assert_eq!(names, vec![("P1", "B"), ("P3", "D"), ("P2", "C")]);
    }

    #[test]
    fn test_merge_duplicate_ids_in_import() {
        let merged = merge_imported(Vec::new(), vec![named("P1", "A"), named("P1", "B")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "B");
    }

    #[test]
    fn test_import_idempotent() {
        let state = AppState::new(vec![named("P1", "A")], initial_clinic_info());
        let import = vec![named("P1", "B"), named("P2", "C")];

        let once = state.apply(Action::Import(import.clone())).unwrap();
        let twice = once.apply(Action::Import(import)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_append_progress_in_call_order() {
        let mut state = AppState::new(vec![named("P1", "A")], initial_clinic_info());
        for i in 0..5 {
            state = state
                .apply(Action::AppendProgress {
                    patient_id: "P1".into(),
                    entry: entry(&format!("log {}", i)),
                    author: Author::Patient,
                })
                .unwrap();
        }

        let progress = &state.patient("P1").unwrap().progress;
        assert_eq!(progress.len(), 5);
        for (i, log) in progress.iter().enumerate() {
            assert_eq!(log.notes, format!("log {}", i));
            assert_eq!(log.author, Author::Patient);
        }
        for pair in progress.windows(2) {
            assert!(pair[0].parsed_date() <= pair[1].parsed_date());
        }
    }

    #[test]
    fn test_append_progress_unknown_patient() {
        let state = AppState::new(vec![named("P1", "A")], initial_clinic_info());
        let result = state.apply(Action::AppendProgress {
            patient_id: "nope".into(),
            entry: entry("x"),
            author: Author::Doctor,
        });
        assert_eq!(result, Err(StoreError::PatientNotFound("nope".into())));
    }

    #[test]
    fn test_all_tags() {
        let mut a = named("P1", "A");
        a.tags = vec!["Neck Pain".into(), "ACL Tear".into()];
        let mut b = named("P2", "B");
        b.tags = vec!["Neck Pain".into()];
        let state = AppState::new(vec![a, b], initial_clinic_info());
        assert_eq!(state.all_tags(), vec!["ACL Tear".to_string(), "Neck Pain".to_string()]);
    }

    #[test]
    fn test_update_clinic_info() {
        let state = AppState::default();
        let next = state
            .apply(Action::UpdateClinicInfo(ClinicInfo::new("Other Clinic".into())))
            .unwrap();
        assert_eq!(next.clinic.name, "Other Clinic");
        assert_eq!(state.clinic.name, crate::models::DEFAULT_CLINIC_NAME);
    }
}
