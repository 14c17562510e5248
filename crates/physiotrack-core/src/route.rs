//! Navigation between the clinician dashboard and the public patient view.

use crate::models::Patient;
use crate::store::AppState;

const PATIENT_ROUTE_PREFIX: &str = "#/patient/";

/// Which surface a host should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Clinician roster and detail editing
    Dashboard,
    /// Progress submission page for a single patient
    PublicPatient(String),
}

impl View {
    /// Derive the view from a URL fragment such as `#/patient/PID-abc`.
    ///
    /// Only the first path segment after `patient` is used as the id.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.strip_prefix(PATIENT_ROUTE_PREFIX) {
            Some(rest) => {
                let id = rest.split('/').next().unwrap_or_default();
                View::PublicPatient(id.to_string())
            }
            None => View::Dashboard,
        }
    }

    /// Fragment that navigates back to this view.
    pub fn fragment(&self) -> String {
        match self {
            View::Dashboard => "#".into(),
            View::PublicPatient(id) => format!("{}{}", PATIENT_ROUTE_PREFIX, id),
        }
    }
}

/// Outcome of resolving a public link against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PublicView<'a> {
    Found(&'a Patient),
    /// The link is invalid or the patient was removed
    NotFound,
}

/// Look up the patient a public link points at.
pub fn resolve_public<'a>(state: &'a AppState, patient_id: &str) -> PublicView<'a> {
    match state.patient(patient_id) {
        Some(patient) => PublicView::Found(patient),
        None => PublicView::NotFound,
    }
}

/// Shareable link for a patient's public view.
pub fn share_link(base_url: &str, patient_id: &str) -> String {
    format!("{}{}", base_url, View::PublicPatient(patient_id.to_string()).fragment())
}
