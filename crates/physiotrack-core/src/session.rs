//! A persisted application session.
//!
//! Holds the database and the current [`AppState`]. Each commit computes the
//! next state, persists it, and only then replaces the in-memory value, so a
//! failed step leaves both untouched.

use chrono::NaiveDate;
use thiserror::Error;

use crate::chart::{ChartDocument, ChartError};
use crate::config::AppConfig;
use crate::csv::{self, CsvError};
use crate::db::{Database, DbError};
use crate::models::{Author, Patient, ProgressEntry};
use crate::route::{self, PublicView, View};
use crate::store::{Action, AppState, StoreError};
use crate::view::{self, ViewQuery};

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A finished export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

pub struct Session {
    db: Database,
    state: AppState,
    share_base_url: String,
}

impl Session {
    /// Open the configured database and load its state.
    pub fn open(config: &AppConfig) -> SessionResult<Self> {
        let db = Database::open(config.data_path())?;
        Self::with_database(db, config)
    }

    /// Wrap an already opened database.
    pub fn with_database(db: Database, config: &AppConfig) -> SessionResult<Self> {
        let state = db.load_state(config.seed_demo_data())?;
        tracing::debug!(patients = state.patients.len(), "session opened");
        Ok(Self {
            db,
            state,
            share_base_url: config.share_base_url().to_string(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply an action, persist the result and make it current.
    pub fn commit(&mut self, action: Action) -> SessionResult<&AppState> {
        let next = self.state.apply(action)?;
        self.db.save_state(&next)?;
        self.state = next;
        Ok(&self.state)
    }

    /// Dashboard view for the given query.
    pub fn list(&self, query: &ViewQuery) -> Vec<&Patient> {
        view::filter_and_sort(&self.state.patients, query)
    }

    /// Add a blank patient and return its id.
    pub fn add_blank_patient(&mut self) -> SessionResult<String> {
        let patient = Patient::new_blank();
        let id = patient.id.clone();
        self.commit(Action::AddPatient(patient))?;
        Ok(id)
    }

    /// Validate and append a progress entry.
    pub fn log_progress(&mut self, patient_id: &str, entry: ProgressEntry, author: Author) -> SessionResult<()> {
        entry.validate()?;
        self.commit(Action::AppendProgress {
            patient_id: patient_id.to_string(),
            entry,
            author,
        })?;
        Ok(())
    }

    /// Export the full roster, named for `today`.
    pub fn export_csv(&self, today: NaiveDate) -> SessionResult<CsvExport> {
        let content = csv::export_csv(&self.state.patients)?;
        Ok(CsvExport {
            file_name: csv::export_file_name(today),
            content,
        })
    }

    /// Parse and merge an import. Returns the number of records imported.
    pub fn import_csv(&mut self, content: &str) -> SessionResult<usize> {
        let imported = csv::import_csv(content)?;
        let count = imported.len();
        self.commit(Action::Import(imported))?;
        tracing::info!(imported = count, total = self.state.patients.len(), "import merged");
        Ok(count)
    }

    pub fn share_link(&self, patient_id: &str) -> String {
        route::share_link(&self.share_base_url, patient_id)
    }

    /// Resolve a navigation fragment against the current state.
    pub fn navigate(&self, fragment: &str) -> Navigation<'_> {
        match View::from_fragment(fragment) {
            View::Dashboard => Navigation::Dashboard,
            View::PublicPatient(id) => match route::resolve_public(&self.state, &id) {
                PublicView::Found(patient) => Navigation::Public(patient),
                PublicView::NotFound => Navigation::NotFound(id),
            },
        }
    }

    /// Exercise chart for a selected patient.
    pub fn chart(&self, patient_id: Option<&str>, issued_on: NaiveDate) -> SessionResult<ChartDocument> {
        let patient = match patient_id {
            Some(id) => Some(
                self.state
                    .patient(id)
                    .ok_or_else(|| StoreError::PatientNotFound(id.to_string()))?,
            ),
            None => None,
        };
        Ok(ChartDocument::build(patient, &self.state.clinic, issued_on)?)
    }
}

/// Where a navigation event lands.
#[derive(Debug, PartialEq)]
pub enum Navigation<'a> {
    Dashboard,
    Public(&'a Patient),
    NotFound(String),
}
