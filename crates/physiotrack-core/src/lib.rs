//! PhysioTrack Core Library
//!
//! Local-first patient roster for a single physiotherapy clinic: exercise
//! charts, progress logs and CSV/chart export.
//!
//! # Architecture
//!
//! ```text
//!   Host UI (clinician dashboard / public patient link)
//!                       │
//!                 Action│            ┌──────────────────────┐
//!                       ▼            │   Filter/Sort view   │
//!              ┌────────────────┐    │ search ∧ tags → sort │
//!              │ AppState.apply │───▶└──────────────────────┘
//!              │ (copy-on-write)│
//!              └───────┬────────┘
//!                      │ persist
//!                      ▼
//!              ┌────────────────┐        ┌─────────────┐
//!              │ SQLite kv_store│        │  CSV codec  │◀── import / export
//!              └────────────────┘        └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Exercise, ProgressLog, ClinicInfo)
//! - [`store`]: Application state and its transitions, including import reconciliation
//! - [`view`]: Filter/sort pipeline for the dashboard
//! - [`csv`]: Roster export and import
//! - [`route`]: View selection and shareable links
//! - [`chart`]: Exercise chart documents and the renderer seam
//! - [`db`]: SQLite key-value persistence
//! - [`session`]: Persisted session used by host surfaces

pub mod chart;
pub mod config;
pub mod csv;
pub mod db;
pub mod models;
pub mod route;
pub mod session;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use chart::{ChartDocument, ChartRenderer, TextChartRenderer};
pub use config::AppConfig;
pub use db::Database;
pub use models::{Author, ClinicInfo, Exercise, PainLevel, Patient, PatientStatus, ProgressEntry, ProgressLog};
pub use session::{CsvExport, Navigation, Session};
pub use store::{Action, AppState};
pub use view::{SortOption, ViewQuery};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PhysioTrackError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Render failed: {0}")]
    Render(String),
}

impl From<db::DbError> for PhysioTrackError {
    fn from(e: db::DbError) -> Self {
        PhysioTrackError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for PhysioTrackError {
    fn from(e: serde_json::Error) -> Self {
        PhysioTrackError::Serialization(e.to_string())
    }
}

impl From<store::StoreError> for PhysioTrackError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::PatientNotFound(id) => PhysioTrackError::NotFound(id),
            store::StoreError::EmptySubmission => PhysioTrackError::InvalidInput(e.to_string()),
        }
    }
}

impl From<csv::CsvError> for PhysioTrackError {
    fn from(e: csv::CsvError) -> Self {
        match e {
            csv::CsvError::InvalidHeader { .. } | csv::CsvError::ParseFailure { .. } => {
                PhysioTrackError::Import(e.to_string())
            }
            csv::CsvError::EmptyExport | csv::CsvError::UnsafeField { .. } => {
                PhysioTrackError::Export(e.to_string())
            }
            csv::CsvError::Json(inner) => inner.into(),
        }
    }
}

impl From<chart::ChartError> for PhysioTrackError {
    fn from(e: chart::ChartError) -> Self {
        PhysioTrackError::Render(e.to_string())
    }
}

impl From<session::SessionError> for PhysioTrackError {
    fn from(e: session::SessionError) -> Self {
        match e {
            session::SessionError::Database(inner) => inner.into(),
            session::SessionError::Store(inner) => inner.into(),
            session::SessionError::Csv(inner) => inner.into(),
            session::SessionError::Chart(inner) => inner.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PhysioTrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PhysioTrackError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(
    path: String,
    share_base_url: String,
    seed_demo_data: bool,
) -> Result<Arc<PhysioTrackCore>, PhysioTrackError> {
    let config = AppConfig::new(path.into(), share_base_url, seed_demo_data);
    let session = Session::open(&config)?;
    Ok(PhysioTrackCore::wrap(session))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory(seed_demo_data: bool) -> Result<Arc<PhysioTrackCore>, PhysioTrackError> {
    let config = AppConfig::new(
        ":memory:".into(),
        config::DEFAULT_SHARE_BASE_URL.into(),
        seed_demo_data,
    );
    let session = Session::with_database(Database::open_in_memory()?, &config)?;
    Ok(PhysioTrackCore::wrap(session))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PhysioTrackCore {
    session: Arc<Mutex<Session>>,
}

impl PhysioTrackCore {
    fn wrap(session: Session) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    fn append_progress(
        &self,
        patient_id: String,
        pain_level: u8,
        completed: bool,
        notes: String,
        author: Author,
    ) -> Result<(), PhysioTrackError> {
        let pain_level = PainLevel::try_from(pain_level).map_err(PhysioTrackError::InvalidInput)?;
        let mut session = self.session.lock()?;
        session.log_progress(&patient_id, ProgressEntry::new(pain_level, completed, notes), author)?;
        Ok(())
    }
}

#[uniffi::export]
impl PhysioTrackCore {
    // =========================================================================
    // Roster Operations
    // =========================================================================

    /// Filtered and sorted dashboard view.
    pub fn list_patients(
        &self,
        search: String,
        tags: Vec<String>,
        sort: String,
    ) -> Result<Vec<FfiPatient>, PhysioTrackError> {
        let sort = sort.parse::<SortOption>().map_err(PhysioTrackError::InvalidInput)?;
        let session = self.session.lock()?;
        let query = ViewQuery::new(search, tags, sort);
        Ok(session.list(&query).into_iter().cloned().map(Into::into).collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, PhysioTrackError> {
        let session = self.session.lock()?;
        Ok(session.state().patient(&id).cloned().map(Into::into))
    }

    /// Every tag in use, sorted.
    pub fn all_tags(&self) -> Result<Vec<String>, PhysioTrackError> {
        let session = self.session.lock()?;
        Ok(session.state().all_tags())
    }

    /// Create a blank patient at the top of the roster.
    pub fn add_patient(&self) -> Result<FfiPatient, PhysioTrackError> {
        let mut session = self.session.lock()?;
        let id = session.add_blank_patient()?;
        session
            .state()
            .patient(&id)
            .cloned()
            .map(Into::into)
            .ok_or(PhysioTrackError::NotFound(id))
    }

    /// Save clinician edits to a patient.
    pub fn update_patient(&self, patient: FfiPatient) -> Result<(), PhysioTrackError> {
        let patient = Patient::try_from(patient)?;
        let mut session = self.session.lock()?;
        session.commit(Action::UpdatePatient(patient))?;
        Ok(())
    }

    pub fn delete_patient(&self, id: String) -> Result<(), PhysioTrackError> {
        let mut session = self.session.lock()?;
        session.commit(Action::DeletePatient(id))?;
        Ok(())
    }

    // =========================================================================
    // Progress Operations
    // =========================================================================

    /// Progress entry written from the clinician detail view.
    pub fn add_clinician_progress(
        &self,
        patient_id: String,
        pain_level: u8,
        completed: bool,
        notes: String,
    ) -> Result<(), PhysioTrackError> {
        self.append_progress(patient_id, pain_level, completed, notes, Author::Doctor)
    }

    /// Progress entry submitted through the public patient link.
    pub fn submit_patient_progress(
        &self,
        patient_id: String,
        pain_level: u8,
        completed: bool,
        notes: String,
    ) -> Result<(), PhysioTrackError> {
        self.append_progress(patient_id, pain_level, completed, notes, Author::Patient)
    }

    // =========================================================================
    // Import/Export Operations
    // =========================================================================

    /// Export the roster as CSV.
    pub fn export_csv(&self) -> Result<FfiCsvExport, PhysioTrackError> {
        let session = self.session.lock()?;
        let export = session.export_csv(chrono::Utc::now().date_naive())?;
        Ok(export.into())
    }

    /// Import a CSV export, merging by patient ID. Returns the imported count.
    pub fn import_csv(&self, content: String) -> Result<u32, PhysioTrackError> {
        let mut session = self.session.lock()?;
        let count = session.import_csv(&content)?;
        Ok(count as u32)
    }

    /// Exercise chart for the selected patient.
    pub fn chart_document(&self, patient_id: Option<String>) -> Result<FfiChartDocument, PhysioTrackError> {
        let session = self.session.lock()?;
        let doc = session.chart(patient_id.as_deref(), chrono::Local::now().date_naive())?;
        Ok(doc.into())
    }

    // =========================================================================
    // Clinic Operations
    // =========================================================================

    pub fn get_clinic_info(&self) -> Result<FfiClinicInfo, PhysioTrackError> {
        let session = self.session.lock()?;
        Ok(session.state().clinic.clone().into())
    }

    pub fn update_clinic_info(&self, info: FfiClinicInfo) -> Result<(), PhysioTrackError> {
        let mut session = self.session.lock()?;
        session.commit(Action::UpdateClinicInfo(info.into()))?;
        Ok(())
    }

    /// Store an uploaded image as the clinic logo.
    pub fn upload_logo(&self, image: Vec<u8>, mime_type: String) -> Result<(), PhysioTrackError> {
        let mut session = self.session.lock()?;
        let clinic = session.state().clinic.clone().with_logo(&image, &mime_type);
        session.commit(Action::UpdateClinicInfo(clinic))?;
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn share_link(&self, patient_id: String) -> Result<String, PhysioTrackError> {
        let session = self.session.lock()?;
        Ok(session.share_link(&patient_id))
    }

    /// Resolve a URL fragment to the view the host should show.
    pub fn resolve_fragment(&self, fragment: String) -> Result<FfiView, PhysioTrackError> {
        let session = self.session.lock()?;
        Ok(match session.navigate(&fragment) {
            Navigation::Dashboard => FfiView::Dashboard,
            Navigation::Public(patient) => FfiView::PublicPatient {
                patient: patient.clone().into(),
                clinic_name: session.state().clinic.name.clone(),
            },
            Navigation::NotFound(patient_id) => FfiView::PatientNotFound { patient_id },
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe exercise.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExercise {
    pub id: String,
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub duration: String,
    pub notes: String,
}

impl From<Exercise> for FfiExercise {
    fn from(ex: Exercise) -> Self {
        Self {
            id: ex.id,
            name: ex.name,
            sets: ex.sets,
            reps: ex.reps,
            duration: ex.duration,
            notes: ex.notes,
        }
    }
}

impl From<FfiExercise> for Exercise {
    fn from(ex: FfiExercise) -> Self {
        Exercise {
            id: ex.id,
            name: ex.name,
            sets: ex.sets,
            reps: ex.reps,
            duration: ex.duration,
            notes: ex.notes,
        }
    }
}

/// FFI-safe progress log.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProgressLog {
    pub id: String,
    pub date: String,
    pub pain_level: u8,
    pub completed: bool,
    pub notes: String,
    pub author: String,
}

impl From<ProgressLog> for FfiProgressLog {
    fn from(log: ProgressLog) -> Self {
        Self {
            id: log.id,
            date: log.date,
            pain_level: log.pain_level.value(),
            completed: log.completed,
            notes: log.notes,
            author: log.author.to_string(),
        }
    }
}

impl TryFrom<FfiProgressLog> for ProgressLog {
    type Error = PhysioTrackError;

    fn try_from(log: FfiProgressLog) -> Result<Self, Self::Error> {
        Ok(ProgressLog {
            id: log.id,
            date: log.date,
            pain_level: PainLevel::try_from(log.pain_level).map_err(PhysioTrackError::InvalidInput)?,
            completed: log.completed,
            notes: log.notes,
            author: log.author.parse().map_err(PhysioTrackError::InvalidInput)?,
        })
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_added: String,
    pub status: String,
    pub tags: Vec<String>,
    pub exercises: Vec<FfiExercise>,
    pub progress: Vec<FfiProgressLog>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            date_added: patient.date_added,
            status: patient.status.label().to_string(),
            tags: patient.tags,
            exercises: patient.exercises.into_iter().map(Into::into).collect(),
            progress: patient.progress.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<FfiPatient> for Patient {
    type Error = PhysioTrackError;

    fn try_from(patient: FfiPatient) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            date_added: patient.date_added,
            status: patient.status.parse().map_err(PhysioTrackError::InvalidInput)?,
            tags: patient.tags,
            exercises: patient.exercises.into_iter().map(Into::into).collect(),
            progress: patient
                .progress
                .into_iter()
                .map(ProgressLog::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// FFI-safe clinic details.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicInfo {
    pub name: String,
    pub logo: String,
}

impl From<ClinicInfo> for FfiClinicInfo {
    fn from(info: ClinicInfo) -> Self {
        Self {
            name: info.name,
            logo: info.logo,
        }
    }
}

impl From<FfiClinicInfo> for ClinicInfo {
    fn from(info: FfiClinicInfo) -> Self {
        ClinicInfo {
            name: info.name,
            logo: info.logo,
        }
    }
}

/// FFI-safe CSV export.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCsvExport {
    pub file_name: String,
    pub content: String,
}

impl From<CsvExport> for FfiCsvExport {
    fn from(export: CsvExport) -> Self {
        Self {
            file_name: export.file_name,
            content: export.content,
        }
    }
}

/// FFI-safe chart row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChartRow {
    pub exercise: String,
    pub sets: String,
    pub reps: String,
    pub duration: String,
    pub notes: String,
}

/// FFI-safe exercise chart document.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChartDocument {
    pub clinic_name: String,
    pub clinic_logo: Option<String>,
    pub subtitle: String,
    pub patient_name: String,
    pub patient_id: String,
    pub issued_on: String,
    pub rows: Vec<FfiChartRow>,
    pub footer: Vec<String>,
    pub file_name: String,
}

impl From<ChartDocument> for FfiChartDocument {
    fn from(doc: ChartDocument) -> Self {
        let file_name = doc.file_name();
        Self {
            clinic_name: doc.clinic_name,
            clinic_logo: doc.clinic_logo,
            subtitle: doc.subtitle,
            patient_name: doc.patient_name,
            patient_id: doc.patient_id,
            issued_on: doc.issued_on.format("%Y-%m-%d").to_string(),
            rows: doc
                .rows
                .into_iter()
                .map(|row| FfiChartRow {
                    exercise: row.exercise,
                    sets: row.sets,
                    reps: row.reps,
                    duration: row.duration,
                    notes: row.notes,
                })
                .collect(),
            footer: doc.footer,
            file_name,
        }
    }
}

/// FFI-safe view selection.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiView {
    Dashboard,
    PublicPatient { patient: FfiPatient, clinic_name: String },
    PatientNotFound { patient_id: String },
}
