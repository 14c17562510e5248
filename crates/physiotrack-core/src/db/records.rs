//! Typed load/save of the record store and clinic details.

use serde::de::DeserializeOwned;

use super::kv::upsert;
use super::{Database, DbResult, CLINIC_INFO_KEY, PATIENTS_KEY};
use crate::models::{initial_clinic_info, initial_patients, ClinicInfo, Patient};
use crate::store::AppState;

impl Database {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        self.get_value(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Stored roster, `None` if it has never been written.
    pub fn load_patients(&self) -> DbResult<Option<Vec<Patient>>> {
        self.load_json(PATIENTS_KEY)
    }

    /// Stored clinic details, `None` if they have never been written.
    pub fn load_clinic_info(&self) -> DbResult<Option<ClinicInfo>> {
        self.load_json(CLINIC_INFO_KEY)
    }

    /// Load the full state, falling back to defaults for missing keys.
    ///
    /// With `seed_demo_data` a missing roster becomes the demo patients,
    /// otherwise it starts empty.
    pub fn load_state(&self, seed_demo_data: bool) -> DbResult<AppState> {
        let patients = match self.load_patients()? {
            Some(patients) => patients,
            None if seed_demo_data => {
                tracing::debug!("no stored roster, seeding demo patients");
                initial_patients()
            }
            None => Vec::new(),
        };
        let clinic = self.load_clinic_info()?.unwrap_or_else(initial_clinic_info);
        Ok(AppState::new(patients, clinic))
    }

    /// Persist both keys in one transaction.
    pub fn save_state(&mut self, state: &AppState) -> DbResult<()> {
        let patients = serde_json::to_string(&state.patients)?;
        let clinic = serde_json::to_string(&state.clinic)?;

        let tx = self.conn.transaction()?;
        upsert(&tx, PATIENTS_KEY, &patients)?;
        upsert(&tx, CLINIC_INFO_KEY, &clinic)?;
        tx.commit()?;

        tracing::debug!(patients = state.patients.len(), "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_CLINIC_NAME;

    #[test]
    fn test_load_state_seeds_defaults() {
        let db = Database::open_in_memory().unwrap();

        let state = db.load_state(true).unwrap();
        assert_eq!(state.patients.len(), 3);
        assert_eq!(state.clinic.name, DEFAULT_CLINIC_NAME);

        let state = db.load_state(false).unwrap();
        assert!(state.patients.is_empty());
    }

    #[test]
    fn test_save_and_load_state() {
        let mut db = Database::open_in_memory().unwrap();
        let mut state = db.load_state(true).unwrap();
        state.clinic.name = "Other Clinic".into();
        state.patients.truncate(1);

        db.save_state(&state).unwrap();
        let loaded = db.load_state(true).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_empty_roster_is_not_reseeded() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_state(&AppState::new(Vec::new(), initial_clinic_info())).unwrap();
        assert!(db.load_state(true).unwrap().patients.is_empty());
    }

    #[test]
    fn test_stored_json_shape() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_state(&AppState::new(initial_patients(), initial_clinic_info())).unwrap();
        let raw = db.get_value(PATIENTS_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"dateAdded\""));
        assert!(raw.contains("\"painLevel\":5"));
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        upsert(&db.conn, CLINIC_INFO_KEY, "{not json").unwrap();
        assert!(db.load_clinic_info().is_err());
    }
}
