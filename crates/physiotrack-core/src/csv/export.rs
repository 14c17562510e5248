//! Roster export.

use chrono::NaiveDate;

use super::{quote_field, CsvError, CsvResult, CSV_HEADER, ROW_TERMINATOR, TAG_SEPARATOR};
use crate::models::Patient;

/// Serialize the whole roster. Refuses an empty roster.
pub fn export_csv(patients: &[Patient]) -> CsvResult<String> {
    if patients.is_empty() {
        return Err(CsvError::EmptyExport);
    }

    let mut rows = Vec::with_capacity(patients.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for patient in patients {
        rows.push(export_row(patient)?);
    }

    tracing::info!(patients = patients.len(), "exported roster to CSV");
    Ok(rows.join(ROW_TERMINATOR))
}

/// Serialize one patient as a CSV row (without terminator).
pub fn export_row(patient: &Patient) -> CsvResult<String> {
    let scalars = [
        ("id", patient.id.as_str()),
        ("name", patient.name.as_str()),
        ("email", patient.email.as_str()),
        ("dateAdded", patient.date_added.as_str()),
    ];
    if patient.id.is_empty() {
        return Err(unsafe_field(patient, "id"));
    }
    for (field, value) in scalars {
        if !is_safe_scalar(value) {
            return Err(unsafe_field(patient, field));
        }
    }

    if patient.tags.iter().any(|t| t.is_empty() || t.contains(['"', TAG_SEPARATOR, '\r', '\n'])) {
        return Err(unsafe_field(patient, "tags"));
    }
    let tags = patient.tags.join(&TAG_SEPARATOR.to_string());

    let exercises = serde_json::to_string(&patient.exercises)?;
    let progress = serde_json::to_string(&patient.progress)?;

    Ok([
        patient.id.clone(),
        patient.name.clone(),
        patient.email.clone(),
        patient.date_added.clone(),
        patient.status.label().to_string(),
        format!("\"{}\"", tags),
        quote_field(&exercises),
        quote_field(&progress),
    ]
    .join(","))
}

/// Scalars are written bare, so they must not need quoting.
fn is_safe_scalar(value: &str) -> bool {
    !value.contains([',', '"', '\r', '\n'])
}

fn unsafe_field(patient: &Patient, field: &'static str) -> CsvError {
    CsvError::UnsafeField {
        patient_id: patient.id.clone(),
        field,
    }
}

/// Download name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("physiotrack_patients_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, PatientStatus};

    fn sample() -> Patient {
        let mut p = Patient::new("John Doe".into(), "john.doe@example.com".into());
        p.id = "PID-abc123def".into();
        p.date_added = "2023-10-26T10:00:00Z".into();
        p.tags = vec!["Neck Pain".into(), "Posture Correction".into()];
        p.exercises = vec![Exercise {
            id: "ex1".into(),
            name: "Cervical Retraction".into(),
            sets: "3".into(),
            reps: "10".into(),
            duration: "5s hold".into(),
            notes: "Keep chin tucked.".into(),
        }];
        p
    }

    #[test]
    fn test_empty_export_refused() {
        assert!(matches!(export_csv(&[]), Err(CsvError::EmptyExport)));
    }

    #[test]
    fn test_export_layout() {
        let csv = export_csv(&[sample(), sample()]).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(!csv.ends_with("\r\n"));
    }

    #[test]
    fn test_export_row_exact() {
        let row = export_row(&sample()).unwrap();
        assert_eq!(
            row,
            "PID-abc123def,John Doe,john.doe@example.com,2023-10-26T10:00:00Z,In Progress,\
             \"Neck Pain;Posture Correction\",\
             \"[{\"\"id\"\":\"\"ex1\"\",\"\"name\"\":\"\"Cervical Retraction\"\",\"\"sets\"\":\"\"3\"\",\
             \"\"reps\"\":\"\"10\"\",\"\"duration\"\":\"\"5s hold\"\",\"\"notes\"\":\"\"Keep chin tucked.\"\"}]\",\
             \"[]\""
        );
    }

    #[test]
    fn test_status_label_in_row() {
        let mut p = sample();
        p.status = PatientStatus::OnHold;
        assert!(export_row(&p).unwrap().contains(",On Hold,"));
    }

    #[test]
    fn test_unsafe_scalars_rejected() {
        let mut p = sample();
        p.name = "Doe, John".into();
        assert!(matches!(
            export_csv(&[p]),
            Err(CsvError::UnsafeField { field: "name", .. })
        ));

        let mut p = sample();
        p.email = "\"quoted\"@example.com".into();
        assert!(matches!(export_row(&p), Err(CsvError::UnsafeField { field: "email", .. })));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut p = sample();
        p.id = String::new();
        assert!(matches!(export_row(&p), Err(CsvError::UnsafeField { field: "id", .. })));
    }

    #[test]
    fn test_unsafe_tags_rejected() {
        let mut p = sample();
        p.tags = vec!["a;b".into()];
        assert!(matches!(export_row(&p), Err(CsvError::UnsafeField { field: "tags", .. })));

        p.tags = vec![String::new()];
        assert!(matches!(export_row(&p), Err(CsvError::UnsafeField { field: "tags", .. })));

        p.tags = vec!["Neck\nPain".into()];
        assert!(matches!(export_csv(&[p.clone()]), Err(CsvError::UnsafeField { field: "tags", .. })));

        p.tags = vec!["Neck\r".into()];
        assert!(matches!(export_row(&p), Err(CsvError::UnsafeField { field: "tags", .. })));

        // commas are fine inside the quoted tag column
        p.tags = vec!["Neck, upper".into()];
        assert!(export_row(&p).is_ok());
    }

    #[test]
    fn test_notes_with_quotes_and_commas() {
        let mut p = sample();
        p.exercises[0].notes = "Say \"ouch\", then stop".into();
        let row = export_row(&p).unwrap();
        assert!(row.contains("\\\"\"ouch\\\"\""));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "physiotrack_patients_2024-03-07.csv");
    }
}
