//! Roster import.

use serde::de::DeserializeOwned;

use super::{scan_line, CsvError, CsvResult, CSV_COLUMNS, CSV_HEADER, TAG_SEPARATOR};
use crate::models::{Exercise, Patient, PatientStatus, ProgressLog};

/// Parse an exported roster. Any malformed row fails the whole import.
pub fn import_csv(content: &str) -> CsvResult<Vec<Patient>> {
    let mut lines = content.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let header = lines.next().unwrap_or_default();
    if header != CSV_HEADER {
        tracing::warn!(found = %header, "CSV import rejected: header mismatch");
        return Err(CsvError::InvalidHeader {
            found: header.to_string(),
        });
    }

    let mut patients = Vec::new();
    for (offset, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        // header is line 1
        let line_no = offset + 2;
        let patient = parse_row(line).map_err(|reason| {
            tracing::warn!(line = line_no, %reason, "CSV import failed");
            CsvError::ParseFailure {
                line: line_no,
                reason,
            }
        })?;
        patients.push(patient);
    }

    tracing::info!(patients = patients.len(), "parsed CSV import");
    Ok(patients)
}

fn parse_row(line: &str) -> Result<Patient, String> {
    let fields = scan_line(line)?;
    if fields.len() != CSV_COLUMNS {
        return Err(format!("expected {} fields, found {}", CSV_COLUMNS, fields.len()));
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    let id = next();
    if id.is_empty() {
        return Err("missing patient id".into());
    }
    let name = next();
    let email = next();
    let date_added = next();
    let status: PatientStatus = next().parse()?;
    let tags = split_tags(&next());
    let exercises: Vec<Exercise> = parse_json(&next(), "exercises")?;
    let progress: Vec<ProgressLog> = parse_json(&next(), "progress")?;

    Ok(Patient {
        id,
        name,
        email,
        date_added,
        status,
        tags,
        exercises,
        progress,
    })
}

fn split_tags(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(TAG_SEPARATOR).map(str::to_string).collect()
}

fn parse_json<T: DeserializeOwned>(value: &str, column: &str) -> Result<T, String> {
    serde_json::from_str(value).map_err(|e| format!("invalid {} column: {}", column, e))
}
