//! Exercise chart documents handed to an external PDF renderer.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ClinicInfo, Patient};

/// Chart rendering errors.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("PDF preview element not found.")]
    MissingRenderTarget,
}

pub type ChartResult<T> = Result<T, ChartError>;

/// One row of the exercise table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub exercise: String,
    pub sets: String,
    pub reps: String,
    pub duration: String,
    pub notes: String,
}

/// Formatted content of a patient's exercise chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDocument {
    pub clinic_name: String,
    /// Logo data URL, `None` renders a placeholder
    pub clinic_logo: Option<String>,
    pub subtitle: String,
    pub patient_name: String,
    pub patient_id: String,
    pub issued_on: NaiveDate,
    pub rows: Vec<ChartRow>,
    pub footer: Vec<String>,
}

pub const CHART_COLUMNS: [&str; 5] = ["Exercise", "Sets", "Reps", "Duration/Hold", "Notes"];

impl ChartDocument {
    /// Assemble the chart for the selected patient.
    pub fn build(patient: Option<&Patient>, clinic: &ClinicInfo, issued_on: NaiveDate) -> ChartResult<Self> {
        let patient = patient.ok_or(ChartError::MissingRenderTarget)?;

        let rows = patient
            .exercises
            .iter()
            .map(|ex| ChartRow {
                exercise: ex.name.clone(),
                sets: ex.sets.clone(),
                reps: ex.reps.clone(),
                duration: ex.duration.clone(),
                notes: ex.notes.clone(),
            })
            .collect();

        Ok(Self {
            clinic_name: clinic.name.clone(),
            clinic_logo: clinic.has_logo().then(|| clinic.logo.clone()),
            subtitle: "Personalized Exercise Program".into(),
            patient_name: patient.name.clone(),
            patient_id: patient.id.clone(),
            issued_on,
            rows,
            footer: vec![
                format!("This exercise plan was prescribed by {}.", clinic.name),
                "If you experience any sharp or increasing pain, please stop and contact your physiotherapist."
                    .into(),
            ],
        })
    }

    /// Suggested download name for the rendered file.
    pub fn file_name(&self) -> String {
        chart_file_name(&self.patient_name)
    }
}

/// `<Name>_Exercise_Chart.pdf`. Only the first space becomes an underscore.
pub fn chart_file_name(patient_name: &str) -> String {
    format!("{}_Exercise_Chart.pdf", patient_name.replacen(' ', "_", 1))
}

/// External rasterizer/PDF writer.
pub trait ChartRenderer {
    /// Render the document to the output format's bytes.
    fn render(&self, document: &ChartDocument) -> ChartResult<Vec<u8>>;
}

/// Plain-text preview renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextChartRenderer;

impl TextChartRenderer {
    pub fn render_string(&self, document: &ChartDocument) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n{}\n", document.clinic_name, document.subtitle));
        if document.clinic_logo.is_none() {
            out.push_str("[Logo]\n");
        }
        out.push('\n');
        out.push_str(&format!("Patient Name: {}\n", document.patient_name));
        out.push_str(&format!("Patient ID: {}\n", document.patient_id));
        out.push_str(&format!("Date Issued: {}\n\n", document.issued_on.format("%Y-%m-%d")));

        out.push_str("Your Exercises\n");
        out.push_str(&CHART_COLUMNS.join(" | "));
        out.push('\n');
        for row in &document.rows {
            out.push_str(&format!(
                "{} | {} | {} | {} | {}\n",
                row.exercise, row.sets, row.reps, row.duration, row.notes
            ));
        }

        out.push('\n');
        for line in &document.footer {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, document: &ChartDocument) -> ChartResult<Vec<u8>> {
        Ok(self.render_string(document).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{initial_patients, ClinicInfo};

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_missing_render_target() {
        let clinic = ClinicInfo::new("HealWell".into());
        assert!(matches!(
            ChartDocument::build(None, &clinic, issued()),
            Err(ChartError::MissingRenderTarget)
        ));
    }

    #[test]
    fn test_build_document() {
        let patients = initial_patients();
        let clinic = ClinicInfo::new("HealWell".into());
        let doc = ChartDocument::build(patients.first(), &clinic, issued()).unwrap();

        assert_eq!(doc.patient_name, "John Doe");
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[0].exercise, "Cervical Retraction");
        assert!(doc.clinic_logo.is_none());
        assert!(doc.footer[0].contains("HealWell"));
        assert_eq!(doc.file_name(), "John_Doe_Exercise_Chart.pdf");
    }

    #[test]
    fn test_file_name_replaces_first_space_only() {
        assert_eq!(chart_file_name("Mary Ann Lee"), "Mary_Ann Lee_Exercise_Chart.pdf");
        assert_eq!(chart_file_name("Cher"), "Cher_Exercise_Chart.pdf");
    }

    #[test]
    fn test_text_renderer() {
        let patients = initial_patients();
        let clinic = ClinicInfo::new("HealWell".into()).with_logo(b"png", "image/png");
        let doc = ChartDocument::build(patients.get(1), &clinic, issued()).unwrap();

        let text = TextChartRenderer.render_string(&doc);
        assert!(text.contains("Patient Name: Jane Smith"));
        assert!(text.contains("Date Issued: 2024-01-15"));
        assert!(text.contains("Quad Sets | 4 | 10 | 10s hold | Press knee down firmly."));
        assert!(!text.contains("[Logo]"));

        let bytes = TextChartRenderer.render(&doc).unwrap();
        assert_eq!(bytes, text.into_bytes());
    }
}
