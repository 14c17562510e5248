//! Default data used when the store has never been written.

use super::{Author, ClinicInfo, Exercise, PainLevel, Patient, PatientStatus, ProgressLog};

pub const DEFAULT_CLINIC_NAME: &str = "HealWell Physiotherapy";

pub fn initial_clinic_info() -> ClinicInfo {
    ClinicInfo::new(DEFAULT_CLINIC_NAME.into())
}

fn exercise(id: &str, name: &str, sets: &str, reps: &str, duration: &str, notes: &str) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        sets: sets.into(),
        reps: reps.into(),
        duration: duration.into(),
        notes: notes.into(),
    }
}

fn patient(name: &str, email: &str, date_added: &str, status: PatientStatus, tags: &[&str]) -> Patient {
    let mut p = Patient::new(name.into(), email.into());
    p.date_added = date_added.into();
    p.status = status;
    p.tags = tags.iter().map(|t| t.to_string()).collect();
    p
}

/// Demo roster for a fresh install.
pub fn initial_patients() -> Vec<Patient> {
    let mut john = patient(
        "John Doe",
        "john.doe@example.com",
        "2023-10-26T10:00:00Z",
        PatientStatus::InProgress,
        &["Neck Pain", "Posture Correction"],
    );
    john.exercises = vec![
        exercise("ex1", "Cervical Retraction", "3", "10", "5s hold", "Keep chin tucked."),
        exercise("ex2", "Scapular Squeezes", "3", "15", "-", "Focus on middle back."),
    ];
    john.progress = vec![ProgressLog {
        id: "p1".into(),
        date: "2023-10-27T10:00:00Z".into(),
        pain_level: PainLevel::default(),
        completed: true,
        notes: "Felt a good stretch.".into(),
        author: Author::Patient,
    }];

    let mut jane = patient(
        "Jane Smith",
        "jane.smith@example.com",
        "2023-10-20T14:30:00Z",
        PatientStatus::Recovered,
        &["ACL Tear", "Sports Injury"],
    );
    jane.exercises = vec![
        exercise("ex1", "Quad Sets", "4", "10", "10s hold", "Press knee down firmly."),
        exercise("ex2", "Heel Slides", "3", "20", "-", "Slide heel towards hip."),
    ];

    let mut mike = patient(
        "Mike Johnson",
        "mike.j@example.com",
        "2023-09-15T09:00:00Z",
        PatientStatus::OnHold,
        &["Low Back Pain"],
    );
    mike.exercises = vec![exercise("ex1", "Cat-Cow Stretch", "2", "10", "-", "Sync with breathing.")];

    vec![john, jane, mike]
}
