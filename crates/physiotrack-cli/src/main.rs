use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use physiotrack_core::models::{mime_type_for_path, parse_tag_list, Exercise, PatientStatus};
use physiotrack_core::{
    Action, AppConfig, Author, Navigation, PainLevel, Patient, ProgressEntry, Session, SortOption,
    TextChartRenderer, ViewQuery,
};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "physiotrack")]
#[command(about = "Clinic patient roster, exercise charts and progress logs")]
struct Cli {
    /// Database file (overrides PHYSIOTRACK_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients
    List {
        /// Case-insensitive match on name, ID or tag
        #[arg(long, default_value = "")]
        search: String,
        /// Required tag (repeatable; all must match)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// newest, oldest, name or status
        #[arg(long, default_value = "newest")]
        sort: SortOption,
    },
    /// Show one patient in full
    Show { id: String },
    /// Add a patient
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        email: String,
        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Edit patient details
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        status: Option<PatientStatus>,
        /// Comma separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a patient
    Delete { id: String },
    /// Edit a patient's exercise chart
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommand,
    },
    /// Record a progress entry
    Log {
        id: String,
        /// Pain level from 0 to 10
        #[arg(long, default_value_t = 5)]
        pain: u8,
        #[arg(long)]
        completed: bool,
        #[arg(long, default_value = "")]
        notes: String,
        /// Record as submitted by the patient through their link
        #[arg(long)]
        as_patient: bool,
    },
    /// Export all patients to CSV
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Import patients from CSV, merging by ID
    Import { file: PathBuf },
    /// Preview a patient's exercise chart
    Chart { id: String },
    /// Print a patient's shareable link
    Share { id: String },
    /// Resolve a link fragment such as "#/patient/PID-abc"
    Open { fragment: String },
    /// Show or update clinic details
    Clinic {
        #[arg(long)]
        name: Option<String>,
        /// Image file to use as the logo
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// Add an exercise
    Add {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        sets: String,
        #[arg(long, default_value = "")]
        reps: String,
        #[arg(long, default_value = "-")]
        duration: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Remove an exercise
    Remove { id: String, exercise_id: String },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("physiotrack=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_overrides(
        cli.db.or_else(|| std::env::var("PHYSIOTRACK_DB").ok().map(PathBuf::from)),
        std::env::var("PHYSIOTRACK_SHARE_URL").ok(),
        std::env::var("PHYSIOTRACK_SEED").ok().as_deref(),
    );
    tracing::debug!(db = %config.data_path().display(), "opening session");

    let mut session = Session::open(&config)
        .with_context(|| format!("opening {}", config.data_path().display()))?;

    match cli.command {
        Commands::List { search, tags, sort } => {
            let query = ViewQuery::new(search, tags, sort);
            let patients = session.list(&query);
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in patients {
                print_summary(patient);
            }
        }
        Commands::Show { id } => {
            let patient = find(&session, &id)?;
            print_detail(patient);
        }
        Commands::Add { name, email, tags } => {
            let mut patient = Patient::new_blank();
            if let Some(name) = name {
                patient.name = name;
            }
            patient.email = email;
            if let Some(tags) = tags {
                patient.tags = parse_tag_list(&tags);
            }
            let id = patient.id.clone();
            session.commit(Action::AddPatient(patient))?;
            println!("Added patient {}", id);
        }
        Commands::Edit {
            id,
            name,
            email,
            status,
            tags,
        } => {
            let mut patient = find(&session, &id)?.clone();
            if let Some(name) = name {
                patient.name = name;
            }
            if let Some(email) = email {
                patient.email = email;
            }
            if let Some(status) = status {
                patient.status = status;
            }
            if let Some(tags) = tags {
                patient.tags = parse_tag_list(&tags);
            }
            session.commit(Action::UpdatePatient(patient))?;
            println!("Updated patient {}", id);
        }
        Commands::Delete { id } => {
            session.commit(Action::DeletePatient(id.clone()))?;
            println!("Deleted patient {}", id);
        }
        Commands::Exercise { command } => match command {
            ExerciseCommand::Add {
                id,
                name,
                sets,
                reps,
                duration,
                notes,
            } => {
                let mut patient = find(&session, &id)?.clone();
                let exercise = Exercise::new(name, sets, reps, duration, notes);
                let exercise_id = exercise.id.clone();
                patient.add_exercise(exercise);
                session.commit(Action::UpdatePatient(patient))?;
                println!("Added exercise {} to {}", exercise_id, id);
            }
            ExerciseCommand::Remove { id, exercise_id } => {
                let mut patient = find(&session, &id)?.clone();
                if !patient.remove_exercise(&exercise_id) {
                    bail!("Exercise {} not found on patient {}", exercise_id, id);
                }
                session.commit(Action::UpdatePatient(patient))?;
                println!("Removed exercise {}", exercise_id);
            }
        },
        Commands::Log {
            id,
            pain,
            completed,
            notes,
            as_patient,
        } => {
            let pain_level = PainLevel::try_from(pain).map_err(anyhow::Error::msg)?;
            let author = if as_patient { Author::Patient } else { Author::Doctor };
            session.log_progress(&id, ProgressEntry::new(pain_level, completed, notes), author)?;
            if as_patient {
                println!("Your progress has been submitted successfully!");
            } else {
                println!("Progress entry added for {}", id);
            }
        }
        Commands::Export { out } => {
            let export = session.export_csv(chrono::Utc::now().date_naive())?;
            let path = out.join(&export.file_name);
            std::fs::write(&path, export.content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} patients to {}", session.state().patients.len(), path.display());
        }
        Commands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            match session.import_csv(&content) {
                Ok(count) => println!("{} patients imported successfully!", count),
                Err(e) => {
                    tracing::debug!(error = %e, "import failed");
                    bail!("Failed to import CSV. Please check the file format and content. ({})", e);
                }
            }
        }
        Commands::Chart { id } => {
            let doc = session.chart(Some(id.as_str()), chrono::Local::now().date_naive())?;
            print!("{}", TextChartRenderer.render_string(&doc));
            println!("\nFile: {}", doc.file_name());
        }
        Commands::Share { id } => {
            find(&session, &id)?;
            println!("{}", session.share_link(&id));
        }
        Commands::Open { fragment } => match session.navigate(&fragment) {
            Navigation::Dashboard => {
                println!("{}", session.state().clinic.name);
                for patient in session.list(&ViewQuery::default()) {
                    print_summary(patient);
                }
            }
            Navigation::Public(patient) => {
                println!("{}", session.state().clinic.name);
                println!("Hello, {}!\n", patient.name);
                print_detail(patient);
            }
            Navigation::NotFound(_) => {
                println!("Patient Not Found");
                println!("The link may be invalid or the patient profile has been removed.");
            }
        },
        Commands::Clinic { name, logo } => {
            let mut clinic = session.state().clinic.clone();
            let changed = name.is_some() || logo.is_some();
            if let Some(name) = name {
                clinic.name = name;
            }
            if let Some(path) = logo {
                let image = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
                clinic = clinic.with_logo(&image, mime_type_for_path(&path));
            }
            if changed {
                session.commit(Action::UpdateClinicInfo(clinic))?;
            }
            let clinic = &session.state().clinic;
            println!("Clinic: {}", clinic.name);
            println!("Logo: {}", if clinic.has_logo() { "uploaded" } else { "none" });
        }
    }

    Ok(())
}

fn find<'a>(session: &'a Session, id: &str) -> anyhow::Result<&'a Patient> {
    session
        .state()
        .patient(id)
        .with_context(|| format!("Patient not found: {}", id))
}

fn print_summary(patient: &Patient) {
    let added = patient.date_added.get(..10).unwrap_or(&patient.date_added);
    println!(
        "{}  {:<24} {:<12} added {}  [{}]",
        patient.id,
        patient.name,
        patient.status,
        added,
        patient.tags.join(", ")
    );
}

fn print_detail(patient: &Patient) {
    println!("{} ({})", patient.name, patient.id);
    println!("Email: {}", patient.email);
    println!("Status: {}", patient.status);
    println!("Tags: {}", patient.tags.join(", "));

    println!("\nExercises:");
    if patient.exercises.is_empty() {
        println!("  none");
    }
    for ex in &patient.exercises {
        println!(
            "  [{}] {} - {} sets x {} reps, {} ({})",
            ex.id, ex.name, ex.sets, ex.reps, ex.duration, ex.notes
        );
    }

    println!("\nProgress History:");
    let logs = patient.progress_newest_first();
    if logs.is_empty() {
        println!("  No progress has been logged yet.");
    }
    for log in logs {
        let notes = if log.notes.is_empty() { "No notes provided." } else { &log.notes };
        let completed = if log.completed { "  Exercises Completed" } else { "" };
        println!("  {} [{}] Pain: {}{}", log.date, log.author, log.pain_level, completed);
        println!("    {}", notes);
    }
}
