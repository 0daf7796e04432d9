//! Bulk subject import from the backtick-delimited text format:
//!
//! ```text
//! <code>`<name>`<credits>`<professor>`<day>: <start>-<end>,<room>`<weeks>
//! ```
//!
//! Each line is tokenized, its timeslot parsed, and the resulting subject
//! created unless the code already exists. The whole run shares one
//! transaction; a single bad line is counted and skipped, never fatal.

pub mod clear;
pub mod record;
pub mod timeslot;
pub mod tokenizer;

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::db::repository;
use crate::error::ImportError;
use record::build_subject;
use tokenizer::{Tokenized, tokenize};

pub use clear::{ClearStats, clear_all};

pub const DEFAULT_FILE: &str = "data.txt";
pub const DEFAULT_SEMESTER: &str = "1-2025";

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Delete every existing subject before loading.
    pub clear: bool,
    /// Semester tag stamped on every created subject.
    pub semester: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            clear: false,
            semester: DEFAULT_SEMESTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl ImportStats {
    fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Blank => {}
            LineOutcome::Malformed { .. } | LineOutcome::Duplicate { .. } => self.skipped += 1,
            LineOutcome::Error(_) => self.errors += 1,
            LineOutcome::Created { .. } => self.created += 1,
        }
    }
}

/// What happened to a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Blank,
    Malformed { fields: usize },
    Duplicate { code: String },
    Error(String),
    Created { id: i64, code: String },
}

/// Reads `path` and imports every line. Nothing is written when the file
/// cannot be read, not even the optional pre-clear.
pub async fn import_file(
    db: &SqlitePool,
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportStats, ImportError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let lines = tokenizer::split_lines(&contents);
    info!("Processing {} lines from {}", lines.len(), path.display());

    import_lines(db, lines, options).await
}

/// Imports already-read lines inside one transaction. Line numbers in the
/// log are 1-based positions in `lines`.
pub async fn import_lines<'a, I>(
    db: &SqlitePool,
    lines: I,
    options: &ImportOptions,
) -> Result<ImportStats, ImportError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rng = StdRng::from_entropy();
    let mut tx = db.begin().await?;

    if options.clear {
        info!("Clearing existing subjects...");
        let removed = repository::delete_all_subjects(&mut *tx).await?;
        info!("Cleared {} subjects", removed);
    }

    let mut stats = ImportStats::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line_num = index + 1;
        let outcome = process_line(&mut tx, line, &options.semester, &mut rng).await;

        match &outcome {
            LineOutcome::Malformed { fields } => {
                info!("Skipping line {}: invalid format ({} fields)", line_num, fields);
            }
            LineOutcome::Duplicate { code } => {
                info!("Skipping line {}: subject {} already exists", line_num, code);
            }
            LineOutcome::Error(reason) => {
                warn!("Error processing line {}: {}", line_num, reason);
                warn!("Line content: {}", line);
            }
            LineOutcome::Blank | LineOutcome::Created { .. } => {}
        }

        stats.record(&outcome);

        if matches!(outcome, LineOutcome::Created { .. }) && stats.created % PROGRESS_EVERY == 0 {
            info!("Processed {} subjects...", stats.created);
        }
    }

    tx.commit().await?;

    info!(
        "Import completed: created {}, skipped {}, errors {}",
        stats.created, stats.skipped, stats.errors
    );
    Ok(stats)
}

async fn process_line(
    conn: &mut SqliteConnection,
    line: &str,
    semester: &str,
    rng: &mut StdRng,
) -> LineOutcome {
    let fields = match tokenize(line) {
        Tokenized::Blank => return LineOutcome::Blank,
        Tokenized::Malformed { fields } => return LineOutcome::Malformed { fields },
        Tokenized::Fields(fields) => fields,
    };

    let subject = match build_subject(&fields, semester, rng) {
        Ok(subject) => subject,
        Err(e) => return LineOutcome::Error(e.to_string()),
    };

    match repository::insert_subject_if_absent(&mut *conn, &subject).await {
        Ok(Some(id)) => LineOutcome::Created {
            id,
            code: subject.code,
        },
        Ok(None) => LineOutcome::Duplicate { code: subject.code },
        Err(e) => LineOutcome::Error(e.to_string()),
    }
}
