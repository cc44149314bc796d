//! Bulk import of decision text files
//!
//! Files are parsed one by one and written in batches, each batch in its own
//! transaction. Bad files are logged, counted and skipped; they never abort a run.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::parsing::parse_decision_text;
use crate::services::documents::decode_text;
use crate::storage::DecisionDb;
use crate::types::ParsedDecision;

/// Import run options
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Records per transaction
    pub batch_size: usize,
    /// Stop after this many files
    pub limit: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            limit: None,
        }
    }
}

/// Outcome counts of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total_files: usize,
    pub imported: usize,
    pub already_existed: usize,
    pub skipped_invalid: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// `*.txt` files under `dir`, sorted by path
pub fn decision_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::validation(format!(
            "Import directory not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Import every decision file under `dir`
pub fn import_directory(db: &DecisionDb, dir: &Path, options: &ImportOptions) -> Result<ImportStats> {
    import_directory_with(db, dir, options, |_| {})
}

/// Like [`import_directory`], calling `on_file` after each file is read
pub fn import_directory_with<F>(
    db: &DecisionDb,
    dir: &Path,
    options: &ImportOptions,
    mut on_file: F,
) -> Result<ImportStats>
where
    F: FnMut(&Path),
{
    let mut files = decision_files(dir)?;
    if let Some(limit) = options.limit {
        files.truncate(limit);
    }

    let batch_size = options.batch_size.max(1);
    let mut stats = ImportStats {
        total_files: files.len(),
        ..Default::default()
    };
    let mut batch: Vec<ParsedDecision> = Vec::with_capacity(batch_size);

    tracing::info!(dir = %dir.display(), files = files.len(), batch_size, "starting import");

    for path in &files {
        match read_decision(path) {
            Ok(decision) if !decision.has_identity() => {
                tracing::warn!(file = %path.display(), "skipping file without bulletin year/number");
                stats.skipped_invalid += 1;
            }
            Ok(decision) => {
                batch.push(decision);
                if batch.len() >= batch_size {
                    flush(db, &mut batch, &mut stats);
                }
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to read decision");
                stats.failed += 1;
                stats.errors.push(format!("{}: {}", path.display(), e));
            }
        }
        on_file(path);
    }

    flush(db, &mut batch, &mut stats);

    tracing::info!(
        total = stats.total_files,
        imported = stats.imported,
        already_existed = stats.already_existed,
        skipped_invalid = stats.skipped_invalid,
        failed = stats.failed,
        "import finished"
    );

    Ok(stats)
}

fn read_decision(path: &Path) -> Result<ParsedDecision> {
    let bytes = std::fs::read(path)?;
    let text = decode_text(&bytes);
    let source = path.to_string_lossy();
    Ok(parse_decision_text(&text, Some(source.as_ref())))
}

fn flush(db: &DecisionDb, batch: &mut Vec<ParsedDecision>, stats: &mut ImportStats) {
    if batch.is_empty() {
        return;
    }

    match db.insert_batch(batch) {
        Ok(outcome) => {
            stats.imported += outcome.inserted;
            stats.already_existed += outcome.duplicates;
            stats.failed += outcome.failures.len();
            for (filename, error) in outcome.failures {
                tracing::warn!(file = %filename, error = %error, "failed to insert decision");
                stats.errors.push(format!("{}: {}", filename, error));
            }
            tracing::debug!(imported = stats.imported, "batch committed");
        }
        Err(e) => {
            tracing::error!(error = %e, records = batch.len(), "batch failed");
            stats.failed += batch.len();
            stats.errors.push(format!("batch of {}: {}", batch.len(), e));
        }
    }

    batch.clear();
}
