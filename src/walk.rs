use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use walkdir::WalkDir;

/// What happened to one matched file.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Output produced (or, in a dry run, would have been).
    Written,
    /// File held no records; nothing written.
    Skipped,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub found: usize,
    pub written: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl BatchStats {
    pub fn print(&self, dry_run: bool) {
        let verb = if dry_run { "would write" } else { "written" };
        println!(
            "{} files found: {} {}, {} without records, {} failed.",
            self.found, self.written, verb, self.skipped, self.errors,
        );
    }
}

/// Every file named exactly `file_name` below `root`, in a stable order.
/// The list is taken once up front; unreadable entries are logged and skipped.
pub fn find_files(root: &Path, file_name: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(|e| e.into_path())
        .collect()
}

/// Name of the folder holding `path`, with digits removed and trimmed.
///
/// `Kapitel 3 Verträge/2 Lehrmittel.md` → `Kapitel  Verträge`.
pub fn assignment_id(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| {
            name.to_string_lossy()
                .chars()
                .filter(|c| !c.is_ascii_digit())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// Run `process` over every file. A failing file is logged and counted; the
/// batch always continues with the next one.
pub fn run_batch<F>(files: &[PathBuf], mut process: F) -> Result<BatchStats>
where
    F: FnMut(&Path) -> Result<Outcome>,
{
    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stats = BatchStats {
        found: files.len(),
        ..Default::default()
    };

    for path in files {
        pb.set_message(path.display().to_string());
        match pb.suspend(|| process(path)) {
            Ok(Outcome::Written) => stats.written += 1,
            Ok(Outcome::Skipped) => stats.skipped += 1,
            Err(e) => {
                warn!("Error processing {}: {:#}", path.display(), e);
                stats.errors += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(stats)
}

// ── Tests ──
