use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::parser::{render_aggregate, ExtractionUnit};

pub const AGGREGATE_FILE: &str = "complete_text.txt";
pub const FLAT_FILE: &str = "complete_text2.txt";

pub fn unit_file_name(index: usize) -> String {
    format!("articulo_{}.txt", index)
}

/// Paths written by one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub aggregate: PathBuf,
    pub units: Vec<PathBuf>,
}

/// Create or truncate `path` and write `text` as UTF-8.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let file = File::create(path).map_err(|e| ScrapeError::io(path, e))?;
    write_into(file, path, text)
}

fn write_into(file: File, path: &Path, text: &str) -> Result<()> {
    let mut out = BufWriter::new(file);
    out.write_all(text.as_bytes())
        .map_err(|e| ScrapeError::io(path, e))?;
    out.flush().map_err(|e| ScrapeError::io(path, e))?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        let err = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory");
        return Err(ScrapeError::io(dir, err));
    }
    fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))
}

/// One `articulo_{N}.txt` per unit (unlabeled), then the labeled aggregate.
/// With no units only an empty aggregate is written.
pub fn write_articles(dir: &Path, units: &[ExtractionUnit]) -> Result<OutputFiles> {
    ensure_directory(dir)?;
    let mut batch = Batch::default();

    let pb = unit_progress(units.len());
    for (i, unit) in units.iter().enumerate() {
        let path = dir.join(unit_file_name(unit.index.unwrap_or(i + 1)));
        batch.write(&path, &unit.text)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let aggregate = dir.join(AGGREGATE_FILE);
    batch.write(&aggregate, &render_aggregate(units))?;

    let mut paths = batch.commit();
    paths.pop();
    info!("Wrote {} article files and {}", paths.len(), aggregate.display());
    Ok(OutputFiles {
        aggregate,
        units: paths,
    })
}

/// The single flat text file.
pub fn write_flat(dir: &Path, unit: &ExtractionUnit) -> Result<OutputFiles> {
    ensure_directory(dir)?;
    let aggregate = dir.join(FLAT_FILE);
    write_text(&aggregate, &render_aggregate(std::slice::from_ref(unit)))?;
    info!("Wrote {} ({} bytes)", aggregate.display(), unit.text.len());
    Ok(OutputFiles {
        aggregate,
        units: Vec::new(),
    })
}

/// Files written so far by one call; removed again on drop unless committed,
/// so a failed run does not leave half a set behind.
#[derive(Default)]
struct Batch {
    written: Vec<PathBuf>,
    committed: bool,
}

impl Batch {
    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        let file = File::create(path).map_err(|e| ScrapeError::io(path, e))?;
        // only files this batch actually opened are ever rolled back
        self.written.push(path.to_path_buf());
        write_into(file, path, text)
    }

    fn commit(mut self) -> Vec<PathBuf> {
        self.committed = true;
        std::mem::take(&mut self.written)
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.written {
            if path.is_file() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("Could not remove partial output {}: {}", path.display(), e);
                }
            }
        }
    }
}

fn unit_progress(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} articles") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

// ── Tests ──
