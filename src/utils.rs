use std::fs::{File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::paths::OUTPUT_DIR_NAME;

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub folders_path: PathBuf,
    pub notes_path: PathBuf,
    pub output_dir: PathBuf,
    pub quiet: bool,
}

impl ExportConfig {
    /// Inputs and output laid out next to each other under `base_dir`.
    pub fn for_base_dir(base_dir: &Path) -> Self {
        Self {
            folders_path: base_dir.join("folder.json"),
            notes_path: base_dir.join("rich_note.json"),
            output_dir: base_dir.join(OUTPUT_DIR_NAME),
            quiet: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    Created,
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub created: usize,
    pub total: usize,
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Created {} files for {} notes.", self.created, self.total)
    }
}

pub fn epoch_to_system_time(secs: i64) -> SystemTime {
    let offset = Duration::from_secs(secs.unsigned_abs());
    if secs >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}

pub fn now_epoch() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// Set access and modification times of an existing file.
pub fn apply_file_times(path: &Path, accessed: i64, modified: i64) -> io::Result<()> {
    let times = FileTimes::new()
        .set_accessed(epoch_to_system_time(accessed))
        .set_modified(epoch_to_system_time(modified));
    File::options().write(true).open(path)?.set_times(times)
}
