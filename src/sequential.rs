use crate::importer::{self, FolderIndex, NoteEnvelope, RichNote};
use crate::paths::{allocate_path, is_pinned, note_dir, note_stem};
use crate::renderer::Renderer;
use crate::timestamps::resolve_epoch;
use crate::utils::{ExportConfig, ExportSummary, ProcessResult, apply_file_times, now_epoch};
use eyre::{Context, Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// The main entry point for the export logic.
/// Loads both input files and writes one Markdown file per rich note.
pub fn execute(config: &ExportConfig) -> Result<ExportSummary> {
    let folders = importer::load_folders(&config.folders_path)?;
    let index = FolderIndex::build(folders);
    let notes = importer::load_notes(&config.notes_path)?;

    run_internal(&index, &notes, config, now_epoch())
}

/// Process `notes` in order. `now` is the timestamp used for notes whose
/// create/update times are missing or unreadable.
pub fn run_internal(
    index: &FolderIndex,
    notes: &[NoteEnvelope],
    config: &ExportConfig,
    now: i64,
) -> Result<ExportSummary> {
    let renderer = Renderer::new();
    let pb = progress_bar(notes.len() as u64, config.quiet);
    let mut summary = ExportSummary {
        created: 0,
        total: notes.len(),
    };

    for envelope in notes {
        pb.inc(1);
        if let ProcessResult::Created =
            process_envelope(envelope, index, &renderer, config, &pb, now)?
        {
            summary.created += 1;
        }
    }

    pb.finish_and_clear();
    Ok(summary)
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Exporting notes...");
    pb
}

fn process_envelope(
    envelope: &NoteEnvelope,
    index: &FolderIndex,
    renderer: &Renderer,
    config: &ExportConfig,
    pb: &ProgressBar,
    now: i64,
) -> Result<ProcessResult> {
    let Some(payload) = envelope.payload() else {
        return Ok(ProcessResult::Skipped);
    };
    let note = RichNote::from_payload(payload);
    export_note(&note, index, renderer, config, pb, now)
}

// Log records go through `pb.suspend` so they don't tear the progress bar.
pub fn export_note(
    note: &RichNote,
    index: &FolderIndex,
    renderer: &Renderer,
    config: &ExportConfig,
    pb: &ProgressBar,
    now: i64,
) -> Result<ProcessResult> {
    let folder_name = index.folder_name(note.folder_guid());
    let dir = note_dir(
        &config.output_dir,
        folder_name,
        is_pinned(note.top_time.as_ref()),
    );
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create directory: {}", dir.display()))?;

    let stem = note_stem(note.title(), note.text());
    let path = allocate_path(&dir, &stem)?;

    let markdown = renderer
        .html_to_markdown(note.html_text())
        .wrap_err_with(|| format!("Failed to render: {}", path.display()))?;
    write_new_file(&path, &markdown)?;
    pb.suspend(|| log::info!("Created: {}", path.display()));

    let created = resolve_epoch(note.create_time.as_ref(), now);
    let updated = resolve_epoch(note.update_time.as_ref(), now);
    if let Err(e) = apply_file_times(&path, created, updated) {
        pb.suspend(|| log::warn!("Error setting times for {}: {}", path.display(), e));
    }

    Ok(ProcessResult::Created)
}

// `allocate_path` has just confirmed the path is free. Finding it occupied
// here means something else is writing into the output tree; stop instead of
// overwriting.
fn write_new_file(path: &Path, contents: &str) -> Result<()> {
    let file = match File::create_new(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(eyre!("File {} already exists.", path.display()));
        }
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("Failed to create: {}", path.display()));
        }
    };

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .wrap_err_with(|| format!("Failed to write: {}", path.display()))
}
