use eyre::{Context, Result};
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::importer::UNSORTED_FOLDER_NAME;

/// Name of the output tree created under the base directory.
pub const OUTPUT_DIR_NAME: &str = "exported_notes_md";
/// Subdirectory holding pinned notes inside a folder directory.
pub const PIN_DIR_NAME: &str = "pin";
pub const UNTITLED: &str = "Untitled";

/// Number of characters of the body used as a filename when a note has no title.
const PREVIEW_CHARS: usize = 20;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("valid regex"));

/// Replace characters that are not allowed in filenames with spaces and trim.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, " ").trim().to_string()
}

/// Filename stem for a note: its title, or a short preview of its body.
pub fn note_stem(title: &str, text: &str) -> String {
    let title = title.trim();
    let stem = if title.is_empty() {
        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        let preview = preview.replace('\n', " ");
        let preview = preview.trim();
        sanitize_filename(if preview.is_empty() { UNTITLED } else { preview })
    } else {
        sanitize_filename(title)
    };

    if stem.is_empty() {
        UNTITLED.to_string()
    } else {
        stem
    }
}

/// `topTime > 0`. Integer strings of any length are compared by their digits,
/// `true` counts as 1, anything unparseable counts as 0.
pub fn is_pinned(top_time: Option<&Value>) -> bool {
    match top_time {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|t| t > 0.0),
        Some(Value::String(s)) => is_positive_integer(s),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn is_positive_integer(s: &str) -> bool {
    let s = s.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.bytes().any(|b| b != b'0')
}

/// Directory a note is written to: `<output_root>/<folder>[/pin]`.
pub fn note_dir(output_root: &Path, folder_name: &str, pinned: bool) -> PathBuf {
    let folder = sanitize_filename(folder_name);
    let folder = if folder.is_empty() {
        UNSORTED_FOLDER_NAME.to_string()
    } else {
        folder
    };

    let dir = output_root.join(folder);
    if pinned { dir.join(PIN_DIR_NAME) } else { dir }
}

// Search the filesystem for the first free name in `stem.md`, `stem_1.md`, ...
// Files left behind by earlier runs count as taken, so reruns append.
pub fn allocate_path(dir: &Path, stem: &str) -> Result<PathBuf> {
    let mut path = dir.join(format!("{}.md", stem));
    let mut count = 1usize;
    while path
        .try_exists()
        .wrap_err_with(|| format!("Failed to check: {}", path.display()))?
    {
        path = dir.join(format!("{}_{}.md", stem, count));
        count += 1;
    }
    Ok(path)
}
