/// Type definitions for the note application's export files.
///
/// The export consists of two JSON arrays sitting next to each other:
///
/// - `folder.json`    – `[{ "guid": "...", "name": "..." }, ...]`
/// - `rich_note.json` – `[{ "richNote": { ... } }, ...]`
///
/// Field shapes drift between app versions: `topTime`, `createTime` and
/// `updateTime` show up as integers in some exports and as strings in others,
/// so those are kept as raw JSON values and interpreted at the point of use.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Folder the source app uses for notes hidden from the main list.
pub const HIDDEN_FOLDER_GUID: &str = "55a54008-ad1b-3589-aa21-0d2629c1df41";
pub const HIDDEN_FOLDER_NAME: &str = "Hidden Notes";

/// `folderGuid` value the app writes for notes that belong to no folder.
pub const NO_FOLDER_GUID: &str = "00000000_0000_0000_0000_000000000000";

/// Folder name used when a note's `folderGuid` is not in the index.
pub const UNSORTED_FOLDER_NAME: &str = "Unsorted";

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    pub guid: String,
    pub name: String,
}

/// Read-only guid → display name lookup, built once per run.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    names: HashMap<String, String>,
}

impl FolderIndex {
    /// Index every folder, then add the synthetic hidden-notes folder.
    pub fn build(folders: impl IntoIterator<Item = Folder>) -> Self {
        let mut names: HashMap<String, String> = folders
            .into_iter()
            .map(|folder| (folder.guid, folder.name))
            .collect();
        names.insert(HIDDEN_FOLDER_GUID.to_string(), HIDDEN_FOLDER_NAME.to_string());
        Self { names }
    }

    pub fn name_for(&self, guid: &str) -> Option<&str> {
        self.names.get(guid).map(String::as_str)
    }

    /// Display name for `guid`, or [`UNSORTED_FOLDER_NAME`] when unknown.
    pub fn folder_name(&self, guid: &str) -> &str {
        self.name_for(guid).unwrap_or(UNSORTED_FOLDER_NAME)
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// One element of `rich_note.json`. Only `richNote` matters; envelopes
/// without it are not notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteEnvelope {
    #[serde(rename = "richNote", default)]
    pub rich_note: Option<Value>,
}

impl NoteEnvelope {
    /// The rich note payload, or `None` unless it is a non-empty object.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        self.rich_note
            .as_ref()
            .and_then(Value::as_object)
            .filter(|map| !map.is_empty())
    }
}

/// Deserialize `T`, or `None` when the value has some other JSON type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Every field is optional and a wrongly typed field reads as absent, so one
/// bad field only loses its own default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichNote {
    #[serde(default, deserialize_with = "lenient")]
    pub folder_guid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub html_text: Option<String>,
    #[serde(default)]
    pub top_time: Option<Value>,
    #[serde(default)]
    pub create_time: Option<Value>,
    #[serde(default)]
    pub update_time: Option<Value>,
}

impl RichNote {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        // Fields are lenient and unknown keys ignored: an object always parses.
        serde_json::from_value(Value::Object(payload.clone())).unwrap_or_default()
    }

    pub fn folder_guid(&self) -> &str {
        self.folder_guid.as_deref().unwrap_or(NO_FOLDER_GUID)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn html_text(&self) -> &str {
        self.html_text.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read: {}", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse: {}", path.display()))
}

pub fn load_folders(path: &Path) -> Result<Vec<Folder>> {
    load_json(path)
}

pub fn load_notes(path: &Path) -> Result<Vec<NoteEnvelope>> {
    load_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn folder(guid: &str, name: &str) -> Folder {
        Folder {
            guid: guid.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn index_includes_hidden_folder() {
        let index = FolderIndex::build(vec![folder("g1", "Work")]);
        assert_eq!(index.name_for("g1"), Some("Work"));
        assert_eq!(index.name_for(HIDDEN_FOLDER_GUID), Some(HIDDEN_FOLDER_NAME));
    }

    #[test]
    fn hidden_folder_overrides_input_with_same_guid() {
        let index = FolderIndex::build(vec![folder(HIDDEN_FOLDER_GUID, "Secret")]);
        assert_eq!(index.folder_name(HIDDEN_FOLDER_GUID), HIDDEN_FOLDER_NAME);
    }

    #[test]
    fn unknown_guid_falls_back_to_unsorted() {
        let index = FolderIndex::build(Vec::new());
        assert_eq!(index.name_for("missing"), None);
        assert_eq!(index.folder_name("missing"), UNSORTED_FOLDER_NAME);
        assert_eq!(index.folder_name(NO_FOLDER_GUID), UNSORTED_FOLDER_NAME);
    }

    #[test]
    fn envelope_payload_skips_missing_null_and_empty() {
        let envelopes: Vec<NoteEnvelope> = serde_json::from_value(json!([
            {},
            { "richNote": null },
            { "richNote": {} },
            { "other": 1, "richNote": { "title": "x" } },
        ]))
        .unwrap();
        let present: Vec<bool> = envelopes.iter().map(|e| e.payload().is_some()).collect();
        assert_eq!(present, vec![false, false, false, true]);
    }

    #[test]
    fn envelope_payload_skips_non_objects() {
        let envelopes: Vec<NoteEnvelope> = serde_json::from_value(json!([
            { "richNote": "" },
            { "richNote": [] },
            { "richNote": 0 },
            { "richNote": false },
            { "richNote": "text" },
        ]))
        .unwrap();
        assert!(envelopes.iter().all(|e| e.payload().is_none()));
    }

    #[test]
    fn rich_note_defaults() {
        let payload = json!({ "title": "Hello", "extra": true });
        let note = RichNote::from_payload(payload.as_object().unwrap());
        assert_eq!(note.title(), "Hello");
        assert_eq!(note.text(), "");
        assert_eq!(note.html_text(), "");
        assert_eq!(note.folder_guid(), NO_FOLDER_GUID);
        assert!(note.top_time.is_none());
    }

    #[test]
    fn rich_note_ignores_only_the_wrongly_typed_field() {
        let payload = json!({
            "folderGuid": 7,
            "title": "Hello",
            "text": 42,
            "htmlText": "<p>Hi</p>",
        });
        let note = RichNote::from_payload(payload.as_object().unwrap());
        assert_eq!(note.folder_guid(), NO_FOLDER_GUID);
        assert_eq!(note.title(), "Hello");
        assert_eq!(note.text(), "");
        assert_eq!(note.html_text(), "<p>Hi</p>");
    }

    #[test]
    fn rich_note_keeps_heterogeneous_times() {
        let payload = json!({
            "topTime": "5",
            "createTime": 1_700_000_000_000_i64,
            "updateTime": "Jan 5, 2023 14:30:00",
        });
        let note = RichNote::from_payload(payload.as_object().unwrap());
        assert_eq!(note.top_time, Some(json!("5")));
        assert_eq!(note.create_time, Some(json!(1_700_000_000_000_i64)));
        assert_eq!(note.update_time, Some(json!("Jan 5, 2023 14:30:00")));
    }

    #[test]
    fn load_folders_reports_path_on_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("folder.json");
        let err = load_folders(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("folder.json"));

        fs::write(&missing, "not json").unwrap();
        let err = load_folders(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn load_notes_reads_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rich_note.json");
        fs::write(
            &path,
            r#"[{"richNote":{"title":"a"}},{"note":{}},{"richNote":""},{"richNote":[]}]"#,
        )
        .unwrap();
        let notes = load_notes(&path).unwrap();
        assert_eq!(notes.len(), 4);
        assert!(notes[0].payload().is_some());
        assert!(notes[1..].iter().all(|n| n.payload().is_none()));
    }
}
