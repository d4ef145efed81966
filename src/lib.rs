//! # rich-note-export
//!
//! A CLI tool that turns a note app's JSON export into a folder tree of Markdown files.
//!
//! ## What it does
//!
//! The export is two files: `folder.json` (folder guids and names) and
//! `rich_note.json` (one envelope per note, the note itself under `richNote`
//! with its body as HTML). Each note becomes one `.md` file:
//!
//! - placed under `exported_notes_md/<folder name>/`, or `.../<folder name>/pin/`
//!   for pinned notes; notes without a known folder land in `Unsorted`
//! - named after its title, or the first 20 characters of its text
//! - HTML checkboxes become `- [x] ` / `- [ ] ` task markers
//! - image sources are pointed at the `_thumb.png` files shipped with the export
//! - file access/modification times are set from the note's create/update times
//!
//! Input files are never modified. Existing output files are never overwritten:
//! a name that is taken gets a `_1`, `_2`, ... suffix, so a second run appends.
//!
//! ## Usage
//!
//! ```sh
//! # Inputs next to the binary, output next to the binary
//! rich-note-export
//!
//! # Inputs and output in a specific directory
//! rich-note-export ~/Downloads/notes-backup
//! ```
//!
//! Preferences can be persisted in `~/.config/rich-note-export/config.toml`.

pub mod importer;
pub mod paths;
pub mod renderer;
pub mod sequential;
pub mod timestamps;
pub mod utils;
