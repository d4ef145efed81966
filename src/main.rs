use clap::Parser;
use eyre::{Context, Result, eyre};
use rich_note_export::{sequential, utils};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert a note app export (folder.json + rich_note.json) into Markdown files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding folder.json and rich_note.json; the output is written here too.
    /// Defaults to the directory containing this executable.
    #[arg(value_name = "BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Path to the folder list. Defaults to BASE_DIR/folder.json.
    #[arg(long, value_name = "PATH")]
    folders: Option<PathBuf>,

    /// Path to the notes. Defaults to BASE_DIR/rich_note.json.
    #[arg(long, value_name = "PATH")]
    notes: Option<PathBuf>,

    /// Output directory. Defaults to BASE_DIR/exported_notes_md.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/rich-note-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log each file written.
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar. Warnings are still printed.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    base_dir: Option<PathBuf>,
    folders_path: Option<PathBuf>,
    notes_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

fn default_base_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().wrap_err("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| eyre!("Executable has no parent directory: {}", exe.display()))
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("rich-note-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve base_dir (CLI > Config > executable dir)
    let base_dir = match cli.base_dir.or(file_cfg.base_dir) {
        Some(dir) => dir,
        None => default_base_dir()?,
    };

    // 3. Individual paths override the base_dir layout (CLI > Config)
    let mut config = utils::ExportConfig::for_base_dir(&base_dir);
    if let Some(p) = cli.folders.or(file_cfg.folders_path) {
        config.folders_path = p;
    }
    if let Some(p) = cli.notes.or(file_cfg.notes_path) {
        config.notes_path = p;
    }
    if let Some(p) = cli.output.or(file_cfg.output_dir) {
        config.output_dir = p;
    }
    config.quiet = cli.quiet;

    // 4. Run the Business Logic
    let summary = sequential::execute(&config)?;
    println!("{}", summary);
    Ok(())
}
