use crate::exporter::{self, Chat};
use crate::importer::Conversation;
use eyre::{Context, Result};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_EXPORT_PATH: &str = "chatgpt-export/conversations.json";
pub const DEFAULT_OUTPUT_PATH: &str = "converted_openwebui.json";
/// Subfolder of the export that holds DALL·E images.
pub const DALLE_FOLDER: &str = "dalle-generations";

/// Configuration required to run the import conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug)]
pub struct ImportConfig {
    pub export_path: PathBuf,
    pub output_path: PathBuf,
    pub image_folders: Vec<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
}

impl ImportConfig {
    pub fn new(export_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        let export_path = export_path.into();
        let image_folders = default_image_folders(&export_path);
        Self {
            export_path,
            output_path: output_path.into(),
            image_folders,
            verbose: false,
            quiet: false,
        }
    }
}

/// The export's own directory and its `dalle-generations/` subfolder.
pub fn default_image_folders(export_path: &Path) -> Vec<PathBuf> {
    let root = export_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    vec![root.to_path_buf(), root.join(DALLE_FOLDER)]
}

/// Read and parse `conversations.json`.
pub fn read_export(path: &Path) -> Result<Vec<Conversation>> {
    let file = fs::File::open(path)
        .wrap_err_with(|| format!("Failed to open export: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to parse export: {}", path.display()))
}

/// Write the chats through a temporary file in the target directory, then
/// move it into place. A failed run leaves no output file behind.
pub fn write_output(path: &Path, chats: &[Chat]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create output directory: {}", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir).wrap_err("Failed to create temporary file")?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        exporter::write_chats(&mut writer, chats)?;
        writer.flush().wrap_err("Failed to flush output file")?;
    }
    tmp.persist(path)
        .wrap_err_with(|| format!("Failed to write output: {}", path.display()))?;
    Ok(())
}
