use chatgpt_openwebui::utils::{self, DEFAULT_EXPORT_PATH, DEFAULT_OUTPUT_PATH, ImportConfig};
use chatgpt_openwebui::sequential;
use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Convert a ChatGPT data export into an Open WebUI chat import file.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to conversations.json from the unzipped ChatGPT export.
    /// Defaults to ./chatgpt-export/conversations.json if not set in config.
    #[arg(value_name = "EXPORT")]
    export: Option<PathBuf>,

    /// Where to write the Open WebUI JSON.
    /// Defaults to ./converted_openwebui.json if not set in config.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Folders to search for `file-*` images, in order (repeatable or comma-separated).
    /// Defaults to the export's folder and its dalle-generations/ subfolder.
    #[arg(long, value_name = "DIR", value_delimiter = ',')]
    images: Option<Vec<PathBuf>>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/chatgpt-openwebui/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log each indexed folder and conversion step.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress warnings and the final summary.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default, Debug)]
struct FileConfig {
    export_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    image_folders: Option<Vec<PathBuf>>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("chatgpt-openwebui/config.toml"))
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

/// CLI > config file > defaults, field by field.
fn resolve_config(cli: Cli, file_cfg: FileConfig) -> ImportConfig {
    let export_path = cli
        .export
        .or(file_cfg.export_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH));

    let output_path = cli
        .output
        .or(file_cfg.output_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    let image_folders = cli
        .images
        .or(file_cfg.image_folders)
        .unwrap_or_else(|| utils::default_image_folders(&export_path));

    ImportConfig {
        export_path,
        output_path,
        image_folders,
        verbose: cli.verbose,
        quiet: cli.quiet,
    }
}

/// Log level used when `RUST_LOG` is unset.
fn default_log_level(config: &ImportConfig) -> &'static str {
    match (config.quiet, config.verbose) {
        (true, _) => "error",
        (false, true) => "info",
        (false, false) => "warn",
    }
}

fn init_tracing(config: &ImportConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(config)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let file_cfg = load_file_config(cli.config.as_deref())?;
    let config = resolve_config(cli, file_cfg);
    init_tracing(&config);

    if !config.export_path.exists() {
        return Err(eyre!(
            "Export not found at: {}\nPass the path to conversations.json as the first argument.",
            config.export_path.display()
        ));
    }

    let summary = sequential::execute(&config)?;

    if !config.quiet {
        let mut line = format!(
            "Done. {} conversations, {} messages, {} images embedded. Saved as {}",
            summary.conversations,
            summary.messages,
            summary.images_embedded,
            config.output_path.display()
        );
        if !summary.warnings.is_empty() {
            line.push_str(&format!(
                " Completed with {} warning(s).",
                summary.warnings.len()
            ));
        }
        eprintln!("{}", line);
    }

    Ok(())
}
