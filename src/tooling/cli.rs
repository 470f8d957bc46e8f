//! CLI Tooling
//!
//! Command-line interface for all file system operations. Every mutating
//! command commits a snapshot to the configured store before returning.

use crate::config::{ConfigLoader, DeskConfig, StorageBackend};
use crate::error::ApiError;
use crate::kernel::Kernel;
use crate::logging::{LogFormat, LogOutput};
use crate::seed;
use crate::store::Snapshot;
use crate::tooling::format::{
    format_listing_text, format_records_text, format_status_text, StatusOutput,
};
use crate::types::FileKind;
use crate::views;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// deskfs CLI - typed virtual desktop file system
#[derive(Parser)]
#[command(name = "deskfs")]
#[command(about = "Typed virtual desktop file system with snapshot persistence")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// sled store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, conflicts_with = "store")]
    pub memory: bool,

    /// Enable verbose logging to stderr
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List a directory (default: the current one)
    Ls {
        /// Path relative to the current directory, or absolute
        path: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the current directory
    Pwd,
    /// Change the current directory
    Cd {
        /// Target path; `..` steps up, a leading `/` starts at the root
        path: String,
    },
    /// Create a folder in the current directory
    Mkdir { name: String },
    /// Delete a folder and everything in it
    Rmdir { name: String },
    /// Rename a folder
    Mvdir { from: String, to: String },
    /// Add a file (replaces a file with the same name and type)
    Add {
        name: String,
        /// File type: image, document, music, video, app (or code 1-5)
        #[arg(value_name = "TYPE")]
        kind: FileKind,
        /// Content, usually a URL
        content: String,
    },
    /// Replace a file's content
    Update {
        name: String,
        #[arg(value_name = "TYPE")]
        kind: FileKind,
        content: String,
    },
    /// Delete a file
    Rm {
        name: String,
        #[arg(value_name = "TYPE")]
        kind: FileKind,
    },
    /// Rename a file, keeping its type
    Mv {
        from: String,
        to: String,
        #[arg(value_name = "TYPE")]
        kind: FileKind,
    },
    /// Change a file's type, keeping its name and content
    Reformat {
        name: String,
        /// New type
        #[arg(value_name = "TYPE")]
        to: FileKind,
        /// Current type; without it the first file with that name is used
        #[arg(long)]
        from: Option<FileKind>,
    },
    /// List every file in the tree, optionally of one type
    Fetch {
        #[arg(value_name = "TYPE")]
        kind: Option<FileKind>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Populate the current directory with sample folders and files
    Seed {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the snapshot as JSON
    Export {
        /// Destination file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace the whole tree from a JSON snapshot file
    Import { file: PathBuf },
    /// Show store and tree summary
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Load configuration and fold command-line overrides into it.
    pub fn resolve_config(&self) -> Result<DeskConfig, ApiError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&std::env::current_dir()?)?,
        };
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }
        if let Some(store) = &self.store {
            config.storage.backend = StorageBackend::Sled;
            config.storage.path = Some(store.clone());
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
            config.logging.output = LogOutput::Stderr;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(output) = self.log_output {
            config.logging.output = output;
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(config)
    }
}

/// Output format for commands that render tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::InvalidArgument(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidArgument(format!("Failed to render JSON: {}", e)))
}

/// CLI execution context: a kernel opened over the configured store.
pub struct CliContext {
    kernel: Kernel,
    config: DeskConfig,
}

impl CliContext {
    /// Open the configured store and restore its snapshot.
    pub fn new(config: DeskConfig) -> Result<Self, ApiError> {
        let store = config.storage.open_store()?;
        Self::with_store(config, store)
    }

    /// Open over an already constructed store.
    pub fn with_store(
        config: DeskConfig,
        store: Arc<dyn crate::store::KvStore>,
    ) -> Result<Self, ApiError> {
        let kernel = Kernel::open(store, config.storage.snapshot_key.clone())?;
        Ok(Self { kernel, config })
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ls { path, format } => {
                let format = parse_format(format)?;
                let (shown, entries) = self.kernel.read(|fs| {
                    let target = fs.cursor().join(path.as_deref().unwrap_or(""));
                    fs.directory_at(path.as_deref().unwrap_or(""))
                        .map(|dir| (target.to_string(), views::list_directory(dir)))
                })?;
                match format {
                    OutputFormat::Json => to_json(&entries),
                    OutputFormat::Text => Ok(format_listing_text(&shown, &entries)),
                }
            }
            Commands::Pwd => Ok(self.kernel.cursor().to_string()),
            Commands::Cd { path } => Ok(self.kernel.change_directory(path)?.to_string()),
            Commands::Mkdir { name } => Ok(if self.kernel.add_directory(name)? {
                format!("Created folder '{}'", name)
            } else {
                format!("Folder '{}' already exists", name)
            }),
            Commands::Rmdir { name } => Ok(match self.kernel.remove_directory(name)? {
                Some(removed) => format!(
                    "Removed folder '{}' ({} file(s) inside)",
                    name,
                    views::flatten(&removed).len()
                ),
                None => format!("No folder named '{}'", name),
            }),
            Commands::Mvdir { from, to } => Ok(if self.kernel.rename_directory(from, to)? {
                format!("Renamed folder '{}' to '{}'", from, to)
            } else {
                format!("No folder named '{}'", from)
            }),
            Commands::Add {
                name,
                kind,
                content,
            } => Ok(match self.kernel.add_file(name, content, *kind)? {
                Some(_) => format!("Replaced {} '{}'", kind, name),
                None => format!("Added {} '{}'", kind, name),
            }),
            Commands::Update {
                name,
                kind,
                content,
            } => Ok(match self.kernel.update_file(name, content, *kind)? {
                Some(_) => format!("Updated {} '{}'", kind, name),
                None => format!("Added {} '{}'", kind, name),
            }),
            Commands::Rm { name, kind } => Ok(if self.kernel.remove_file(name, *kind)? {
                format!("Removed {} '{}'", kind, name)
            } else {
                format!("No {} named '{}'", kind, name)
            }),
            Commands::Mv { from, to, kind } => {
                Ok(if self.kernel.rename_file(from, to, *kind)? {
                    format!("Renamed {} '{}' to '{}'", kind, from, to)
                } else {
                    format!("No {} named '{}'", kind, from)
                })
            }
            Commands::Reformat { name, to, from } => {
                Ok(match self.kernel.reformat_file(name, *from, *to)? {
                    Some(old) => format!("Changed '{}' from {} to {}", name, old, to),
                    None => match from {
                        Some(from) => format!("No {} named '{}'", from, name),
                        None => format!("No file named '{}'", name),
                    },
                })
            }
            Commands::Fetch { kind, format } => {
                let format = parse_format(format)?;
                let records = match kind {
                    Some(kind) => self.kernel.fetch_kind(*kind),
                    None => self.kernel.fetch_all(),
                };
                match format {
                    OutputFormat::Json if *kind == Some(FileKind::App) => {
                        to_json(&self.kernel.fetch_apps())
                    }
                    OutputFormat::Json => to_json(&records),
                    OutputFormat::Text => {
                        let title = match kind {
                            Some(kind) => format!("Files of type {}", kind),
                            None => "All files".to_string(),
                        };
                        Ok(format_records_text(&title, &records))
                    }
                }
            }
            Commands::Seed { format } => {
                let format = parse_format(format)?;
                let report = seed::populate(&self.kernel)?;
                match format {
                    OutputFormat::Json => to_json(&report),
                    OutputFormat::Text => Ok(format!(
                        "Seeded {} folder(s) and {} file(s)",
                        report.folders_created, report.files_written
                    )),
                }
            }
            Commands::Export { output } => {
                let json = self.kernel.snapshot().to_json_pretty()?;
                match output {
                    Some(path) => {
                        std::fs::write(path, &json)?;
                        info!(path = %path.display(), "Exported snapshot");
                        Ok(format!("Wrote snapshot to {}", path.display()))
                    }
                    None => Ok(json),
                }
            }
            Commands::Import { file } => {
                let bytes = std::fs::read(file)?;
                let snapshot = Snapshot::from_json(&file.display().to_string(), &bytes)?;
                let files = views::flatten(&snapshot.files).len();
                self.kernel.restore(snapshot)?;
                Ok(format!(
                    "Restored {} file(s) from {}; current directory {}",
                    files,
                    file.display(),
                    self.kernel.cursor()
                ))
            }
            Commands::Status { format } => {
                let format = parse_format(format)?;
                let status = self.status()?;
                match format {
                    OutputFormat::Json => to_json(&status),
                    OutputFormat::Text => Ok(format_status_text(&status)),
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn status(&self) -> Result<StatusOutput, ApiError> {
        let storage = &self.config.storage;
        let (backend, store_path) = match storage.backend {
            StorageBackend::Sled => (
                "sled",
                Some(storage.resolve_path()?.display().to_string()),
            ),
            StorageBackend::Memory => ("memory", None),
        };
        let (cursor, tree) = self
            .kernel
            .read(|fs| (fs.cursor().to_string(), views::tree_stats(fs.files())));
        Ok(StatusOutput {
            backend: backend.to_string(),
            store_path,
            snapshot_key: self.kernel.snapshot_key().to_string(),
            cursor,
            tree,
        })
    }
}
