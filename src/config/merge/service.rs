//! MergeService: stacks the configuration layers and deserializes the result.

use crate::config::sources::{environment, global_file, local_file};
use crate::config::DeskConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

pub struct MergeService;

impl MergeService {
    /// Defaults, then the global file, then `deskfs.toml` in `dir`, then
    /// environment variables. Later layers win.
    pub fn load(dir: &Path) -> Result<DeskConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = local_file::add_to_builder(builder, dir)?;
        finish(builder)
    }

    /// Defaults, then exactly `path`, then environment variables.
    pub fn load_from_file(path: &Path) -> Result<DeskConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        finish(builder)
    }
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<DeskConfig, ConfigError> {
    builder
        .add_source(environment::source())
        .build()?
        .try_deserialize()
}
