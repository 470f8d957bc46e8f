//! Integration tests for the virtual desktop file system

mod cli_contracts;
mod filesystem_properties;
mod legacy_snapshot;
