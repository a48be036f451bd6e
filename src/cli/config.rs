//! `config` command.

use crate::config::StudySphereConfig;
use crate::rendering::BuildingImageIndex;
use crate::{Error, Result};
use std::io::Write;

/// Prints the effective configuration and the resolved image index.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn cmd_config_show<W: Write>(config: &StudySphereConfig, out: &mut W) -> Result<()> {
    let toml = config.to_toml()?;
    let index = BuildingImageIndex::from_config(&config.images);

    let write_err = |e: std::io::Error| Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    };

    writeln!(out, "{}", toml.trim_end()).map_err(write_err)?;
    writeln!(out).map_err(write_err)?;
    writeln!(out, "# Building images").map_err(write_err)?;
    for (group, image) in index.entries() {
        writeln!(out, "#   {group} -> {image}").map_err(write_err)?;
    }
    writeln!(out, "#   (default) -> {}", index.default_image()).map_err(write_err)
}
