//! Common functionality for building fuel supply chain tables for energy system models.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod commodity;
pub mod graph;
pub mod id;
pub mod input;
pub mod log;
pub mod mapping;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod price;
pub mod region;
pub mod sector;
pub mod settings;
pub mod tables;
pub mod technology;

#[cfg(test)]
mod fixture;

/// The name of the folder (within the user's config dir) holding program configuration
const CONFIG_DIR_NAME: &str = "can_fuel";

/// Where users should report bugs
pub const ISSUES_URL: &str = "https://github.com/energy-modelling/can_fuel/issues";

/// Get the directory in which program configuration files are stored
pub fn get_can_fuel_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform; fall back to the working directory
        return PathBuf::new();
    };
    config_dir.push(CONFIG_DIR_NAME);

    config_dir
}
