//! The module responsible for writing output data to disk.
use crate::graph::CommodityGraph;
use crate::tables::ModelTables;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The output file name for the commodity graph
pub const GRAPH_FILE_NAME: &str = "commodity_graph.dot";

/// Get the default output folder for the input data in the specified directory
pub fn get_output_dir(input_dir: &Path, results_root: &Path) -> Result<PathBuf> {
    // Get the input set name from the dir path. This ends up being convoluted because we need to
    // check for all possible errors. Ugh.
    let input_dir = input_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to input data")?;

    let input_name = input_dir
        .file_name()
        .context("Input data cannot be in root folder")?
        .to_str()
        .context("Invalid chars in input dir name")?;

    // Construct path
    Ok(results_root.join(input_name))
}

/// Create a new output directory, if it doesn't already exist.
///
/// An existing directory may only be reused if it is empty or `allow_overwrite` is true.
///
/// # Returns
///
/// True if existing output files will be overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Rerun with --overwrite to replace \
             its contents."
        );

        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Write rows of a table to a CSV file named after the table.
///
/// A header row is written before the first record, so an empty table gives an empty file.
fn write_table<T: Serialize>(output_path: &Path, table_name: &str, rows: &[T]) -> Result<()> {
    let file_path = output_path.join(format!("{table_name}.csv"));
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write every output table to a separate CSV file in the output folder
pub fn write_tables(output_path: &Path, tables: &ModelTables) -> Result<()> {
    write_table(output_path, "Commodity", &tables.commodities)?;
    write_table(output_path, "Technology", &tables.technologies)?;
    write_table(output_path, "Efficiency", &tables.efficiencies)?;
    write_table(output_path, "CostVariable", &tables.costs)?;
    write_table(output_path, "EmissionActivity", &tables.emissions)?;
    write_table(output_path, "DataSet", &tables.datasets)?;
    write_table(output_path, "DataSource", &tables.data_sources)?;
    write_table(output_path, "SectorLabel", &tables.sector_labels)?;

    Ok(())
}

/// Write the commodity graph to the output folder in DOT format
pub fn write_commodity_graph(output_path: &Path, graph: &CommodityGraph) -> Result<()> {
    let file_path = output_path.join(GRAPH_FILE_NAME);
    graph
        .save(&file_path)
        .with_context(|| format!("Failed to write {}", file_path.display()))
}
