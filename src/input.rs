//! Common routines for handling input data.
use crate::naming::Nomenclature;
use crate::price::PriceSeries;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod emission;
use emission::{EmissionFactor, read_emission_factors};
pub mod fuel;
use fuel::{FuelReference, read_fuel_reference};
pub mod params;
use params::RunParameters;
pub mod price;
use price::read_price_series;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec.into_iter())
}

fn read_csv_internal<'a, T: DeserializeOwned + 'a>(file_path: &'a Path) -> Result<Vec<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Check whether an iterator contains values that are sorted and unique
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// All the reference data needed to build the output tables for one run
#[derive(Debug)]
pub struct InputData {
    /// Parameters for this run
    pub params: RunParameters,
    /// Normalised raw price series
    pub prices: PriceSeries,
    /// The commodity list and fuel names
    pub fuel_reference: FuelReference,
    /// Emission factors, upstream factors first
    pub emission_factors: Vec<EmissionFactor>,
}

impl InputData {
    /// The naming tables for commodities and technologies
    pub fn nomenclature(&self) -> Nomenclature {
        Nomenclature::new(self.fuel_reference.fuels.clone())
    }
}

/// Read all input files from the specified directory.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
///
/// # Returns
///
/// The loaded input data or an error if any file is missing or invalid.
pub fn load_inputs(input_dir: &Path) -> Result<InputData> {
    let params = RunParameters::from_path(input_dir)?;
    let prices = read_price_series(input_dir, &params.periods, &params.price_unit)?;
    let fuel_reference = read_fuel_reference(input_dir)?;
    let emission_factors = read_emission_factors(input_dir)?;

    info!(
        "Read {} commodities, {} fuels, {} price series and {} emission factors",
        fuel_reference.commodities.len(),
        fuel_reference.fuels.len(),
        prices.num_labels(),
        emission_factors.len()
    );

    Ok(InputData {
        params,
        prices,
        fuel_reference,
        emission_factors,
    })
}
