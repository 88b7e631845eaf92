//! Code for reading emission factors.
use super::{input_err_msg, read_csv};
use crate::commodity::CommodityID;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

/// Emissions from producing and delivering fuels
const UPSTREAM_EMISSIONS_FILE_NAME: &str = "upstream_emissions_fuels.csv";

/// Emissions from burning fuels
const DIRECT_EMISSIONS_FILE_NAME: &str = "direct_comb_emission.csv";

/// An emission factor for a commodity
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmissionFactor {
    /// The emitted commodity (e.g. `CO2eq`)
    pub emission: CommodityID,
    /// The commodity whose production or use causes the emission
    pub commodity: CommodityID,
    /// Emissions per unit of activity
    pub value: f64,
    /// Units of `value`
    pub units: String,
    /// Free-text notes
    pub notes: String,
    /// Reference to the data source (e.g. `[F4]`)
    pub source: String,
}

/// Read emission factors from the specified input directory: upstream factors, then direct ones
pub fn read_emission_factors(input_dir: &Path) -> Result<Vec<EmissionFactor>> {
    let mut factors = Vec::new();
    for file_name in [UPSTREAM_EMISSIONS_FILE_NAME, DIRECT_EMISSIONS_FILE_NAME] {
        let file_path = input_dir.join(file_name);
        let iter = read_csv::<EmissionFactor>(&file_path)?;
        let mut file_factors =
            read_emission_factors_from_iter(iter).with_context(|| input_err_msg(&file_path))?;
        factors.append(&mut file_factors);
    }

    Ok(factors)
}

fn read_emission_factors_from_iter<I>(iter: I) -> Result<Vec<EmissionFactor>>
where
    I: Iterator<Item = EmissionFactor>,
{
    iter.map(|factor| {
        ensure!(
            factor.value.is_finite(),
            "Invalid emission factor for {} from {}: {}",
            factor.emission,
            factor.commodity,
            factor.value
        );
        Ok(factor)
    })
    .collect()
}
