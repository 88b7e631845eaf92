//! Defines the `RunParameters` struct, which represents the contents of `params.toml`.
use crate::input::{input_err_msg, is_sorted_and_unique, read_toml};
use crate::price::PricingConstants;
use crate::region::{DataID, RegionID, national_data_id, province_data_id};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const RUN_PARAMETERS_FILE_NAME: &str = "params.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(
    default_provinces,
    Vec<RegionID>,
    ["AB", "ON", "BC", "MB", "SK", "QC"].map(RegionID::new).to_vec()
);
define_param_default!(default_national_region, RegionID, "CAN".into());
define_param_default!(default_price_unit, String, "2024 $/MMBtu".into());
define_param_default!(default_cost_unit, String, "2020 M$/PJ".into());

/// Represents the contents of the entire parameters file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct RunParameters {
    /// Periods for which prices are resolved; also used as vintages
    pub periods: Vec<u32>,
    /// Version number of the generated datasets
    pub version: u32,
    /// Provinces for which rows are generated
    #[serde(default = "default_provinces")]
    pub provinces: Vec<RegionID>,
    /// The region used to tag data shared by all provinces
    #[serde(default = "default_national_region")]
    pub national_region: RegionID,
    /// Only raw prices in this unit are used
    #[serde(default = "default_price_unit")]
    pub price_unit: String,
    /// The unit of the resolved variable costs
    #[serde(default = "default_cost_unit")]
    pub cost_unit: String,
    /// Conversion factors and fixed prices
    #[serde(default)]
    pub pricing: PricingConstants,
    /// Fields of the dataset table
    #[serde(default)]
    pub dataset: DatasetInfo,
}

/// Descriptive fields for the rows of the dataset table
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetInfo {
    /// What the dataset contains
    pub description: String,
    /// Status of the dataset (e.g. `active`)
    pub status: String,
    /// Who produced the dataset
    pub author: String,
    /// When the dataset was produced
    pub date: String,
    /// Changes since the previous version
    pub changelog: String,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            description: "2025 annual update".into(),
            status: "active".into(),
            author: String::new(),
            date: String::new(),
            changelog: "Original sector design".into(),
        }
    }
}

/// Check that the `periods` parameter is valid
fn check_periods(periods: &[u32]) -> Result<()> {
    ensure!(!periods.is_empty(), "`periods` is empty");

    ensure!(
        is_sorted_and_unique(periods),
        "`periods` must be composed of unique values in order"
    );

    Ok(())
}

/// Check that the regions are valid
fn check_regions(provinces: &[RegionID], national_region: &RegionID) -> Result<()> {
    ensure!(!provinces.is_empty(), "`provinces` is empty");

    let mut seen = HashSet::new();
    for province in provinces {
        ensure!(
            seen.insert(province),
            "Province {province} is listed more than once"
        );
    }

    ensure!(
        !seen.contains(national_region),
        "The national region ({national_region}) cannot also be a province"
    );

    Ok(())
}

impl RunParameters {
    /// Read a parameters file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Folder containing input files
    ///
    /// # Returns
    ///
    /// The file contents as a [`RunParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(input_dir: P) -> Result<RunParameters> {
        let file_path = input_dir.as_ref().join(RUN_PARAMETERS_FILE_NAME);
        let params: RunParameters = read_toml(&file_path)?;

        params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_periods(&self.periods)?;
        check_regions(&self.provinces, &self.national_region)?;
        self.pricing.validate()?;

        Ok(())
    }

    /// The dataset ID for rows belonging to a province
    pub fn province_data_id(&self, province: &RegionID) -> DataID {
        province_data_id(province, self.version)
    }

    /// The dataset ID for rows shared by all provinces
    pub fn national_data_id(&self) -> DataID {
        national_data_id(self.version)
    }

    /// Every region with a dataset: the provinces, then the national region
    pub fn regions(&self) -> impl Iterator<Item = &RegionID> {
        self.provinces
            .iter()
            .chain(std::iter::once(&self.national_region))
    }

    /// The dataset ID for any region
    pub fn data_id(&self, region: &RegionID) -> DataID {
        if *region == self.national_region {
            self.national_data_id()
        } else {
            self.province_data_id(region)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Write a parameters file with the given contents and try to load it
    fn load_params(contents: &str) -> Result<RunParameters> {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(RUN_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(file, "{contents}").unwrap();
        }

        RunParameters::from_path(dir.path())
    }

    #[test]
    fn test_check_periods() {
        // Valid
        assert!(check_periods(&[2025]).is_ok());
        assert!(check_periods(&[2025, 2030]).is_ok());

        // Invalid
        assert!(check_periods(&[]).is_err());
        assert!(check_periods(&[2025, 2025]).is_err());
        assert!(check_periods(&[2030, 2025]).is_err());
    }

    #[rstest]
    #[case(&["AB", "ON"], "CAN", None)]
    #[case(&[], "CAN", Some("`provinces` is empty"))]
    #[case(&["AB", "AB"], "CAN", Some("Province AB is listed more than once"))]
    #[case(
        &["AB", "CAN"],
        "CAN",
        Some("The national region (CAN) cannot also be a province")
    )]
    fn test_check_regions(
        #[case] provinces: &[&str],
        #[case] national_region: &str,
        #[case] expected_err: Option<&str>,
    ) {
        let provinces = provinces.iter().map(|p| RegionID::new(p)).collect::<Vec<_>>();
        let result = check_regions(&provinces, &national_region.into());
        match expected_err {
            None => assert!(result.is_ok()),
            Some(msg) => assert_eq!(result.unwrap_err().to_string(), msg),
        }
    }

    #[test]
    fn test_run_params_from_path_defaults() {
        let params = load_params("periods = [2025, 2030]\nversion = 3").unwrap();
        assert_eq!(
            params,
            RunParameters {
                periods: vec![2025, 2030],
                version: 3,
                provinces: default_provinces(),
                national_region: "CAN".into(),
                price_unit: "2024 $/MMBtu".into(),
                cost_unit: "2020 M$/PJ".into(),
                pricing: PricingConstants::default(),
                dataset: DatasetInfo::default(),
            }
        );
        assert_eq!(
            params.province_data_id(&"AB".into()),
            DataID::new("ABDIST3")
        );
        assert_eq!(params.data_id(&"CAN".into()), DataID::new("GENDIST3"));
        assert_eq!(
            params.regions().map(RegionID::as_str).collect::<Vec<_>>(),
            ["AB", "ON", "BC", "MB", "SK", "QC", "CAN"]
        );
    }

    #[test]
    fn test_run_params_from_path_overrides() {
        let params = load_params(
            r#"
periods = [2025]
version = 1
provinces = ["NS"]
price_unit = "2023 $/MMBtu"

[pricing]
biomass_price = 2.0

[dataset]
author = "Modelling team"
"#,
        )
        .unwrap();

        assert_eq!(params.provinces, [RegionID::new("NS")]);
        assert_eq!(params.price_unit, "2023 $/MMBtu");
        assert_approx_eq!(f64, params.pricing.biomass_price, 2.0);
        assert_eq!(params.dataset.author, "Modelling team");
        assert_eq!(params.dataset.status, "active");
    }

    #[rstest]
    #[case("periods = [2030, 2025]\nversion = 1", "`periods` must be composed of unique values in order")]
    #[case(
        "periods = [2025]\nversion = 1\nnational_region = \"AB\"",
        "The national region (AB) cannot also be a province"
    )]
    #[case(
        "periods = [2025]\nversion = 1\n[pricing]\neth_price = inf",
        "Invalid value for eth_price (inf)"
    )]
    fn test_run_params_from_path_invalid(#[case] contents: &str, #[case] msg: &str) {
        let err = load_params(contents).unwrap_err();
        assert!(err.to_string().starts_with("Error reading "));
        assert_eq!(err.root_cause().to_string(), msg);
    }
}
