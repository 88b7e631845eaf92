//! Code for reading the fuel list, which gives the commodities to generate and the names of fuels.
use super::{input_err_msg, read_csv};
use crate::commodity::CommodityID;
use crate::naming::FuelMap;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

const FUEL_LIST_FILE_NAME: &str = "fuel_list.csv";

/// A row of the fuel list file
#[derive(Debug, Deserialize, PartialEq)]
struct FuelListRow {
    #[serde(rename = "Commodity")]
    commodity: Option<String>,
    #[serde(rename = "Fuel_type")]
    fuel_type: Option<String>,
    #[serde(rename = "Fuel_name")]
    fuel_name: Option<String>,
}

/// The contents of the fuel list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelReference {
    /// Commodity codes, in file order (may contain duplicates)
    pub commodities: Vec<CommodityID>,
    /// Fuel names keyed by fuel token (the last row for a token wins)
    pub fuels: FuelMap,
    /// The fuel name given on the first row listing each commodity
    pub notes: IndexMap<CommodityID, String>,
}

impl FuelReference {
    /// The note for a commodity, if the commodity is listed
    pub fn note(&self, commodity: &str) -> Option<&str> {
        self.notes.get(commodity).map(String::as_str)
    }
}

/// Read the fuel list from the specified input directory
pub fn read_fuel_reference(input_dir: &Path) -> Result<FuelReference> {
    let file_path = input_dir.join(FUEL_LIST_FILE_NAME);
    let rows = read_csv::<FuelListRow>(&file_path)?;
    read_fuel_reference_from_iter(rows).with_context(|| input_err_msg(&file_path))
}

fn read_fuel_reference_from_iter<I>(rows: I) -> Result<FuelReference>
where
    I: IntoIterator<Item = FuelListRow>,
{
    let mut reference = FuelReference::default();
    for row in rows {
        let fuel_name = row.fuel_name.unwrap_or_default();

        if let Some(commodity) = row.commodity {
            let commodity = CommodityID::from(commodity);
            reference.commodities.push(commodity.clone());
            reference
                .notes
                .entry(commodity)
                .or_insert_with(|| fuel_name.clone());
        }

        if let Some(token) = row.fuel_type
            && let Some(old_name) = reference.fuels.insert(token.clone(), fuel_name)
        {
            debug!("Fuel type {token} is listed more than once; replacing name '{old_name}'");
        }
    }

    ensure!(
        !reference.commodities.is_empty(),
        "No commodities listed"
    );

    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use itertools::Itertools;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn row(commodity: Option<&str>, fuel_type: Option<&str>, fuel_name: Option<&str>) -> FuelListRow {
        FuelListRow {
            commodity: commodity.map(String::from),
            fuel_type: fuel_type.map(String::from),
            fuel_name: fuel_name.map(String::from),
        }
    }

    #[test]
    fn test_read_fuel_reference() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(FUEL_LIST_FILE_NAME)).unwrap();
            writeln!(
                file,
                "Commodity,Fuel_type,Fuel_name
F_ethos,,
R_ng,ng,natural gas
T_lng,lng,liquefied natural gas
R_elc,,
,coal,coal"
            )
            .unwrap();
        }

        let reference = read_fuel_reference(dir.path()).unwrap();
        assert_eq!(
            reference
                .commodities
                .iter()
                .map(CommodityID::as_str)
                .collect_vec(),
            ["F_ethos", "R_ng", "T_lng", "R_elc"]
        );
        assert_eq!(reference.fuels.get("lng"), Some("liquefied natural gas"));
        assert_eq!(reference.fuels.get("coal"), Some("coal"));
        assert_eq!(reference.note("R_ng"), Some("natural gas"));
        assert_eq!(reference.note("R_elc"), Some(""));
        assert_eq!(reference.note("C_ng"), None);
    }

    #[test]
    fn test_read_fuel_reference_repeated_fuel_type() {
        let rows = [
            row(Some("R_ng"), Some("ng"), Some("natural gas")),
            row(Some("R_ng"), Some("ng"), Some("gas")),
        ];
        let reference = read_fuel_reference_from_iter(rows).unwrap();
        assert_eq!(reference.commodities.len(), 2);

        // The last name for a fuel type wins, but the note comes from the first commodity row
        assert_eq!(reference.fuels.get("ng"), Some("gas"));
        assert_eq!(reference.note("R_ng"), Some("natural gas"));
    }

    #[test]
    fn test_read_fuel_reference_no_commodities() {
        let rows = [row(None, Some("ng"), Some("natural gas"))];
        assert_error!(read_fuel_reference_from_iter(rows), "No commodities listed");
    }
}
