//! Regions are the provinces for which tables are built, plus the nationwide region used to tag
//! data shared by all provinces.
use crate::id::define_id_type;
use std::fmt::Display;

define_id_type! {RegionID}

define_id_type! {DataID}

/// Get the dataset ID for a province (e.g. `ABDIST3`)
pub fn province_data_id(province: &RegionID, version: impl Display) -> DataID {
    format!("{province}DIST{version}").into()
}

/// Get the dataset ID for data shared by all provinces (e.g. `GENDIST3`)
pub fn national_data_id(version: impl Display) -> DataID {
    format!("GENDIST{version}").into()
}
