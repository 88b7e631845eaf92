//! Technologies move fuels between sectors: imports into the fuel sector and distribution from the
//! fuel sector (or the electricity grid) to end-use sectors.
//!
//! Technology codes are derived from commodity codes by a fixed naming convention:
//!
//! * `F_IMP_<FUEL>` imports a fuel into the fuel sector
//! * `F_<Sector>_<FUEL>` distributes a fuel from the fuel sector to another sector
//! * `E_<Sector>_<FUEL>` distributes electricity to a sector
use crate::commodity::Commodity;
use crate::id::define_id_type;
use crate::naming::{Nomenclature, capitalise};
use crate::sector::TechnologySector;
use indexmap::IndexSet;
use log::{debug, warn};
use serde_string_enum::SerializeLabeledStringEnum;

define_id_type! {TechnologyID}

/// Commodity codes (lower case) for which no technology is generated
const EXCLUDED_COMMODITIES: [&str; 3] = ["e_elc_dx", "e_elc", "f_ethos"];

/// Prefix of import technologies
pub const IMPORT_PREFIX: &str = "F_IMP_";

/// Technology code prefixes and the sector each is assigned to, checked in order
const SECTOR_PREFIXES: [(&str, TechnologySector); 11] = [
    ("F_C_", TechnologySector::Commercial),
    ("E_C_", TechnologySector::Commercial),
    ("F_I_", TechnologySector::Industrial),
    ("E_I_", TechnologySector::Industrial),
    ("F_R_", TechnologySector::Residential),
    ("E_R_", TechnologySector::Residential),
    ("F_A_", TechnologySector::Agriculture),
    ("E_A_", TechnologySector::Agriculture),
    ("F_T_", TechnologySector::Transportation),
    ("E_T_", TechnologySector::Transportation),
    ("F_E_", TechnologySector::Electricity),
];

/// How a technology is treated by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum)]
pub enum TechnologyFlag {
    /// A resource technology, drawing on an unlimited source
    #[string = "r"]
    Resource,
    /// An ordinary process
    #[string = "p"]
    Process,
}

/// A technology as it appears in the technology table
#[derive(Debug, Clone, PartialEq)]
pub struct Technology {
    /// Technology code (e.g. `F_R_NG`)
    pub id: TechnologyID,
    /// How the technology is treated by the model
    pub flag: TechnologyFlag,
    /// The sector the technology belongs to
    pub sector: TechnologySector,
    /// Human-readable description
    pub description: String,
}

impl Technology {
    /// Create a technology from its code, deriving flag, sector and description
    pub fn from_code(id: TechnologyID, names: &Nomenclature) -> Self {
        let code = id.as_str();
        let flag = technology_flag(code);
        let sector = technology_sector(code);
        let description = describe_technology(code, names);

        Self {
            id,
            flag,
            sector,
            description,
        }
    }
}

/// Derive the code of the technology which supplies the given commodity.
///
/// Returns `None` for the special commodities that no technology supplies (`E_elc`, `E_elc_dx`
/// and `F_ethos`, compared case-insensitively). The derivation is a pure function of the code.
pub fn derive_technology_code(commodity: &str) -> Option<TechnologyID> {
    let lower = commodity.to_lowercase();
    if EXCLUDED_COMMODITIES.contains(&lower.as_str()) {
        return None;
    }

    let (prefix, fuel_part) = match lower.split_once('_') {
        Some((prefix, rest)) => (prefix.to_uppercase(), rest.to_uppercase()),
        None => (lower.to_uppercase(), lower.to_uppercase()),
    };

    let code = if fuel_part.starts_with("ELC") && prefix != "E" {
        format!("E_{prefix}_{fuel_part}")
    } else if prefix == "F" {
        format!("{IMPORT_PREFIX}{fuel_part}")
    } else {
        format!("F_{prefix}_{fuel_part}")
    };

    Some(code.into())
}

/// Get the flag for a technology code: imports are resources, everything else is a process
pub fn technology_flag(code: &str) -> TechnologyFlag {
    if code.starts_with(IMPORT_PREFIX) {
        TechnologyFlag::Resource
    } else {
        TechnologyFlag::Process
    }
}

/// Assign a technology to a sector based on its code prefix
pub fn technology_sector(code: &str) -> TechnologySector {
    SECTOR_PREFIXES
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map_or(TechnologySector::Fuel, |(_, sector)| *sector)
}

/// Describe a technology from its code, e.g. `F_R_NG` → "Natural gas distribution from fuel sector
/// to residential sector".
///
/// The fuel key is looked up in the fuel table only. Unlike commodity descriptions, electricity
/// keys have no fixed names here, so `E_R_ELC` is described with the raw key.
pub fn describe_technology(code: &str, names: &Nomenclature) -> String {
    let parts: Vec<&str> = code.split('_').collect();
    let fuel_name = |parts: &[&str]| {
        let key = parts.join("_").to_lowercase();
        let name = names.fuels.get(&key).map(str::to_string).unwrap_or_else(|| {
            debug!("No fuel name for '{key}' in technology code {code}");
            key.clone()
        });
        capitalise(&name)
    };
    let sector_name = |letter: &str| {
        names
            .sectors
            .get(letter)
            .unwrap_or(letter)
            .to_lowercase()
    };

    match parts.as_slice() {
        ["F", "IMP", fuel @ ..] => format!("{} import into fuel sector", fuel_name(fuel)),
        ["F", sector, fuel @ ..] if !fuel.is_empty() => format!(
            "{} distribution from fuel sector to {}",
            fuel_name(fuel),
            sector_name(*sector)
        ),
        ["E", sector, fuel @ ..] if !fuel.is_empty() => format!(
            "{} distribution to {}",
            fuel_name(fuel),
            sector_name(*sector)
        ),
        _ => format!("Fuel flow for {code}"),
    }
}

/// Generate the technology table from the commodity table.
///
/// One technology is derived per commodity (except the excluded special commodities), in
/// commodity order. If two commodities yield the same technology code, only the first is kept.
pub fn generate_technologies(commodities: &[Commodity], names: &Nomenclature) -> Vec<Technology> {
    let mut codes = IndexSet::new();
    for commodity in commodities {
        let Some(code) = derive_technology_code(commodity.id.as_str()) else {
            continue;
        };

        if !codes.insert(code.clone()) {
            warn!(
                "Technology {code} derived from commodity {} already exists; ignoring duplicate",
                commodity.id
            );
        }
    }

    codes
        .into_iter()
        .map(|code| Technology::from_code(code, names))
        .collect()
}
