//! Commodities are the fuels and forms of electricity traded between sectors.
//!
//! Commodity codes have the form `<SectorLetter>_<fuelToken>` (e.g. `R_ng`), with a few special
//! codes such as `F_ethos` (the universal import source) and `E_elc_dx`.
use crate::id::define_id_type;
use crate::naming::{Nomenclature, capitalise, split_prefix};
use crate::sector::UNKNOWN_SECTOR;
use indexmap::IndexMap;
use log::warn;
use serde_string_enum::SerializeLabeledStringEnum;
use std::collections::BTreeSet;

define_id_type! {CommodityID}

/// The code of the dummy commodity from which all imports are drawn
pub const SOURCE_COMMODITY: &str = "F_ethos";

/// How a commodity is treated by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeLabeledStringEnum)]
pub enum CommodityFlag {
    /// A source commodity, available in unlimited quantities
    #[string = "s"]
    Source,
    /// A physical commodity which must be balanced
    #[string = "p"]
    Physical,
}

impl CommodityFlag {
    /// Get the flag for the commodity with the given code
    pub fn for_code(code: &str) -> Self {
        if code == SOURCE_COMMODITY {
            Self::Source
        } else {
            Self::Physical
        }
    }
}

/// A commodity as it appears in the commodity table
#[derive(Debug, Clone, PartialEq)]
pub struct Commodity {
    /// Commodity code (e.g. `R_ng`)
    pub id: CommodityID,
    /// How the commodity is treated by the model
    pub flag: CommodityFlag,
    /// Human-readable description
    pub description: String,
}

impl Commodity {
    /// Create a commodity, deriving its flag from the code
    fn new(id: CommodityID, description: String) -> Self {
        let flag = CommodityFlag::for_code(id.as_str());
        Self {
            id,
            flag,
            description,
        }
    }
}

/// Describe a commodity from its code, e.g. `R_ng` → "Natural gas for the residential sector".
///
/// Unknown sector letters and fuel tokens are not errors: a placeholder sector name or the raw
/// fuel key is used instead and a warning is logged.
pub fn describe_commodity(code: &str, names: &Nomenclature) -> String {
    let (prefix, key) = split_prefix(code);

    let sector = names.sectors.get(prefix).unwrap_or_else(|| {
        warn!("Unknown sector prefix '{prefix}' in commodity code {code}");
        UNKNOWN_SECTOR
    });
    // A fuel table entry for the whole code takes precedence over one for the fuel key
    let fuel = names
        .fuels
        .get(code)
        .or_else(|| names.fuel_name(key))
        .unwrap_or_else(|| {
            warn!("Unknown fuel token '{key}' in commodity code {code}; using it as the fuel name");
            key
        });

    format!("{} for the {}", capitalise(fuel), sector.to_lowercase())
}

/// Generate the commodity table from the reference list of commodity codes.
///
/// Every listed code is kept, in order. For each fuel token used by a listed code, a fuel-sector
/// commodity `F_<token>` is added (in sorted token order) so that the fuel can be imported. The
/// result contains each code once; the first occurrence wins.
pub fn generate_commodities(codes: &[CommodityID], names: &Nomenclature) -> Vec<Commodity> {
    let mut commodities: IndexMap<CommodityID, Commodity> = IndexMap::new();
    let mut add = |commodity: Commodity| {
        commodities.entry(commodity.id.clone()).or_insert(commodity);
    };

    for code in codes {
        add(Commodity::new(
            code.clone(),
            describe_commodity(code.as_str(), names),
        ));
    }

    for token in used_fuel_tokens(codes, names) {
        let fuel_name = names.fuels.get(token).unwrap_or(token);
        add(Commodity::new(
            format!("F_{token}").into(),
            format!("{} for Fuel sector", capitalise(fuel_name)),
        ));
    }

    commodities.into_values().collect()
}

/// Fuel tokens referenced by the given codes which appear in the fuel table, excluding electricity
fn used_fuel_tokens<'a>(codes: &'a [CommodityID], names: &Nomenclature) -> BTreeSet<&'a str> {
    codes
        .iter()
        .map(|code| split_prefix(code.as_str()).1)
        .filter(|key| {
            let upper = key.to_uppercase();
            upper != "ELC" && upper != "ELC_DX" && names.fuels.contains(key)
        })
        .collect()
}
