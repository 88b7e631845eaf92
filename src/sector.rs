//! Sectors of the energy system, identified in commodity and technology codes by a single letter.
use indexmap::IndexMap;
use strum::{EnumIter, IntoEnumIterator};

/// Placeholder used when a code's sector letter is not recognised
pub const UNKNOWN_SECTOR: &str = "Unknown sector";

/// A sector of the energy system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Sector {
    /// Electricity generation
    ElectricPower,
    /// Residential buildings
    Residential,
    /// Commercial buildings
    Commercial,
    /// Industry
    Industrial,
    /// Transport
    Transportation,
    /// Agriculture
    Agriculture,
    /// Production and import of fuels
    FuelProduction,
}

impl Sector {
    /// The single-letter code used as a prefix in commodity and technology codes
    pub fn letter(self) -> &'static str {
        match self {
            Self::ElectricPower => "E",
            Self::Residential => "R",
            Self::Commercial => "C",
            Self::Industrial => "I",
            Self::Transportation => "T",
            Self::Agriculture => "A",
            Self::FuelProduction => "F",
        }
    }

    /// Human-readable name of the sector
    pub fn name(self) -> &'static str {
        match self {
            Self::ElectricPower => "Electric power sector",
            Self::Residential => "Residential sector",
            Self::Commercial => "Commercial sector",
            Self::Industrial => "Industrial sector",
            Self::Transportation => "Transportation sector",
            Self::Agriculture => "Agriculture sector",
            Self::FuelProduction => "Fuel production sector",
        }
    }
}

/// Sector names keyed by sector letter.
///
/// The default map contains every [`Sector`]. Tests may construct smaller maps.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorMap(IndexMap<String, String>);

impl Default for SectorMap {
    fn default() -> Self {
        Self(
            Sector::iter()
                .map(|sector| (sector.letter().to_string(), sector.name().to_string()))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for SectorMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl SectorMap {
    /// Get the name of the sector with the given letter, if known
    pub fn get(&self, letter: &str) -> Option<&str> {
        self.0.get(letter).map(String::as_str)
    }
}

/// The sector bucket a technology is assigned to in the technology table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TechnologySector {
    /// Electric power sector
    Electricity,
    /// Residential sector
    Residential,
    /// Commercial sector
    Commercial,
    /// Industrial sector
    Industrial,
    /// Transportation sector
    Transportation,
    /// Agriculture sector
    Agriculture,
    /// Fuel production sector
    Fuel,
}

impl TechnologySector {
    /// The label used for this sector in output tables
    pub fn label(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Transportation => "transportation",
            Self::Agriculture => "agriculture",
            Self::Fuel => "fuel",
        }
    }

    /// The longer description of the sector, as used in the sector label table
    pub fn description(self) -> &'static str {
        self.sector().name()
    }

    /// The [`Sector`] this bucket corresponds to
    fn sector(self) -> Sector {
        match self {
            Self::Electricity => Sector::ElectricPower,
            Self::Residential => Sector::Residential,
            Self::Commercial => Sector::Commercial,
            Self::Industrial => Sector::Industrial,
            Self::Transportation => Sector::Transportation,
            Self::Agriculture => Sector::Agriculture,
            Self::Fuel => Sector::FuelProduction,
        }
    }
}
