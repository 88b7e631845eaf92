//! The mapping from each technology to the commodities it consumes and produces.
//!
//! The mapping is derived purely from technology codes. It is built once per run and shared by
//! every table that needs to know a technology's input or output.
use crate::commodity::{CommodityID, SOURCE_COMMODITY};
use crate::technology::{IMPORT_PREFIX, TechnologyID};
use indexmap::IndexMap;
use log::warn;

/// The commodity consumed by all electricity distribution technologies
pub const ELECTRICITY_SUPPLY_COMMODITY: &str = "E_elc_dx";

/// The input and output commodities of a technology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommodityFlow {
    /// The commodity consumed
    pub input: CommodityID,
    /// The commodity produced
    pub output: CommodityID,
}

impl CommodityFlow {
    fn new(input: impl Into<CommodityID>, output: impl Into<CommodityID>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Input and output commodities for each technology, keyed by technology code.
///
/// Technologies whose codes match none of the naming rules have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnologyMapping(IndexMap<TechnologyID, CommodityFlow>);

impl TechnologyMapping {
    /// Build the mapping for the given technologies.
    ///
    /// Technology codes which match none of the naming rules are left out and a warning is logged.
    pub fn from_technologies<'a, I>(technologies: I) -> Self
    where
        I: IntoIterator<Item = &'a TechnologyID>,
    {
        let mut map = IndexMap::new();
        for id in technologies {
            if let Some(flow) = map_technology(id.as_str()) {
                map.insert(id.clone(), flow);
            } else {
                warn!("Technology {id} matches no naming rule; it has no input or output commodity");
            }
        }

        Self(map)
    }

    /// Get the input and output commodities for a technology, if it is mapped
    pub fn get(&self, id: &str) -> Option<&CommodityFlow> {
        self.0.get(id)
    }

    /// Whether the technology has an entry in the mapping
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Iterate over technologies and their flows, in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = (&TechnologyID, &CommodityFlow)> {
        self.0.iter()
    }

    /// The number of mapped technologies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no mapped technologies
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derive the input and output commodities for a single technology code.
///
/// * `F_IMP_<FUEL>` consumes `F_ethos` and produces `F_<fuel>`
/// * `E_<S>_<...>` consumes `E_elc_dx` and produces `<S>_elc`
/// * `F_<S>_<FUEL>` consumes `F_<fuel>` and produces `<S>_<fuel>`
///
/// Sector letters are upper-cased and fuel tokens lower-cased. Returns `None` for codes that
/// match none of these forms (including forms with an empty sector or fuel).
pub fn map_technology(code: &str) -> Option<CommodityFlow> {
    if let Some(fuel) = code.strip_prefix(IMPORT_PREFIX) {
        if fuel.is_empty() {
            return None;
        }

        let fuel = fuel.to_lowercase();
        return Some(CommodityFlow::new(SOURCE_COMMODITY, format!("F_{fuel}")));
    }

    let (family, rest) = code.split_once('_')?;
    let (sector, fuel) = rest.split_once('_')?;
    if sector.is_empty() || fuel.is_empty() {
        return None;
    }

    let sector = sector.to_uppercase();
    match family {
        "E" => Some(CommodityFlow::new(
            ELECTRICITY_SUPPLY_COMMODITY,
            format!("{sector}_elc"),
        )),
        "F" => {
            let fuel = fuel.to_lowercase();
            Some(CommodityFlow::new(
                format!("F_{fuel}"),
                format!("{sector}_{fuel}"),
            ))
        }
        _ => None,
    }
}
