//! The variable cost table, giving the unit price of each fuel supply technology.
use crate::commodity::CommodityID;
use crate::input::fuel::FuelReference;
use crate::input::params::RunParameters;
use crate::mapping::TechnologyMapping;
use crate::price::{PriceError, PriceResolver};
use crate::region::{DataID, RegionID};
use crate::technology::{Technology, TechnologyID};
use log::warn;
use serde::Serialize;

/// Technologies whose code contains any of these are not costed
const UNCOSTED_FRAGMENTS: [&str; 3] = ["F_IMP", "ELC", "OTH"];

/// Data source for costs of commodities in the fuel list
const FUEL_LIST_SOURCE: &str = "[F1]";

/// A row of the variable cost table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CostVariableRow {
    region: RegionID,
    period: u32,
    tech: TechnologyID,
    vintage: u32,
    cost: f64,
    units: String,
    notes: String,
    data_source: String,
    dq_cred: u32,
    dq_geog: u32,
    dq_struc: u32,
    dq_tech: u32,
    dq_time: u32,
    data_id: DataID,
}

/// A technology to be costed, with its output commodity and the notes for its rows
struct CostedTechnology<'a> {
    id: &'a TechnologyID,
    output: &'a CommodityID,
    notes: &'a str,
    data_source: &'a str,
}

/// Whether variable costs are generated for the technology
fn is_costed(technology: &str) -> bool {
    !UNCOSTED_FRAGMENTS
        .iter()
        .any(|fragment| technology.contains(fragment))
}

/// Select the technologies to cost, in order
fn costed_technologies<'a>(
    technologies: &'a [Technology],
    mapping: &'a TechnologyMapping,
    fuel_reference: &'a FuelReference,
) -> Vec<CostedTechnology<'a>> {
    technologies
        .iter()
        .filter(|technology| is_costed(technology.id.as_str()))
        .filter_map(|technology| {
            let Some(flow) = mapping.get(technology.id.as_str()) else {
                warn!("Technology {} is not mapped; it will not be costed", technology.id);
                return None;
            };

            let (notes, data_source) = match fuel_reference.note(flow.output.as_str()) {
                Some(notes) => (notes, FUEL_LIST_SOURCE),
                None => ("", ""),
            };

            Some(CostedTechnology {
                id: &technology.id,
                output: &flow.output,
                notes,
                data_source,
            })
        })
        .collect()
}

/// Build the variable cost table.
///
/// There is one row per province, vintage, period no earlier than the vintage and costed
/// technology.
///
/// # Returns
///
/// The rows or the first error encountered resolving a price.
pub fn build_cost_rows(
    params: &RunParameters,
    technologies: &[Technology],
    mapping: &TechnologyMapping,
    resolver: &PriceResolver,
    fuel_reference: &FuelReference,
) -> Result<Vec<CostVariableRow>, PriceError> {
    let costed = costed_technologies(technologies, mapping, fuel_reference);

    let mut rows = Vec::new();
    for province in &params.provinces {
        let data_id = params.province_data_id(province);
        for &vintage in &params.periods {
            for &period in params.periods.iter().filter(|&&period| period >= vintage) {
                for technology in &costed {
                    let cost =
                        resolver.resolve(technology.id.as_str(), technology.output.as_str(), period)?;
                    rows.push(CostVariableRow {
                        region: province.clone(),
                        period,
                        tech: technology.id.clone(),
                        vintage,
                        cost,
                        units: params.cost_unit.clone(),
                        notes: technology.notes.to_string(),
                        data_source: technology.data_source.to_string(),
                        dq_cred: 2,
                        dq_geog: 3,
                        dq_struc: 2,
                        dq_tech: 1,
                        dq_time: 1,
                        data_id: data_id.clone(),
                    });
                }
            }
        }
    }

    Ok(rows)
}
