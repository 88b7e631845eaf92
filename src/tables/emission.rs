//! The emission activity table, which applies emission factors to the technologies producing
//! each commodity.
use crate::commodity::CommodityID;
use crate::input::emission::EmissionFactor;
use crate::input::params::RunParameters;
use crate::mapping::TechnologyMapping;
use crate::region::{DataID, RegionID};
use crate::technology::TechnologyID;
use serde::Serialize;
use std::collections::HashSet;

/// The columns which identify an emission activity row
type RowKey = (
    RegionID,
    CommodityID,
    CommodityID,
    TechnologyID,
    u32,
    CommodityID,
    DataID,
);

/// A row of the emission activity table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmissionActivityRow {
    region: RegionID,
    emis_comm: CommodityID,
    input_comm: CommodityID,
    tech: TechnologyID,
    vintage: u32,
    output_comm: CommodityID,
    activity: f64,
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

impl EmissionActivityRow {
    fn key(&self) -> RowKey {
        (
            self.region.clone(),
            self.emis_comm.clone(),
            self.input_comm.clone(),
            self.tech.clone(),
            self.vintage,
            self.output_comm.clone(),
            self.data_id.clone(),
        )
    }
}

/// Build the emission activity table.
///
/// For each province and emission factor, there is a row for every mapped technology whose output
/// is the factor's commodity, in each period (used as the vintage). Rows with the same key as an
/// earlier row are dropped.
pub fn build_emission_rows(
    params: &RunParameters,
    factors: &[EmissionFactor],
    mapping: &TechnologyMapping,
) -> Vec<EmissionActivityRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for province in &params.provinces {
        let data_id = params.province_data_id(province);
        for factor in factors {
            let producers = mapping
                .iter()
                .filter(|(_, flow)| flow.output == factor.commodity);
            for (tech, flow) in producers {
                for &period in &params.periods {
                    let row = EmissionActivityRow {
                        region: province.clone(),
                        emis_comm: factor.emission.clone(),
                        input_comm: flow.input.clone(),
                        tech: tech.clone(),
                        vintage: period,
                        output_comm: flow.output.clone(),
                        activity: factor.value,
                        units: factor.units.clone(),
                        notes: factor.notes.clone(),
                        data_source: factor.source.clone(),
                        dq_cred: 1,
                        dq_geog: 2,
                        dq_struc: 2,
                        dq_tech: 2,
                        dq_time: 2,
                        data_id: data_id.clone(),
                    };

                    if seen.insert(row.key()) {
                        rows.push(row);
                    }
                }
            }
        }
    }

    rows
}
