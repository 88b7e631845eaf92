//! The efficiency table, which links each technology to its input and output commodities.
use crate::commodity::CommodityID;
use crate::input::params::RunParameters;
use crate::mapping::TechnologyMapping;
use crate::region::{DataID, RegionID};
use crate::technology::{Technology, TechnologyID};
use itertools::iproduct;
use log::warn;
use serde::Serialize;

/// Fuel technologies transfer energy without losses
const TRANSFER_EFFICIENCY: f64 = 1.0;

const TRANSFER_NOTE: &str = "Arbitrary value for transfer technology";

/// A row of the efficiency table.
///
/// Unmapped technologies have no input or output commodity. The data quality columns are left
/// empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EfficiencyRow {
    region: RegionID,
    input_comm: Option<CommodityID>,
    tech: TechnologyID,
    vintage: u32,
    output_comm: Option<CommodityID>,
    efficiency: f64,
    notes: &'static str,
    data_source: Option<String>,
    dq_cred: Option<u32>,
    dq_geog: Option<u32>,
    dq_struc: Option<u32>,
    dq_tech: Option<u32>,
    dq_time: Option<u32>,
    data_id: DataID,
}

/// Build the efficiency table: one row per province, vintage and technology
pub fn build_efficiency_rows(
    params: &RunParameters,
    technologies: &[Technology],
    mapping: &TechnologyMapping,
) -> Vec<EfficiencyRow> {
    let flows: Vec<_> = technologies
        .iter()
        .map(|technology| {
            let flow = mapping.get(technology.id.as_str());
            if flow.is_none() {
                warn!(
                    "Technology {} is not mapped; its efficiency rows have no commodities",
                    technology.id
                );
            }
            (&technology.id, flow)
        })
        .collect();

    let mut rows = Vec::new();
    for province in &params.provinces {
        let data_id = params.province_data_id(province);
        for (vintage, (tech, flow)) in iproduct!(&params.periods, &flows) {
            rows.push(EfficiencyRow {
                region: province.clone(),
                input_comm: flow.map(|flow| flow.input.clone()),
                tech: (*tech).clone(),
                vintage: *vintage,
                output_comm: flow.map(|flow| flow.output.clone()),
                efficiency: TRANSFER_EFFICIENCY,
                notes: TRANSFER_NOTE,
                data_source: None,
                dq_cred: None,
                dq_geog: None,
                dq_struc: None,
                dq_tech: None,
                dq_time: None,
                data_id: data_id.clone(),
            });
        }
    }

    rows
}
