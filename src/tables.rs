//! Assembly of the output tables.
//!
//! Each table is a list of rows with the column layout of the target model database. Rows for
//! provinces are ordered by province, then vintage, then period, then technology.
use crate::commodity::{Commodity, CommodityFlag, CommodityID};
use crate::input::InputData;
use crate::pipeline::GeneratedCodes;
use crate::price::PriceResolver;
use crate::region::DataID;
use crate::technology::{Technology, TechnologyFlag, TechnologyID};
use anyhow::{Context, Result};
use serde::Serialize;

pub mod cost;
use cost::{CostVariableRow, build_cost_rows};
pub mod efficiency;
use efficiency::{EfficiencyRow, build_efficiency_rows};
pub mod emission;
use emission::{EmissionActivityRow, build_emission_rows};
pub mod metadata;
use metadata::{
    DataSetRow, DataSourceRow, SectorLabelRow, build_data_source_rows, build_dataset_rows,
    build_sector_label_rows,
};

/// A row of the commodity table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommodityRow {
    name: CommodityID,
    flag: CommodityFlag,
    description: String,
    data_id: DataID,
}

impl CommodityRow {
    fn new(commodity: &Commodity, data_id: &DataID) -> Self {
        Self {
            name: commodity.id.clone(),
            flag: commodity.flag,
            description: commodity.description.clone(),
            data_id: data_id.clone(),
        }
    }
}

/// A row of the technology table.
///
/// Fuel technologies have unlimited capacity and none of the optional behaviours.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechnologyRow {
    tech: TechnologyID,
    flag: TechnologyFlag,
    sector: &'static str,
    category: String,
    sub_category: String,
    unlim_cap: u8,
    annual: u8,
    reserve: u8,
    curtail: u8,
    retire: u8,
    flex: u8,
    exchange: u8,
    seas_stor: u8,
    description: String,
    data_id: DataID,
}

impl TechnologyRow {
    fn new(technology: &Technology, data_id: &DataID) -> Self {
        Self {
            tech: technology.id.clone(),
            flag: technology.flag,
            sector: technology.sector.label(),
            category: String::new(),
            sub_category: String::new(),
            unlim_cap: 1,
            annual: 0,
            reserve: 0,
            curtail: 0,
            retire: 0,
            flex: 0,
            exchange: 0,
            seas_stor: 0,
            description: technology.description.clone(),
            data_id: data_id.clone(),
        }
    }
}

/// All output tables for one run
#[derive(Debug, Default, PartialEq)]
pub struct ModelTables {
    /// Commodities, tagged with the national dataset
    pub commodities: Vec<CommodityRow>,
    /// Technologies, tagged with the national dataset
    pub technologies: Vec<TechnologyRow>,
    /// Input and output commodities of each technology per province and vintage
    pub efficiencies: Vec<EfficiencyRow>,
    /// Variable costs per province, vintage and period
    pub costs: Vec<CostVariableRow>,
    /// Emissions per unit of activity
    pub emissions: Vec<EmissionActivityRow>,
    /// One dataset per region
    pub datasets: Vec<DataSetRow>,
    /// References for the data
    pub data_sources: Vec<DataSourceRow>,
    /// Descriptions of technology sectors
    pub sector_labels: Vec<SectorLabelRow>,
}

impl ModelTables {
    /// Build every table from the input data and the generated codes.
    ///
    /// # Returns
    ///
    /// The tables or an error if a variable cost cannot be resolved.
    pub fn build(input: &InputData, codes: &GeneratedCodes) -> Result<Self> {
        let params = &input.params;
        let national_id = params.national_data_id();

        let commodities = codes
            .commodities
            .iter()
            .map(|commodity| CommodityRow::new(commodity, &national_id))
            .collect();
        let technologies = codes
            .technologies
            .iter()
            .map(|technology| TechnologyRow::new(technology, &national_id))
            .collect();

        let efficiencies = build_efficiency_rows(params, &codes.technologies, &codes.mapping);

        let resolver = PriceResolver::new(&input.prices, &params.pricing);
        let costs = build_cost_rows(
            params,
            &codes.technologies,
            &codes.mapping,
            &resolver,
            &input.fuel_reference,
        )
        .context("Failed to build variable cost table")?;

        let emissions = build_emission_rows(params, &input.emission_factors, &codes.mapping);

        Ok(Self {
            commodities,
            technologies,
            efficiencies,
            costs,
            emissions,
            datasets: build_dataset_rows(params),
            data_sources: build_data_source_rows(&national_id),
            sector_labels: build_sector_label_rows(),
        })
    }

    /// The number of rows in each table, keyed by table name
    pub fn row_counts(&self) -> [(&'static str, usize); 8] {
        [
            ("Commodity", self.commodities.len()),
            ("Technology", self.technologies.len()),
            ("Efficiency", self.efficiencies.len()),
            ("CostVariable", self.costs.len()),
            ("EmissionActivity", self.emissions.len()),
            ("DataSet", self.datasets.len()),
            ("DataSource", self.data_sources.len()),
            ("SectorLabel", self.sector_labels.len()),
        ]
    }
}
