//! Functionality for running the table-building pipeline.
//!
//! A run reads the input data, generates the commodity and technology codes, checks the
//! commodity graph and assembles the output tables, which are then written to disk.
use crate::commodity::{Commodity, CommodityID, generate_commodities};
use crate::graph::CommodityGraph;
use crate::input::InputData;
use crate::mapping::TechnologyMapping;
use crate::naming::Nomenclature;
use crate::output::{write_commodity_graph, write_tables};
use crate::tables::ModelTables;
use crate::technology::{Technology, generate_technologies};
use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;

/// The commodities and technologies derived from the commodity list
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCodes {
    /// Commodities, in order, without duplicates
    pub commodities: Vec<Commodity>,
    /// Technologies, in order, without duplicates
    pub technologies: Vec<Technology>,
    /// Input and output commodities of each technology
    pub mapping: TechnologyMapping,
}

impl GeneratedCodes {
    /// Generate commodities, technologies and the technology mapping from a list of commodity
    /// codes
    pub fn generate(codes: &[CommodityID], names: &Nomenclature) -> Self {
        let commodities = generate_commodities(codes, names);
        let technologies = generate_technologies(&commodities, names);
        let mapping = TechnologyMapping::from_technologies(technologies.iter().map(|t| &t.id));

        Self {
            commodities,
            technologies,
            mapping,
        }
    }
}

/// Everything built in a single run
#[derive(Debug)]
pub struct ModelBuild {
    /// The generated codes
    pub codes: GeneratedCodes,
    /// Commodity flows between sectors
    pub graph: CommodityGraph,
    /// The output tables
    pub tables: ModelTables,
}

impl ModelBuild {
    /// Build all the output tables for the given input data.
    ///
    /// Problems with the commodity graph are reported as warnings. Failing to resolve a price is
    /// an error.
    pub fn new(input: &InputData) -> Result<Self> {
        let codes =
            GeneratedCodes::generate(&input.fuel_reference.commodities, &input.nomenclature());
        info!(
            "Generated {} commodities and {} technologies",
            codes.commodities.len(),
            codes.technologies.len()
        );

        let num_unmapped = codes.technologies.len() - codes.mapping.len();
        if num_unmapped > 0 {
            warn!("{num_unmapped} technologies have no input or output commodity");
        }

        let graph = CommodityGraph::new(&codes.commodities, &codes.mapping);
        let num_unlisted = graph.validate();
        if num_unlisted > 0 {
            warn!("{num_unlisted} commodities used by technologies are not in the commodity table");
        }

        let tables = ModelTables::build(input, &codes)?;
        for (name, count) in tables.row_counts() {
            debug!("{name}: {count} rows");
        }

        Ok(Self {
            codes,
            graph,
            tables,
        })
    }
}

/// Build the output tables and write them to the output folder.
///
/// # Arguments
///
/// * `input` - The input data
/// * `output_path` - The folder to which output files will be written
/// * `save_graph` - Whether to write the commodity graph in DOT format
pub fn run(input: &InputData, output_path: &Path, save_graph: bool) -> Result<()> {
    let build = ModelBuild::new(input)?;

    info!("Writing tables to {}", output_path.display());
    write_tables(output_path, &build.tables)?;
    for (name, count) in build.tables.row_counts() {
        info!("Wrote {count} rows to {name}");
    }

    if save_graph {
        write_commodity_graph(output_path, &build.graph)?;
        info!("Wrote commodity graph");
    }

    Ok(())
}
