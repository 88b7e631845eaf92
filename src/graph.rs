//! Module for creating and checking the commodity graph.
//!
//! The graph has a node for each commodity and an edge for each mapped technology, running from
//! the technology's input commodity to its output commodity.
use crate::commodity::{Commodity, CommodityID};
use crate::mapping::TechnologyMapping;
use crate::technology::{IMPORT_PREFIX, TechnologyID};
use anyhow::Result;
use indexmap::IndexSet;
use log::{debug, warn};
use petgraph::Direction;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A graph of commodity flows
pub type CommoditiesGraph = DiGraph<CommodityID, TechnologyID>;

/// The commodity graph, along with the commodities it references which are not in the commodity
/// table
#[derive(Debug)]
pub struct CommodityGraph {
    graph: CommoditiesGraph,
    unlisted: IndexSet<CommodityID>,
}

impl CommodityGraph {
    /// Build the graph for the given commodities and mapping.
    ///
    /// Every commodity in the table gets a node, in order. Commodities which appear in the mapping
    /// but not in the table are added after them and recorded as unlisted.
    pub fn new(commodities: &[Commodity], mapping: &TechnologyMapping) -> Self {
        let mut graph = CommoditiesGraph::new();
        let mut nodes: HashMap<CommodityID, NodeIndex> = HashMap::new();
        for commodity in commodities {
            nodes
                .entry(commodity.id.clone())
                .or_insert_with(|| graph.add_node(commodity.id.clone()));
        }

        let mut unlisted = IndexSet::new();
        let mut get_node = |graph: &mut CommoditiesGraph, id: &CommodityID| {
            *nodes.entry(id.clone()).or_insert_with(|| {
                unlisted.insert(id.clone());
                graph.add_node(id.clone())
            })
        };

        for (tech, flow) in mapping.iter() {
            let source = get_node(&mut graph, &flow.input);
            let target = get_node(&mut graph, &flow.output);
            graph.add_edge(source, target, tech.clone());
        }

        Self { graph, unlisted }
    }

    /// Commodities used by technologies but missing from the commodity table
    pub fn unlisted_commodities(&self) -> impl Iterator<Item = &CommodityID> {
        self.unlisted.iter()
    }

    /// Commodities which are neither produced nor consumed by any technology
    pub fn isolated_commodities(&self) -> impl Iterator<Item = &CommodityID> {
        self.graph.node_indices().filter_map(|node| {
            let has_edges = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .chain(self.graph.edges_directed(node, Direction::Outgoing))
                .next()
                .is_some();
            (!has_edges).then(|| &self.graph[node])
        })
    }

    /// Check the graph, logging a warning for each commodity which is used by a technology but is
    /// not in the commodity table.
    ///
    /// # Returns
    ///
    /// The number of such commodities.
    pub fn validate(&self) -> usize {
        for id in &self.unlisted {
            let users = self
                .graph
                .edge_references()
                .filter(|edge| {
                    &self.graph[edge.source()] == id || &self.graph[edge.target()] == id
                })
                .map(|edge| edge.weight().as_str())
                .collect::<Vec<_>>();
            warn!(
                "Commodity {id} is used by {} but is not in the commodity table",
                users.join(", ")
            );
        }

        for id in self.isolated_commodities() {
            debug!("Commodity {id} is not produced or consumed by any technology");
        }

        self.unlisted.len()
    }

    /// The number of commodities in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of technologies in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Save the graph to file in DOT format
    pub fn save(&self, file_path: &Path) -> Result<()> {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[],
            &get_edge_attributes,
            &|_, _| String::new(), // Use default attributes for nodes
        );
        let mut file = File::create(file_path)?;
        write!(file, "{dot}")?;

        Ok(())
    }
}

/// Gets custom DOT attributes for edges in the commodity graph
fn get_edge_attributes(_: &CommoditiesGraph, edge_ref: EdgeReference<TechnologyID>) -> String {
    if edge_ref.weight().as_str().starts_with(IMPORT_PREFIX) {
        // Use dashed lines for imports
        "style=dashed".to_string()
    } else {
        String::new()
    }
}
