//! The fixture dependency graph.
//!
//! Nodes are added in declaration order and an edge runs from each
//! requirement to the node requiring it. [`FixtureGraph::new`] rejects any
//! graph in which an ingestion step could run without its CSV inputs, its
//! prerequisite ingests, or the database.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use rustworkx_core::petgraph::visit::{Dfs, Reversed};

use crate::catalog::CsvFixture;
use crate::error::FixtureError;
use crate::node::{Artifact, FixtureAction, FixtureNode, IngestStep, PIPELINE};

/// Validated directed acyclic graph of fixture nodes.
#[derive(Debug, Clone)]
pub struct FixtureGraph {
    graph: DiGraph<FixtureNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl FixtureGraph {
    /// Build and validate a graph.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found: a duplicate name, an
    /// unknown requirement, a cycle, or an ingest node missing an input,
    /// a prerequisite ingest or the pipeline.
    pub fn new(nodes: impl IntoIterator<Item = FixtureNode>) -> Result<Self, FixtureError> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for node in nodes {
            if index.contains_key(&node.name) {
                return Err(FixtureError::DuplicateNode(node.name));
            }
            let name = node.name.clone();
            index.insert(name, graph.add_node(node));
        }

        let mut edges = Vec::new();
        for idx in graph.node_indices() {
            let node = &graph[idx];
            for requirement in &node.requires {
                let Some(&from) = index.get(requirement) else {
                    return Err(FixtureError::UnknownRequirement {
                        node: node.name.clone(),
                        requirement: requirement.clone(),
                    });
                };
                edges.push((from, idx));
            }
        }
        for (from, to) in edges {
            graph.update_edge(from, to, ());
        }

        toposort(&graph, None)
            .map_err(|cycle| FixtureError::Cycle(graph[cycle.node_id()].name.clone()))?;

        let fixture_graph = Self { graph, index };
        fixture_graph.validate_ingests()?;
        Ok(fixture_graph)
    }

    /// The standard chain: `pipeline`, the ten CSV writers, then
    /// `ingest_lab` -> `ingest_subjects` -> `ingest_sessions`.
    ///
    /// # Errors
    ///
    /// Never fails in practice; validation runs as for any other graph.
    pub fn standard() -> Result<Self, FixtureError> {
        Self::new(standard_nodes())
    }

    fn validate_ingests(&self) -> Result<(), FixtureError> {
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let FixtureAction::Ingest(step) = node.action else {
                continue;
            };

            let direct: HashSet<Artifact> = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|req| self.graph[req].produces())
                .collect();
            for input in step.inputs() {
                if !direct.contains(&Artifact::CsvFile(*input)) {
                    return Err(FixtureError::MissingInput {
                        node: node.name.clone(),
                        file: input.file_name(),
                    });
                }
            }

            let upstream: HashSet<Artifact> = self
                .ancestors(idx)
                .into_iter()
                .map(|a| self.graph[a].produces())
                .collect();
            for prerequisite in step.prerequisites() {
                if !upstream.contains(&Artifact::Ingested(*prerequisite)) {
                    return Err(FixtureError::MissingPrerequisite {
                        node: node.name.clone(),
                        prerequisite: prerequisite.node_name(),
                    });
                }
            }
            if !upstream.contains(&Artifact::Database) {
                return Err(FixtureError::MissingPipeline(node.name.clone()));
            }
        }
        Ok(())
    }

    /// Every node `idx` transitively requires, excluding itself.
    fn ancestors(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, idx);
        let mut found = HashSet::new();
        while let Some(next) = dfs.next(reversed) {
            if next != idx {
                found.insert(next);
            }
        }
        found
    }

    /// The targets and everything they require, in an order where each node
    /// follows all of its requirements. Ties go to the node declared first.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnknownTarget` for a name not in the graph.
    pub fn plan(&self, targets: &[&str]) -> Result<Vec<&FixtureNode>, FixtureError> {
        let mut closure = HashSet::new();
        for target in targets {
            let idx = *self
                .index
                .get(*target)
                .ok_or_else(|| FixtureError::UnknownTarget((*target).to_string()))?;
            closure.insert(idx);
            closure.extend(self.ancestors(idx));
        }

        let mut pending: HashMap<NodeIndex, usize> = closure
            .iter()
            .map(|&idx| {
                let deps = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (idx, deps)
            })
            .collect();
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = pending
            .iter()
            .filter(|(_, deps)| **deps == 0)
            .map(|(idx, _)| Reverse(*idx))
            .collect();

        let mut order = Vec::with_capacity(closure.len());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(&self.graph[idx]);
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(deps) = pending.get_mut(&next) {
                    *deps -= 1;
                    if *deps == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }
        Ok(order)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FixtureNode> {
        self.index.get(name).map(|idx| &self.graph[*idx])
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &FixtureNode> {
        self.graph.node_weights()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Node list of [`FixtureGraph::standard`].
#[must_use]
pub fn standard_nodes() -> Vec<FixtureNode> {
    let mut nodes = vec![FixtureNode::pipeline()];
    nodes.extend(CsvFixture::ALL.into_iter().map(FixtureNode::csv));
    nodes.push(FixtureNode::ingest(IngestStep::Lab, [PIPELINE]));
    nodes.push(FixtureNode::ingest(
        IngestStep::Subjects,
        [PIPELINE, IngestStep::Lab.node_name()],
    ));
    nodes.push(FixtureNode::ingest(
        IngestStep::Sessions,
        [IngestStep::Lab.node_name(), IngestStep::Subjects.node_name()],
    ));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names<'a>(plan: &[&'a FixtureNode]) -> Vec<&'a str> {
        plan.iter().map(|n| n.name.as_str()).collect()
    }

    fn position(plan: &[&str], name: &str) -> usize {
        plan.iter().position(|n| *n == name).unwrap()
    }

    #[test]
    fn standard_graph_is_valid() {
        let graph = FixtureGraph::standard().unwrap();
        assert_eq!(graph.len(), 14);
        assert!(graph.get("ingest_sessions").is_some());
    }

    #[test]
    fn plan_for_sessions_orders_ingests() {
        let graph = FixtureGraph::standard().unwrap();
        let plan = graph.plan(&["ingest_sessions"]).unwrap();
        let plan = names(&plan);
        assert_eq!(plan.len(), 14);
        assert_eq!(plan[0], "pipeline");
        assert!(position(&plan, "ingest_lab") < position(&plan, "ingest_subjects"));
        assert!(position(&plan, "ingest_subjects") < position(&plan, "ingest_sessions"));
        assert!(position(&plan, "sessions_csv") < position(&plan, "ingest_sessions"));
    }

    #[test]
    fn plan_only_includes_the_closure() {
        let graph = FixtureGraph::standard().unwrap();
        let plan = graph.plan(&["ingest_lab"]).unwrap();
        assert_eq!(
            names(&plan),
            [
                "pipeline",
                "lab_csv",
                "lab_project_csv",
                "lab_project_users_csv",
                "lab_publications_csv",
                "lab_keywords_csv",
                "lab_protocol_csv",
                "lab_user_csv",
                "ingest_lab",
            ]
        );
    }

    #[test]
    fn plan_is_deterministic() {
        let graph = FixtureGraph::standard().unwrap();
        let first = names(&graph.plan(&["ingest_sessions", "lab_csv"]).unwrap());
        let second = names(&graph.plan(&["lab_csv", "ingest_sessions"]).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let graph = FixtureGraph::standard().unwrap();
        assert!(matches!(
            graph.plan(&["nope"]),
            Err(FixtureError::UnknownTarget(_))
        ));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let result = FixtureGraph::new([FixtureNode::pipeline(), FixtureNode::pipeline()]);
        assert!(matches!(result, Err(FixtureError::DuplicateNode(name)) if name == "pipeline"));
    }

    #[test]
    fn unknown_requirement_is_rejected() {
        let node = FixtureNode::new("a", ["missing"], FixtureAction::Pipeline);
        assert!(matches!(
            FixtureGraph::new([node]),
            Err(FixtureError::UnknownRequirement { .. })
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let a = FixtureNode::new("a", ["b"], FixtureAction::WriteCsv(CsvFixture::Labs));
        let b = FixtureNode::new("b", ["a"], FixtureAction::WriteCsv(CsvFixture::Projects));
        assert!(matches!(
            FixtureGraph::new([a, b]),
            Err(FixtureError::Cycle(_))
        ));
    }

    #[test]
    fn subjects_without_lab_ingest_are_rejected() {
        let mut nodes = standard_nodes();
        nodes.retain(|n| n.name != "ingest_sessions");
        for node in &mut nodes {
            if node.name == "ingest_subjects" {
                node.requires.retain(|r| r != "ingest_lab");
            }
        }
        assert!(matches!(
            FixtureGraph::new(nodes),
            Err(FixtureError::MissingPrerequisite { prerequisite: "ingest_lab", .. })
        ));
    }

    #[test]
    fn ingest_without_its_csv_is_rejected() {
        let mut nodes = standard_nodes();
        for node in &mut nodes {
            if node.name == "ingest_lab" {
                node.requires.retain(|r| r != "lab_keywords_csv");
            }
        }
        assert!(matches!(
            FixtureGraph::new(nodes),
            Err(FixtureError::MissingInput { file: "keywords.csv", .. })
        ));
    }

    #[test]
    fn ingest_without_pipeline_is_rejected() {
        let mut nodes: Vec<FixtureNode> =
            CsvFixture::ALL.into_iter().map(FixtureNode::csv).collect();
        nodes.push(FixtureNode::ingest(IngestStep::Lab, std::iter::empty()));
        assert!(matches!(
            FixtureGraph::new(nodes),
            Err(FixtureError::MissingPipeline(name)) if name == "ingest_lab"
        ));
    }
}
