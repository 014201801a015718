// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::dag::TaskId;
use crate::dag::condition::ParseError;
use crate::dag::index::DependencyIndex;
use crate::dag::parser::{self, Edge};

/// Internal node structure: stores immediate prerequisites and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Tasks named in any condition gating this one.
    prerequisites: Vec<TaskId>,
    /// Tasks whose conditions name this one.
    dependents: Vec<TaskId>,
}

/// A compiled workflow graph: the edges as written, the dependency index and
/// the fixed task universe.
///
/// Built once; the simulation never mutates it.
#[derive(Debug, Clone)]
pub struct Graph {
    edges: Vec<Edge>,
    index: DependencyIndex,
    universe: BTreeSet<TaskId>,
    nodes: BTreeMap<TaskId, DagNode>,
}

impl Graph {
    /// Parse and compile graph text. The task universe is every name the text
    /// mentions.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let universe = parser::discover_tasks(text);
        Self::with_universe(text, universe)
    }

    /// Parse and compile graph text against an explicitly supplied universe.
    ///
    /// Names used in conditions but missing from `universe` can never
    /// succeed, so anything gated on them waits forever. Dependents missing
    /// from `universe` are never simulated. Both are only warned about.
    pub fn with_universe<I>(text: &str, universe: I) -> Result<Self, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<TaskId>,
    {
        let edges = parser::parse_edges(text);
        let index = DependencyIndex::build(&edges)?;
        let universe: BTreeSet<TaskId> = universe.into_iter().map(Into::into).collect();

        let graph = Self::from_parts(edges, index, universe);
        graph.warn_about_undeclared();
        Ok(graph)
    }

    /// Convenience for multi-line graph definitions (see
    /// [`parser::rationalise_lines`]).
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::parse(&parser::join_lines(lines))
    }

    fn from_parts(edges: Vec<Edge>, index: DependencyIndex, universe: BTreeSet<TaskId>) -> Self {
        let mut nodes: BTreeMap<TaskId, DagNode> = universe
            .iter()
            .map(|t| (t.clone(), DagNode::default()))
            .collect();

        for (task, conditions) in index.iter() {
            for condition in conditions {
                for prerequisite in condition.references() {
                    let node = nodes.entry(task.to_string()).or_default();
                    if !node.prerequisites.iter().any(|p| p == prerequisite) {
                        node.prerequisites.push(prerequisite.to_string());
                    }

                    let upstream = nodes.entry(prerequisite.to_string()).or_default();
                    if !upstream.dependents.iter().any(|d| d == task) {
                        upstream.dependents.push(task.to_string());
                    }
                }
            }
        }

        Self {
            edges,
            index,
            universe,
            nodes,
        }
    }

    fn warn_about_undeclared(&self) {
        for name in self.undeclared_references() {
            warn!(
                task = %name,
                "prerequisite is not a declared task; anything gated on it will never run"
            );
        }
        for name in self.index.dependents() {
            if !self.universe.contains(name) {
                warn!(task = %name, "dependent is not a declared task; ignoring it");
            }
        }
    }

    /// The fixed set of simulated tasks.
    pub fn universe(&self) -> &BTreeSet<TaskId> {
        &self.universe
    }

    /// All task names, sorted.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.universe.iter().map(|s| s.as_str())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// Immediate prerequisites of a task (every name in its conditions).
    pub fn dependencies_of(&self, name: &str) -> &[TaskId] {
        self.nodes
            .get(name)
            .map(|n| n.prerequisites.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks whose conditions name it).
    pub fn dependents_of(&self, name: &str) -> &[TaskId] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Names referenced by a condition but absent from the universe.
    pub fn undeclared_references(&self) -> Vec<&str> {
        let mut out: BTreeSet<&str> = BTreeSet::new();
        for (_, conditions) in self.index.iter() {
            for condition in conditions {
                out.extend(
                    condition
                        .references()
                        .into_iter()
                        .filter(|name| !self.universe.contains(*name)),
                );
            }
        }
        out.into_iter().collect()
    }

    /// A task involved in a dependency cycle, if there is one.
    ///
    /// Cycles are legal graphs; they simply stall the simulation.
    pub fn cycle_member(&self) -> Option<&str> {
        // Edge direction: prerequisite -> dependent.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }
        for (name, node) in self.nodes.iter() {
            for prerequisite in &node.prerequisites {
                graph.add_edge(prerequisite.as_str(), name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => None,
            Err(cycle) => Some(cycle.node_id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_comes_from_the_text() {
        let graph = Graph::parse("a => b // c").unwrap();
        assert_eq!(graph.tasks().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn adjacency_follows_condition_references() {
        let graph = Graph::parse("a & (b | c) => d // d => e").unwrap();
        assert_eq!(graph.dependencies_of("d"), ["a", "b", "c"]);
        assert_eq!(graph.dependents_of("a"), ["d"]);
        assert_eq!(graph.dependents_of("d"), ["e"]);
        assert!(graph.dependencies_of("a").is_empty());
    }

    #[test]
    fn explicit_universe_exposes_undeclared_names() {
        let graph = Graph::with_universe("ghost => a // a => b", ["a", "b"]).unwrap();
        assert_eq!(graph.undeclared_references(), vec!["ghost"]);
        assert_eq!(graph.universe().len(), 2);
    }

    #[test]
    fn parse_errors_abort_construction() {
        assert!(Graph::parse("a => b // a ^ b => c").is_err());
    }

    #[test]
    fn cycles_are_reported_not_rejected() {
        let graph = Graph::parse("a => b // b => a // x").unwrap();
        let member = graph.cycle_member().unwrap();
        assert!(member == "a" || member == "b");

        assert!(Graph::parse("a => b => c").unwrap().cycle_member().is_none());
    }

    #[test]
    fn from_lines_joins_continuations() {
        let graph = Graph::from_lines(["a &", "b => c", "c => d"]).unwrap();
        assert_eq!(graph.index().conditions_for("c").len(), 1);
        assert_eq!(graph.dependencies_of("c"), ["a", "b"]);
    }
}
