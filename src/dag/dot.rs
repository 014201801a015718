// src/dag/dot.rs

//! Graphviz export of a workflow graph.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::dag::Graph;

/// One arrow in the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Trigger<'a> {
    pub prerequisite: &'a str,
    pub dependent: &'a str,
    /// The prerequisite sits under an `|`, so it is not strictly required.
    pub conditional: bool,
}

/// Every (prerequisite, dependent) arrow implied by the graph, sorted.
///
/// A pair is marked conditional if any edge makes it conditional.
pub fn triggers(graph: &Graph) -> Vec<Trigger<'_>> {
    let mut out: BTreeSet<Trigger<'_>> = BTreeSet::new();

    for (dependent, conditions) in graph.index().iter() {
        for condition in conditions {
            let conditional = condition.conditional_refs();
            for prerequisite in condition.references() {
                out.insert(Trigger {
                    prerequisite,
                    dependent,
                    conditional: conditional.contains(prerequisite),
                });
            }
        }
    }

    let mut triggers: Vec<Trigger<'_>> = Vec::with_capacity(out.len());
    for t in out {
        // Keep one arrow per pair, preferring the conditional marker.
        match triggers.last_mut() {
            Some(last)
                if last.prerequisite == t.prerequisite && last.dependent == t.dependent =>
            {
                last.conditional |= t.conditional;
            }
            _ => triggers.push(t),
        }
    }
    triggers
}

/// Render the graph as a graphviz `digraph`.
///
/// Conditional arrows use an open arrowhead. Tasks with no arrows are listed
/// as bare nodes so they still appear.
pub fn to_dot(graph: &Graph) -> String {
    let triggers = triggers(graph);
    let mut connected: BTreeSet<&str> = BTreeSet::new();

    let mut out = String::from("digraph {\n");
    for t in &triggers {
        connected.insert(t.prerequisite);
        connected.insert(t.dependent);
        let attrs = if t.conditional { " [arrowhead=o]" } else { "" };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "    {} -> {}{attrs}", quote(t.prerequisite), quote(t.dependent));
    }
    for task in graph.tasks().filter(|t| !connected.contains(t)) {
        let _ = writeln!(out, "    {}", quote(task));
    }
    out.push_str("}\n");
    out
}

fn quote(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    }
}
