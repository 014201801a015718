// src/dag/parser.rs

//! Graph-text parsing.
//!
//! A graph is a list of chains separated by `//`. Each chain is a sequence
//! of elements separated by `=>`:
//!
//! ```text
//! a => b => c // b & c => d
//! ```
//!
//! Every adjacent pair of elements becomes an [`Edge`]. The left element is
//! kept as raw prerequisite text (compiled later by
//! [`Condition`](crate::dag::Condition)); the right element names one or more
//! dependent tasks. No name validation happens here.

use tracing::trace;

use crate::dag::TaskId;

/// Separator between chains in a single-line graph string.
pub const LINE_SEPARATOR: &str = "//";

/// Separator between elements of one chain.
pub const ARROW: &str = "=>";

const OPERATOR_CHARS: [char; 4] = ['(', ')', '&', '|'];

/// One `prerequisite => dependent` relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Raw prerequisite expression, trimmed (e.g. `"a & (b | c)"`).
    pub prerequisite: String,
    /// The task that waits on `prerequisite`.
    pub dependent: TaskId,
}

impl Edge {
    pub fn new(prerequisite: impl Into<String>, dependent: impl Into<TaskId>) -> Self {
        Self {
            prerequisite: prerequisite.into(),
            dependent: dependent.into(),
        }
    }
}

/// Split graph text into edges, in the order they are written.
///
/// Chains with a single element (no arrow) contribute no edges.
pub fn parse_edges(graph: &str) -> Vec<Edge> {
    let mut edges = Vec::new();

    for chain in graph.split(LINE_SEPARATOR) {
        let parts: Vec<&str> = chain.split(ARROW).collect();
        if parts.len() < 2 {
            trace!(chain = %chain.trim(), "graph line has no arrow; no edges");
            continue;
        }

        for pair in parts.windows(2) {
            let prerequisite = pair[0].trim();
            for dependent in dependent_names(pair[1]) {
                edges.push(Edge::new(prerequisite, dependent));
            }
        }
    }

    edges
}

/// Every task name mentioned in any chain element, in order of first
/// appearance.
///
/// This includes names on single-element chains, which declare a task
/// without relating it to anything.
pub fn discover_tasks(graph: &str) -> Vec<TaskId> {
    let mut out: Vec<TaskId> = Vec::new();
    for chain in graph.split(LINE_SEPARATOR) {
        for element in chain.split(ARROW) {
            for name in dependent_names(element) {
                if !out.iter().any(|n| n == name) {
                    out.push(name.to_string());
                }
            }
        }
    }
    out
}

/// Names in a chain element. Operator characters and blanks only separate
/// names here.
pub fn dependent_names(element: &str) -> impl Iterator<Item = &str> {
    element
        .split(|c: char| OPERATOR_CHARS.contains(&c))
        .flat_map(str::split_whitespace)
}

/// Join continuation lines and drop blank ones.
///
/// A line whose trimmed text ends in `&`, `|` or `=>` continues onto the
/// next line, so
///
/// ```text
/// a & b &
///     c => d
/// ```
///
/// becomes the single line `a & b & c => d`.
pub fn rationalise_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in lines {
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }

        buffer.push(trimmed.to_string());
        let continues =
            trimmed.ends_with('&') || trimmed.ends_with('|') || trimmed.ends_with(ARROW);
        if !continues {
            out.push(buffer.join(" "));
            buffer.clear();
        }
    }

    // A dangling continuation at the end is kept as-is; compiling it will
    // report the missing operand.
    if !buffer.is_empty() {
        out.push(buffer.join(" "));
    }

    out
}

/// Join rationalised lines into the single `//`-separated graph string.
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rationalise_lines(lines).join(LINE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_arrows_split_into_pairs() {
        assert_eq!(
            parse_edges("a=>b=>c"),
            vec![Edge::new("a", "b"), Edge::new("b", "c")]
        );
    }

    #[test]
    fn single_element_chain_has_no_edges() {
        assert!(parse_edges("a").is_empty());
        assert!(parse_edges("").is_empty());
    }

    #[test]
    fn whitespace_around_names_is_insignificant() {
        assert_eq!(
            parse_edges("  a & b  =>   c // c=>d "),
            vec![Edge::new("a & b", "c"), Edge::new("c", "d")]
        );
    }

    #[test]
    fn several_dependents_on_the_right_get_one_edge_each() {
        assert_eq!(
            parse_edges("a => b & c => d"),
            vec![
                Edge::new("a", "b"),
                Edge::new("a", "c"),
                Edge::new("b & c", "d"),
            ]
        );
    }

    #[test]
    fn discover_tasks_includes_lone_nodes() {
        assert_eq!(
            discover_tasks("x // a & (b | c) => d"),
            vec!["x", "a", "b", "c", "d"]
        );
    }

    #[test]
    fn continuation_lines_are_joined() {
        let lines = ["a & b &", "   c => d", "", "e =>", "f", "g"];
        assert_eq!(
            rationalise_lines(lines),
            vec!["a & b & c => d", "e => f", "g"]
        );
        assert_eq!(join_lines(["a => b", "b => c"]), "a => b//b => c");
    }
}
