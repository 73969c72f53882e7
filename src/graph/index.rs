use std::collections::HashMap;

use crate::types::{GraphStats, Node, NodeKind};

/// Read-only lookups over a code graph.
///
/// Implementations must return nodes of a kind in a stable order: resolver
/// and graph-search matches use that order as their only tie-break.
pub trait GraphIndex: Send + Sync {
    /// Exact lookup by full node id.
    fn get_node(&self, id: &str) -> Option<&Node>;

    /// All nodes of the given kind, in iteration order.
    fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&Node>;
}

/// A graph index held entirely in memory.
///
/// Nodes keep their insertion order, which is also the order returned by
/// [`GraphIndex::nodes_by_kind`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryGraph {
    nodes: Vec<Node>,
    by_id: HashMap<String, usize>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl InMemoryGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from nodes in iteration order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert_node(node);
        }
        graph
    }

    /// Inserts a node. A node with an existing id replaces the old one in place.
    pub fn insert_node(&mut self, node: Node) {
        if let Some(&idx) = self.by_id.get(&node.id) {
            let old_kind = self.nodes[idx].kind;
            if old_kind != node.kind {
                if let Some(ids) = self.by_kind.get_mut(&old_kind) {
                    ids.retain(|&i| i != idx);
                }
                self.by_kind.entry(node.kind).or_default().push(idx);
            }
            self.nodes[idx] = node;
            return;
        }

        let idx = self.nodes.len();
        self.by_id.insert(node.id.clone(), idx);
        self.by_kind.entry(node.kind).or_default().push(idx);
        self.nodes.push(node);
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node counts, keyed by kind name.
    pub fn stats(&self) -> GraphStats {
        let nodes_by_kind = self
            .by_kind
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(kind, ids)| (kind.as_str().to_string(), ids.len() as u64))
            .collect();

        GraphStats {
            node_count: self.nodes.len() as u64,
            nodes_by_kind,
            ..GraphStats::default()
        }
    }
}

impl GraphIndex for InMemoryGraph {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.by_kind
            .get(&kind)
            .map(|ids| ids.iter().map(|&idx| &self.nodes[idx]).collect())
            .unwrap_or_default()
    }
}
