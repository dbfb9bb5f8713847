//! Decoding of integral selections into rooted k-trees.

use std::collections::VecDeque;

use crate::graph::{ArcId, EdgeId, Graph, NodeId, ROOT};
use crate::TreeError;

/// A connected subtree with exactly `k` edges that contains the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootedTree {
    edges: Vec<EdgeId>,
    arcs: Vec<ArcId>,
    nodes: Vec<NodeId>,
}

/// 0/1 values of every edge, arc and node variable for one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    pub edges: Vec<f64>,
    pub arcs: Vec<f64>,
    pub nodes: Vec<f64>,
}

impl RootedTree {
    pub fn from_edges(graph: &Graph, edges: &[EdgeId], k: usize) -> Result<Self, TreeError> {
        let mut selected = edges.to_vec();
        selected.sort_unstable();
        selected.dedup();
        if selected.len() != k {
            return Err(TreeError::WrongSize {
                expected: k,
                actual: selected.len(),
            });
        }

        let n = graph.node_count();
        let mut adjacency: Vec<Vec<(EdgeId, NodeId)>> = vec![Vec::new(); n];
        let mut touched = vec![false; n];
        for &edge_id in &selected {
            let edge = graph
                .edge(edge_id)
                .ok_or(TreeError::UnknownEdge(edge_id.0))?;
            adjacency[edge.v1.0].push((edge_id, edge.v2));
            adjacency[edge.v2.0].push((edge_id, edge.v1));
            touched[edge.v1.0] = true;
            touched[edge.v2.0] = true;
        }
        touched[ROOT.0] = true;

        let mut visited = vec![false; n];
        let mut arcs = Vec::with_capacity(k);
        let mut queue = VecDeque::from([ROOT]);
        visited[ROOT.0] = true;
        while let Some(node) = queue.pop_front() {
            for &(edge_id, next) in &adjacency[node.0] {
                if visited[next.0] {
                    continue;
                }
                visited[next.0] = true;
                if let Some(arc) = graph.arc_from(edge_id, node) {
                    arcs.push(arc);
                }
                queue.push_back(next);
            }
        }

        if touched.iter().zip(&visited).any(|(&t, &v)| t && !v) {
            return Err(TreeError::Disconnected);
        }
        let nodes: Vec<NodeId> = (0..n).filter(|&v| visited[v]).map(NodeId).collect();
        if nodes.len() != k + 1 {
            return Err(TreeError::Cycle);
        }
        arcs.sort_unstable();
        Ok(Self {
            edges: selected,
            arcs,
            nodes,
        })
    }

    /// Decodes edge-variable values; each must be within `tol` of 0 or 1.
    pub fn from_edge_values(
        graph: &Graph,
        values: &[f64],
        k: usize,
        tol: f64,
    ) -> Result<Self, TreeError> {
        let selected = integral_support(values, graph.edge_count(), "edge", tol)?;
        let edges: Vec<EdgeId> = selected.into_iter().map(EdgeId).collect();
        Self::from_edges(graph, &edges, k)
    }

    /// Decodes arc-variable values. Every node may be entered at most once.
    pub fn from_arc_values(
        graph: &Graph,
        values: &[f64],
        k: usize,
        tol: f64,
    ) -> Result<Self, TreeError> {
        let selected = integral_support(values, graph.arc_count(), "arc", tol)?;
        let mut entered = vec![false; graph.node_count()];
        let mut edges = Vec::with_capacity(selected.len());
        for arc_idx in selected {
            let arc = graph.arc_list()[arc_idx];
            if entered[arc.head.0] {
                return Err(TreeError::MultipleParents(arc.head.0));
            }
            entered[arc.head.0] = true;
            edges.push(arc.edge);
        }
        let tree = Self::from_edges(graph, &edges, k)?;
        if edges.len() != tree.edges.len() {
            return Err(TreeError::WrongSize {
                expected: k,
                actual: edges.len(),
            });
        }
        Ok(tree)
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Tree edges oriented away from the root.
    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    pub fn weight(&self, graph: &Graph) -> i64 {
        self.edges
            .iter()
            .filter_map(|&edge| graph.edge(edge))
            .map(|edge| edge.weight)
            .sum()
    }

    pub fn indicators(&self, graph: &Graph) -> Indicators {
        let mut edges = vec![0.0; graph.edge_count()];
        let mut arcs = vec![0.0; graph.arc_count()];
        let mut nodes = vec![0.0; graph.node_count()];
        for edge in &self.edges {
            edges[edge.0] = 1.0;
        }
        for arc in &self.arcs {
            arcs[arc.0] = 1.0;
        }
        for node in &self.nodes {
            nodes[node.0] = 1.0;
        }
        Indicators { edges, arcs, nodes }
    }
}

fn integral_support(
    values: &[f64],
    expected: usize,
    what: &'static str,
    tol: f64,
) -> Result<Vec<usize>, TreeError> {
    if values.len() != expected {
        return Err(TreeError::LengthMismatch {
            what,
            expected,
            actual: values.len(),
        });
    }
    let mut selected = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        if value >= 1.0 - tol {
            selected.push(index);
        } else if value > tol {
            return Err(TreeError::Fractional { what, index, value });
        }
    }
    Ok(selected)
}
