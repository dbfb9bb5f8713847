//! Dijkstra over per-direction edge weights.
//!
//! Weights live in `2m` slots: slot `e` prices traversing edge `e` from `v1`
//! to `v2`, slot `m + e` prices the reverse traversal. Setting both slots of an
//! edge to `+inf` removes it from the graph for one query.

use crate::graph::{EdgeId, Graph, NodeId};
use crate::OracleError;

/// Weight vector with one slot per edge direction.
#[derive(Debug, Clone)]
pub struct DirectionWeights {
    values: Vec<f64>,
    edge_count: usize,
}

impl DirectionWeights {
    pub fn new(edge_count: usize) -> Self {
        Self {
            values: vec![0.0; 2 * edge_count],
            edge_count,
        }
    }

    /// Resets both directions of every edge to `max(0, 1 - x_e)`.
    pub fn reset_from(&mut self, edge_values: &[f64]) -> Result<(), OracleError> {
        if edge_values.len() != self.edge_count {
            return Err(OracleError::LengthMismatch {
                what: "edge values",
                expected: self.edge_count,
                actual: edge_values.len(),
            });
        }
        let m = self.edge_count;
        for (edge, &value) in edge_values.iter().enumerate() {
            if !value.is_finite() {
                return Err(OracleError::InvalidWeight { slot: edge, value });
            }
            let weight = (1.0 - value).max(0.0);
            self.values[edge] = weight;
            self.values[edge + m] = weight;
        }
        Ok(())
    }

    /// Removes `edge` from subsequent queries; returns its previous weight.
    pub fn exclude(&mut self, edge: EdgeId) -> Result<f64, OracleError> {
        self.check_edge(edge)?;
        let previous = self.values[edge.0];
        self.values[edge.0] = f64::INFINITY;
        self.values[edge.0 + self.edge_count] = f64::INFINITY;
        Ok(previous)
    }

    pub fn restore(&mut self, edge: EdgeId, weight: f64) -> Result<(), OracleError> {
        self.check_edge(edge)?;
        self.values[edge.0] = weight;
        self.values[edge.0 + self.edge_count] = weight;
        Ok(())
    }

    fn check_edge(&self, edge: EdgeId) -> Result<(), OracleError> {
        if edge.0 >= self.edge_count {
            return Err(OracleError::EdgeOutOfRange {
                edge: edge.0,
                edge_count: self.edge_count,
            });
        }
        Ok(())
    }

    pub fn weight(&self, edge: EdgeId) -> Option<f64> {
        self.values.get(edge.0).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Total weight; `+inf` when the target is unreachable.
    pub weight: f64,
    /// Direction slots in order from source to target.
    pub slots: Vec<usize>,
}

impl ShortestPath {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_reachable(&self) -> bool {
        self.weight.is_finite()
    }

    pub fn edges(&self, edge_count: usize) -> impl Iterator<Item = EdgeId> + '_ {
        self.slots
            .iter()
            .map(move |&slot| edge_of_slot(slot, edge_count))
    }
}

pub fn edge_of_slot(slot: usize, edge_count: usize) -> EdgeId {
    if slot >= edge_count {
        EdgeId(slot - edge_count)
    } else {
        EdgeId(slot)
    }
}

/// Shortest path from `source` to `target` using an `O(n^2)` minimum scan.
///
/// Ties between unfinished nodes go to the lowest node index. The search stops
/// as soon as `target` is the closest unfinished node.
pub fn shortest_path(
    graph: &Graph,
    weights: &[f64],
    source: NodeId,
    target: NodeId,
) -> Result<ShortestPath, OracleError> {
    let n = graph.node_count();
    let m = graph.edge_count();
    for node in [source, target] {
        if node.0 >= n {
            return Err(OracleError::NodeOutOfRange {
                node: node.0,
                node_count: n,
            });
        }
    }
    if weights.len() != 2 * m {
        return Err(OracleError::LengthMismatch {
            what: "direction weights",
            expected: 2 * m,
            actual: weights.len(),
        });
    }
    if let Some((slot, &value)) = weights.iter().enumerate().find(|(_, w)| !(**w >= 0.0)) {
        return Err(OracleError::InvalidWeight { slot, value });
    }
    if source == target {
        return Ok(ShortestPath {
            weight: 0.0,
            slots: Vec::new(),
        });
    }

    let edges = graph.edge_list();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred_node = vec![usize::MAX; n];
    let mut pred_slot = vec![usize::MAX; n];
    let mut finished = vec![false; n];
    dist[source.0] = 0.0;

    loop {
        let mut next = None;
        let mut wmin = f64::INFINITY;
        for u in 0..n {
            if !finished[u] && dist[u] < wmin {
                wmin = dist[u];
                next = Some(u);
            }
        }
        let Some(v) = next else {
            break;
        };
        if v == target.0 {
            break;
        }
        finished[v] = true;

        for &edge_id in graph.incident_edges(NodeId(v)).unwrap_or(&[]) {
            let edge = &edges[edge_id.0];
            let (slot, u) = if edge.v1.0 == v {
                (edge_id.0, edge.v2.0)
            } else {
                (edge_id.0 + m, edge.v1.0)
            };
            if finished[u] {
                continue;
            }
            let candidate = dist[v] + weights[slot];
            if candidate < dist[u] {
                dist[u] = candidate;
                pred_node[u] = v;
                pred_slot[u] = slot;
            }
        }
    }

    if !dist[target.0].is_finite() {
        return Ok(ShortestPath {
            weight: f64::INFINITY,
            slots: Vec::new(),
        });
    }

    let mut slots = Vec::new();
    let mut v = target.0;
    while v != source.0 {
        slots.push(pred_slot[v]);
        v = pred_node[v];
    }
    slots.reverse();
    Ok(ShortestPath {
        weight: dist[target.0],
        slots,
    })
}
