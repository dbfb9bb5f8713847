//! Capped maximum flow / minimum cut on the arc network.
//!
//! The residual network is laid out once per graph; `update` only swaps the
//! source/sink pair and, when given, the capacity vector. Each `min_cut` call
//! restarts from zero flow.

use std::collections::VecDeque;

use crate::graph::{ArcId, Graph, NodeId};
use crate::OracleError;

const RESIDUAL_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
struct FlowEdge {
    to: usize,
    rev: usize,
    cap: f64,
}

#[derive(Debug, Clone)]
pub struct FlowNetwork {
    node_count: usize,
    arcs: Vec<(usize, usize)>,
    graph: Vec<Vec<FlowEdge>>,
    /// Position of each arc's forward residual edge: `(tail, index)`.
    arc_slots: Vec<(usize, usize)>,
    capacities: Option<Vec<f64>>,
    terminals: Option<(usize, usize)>,
    prev: Vec<Option<(usize, usize)>>,
    queue: VecDeque<usize>,
}

impl FlowNetwork {
    pub fn new(node_count: usize, arcs: &[(usize, usize)]) -> Result<Self, OracleError> {
        let mut graph: Vec<Vec<FlowEdge>> = vec![Vec::new(); node_count];
        let mut arc_slots = Vec::with_capacity(arcs.len());
        for (arc, &(tail, head)) in arcs.iter().enumerate() {
            for node in [tail, head] {
                if node >= node_count {
                    return Err(OracleError::NodeOutOfRange { node, node_count });
                }
            }
            if tail == head {
                return Err(OracleError::InvalidArc { arc });
            }
            let tail_index = graph[tail].len();
            let head_index = graph[head].len();
            graph[tail].push(FlowEdge {
                to: head,
                rev: head_index,
                cap: 0.0,
            });
            graph[head].push(FlowEdge {
                to: tail,
                rev: tail_index,
                cap: 0.0,
            });
            arc_slots.push((tail, tail_index));
        }
        Ok(Self {
            node_count,
            arcs: arcs.to_vec(),
            graph,
            arc_slots,
            capacities: None,
            terminals: None,
            prev: vec![None; node_count],
            queue: VecDeque::with_capacity(node_count),
        })
    }

    pub fn from_graph(graph: &Graph) -> Result<Self, OracleError> {
        Self::new(graph.node_count(), &graph.arc_endpoints())
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Selects a new source/sink pair and optionally replaces the capacities.
    ///
    /// Capacities must be supplied at least once; later calls may pass `None`
    /// to keep the previous vector.
    pub fn update(
        &mut self,
        source: NodeId,
        sink: NodeId,
        capacities: Option<&[f64]>,
    ) -> Result<(), OracleError> {
        for node in [source, sink] {
            if node.0 >= self.node_count {
                return Err(OracleError::NodeOutOfRange {
                    node: node.0,
                    node_count: self.node_count,
                });
            }
        }
        if source == sink {
            return Err(OracleError::SourceIsSink(source.0));
        }
        match capacities {
            Some(caps) => {
                if caps.len() != self.arcs.len() {
                    return Err(OracleError::LengthMismatch {
                        what: "capacities",
                        expected: self.arcs.len(),
                        actual: caps.len(),
                    });
                }
                if let Some((arc, &value)) = caps
                    .iter()
                    .enumerate()
                    .find(|(_, c)| !c.is_finite() || **c < 0.0)
                {
                    return Err(OracleError::InvalidCapacity { arc, value });
                }
                match self.capacities.as_mut() {
                    Some(stored) => stored.copy_from_slice(caps),
                    None => self.capacities = Some(caps.to_vec()),
                }
            }
            None if self.capacities.is_none() => return Err(OracleError::CapacitiesMissing),
            None => {}
        }
        self.terminals = Some((source.0, sink.0));
        Ok(())
    }

    /// Pushes flow from source to sink until it reaches `threshold` or no
    /// augmenting path is left, then labels `partition[v] = true` for every
    /// node residual-reachable from the source.
    ///
    /// The returned flow equals the minimum cut value whenever it is below
    /// `threshold`.
    pub fn min_cut(&mut self, threshold: f64, partition: &mut [bool]) -> Result<f64, OracleError> {
        let (source, sink) = self.terminals.ok_or(OracleError::NotConfigured)?;
        if threshold.is_nan() {
            return Err(OracleError::InvalidThreshold(threshold));
        }
        if partition.len() != self.node_count {
            return Err(OracleError::LengthMismatch {
                what: "partition",
                expected: self.node_count,
                actual: partition.len(),
            });
        }
        self.reset_residual()?;

        let mut flow = 0.0;
        while flow < threshold {
            if !self.search(source, Some(sink)) {
                break;
            }
            let mut bottleneck = f64::INFINITY;
            let mut v = sink;
            while v != source {
                let (u, idx) = self.prev[v].ok_or(OracleError::NotConfigured)?;
                bottleneck = bottleneck.min(self.graph[u][idx].cap);
                v = u;
            }
            v = sink;
            while v != source {
                let (u, idx) = self.prev[v].ok_or(OracleError::NotConfigured)?;
                let rev = self.graph[u][idx].rev;
                self.graph[u][idx].cap -= bottleneck;
                self.graph[v][rev].cap += bottleneck;
                v = u;
            }
            flow += bottleneck;
        }

        self.search(source, None);
        for (node, side) in partition.iter_mut().enumerate() {
            *side = node == source || self.prev[node].is_some();
        }
        Ok(flow)
    }

    /// Arcs whose tail is on the source side and head on the sink side.
    pub fn crossing_arcs(&self, partition: &[bool]) -> Vec<ArcId> {
        self.arcs
            .iter()
            .enumerate()
            .filter(|(_, &(tail, head))| {
                partition.get(tail).copied().unwrap_or(false)
                    && !partition.get(head).copied().unwrap_or(false)
            })
            .map(|(idx, _)| ArcId(idx))
            .collect()
    }

    fn reset_residual(&mut self) -> Result<(), OracleError> {
        let caps = self.capacities.as_ref().ok_or(OracleError::CapacitiesMissing)?;
        for (&(tail, idx), &cap) in self.arc_slots.iter().zip(caps.iter()) {
            let (head, rev) = {
                let edge = &self.graph[tail][idx];
                (edge.to, edge.rev)
            };
            self.graph[tail][idx].cap = cap;
            self.graph[head][rev].cap = 0.0;
        }
        Ok(())
    }

    /// Breadth-first search over residual edges. Records predecessors in
    /// `prev` and returns whether `target` was reached.
    fn search(&mut self, source: usize, target: Option<usize>) -> bool {
        self.prev.iter_mut().for_each(|p| *p = None);
        self.queue.clear();
        self.queue.push_back(source);
        while let Some(u) = self.queue.pop_front() {
            for (idx, edge) in self.graph[u].iter().enumerate() {
                if edge.cap <= RESIDUAL_EPS || edge.to == source || self.prev[edge.to].is_some() {
                    continue;
                }
                self.prev[edge.to] = Some((u, idx));
                if Some(edge.to) == target {
                    return true;
                }
                self.queue.push_back(edge.to);
            }
        }
        false
    }
}
