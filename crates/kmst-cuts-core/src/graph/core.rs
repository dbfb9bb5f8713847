use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcId(pub usize);

/// The distinguished root. It never has incoming arcs.
pub const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub v1: NodeId,
    pub v2: NodeId,
    pub weight: i64,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.v1 == node || self.v2 == node
    }

    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.v1 == node {
            Some(self.v2)
        } else if self.v2 == node {
            Some(self.v1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub tail: NodeId,
    pub head: NodeId,
    pub edge: EdgeId,
    /// Reverse arc of the same edge; `None` when the edge touches the root.
    pub opposite: Option<ArcId>,
}

/// Undirected weighted graph together with its directed-arc expansion.
///
/// Every edge not touching the root yields two opposite arcs; an edge
/// touching the root yields a single arc oriented out of the root.
#[derive(Debug, Clone)]
pub struct Graph {
    node_count: usize,
    edges: Vec<Edge>,
    arcs: Vec<Arc>,
    incident: Vec<Vec<EdgeId>>,
    outgoing: Vec<Vec<ArcId>>,
    edge_arcs: Vec<(ArcId, Option<ArcId>)>,
}

impl Graph {
    pub fn new(node_count: usize) -> Result<Self, ConfigError> {
        if node_count == 0 {
            return Err(ConfigError::InvalidGraph(
                "graph needs at least the root node".to_string(),
            ));
        }
        Ok(Self {
            node_count,
            edges: Vec::new(),
            arcs: Vec::new(),
            incident: vec![Vec::new(); node_count],
            outgoing: vec![Vec::new(); node_count],
            edge_arcs: Vec::new(),
        })
    }

    pub fn from_edges(node_count: usize, edges: &[(usize, usize, i64)]) -> Result<Self, ConfigError> {
        let mut graph = Self::new(node_count)?;
        for &(v1, v2, weight) in edges {
            graph.add_edge(NodeId(v1), NodeId(v2), weight)?;
        }
        Ok(graph)
    }

    pub fn add_edge(&mut self, v1: NodeId, v2: NodeId, weight: i64) -> Result<EdgeId, ConfigError> {
        if v1.0 >= self.node_count || v2.0 >= self.node_count {
            return Err(ConfigError::InvalidGraph(format!(
                "edge ({}, {}) has an endpoint outside {} nodes",
                v1.0, v2.0, self.node_count
            )));
        }
        if v1 == v2 {
            return Err(ConfigError::InvalidGraph(format!(
                "self-loop on node {}",
                v1.0
            )));
        }
        let edge_id = EdgeId(self.edges.len());
        self.edges.push(Edge { v1, v2, weight });
        self.incident[v1.0].push(edge_id);
        self.incident[v2.0].push(edge_id);

        if v1 == ROOT || v2 == ROOT {
            let head = if v1 == ROOT { v2 } else { v1 };
            let arc = self.push_arc(ROOT, head, edge_id, None);
            self.edge_arcs.push((arc, None));
        } else {
            let forward = ArcId(self.arcs.len());
            let backward = ArcId(forward.0 + 1);
            self.push_arc(v1, v2, edge_id, Some(backward));
            self.push_arc(v2, v1, edge_id, Some(forward));
            self.edge_arcs.push((forward, Some(backward)));
        }
        Ok(edge_id)
    }

    fn push_arc(&mut self, tail: NodeId, head: NodeId, edge: EdgeId, opposite: Option<ArcId>) -> ArcId {
        let arc_id = ArcId(self.arcs.len());
        self.arcs.push(Arc {
            tail,
            head,
            edge,
            opposite,
        });
        self.outgoing[tail.0].push(arc_id);
        arc_id
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.0)
    }

    pub fn arc(&self, arc: ArcId) -> Option<&Arc> {
        self.arcs.get(arc.0)
    }

    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    pub fn arc_list(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (EdgeId(idx), edge))
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &Arc)> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(idx, arc)| (ArcId(idx), arc))
    }

    pub fn incident_edges(&self, node: NodeId) -> Option<&[EdgeId]> {
        self.incident.get(node.0).map(Vec::as_slice)
    }

    pub fn outgoing_arcs(&self, node: NodeId) -> Option<&[ArcId]> {
        self.outgoing.get(node.0).map(Vec::as_slice)
    }

    /// Arcs created for `edge`: the first one, and its opposite if any.
    pub fn arcs_of_edge(&self, edge: EdgeId) -> Option<(ArcId, Option<ArcId>)> {
        self.edge_arcs.get(edge.0).copied()
    }

    /// Arc of `edge` running from `tail` to the other endpoint, if it exists.
    pub fn arc_from(&self, edge: EdgeId, tail: NodeId) -> Option<ArcId> {
        let (first, second) = self.arcs_of_edge(edge)?;
        if self.arcs[first.0].tail == tail {
            return Some(first);
        }
        second.filter(|arc| self.arcs[arc.0].tail == tail)
    }

    /// `(tail, head)` pairs in arc order, the layout the flow network expects.
    pub fn arc_endpoints(&self) -> Vec<(usize, usize)> {
        self.arcs
            .iter()
            .map(|arc| (arc.tail.0, arc.head.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_edges_get_a_single_outgoing_arc() {
        let graph = Graph::from_edges(3, &[(1, 0, 4), (1, 2, 7)]).unwrap();
        assert_eq!(graph.arc_count(), 3);
        let root_arc = graph.arc(ArcId(0)).unwrap();
        assert_eq!(root_arc.tail, ROOT);
        assert_eq!(root_arc.head, NodeId(1));
        assert_eq!(root_arc.opposite, None);
        assert!(graph.outgoing_arcs(NodeId(1)).unwrap().iter().all(|&a| {
            graph.arc(a).unwrap().head != ROOT
        }));
    }

    #[test]
    fn opposite_arcs_swap_endpoints() {
        let graph = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 1, 4)]).unwrap();
        assert_eq!(graph.arc_count(), 7);
        for (arc_id, arc) in graph.arcs() {
            if let Some(opposite) = arc.opposite {
                let other = graph.arc(opposite).unwrap();
                assert_eq!(other.tail, arc.head);
                assert_eq!(other.head, arc.tail);
                assert_eq!(other.edge, arc.edge);
                assert_eq!(other.opposite, Some(arc_id));
            }
        }
        assert_eq!(graph.arc_from(EdgeId(3), NodeId(1)), Some(ArcId(6)));
        assert_eq!(graph.arc_from(EdgeId(0), NodeId(1)), None);
    }

    #[test]
    fn rejects_malformed_edges() {
        let mut graph = Graph::new(2).unwrap();
        assert!(matches!(
            graph.add_edge(NodeId(0), NodeId(2), 1),
            Err(ConfigError::InvalidGraph(_))
        ));
        assert!(matches!(
            graph.add_edge(NodeId(1), NodeId(1), 1),
            Err(ConfigError::InvalidGraph(_))
        ));
        assert!(Graph::new(0).is_err());
    }

    #[test]
    fn incidence_lists_cover_both_endpoints() {
        let graph = Graph::from_edges(3, &[(0, 1, 1), (1, 2, 1)]).unwrap();
        assert_eq!(graph.incident_edges(NodeId(1)).unwrap(), &[EdgeId(0), EdgeId(1)]);
        assert_eq!(graph.incident_edges(NodeId(2)).unwrap(), &[EdgeId(1)]);
        assert!(graph.incident_edges(NodeId(3)).is_none());
    }
}
