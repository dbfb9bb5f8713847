//! Separation oracles for branch-and-cut formulations of the rooted k-node
//! minimum spanning tree problem.
//!
//! The crate exposes the graph model with its directed-arc expansion, a
//! shortest-path oracle for cycle-elimination inequalities, a capped
//! max-flow/min-cut oracle for directed connection inequalities, and the
//! [`Separator`] that drives both on behalf of an external MIP engine.

pub mod graph;
pub mod inequality;
pub mod oracle;
pub mod separation;

pub use graph::{Arc, ArcId, Edge, EdgeId, Graph, NodeId, RootedTree, ROOT};
pub use inequality::{Assignment, Inequality, Sense, Term, Var};
pub use separation::{
    CutPolicy, Dedup, Family, SeparationConfig, SeparationContext, SeparationStats, Separator,
};

/// Rejected setup: malformed graph data or configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("k = {k} must satisfy 1 <= k < {node_count}")]
    InvalidK { k: usize, node_count: usize },
    #[error("per-round inequality budget must be positive")]
    ZeroBudget,
    #[error("{name} must be positive and finite, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },
    #[error("connection threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
}

/// Unexpected state inside a shortest-path or flow computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    #[error("node {node} outside range of {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },
    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("arc {arc} has identical tail and head")]
    InvalidArc { arc: usize },
    #[error("source and sink are both node {0}")]
    SourceIsSink(usize),
    #[error("no capacities supplied for the flow network")]
    CapacitiesMissing,
    #[error("flow network queried before update")]
    NotConfigured,
    #[error("capacity of arc {arc} is {value}")]
    InvalidCapacity { arc: usize, value: f64 },
    #[error("weight slot {slot} is {value}")]
    InvalidWeight { slot: usize, value: f64 },
    #[error("edge {edge} outside range of {edge_count} edges")]
    EdgeOutOfRange { edge: usize, edge_count: usize },
    #[error("threshold {0} is not a number")]
    InvalidThreshold(f64),
}

/// Failure of a single separation round. The round emits no inequalities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeparationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("{what} values have length {actual}, expected {expected}")]
    AssignmentLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} value {index} is {value}")]
    InvalidValue {
        what: &'static str,
        index: usize,
        value: f64,
    },
}

/// Reasons an integral selection is not a rooted k-tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("{what} values have length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} {index} has fractional value {value}")]
    Fractional {
        what: &'static str,
        index: usize,
        value: f64,
    },
    #[error("selection has {actual} edges, expected {expected}")]
    WrongSize { expected: usize, actual: usize },
    #[error("edge id {0} out of range")]
    UnknownEdge(usize),
    #[error("selection is not connected to the root")]
    Disconnected,
    #[error("selection contains a cycle")]
    Cycle,
    #[error("node {0} is entered by more than one selected arc")]
    MultipleParents(usize),
}
