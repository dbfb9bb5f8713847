//! Graph oracles queried by the separation routines.

pub mod min_cut;
pub mod shortest_path;

pub use min_cut::FlowNetwork;
pub use shortest_path::{shortest_path, DirectionWeights, ShortestPath};
