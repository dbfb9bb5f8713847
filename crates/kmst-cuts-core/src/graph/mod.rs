mod core;
pub mod tree;

pub use self::core::{Arc, ArcId, Edge, EdgeId, Graph, NodeId, ROOT};
pub use tree::{Indicators, RootedTree};
