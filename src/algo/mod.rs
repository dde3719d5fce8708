//! Network construction
//!
//! Aggregation of filtered events into weighted edges, and the adapter
//! layer that projects them onto the `newsnet-graph-algorithms` view to
//! compute degree statistics.

pub mod aggregate;
pub mod network;

pub use aggregate::{aggregate, Grouping, NodeKey, WeightedEdge, WeightedEdges};
pub use network::{build, NetworkEdge, NetworkNode, NetworkView, ScaleBounds, MISSING_LABEL};

// Re-export algorithms
pub use newsnet_graph_algorithms::{Direction, ValueRange, WeightedDegree};
