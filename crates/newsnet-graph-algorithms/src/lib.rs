pub mod common;
pub mod degree;

pub use common::{GraphView, NodeId};
pub use degree::{top_k_by_weight, weighted_degrees, Direction, ValueRange, WeightedDegree};
