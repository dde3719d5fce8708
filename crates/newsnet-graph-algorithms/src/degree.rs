//! Weighted degree statistics
//!
//! Per-node sums of incident edge weights and the value ranges used to
//! drive size/color encodings.

use super::common::GraphView;
use std::cmp::Ordering;

/// Weighted degree of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedDegree {
    /// Sum of incoming edge weights (includes the self-loop)
    pub in_weight: f64,
    /// Sum of outgoing edge weights (includes the self-loop)
    pub out_weight: f64,
    /// Weight of the edge from the node to itself, if any
    pub self_loop: f64,
}

impl WeightedDegree {
    /// Total incident weight.
    ///
    /// Non-loop edges count once; a self-loop counts twice, once for each end.
    pub fn total(&self) -> f64 {
        let undirected = (self.in_weight - self.self_loop) + (self.out_weight - self.self_loop);
        undirected + 2.0 * self.self_loop
    }

    /// The statistic used for color encoding.
    ///
    /// Summed in+out weight with the same self-loop adjustment as [`total`](Self::total),
    /// so the two currently coincide. See [`flow`](Self::flow) for in minus out.
    pub fn net(&self) -> f64 {
        self.total()
    }

    /// Directed net flow (in minus out). Self-loops cancel out.
    pub fn flow(&self) -> f64 {
        self.in_weight - self.out_weight
    }
}

/// Compute weighted degrees for every node, aligned with dense indices.
pub fn weighted_degrees(view: &GraphView) -> Vec<WeightedDegree> {
    (0..view.node_count)
        .map(|idx| WeightedDegree {
            in_weight: view.in_weights(idx).iter().sum(),
            out_weight: view.out_weights(idx).iter().sum(),
            self_loop: view
                .successors(idx)
                .iter()
                .zip(view.out_weights(idx))
                .filter(|(v, _)| **v == idx)
                .map(|(_, &w)| w)
                .sum(),
        })
        .collect()
}

/// Closed range of a statistic over all nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range of the given values, `None` when empty
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Linear position of `value` inside the range, clamped to [0, 1].
    ///
    /// A zero-width range maps everything to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.width();
        if width <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }
}

/// Which side of a node's incident weight to rank by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// Top `k` nodes by weighted in- or out-degree, as `(dense index, weight)`.
///
/// Equal weights are ordered by `tie_break` over dense indices.
pub fn top_k_by_weight<F>(
    degrees: &[WeightedDegree],
    direction: Direction,
    k: usize,
    mut tie_break: F,
) -> Vec<(usize, f64)>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut ranked: Vec<(usize, f64)> = degrees
        .iter()
        .enumerate()
        .map(|(idx, d)| match direction {
            Direction::Outgoing => (idx, d.out_weight),
            Direction::Incoming => (idx, d.in_weight),
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| tie_break(a.0, b.0)));
    ranked.truncate(k);
    ranked
}
