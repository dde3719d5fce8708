//! Shared utilities for graph algorithms
//!
//! Provides a read-only, weighted view of a directed topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of a weighted directed graph using Compressed Sparse Row (CSR) format.
///
/// Parallel edges are merged when the view is built: each `(source, target)` pair
/// appears at most once and carries the summed weight.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,
    /// Edge weights: aligned with `out_targets`
    pub out_weights: Vec<f64>,

    /// Incoming weights, grouped by target node
    /// Offsets into `in_weights`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    pub in_weights: Vec<f64>,
}

impl GraphView {
    /// Build a view from a weighted edge list.
    ///
    /// Nodes are indexed in order of first appearance (source before target).
    pub fn from_weighted_edges(edges: &[(NodeId, NodeId, f64)]) -> Self {
        let mut index_to_node = Vec::new();
        let mut node_to_index = HashMap::new();

        let mut intern = |id: NodeId, index_to_node: &mut Vec<NodeId>| -> usize {
            *node_to_index.entry(id).or_insert_with(|| {
                index_to_node.push(id);
                index_to_node.len() - 1
            })
        };

        // Merge parallel edges; keep insertion order per source
        let mut merged: Vec<Vec<(usize, f64)>> = Vec::new();
        let mut slot: HashMap<(usize, usize), usize> = HashMap::new();

        for &(source, target, weight) in edges {
            let u = intern(source, &mut index_to_node);
            let v = intern(target, &mut index_to_node);
            if merged.len() < index_to_node.len() {
                merged.resize(index_to_node.len(), Vec::new());
            }

            match slot.get(&(u, v)) {
                Some(&pos) => merged[u][pos].1 += weight,
                None => {
                    slot.insert((u, v), merged[u].len());
                    merged[u].push((v, weight));
                }
            }
        }

        let node_count = index_to_node.len();
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut out_w: Vec<Vec<f64>> = vec![Vec::new(); node_count];
        let mut in_w: Vec<Vec<f64>> = vec![Vec::new(); node_count];

        for (u, targets) in merged.into_iter().enumerate() {
            for (v, weight) in targets {
                outgoing[u].push(v);
                out_w[u].push(weight);
                in_w[v].push(weight);
            }
        }

        Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            outgoing,
            out_w,
            in_w,
        )
    }

    fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        out_weights: Vec<Vec<f64>>,
        in_weights: Vec<Vec<f64>>,
    ) -> Self {
        let (out_offsets, out_targets) = flatten(outgoing);
        let (_, out_weights) = flatten(out_weights);
        let (in_offsets, in_weights) = flatten(in_weights);

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            out_weights,
            in_offsets,
            in_weights,
        }
    }

    /// Number of distinct (source, target) edges
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn out_weights(&self, idx: usize) -> &[f64] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_weights[start..end]
    }

    /// Get weights for incoming edges of a node
    pub fn in_weights(&self, idx: usize) -> &[f64] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_weights[start..end]
    }

    /// Iterate all edges as `(source_idx, target_idx, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.node_count).flat_map(move |u| {
            self.successors(u)
                .iter()
                .zip(self.out_weights(u))
                .map(move |(&v, &w)| (u, v, w))
        })
    }
}

fn flatten<T>(lists: Vec<Vec<T>>) -> (Vec<usize>, Vec<T>) {
    let mut offsets = Vec::with_capacity(lists.len() + 1);
    let mut flat = Vec::new();

    offsets.push(0);
    for row in lists {
        flat.extend(row);
        offsets.push(flat.len());
    }

    (offsets, flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_merges_parallel_edges() {
        let view = GraphView::from_weighted_edges(&[(10, 20, 1.0), (10, 20, 2.0), (20, 30, 1.0)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.index_to_node, vec![10, 20, 30]);

        let a = view.node_to_index[&10];
        assert_eq!(view.out_weights(a), &[3.0]);
        assert_eq!(view.successors(a).len(), 1);

        let b = view.node_to_index[&20];
        assert_eq!(view.in_weights(b), &[3.0]);
        assert_eq!(view.in_weights(a), &[] as &[f64]);
    }

    #[test]
    fn test_self_loop_in_both_directions() {
        let view = GraphView::from_weighted_edges(&[(7, 7, 4.0)]);

        assert_eq!(view.node_count, 1);
        assert_eq!(view.successors(0), &[0]);
        assert_eq!(view.out_weights(0), &[4.0]);
        assert_eq!(view.in_weights(0), &[4.0]);
    }

    #[test]
    fn test_empty_view() {
        let view = GraphView::from_weighted_edges(&[]);
        assert_eq!(view.node_count, 0);
        assert_eq!(view.edge_count(), 0);
        assert_eq!(view.edges().count(), 0);
    }
}
