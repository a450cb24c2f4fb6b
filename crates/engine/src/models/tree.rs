//! CART regression tree.
//!
//! Nodes live in a flat arena indexed from the root at 0. Traversal goes
//! left when the feature value is `<=` the threshold.

use goalcast_core::FEATURE_COUNT;

use super::{Regressor, Row};

/// A tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Terminal node holding the mean target of its samples
    Leaf {
        /// Predicted value
        value: f64,
    },
    /// Internal split
    Split {
        /// Feature column
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Index of the `<=` child
        left: usize,
        /// Index of the `>` child
        right: usize,
    },
}

/// Growth limits of a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Maximum depth (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Regression tree minimizing squared error.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit on the samples selected by `indices`; an index may repeat.
    pub fn fit(rows: &[Row], targets: &[f64], indices: &[usize], params: TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut idx = indices.to_vec();
        tree.grow(rows, targets, &mut idx, 0, params);
        tree
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn grow(
        &mut self,
        rows: &[Row],
        targets: &[f64],
        idx: &mut [usize],
        depth: usize,
        params: TreeParams,
    ) -> usize {
        let id = self.nodes.len();
        let value = if idx.is_empty() {
            0.0
        } else {
            idx.iter().map(|&i| targets[i]).sum::<f64>() / idx.len() as f64
        };
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || idx.len() < params.min_samples_split.max(2) {
            return id;
        }

        let Some(split) = best_split(rows, targets, idx) else {
            return id;
        };

        let (mut left_idx, mut right_idx): (Vec<usize>, Vec<usize>) = idx
            .iter()
            .partition(|&&i| rows[i][split.feature] <= split.threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return id;
        }

        let left = self.grow(rows, targets, &mut left_idx, depth + 1, params);
        let right = self.grow(rows, targets, &mut right_idx, depth + 1, params);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }
}

impl Regressor for RegressionTree {
    fn predict_row(&self, row: &Row) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }
}

/// Lowest total squared error split over all features, if any improves on
/// the parent. Ties keep the first candidate found.
fn best_split(rows: &[Row], targets: &[f64], idx: &mut [usize]) -> Option<SplitCandidate> {
    let n = idx.len();
    let total: f64 = idx.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = idx.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total * total / n as f64;
    if parent_sse <= 1e-12 {
        return None;
    }

    let mut best: Option<SplitCandidate> = None;
    for feature in 0..FEATURE_COUNT {
        idx.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut sum_left = 0.0;
        let mut sq_left = 0.0;
        for k in 1..n {
            let y = targets[idx[k - 1]];
            sum_left += y;
            sq_left += y * y;

            let lo = rows[idx[k - 1]][feature];
            let hi = rows[idx[k]][feature];
            if lo >= hi {
                continue;
            }

            let n_left = k as f64;
            let n_right = (n - k) as f64;
            let sum_right = total - sum_left;
            let sq_right = total_sq - sq_left;
            let sse = (sq_left - sum_left * sum_left / n_left)
                + (sq_right - sum_right * sum_right / n_right);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                let mid = lo + (hi - lo) / 2.0;
                let threshold = if mid < hi { mid } else { lo };
                best = Some(SplitCandidate { feature, threshold, sse });
            }
        }
    }

    best.filter(|b| b.sse < parent_sse)
}
