use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::DiffResult;
use crate::tree::Tree;

/// Which comparison side serializes to more bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LargerSide {
    Left,
    Right,
    Equal,
}

impl fmt::Display for LargerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LargerSide::Left => write!(f, "left"),
            LargerSide::Right => write!(f, "right"),
            LargerSide::Equal => write!(f, "equal"),
        }
    }
}

/// Quantified summary of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub difference_percentage: f64,
    pub larger_side: LargerSide,
    pub size_skew_percentage: f64,
}

/// Recursive item count: 1 per scalar, 1 per container plus its children.
/// A mapping with two scalar children counts as 3.
pub fn item_count(tree: &Tree) -> usize {
    match tree {
        Tree::Scalar(_) => 1,
        Tree::Sequence(items) => 1 + items.iter().map(item_count).sum::<usize>(),
        Tree::Mapping(entries) => 1 + entries.iter().map(|(_, v)| item_count(v)).sum::<usize>(),
    }
}

/// Derive metrics for a comparison of `left` and `right` with the delta
/// already computed.
///
/// The changed-item count is the flat sum of the three category lists, so
/// a changed subtree contributes once at its own path and again through
/// its ancestors' item counts. That double-counting is intentional and
/// kept stable: downstream thresholds are calibrated against it.
pub fn compute(left: &Tree, right: &Tree, delta: &DiffResult) -> Metrics {
    let total_items = item_count(left) + item_count(right);
    let difference_percentage = if total_items == 0 {
        0.0
    } else {
        delta.change_count() as f64 / total_items as f64 * 100.0
    };

    let left_len = serialized_len(left);
    let right_len = serialized_len(right);
    let (larger_side, size_skew_percentage) = if left_len > right_len {
        (
            LargerSide::Left,
            (left_len - right_len) as f64 / right_len as f64 * 100.0,
        )
    } else if right_len > left_len {
        (
            LargerSide::Right,
            (right_len - left_len) as f64 / left_len as f64 * 100.0,
        )
    } else {
        (LargerSide::Equal, 0.0)
    };

    Metrics {
        difference_percentage,
        larger_side,
        size_skew_percentage,
    }
}

fn serialized_len(tree: &Tree) -> usize {
    serde_json::to_string(tree)
        .expect("tree should be serializable")
        .len()
}
