use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// One step from the tree root toward a differing node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(k) => write!(f, "['{k}']"),
        }
    }
}

/// Render a path the way reports print it: `root['slides'][2]`.
pub fn display_path(path: &[PathSegment]) -> String {
    let mut out = String::from("root");
    for segment in path {
        out.push_str(&segment.to_string());
    }
    out
}

/// A single reported difference at a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub path: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

/// Structural delta between two trees, grouped by change category.
/// Identical trees produce a result with all three lists empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub value_changed: Vec<Change>,
    pub item_added: Vec<Change>,
    pub item_removed: Vec<Change>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.value_changed.is_empty() && self.item_added.is_empty() && self.item_removed.is_empty()
    }

    /// Total entries across all categories (the changed-item count the
    /// metrics calculator consumes).
    pub fn change_count(&self) -> usize {
        self.value_changed.len() + self.item_added.len() + self.item_removed.len()
    }
}

/// Compare two trees structurally.
///
/// Membership comparison ignores order for both sequences and mappings,
/// but reported paths reference the structural location on the side the
/// element came from: removals are indexed into the left tree, additions
/// into the right.
pub fn diff(left: &Tree, right: &Tree) -> DiffResult {
    let mut result = DiffResult::default();
    let mut path = Vec::new();
    diff_node(left, right, &mut path, &mut result);
    result
}

fn diff_node(left: &Tree, right: &Tree, path: &mut Vec<PathSegment>, out: &mut DiffResult) {
    match (left, right) {
        (Tree::Scalar(a), Tree::Scalar(b)) => {
            if a != b {
                out.value_changed.push(Change {
                    path: path.clone(),
                    old_value: Some(a.clone()),
                    new_value: Some(b.clone()),
                });
            }
        }
        (Tree::Mapping(a), Tree::Mapping(b)) => {
            for (key, left_value) in a {
                match right.get(key) {
                    Some(right_value) => {
                        path.push(PathSegment::Key(key.clone()));
                        diff_node(left_value, right_value, path, out);
                        path.pop();
                    }
                    None => {
                        let mut removed_path = path.clone();
                        removed_path.push(PathSegment::Key(key.clone()));
                        out.item_removed.push(Change {
                            path: removed_path,
                            old_value: Some(left_value.render()),
                            new_value: None,
                        });
                    }
                }
            }
            for (key, right_value) in b {
                if left.get(key).is_none() {
                    let mut added_path = path.clone();
                    added_path.push(PathSegment::Key(key.clone()));
                    out.item_added.push(Change {
                        path: added_path,
                        old_value: None,
                        new_value: Some(right_value.render()),
                    });
                }
            }
        }
        (Tree::Sequence(a), Tree::Sequence(b)) => {
            // Multiset comparison. Each left element greedily claims the
            // first structurally equal unclaimed right element; the scan is
            // left-to-right on both sides so equal duplicates pair up
            // deterministically. Engine policy, relied on by path-sensitive
            // report expectations.
            let mut claimed = vec![false; b.len()];
            for (i, left_item) in a.iter().enumerate() {
                let matched = b
                    .iter()
                    .enumerate()
                    .find(|(j, right_item)| !claimed[*j] && *right_item == left_item);
                match matched {
                    Some((j, _)) => claimed[j] = true,
                    None => {
                        let mut removed_path = path.clone();
                        removed_path.push(PathSegment::Index(i));
                        out.item_removed.push(Change {
                            path: removed_path,
                            old_value: Some(left_item.render()),
                            new_value: None,
                        });
                    }
                }
            }
            for (j, right_item) in b.iter().enumerate() {
                if !claimed[j] {
                    let mut added_path = path.clone();
                    added_path.push(PathSegment::Index(j));
                    out.item_added.push(Change {
                        path: added_path,
                        old_value: None,
                        new_value: Some(right_item.render()),
                    });
                }
            }
        }
        // Type mismatch at a path is data, not a fault: report both sides
        // in their textual form.
        (left_other, right_other) => {
            out.value_changed.push(Change {
                path: path.clone(),
                old_value: Some(left_other.render()),
                new_value: Some(right_other.render()),
            });
        }
    }
}
