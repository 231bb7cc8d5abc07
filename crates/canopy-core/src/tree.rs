use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// Canonical tree: the single normalized representation every extractor
/// produces and the diff engine consumes.
///
/// Serializes to plain JSON (string / array / object). Mapping entries keep
/// first-seen key order, and keys are unique within a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Scalar(String),
    Sequence(Vec<Tree>),
    Mapping(Vec<(String, Tree)>),
}

impl Tree {
    pub fn scalar(value: impl Into<String>) -> Self {
        Tree::Scalar(value.into())
    }

    /// An empty mapping, for builder-style construction.
    pub fn mapping() -> Self {
        Tree::Mapping(Vec::new())
    }

    /// Append an entry to a mapping, consuming and returning `self`.
    /// Non-mapping receivers are returned unchanged.
    pub fn with_entry(mut self, key: impl Into<String>, value: Tree) -> Self {
        if let Tree::Mapping(entries) = &mut self {
            entries.push((key.into(), value));
        }
        self
    }

    /// Look up a mapping entry by key. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Tree::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Tree::Scalar(s) => s.is_empty(),
            Tree::Sequence(items) => items.is_empty(),
            Tree::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Encode to interchange JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Decode from interchange JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Textual form of a node, used when a whole subtree appears in a
    /// report entry: scalars render as their raw text, composites as
    /// compact JSON.
    pub fn render(&self) -> String {
        match self {
            Tree::Scalar(s) => s.clone(),
            _ => serde_json::to_string(self).expect("tree should be serializable"),
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Tree::Scalar(s) => serializer.serialize_str(s),
            Tree::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, array, or object")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v.to_owned()))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v))
    }

    // Hand-authored interchange files may contain bare JSON numbers,
    // booleans, or null; coerce them to their textual scalar form.
    fn visit_bool<E: serde::de::Error>(self, v: bool) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v.to_string()))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v.to_string()))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v.to_string()))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(v.to_string()))
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Tree, E> {
        Ok(Tree::Scalar(String::new()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Tree, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Tree::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Tree, A::Error> {
        let mut entries: Vec<(String, Tree)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Tree>()? {
            // Duplicate keys overwrite in place; key order stays first-seen.
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(Tree::Mapping(entries))
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}
