// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addresses of fields within a state tree.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One step of a [`Path`]: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Dot-joined address of a field, from the root of the tree.
///
/// Purely numeric segments are array indices, so `led.data.2.3` addresses
/// row 2, column 3 of the LED grid. The empty path is the root.
///
/// # Examples
///
/// ```
/// use microbit_sync::tracker::Path;
///
/// let path = Path::parse("led.data").index(2).index(3);
/// assert_eq!(path.to_string(), "led.data.2.3");
/// assert_eq!(path, Path::parse("led.data.2.3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<Segment>);

impl Path {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses a dot-joined path.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Self::root();
        }
        Self(
            s.split('.')
                .map(|part| match part.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(part.to_string()),
                })
                .collect(),
        )
    }

    /// Returns a path with `key` appended.
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.into()));
        Self(segments)
    }

    /// Returns a path with array position `index` appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Returns the segments of the path.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path without its last segment, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    /// Returns the last segment, or `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Returns `true` if `self` equals `other` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, other: &Path) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Looks up the value this path addresses in `root`.
    ///
    /// Index segments also match object members named by the number, which
    /// is how maps keyed by pin number are addressed.
    #[must_use]
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key),
            (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
            (Value::Array(items), Segment::Index(index)) => items.get(*index),
            _ => None,
        })
    }

    /// Collects every leaf of `root` (anything that is not a non-empty
    /// object or array) keyed by its path.
    #[must_use]
    pub fn flatten(root: &Value) -> BTreeMap<Path, Value> {
        let mut leaves = BTreeMap::new();
        collect_leaves(&Self::root(), root, &mut leaves);
        leaves
    }

    /// Rebuilds a nested value from path-keyed leaves.
    ///
    /// Index segments produce arrays; gaps are filled with `null`.
    #[must_use]
    pub fn unflatten(leaves: &BTreeMap<Path, Value>) -> Value {
        let mut root = Value::Null;
        for (path, value) in leaves {
            insert_leaf(&mut root, path.segments(), value.clone());
        }
        root
    }
}

fn collect_leaves(path: &Path, node: &Value, leaves: &mut BTreeMap<Path, Value>) {
    match node {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_leaves(&path.child(key.as_str()), child, leaves);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                collect_leaves(&path.index(index), child, leaves);
            }
        }
        _ => {
            leaves.insert(path.clone(), node.clone());
        }
    }
}

fn insert_leaf(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    let child = match first {
        Segment::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else { return };
            map.entry(key.clone()).or_insert(Value::Null)
        }
        Segment::Index(index) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let Value::Array(items) = node else { return };
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[*index]
        }
    };
    insert_leaf(child, rest, value);
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_and_display() {
        let path = Path::parse("magnetometer.bearing.data");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "magnetometer.bearing.data");

        let grid = Path::parse("led.data.2.3");
        assert_eq!(grid.last(), Some(&Segment::Index(3)));
    }

    #[test]
    fn root_path() {
        let root = Path::parse("");
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
        assert!(root.parent().is_none());
    }

    #[test]
    fn parent_and_starts_with() {
        let path = Path::parse("button.a.data");
        assert_eq!(path.parent(), Some(Path::parse("button.a")));
        assert!(path.starts_with(&Path::parse("button")));
        assert!(!path.starts_with(&Path::parse("button.b")));
    }

    #[test]
    fn lookup_objects_arrays_and_numeric_keys() {
        let tree = json!({
            "led": { "data": [[false, true]] },
            "ioPin": { "data": { "3": 200 } }
        });
        assert_eq!(Path::parse("led.data.0.1").lookup(&tree), Some(&json!(true)));
        assert_eq!(Path::parse("ioPin.data.3").lookup(&tree), Some(&json!(200)));
        assert_eq!(Path::parse("led.data.5").lookup(&tree), None);
        assert_eq!(Path::parse("led.data.0.1.x").lookup(&tree), None);
    }

    #[test]
    fn flatten_collects_leaves() {
        let tree = json!({
            "connection": { "connected": true },
            "accelerometer": { "data": { "x": 1.0, "y": null } },
            "ioPin": { "data": {} }
        });
        let leaves = Path::flatten(&tree);
        assert_eq!(leaves.len(), 4);
        assert_eq!(leaves[&Path::parse("connection.connected")], json!(true));
        assert_eq!(leaves[&Path::parse("accelerometer.data.y")], Value::Null);
        assert_eq!(leaves[&Path::parse("ioPin.data")], json!({}));
    }

    #[test]
    fn unflatten_rebuilds_nested_shape() {
        let tree = json!({
            "led": { "data": [[true, false], [false, true]], "updating": false },
            "name": "BBC micro:bit"
        });
        let rebuilt = Path::unflatten(&Path::flatten(&tree));
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn serializes_as_string() {
        let path = Path::parse("temperature.data");
        assert_eq!(serde_json::to_value(&path).unwrap(), json!("temperature.data"));
        let back: Path = serde_json::from_value(json!("led.data.1.2")).unwrap();
        assert_eq!(back, Path::root().child("led").child("data").index(1).index(2));
    }
}
