//! Property-level diffing of resource snapshots
//!
//! The engine walks the `before` and `after` trees of one resource change in
//! sorted key order and emits one `PropertyChange` per differing leaf. Maps
//! are descended into; every other value (lists included) is compared as a
//! whole. Sensitivity and unknown-value marker trees are walked in lockstep.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::property::PropertyChange;
use crate::format::is_empty_value;
use crate::plan::{ActionType, ResourceChange};

/// Nesting levels below the resource root that are still compared
pub const DEFAULT_MAX_DEPTH: usize = 10;

static NULL: Value = Value::Null;

/// Which snapshots take part in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sides {
    /// Update and recreate: structural comparison
    Both,
    /// Create: `before` is empty at every path
    AfterOnly,
    /// Delete: `after` is empty at every path
    BeforeOnly,
}

impl Sides {
    fn descends(&self, before: &Value, after: &Value) -> bool {
        match self {
            Sides::Both => before.is_object() && after.is_object(),
            Sides::AfterOnly => after.is_object(),
            Sides::BeforeOnly => before.is_object(),
        }
    }
}

/// Marker sub-trees for the node being compared
#[derive(Debug, Clone, Copy, Default)]
struct Markers<'a> {
    before_sensitive: Option<&'a Value>,
    after_sensitive: Option<&'a Value>,
    after_unknown: Option<&'a Value>,
}

impl<'a> Markers<'a> {
    fn child(&self, key: &str) -> Markers<'a> {
        Markers {
            before_sensitive: child_marker(self.before_sensitive, key),
            after_sensitive: child_marker(self.after_sensitive, key),
            after_unknown: child_marker(self.after_unknown, key),
        }
    }

    fn is_sensitive(&self) -> bool {
        is_marked(self.before_sensitive) || is_marked(self.after_sensitive)
    }

    fn is_unknown(&self) -> bool {
        is_marked(self.after_unknown)
    }

    /// Whether a value emitted whole from here carries a sensitive part
    fn covers_sensitive(&self) -> bool {
        contains_marked(self.before_sensitive) || contains_marked(self.after_sensitive)
    }
}

/// Marker for `key` below `marker`
///
/// A literal `true` covers everything beneath it. A container only says the
/// structure exists, so the child entry decides on its own.
fn child_marker<'a>(marker: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    match marker? {
        marked @ Value::Bool(true) => Some(marked),
        Value::Object(children) => children.get(key),
        _ => None,
    }
}

fn is_marked(marker: Option<&Value>) -> bool {
    matches!(marker, Some(Value::Bool(true)))
}

fn contains_marked(marker: Option<&Value>) -> bool {
    match marker {
        Some(Value::Bool(true)) => true,
        Some(Value::Array(items)) => items.iter().any(|item| contains_marked(Some(item))),
        Some(Value::Object(children)) => children.values().any(|child| contains_marked(Some(child))),
        _ => false,
    }
}

/// Computes the ordered property changes of a resource change
pub struct DiffEngine {
    max_depth: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Diff one resource change
    ///
    /// The result is sorted by property path and never holds a path twice.
    pub fn analyze(&self, resource: &ResourceChange) -> Vec<PropertyChange> {
        let sides = match resource.action {
            ActionType::Create => Sides::AfterOnly,
            ActionType::Delete => Sides::BeforeOnly,
            _ => Sides::Both,
        };

        let before = match sides {
            Sides::AfterOnly => None,
            _ => resource.before.as_ref(),
        };
        let after = match sides {
            Sides::BeforeOnly => None,
            _ => resource.after.as_ref(),
        };

        let markers = Markers {
            before_sensitive: before.and(resource.before_sensitive.as_ref()),
            after_sensitive: after.and(resource.after_sensitive.as_ref()),
            after_unknown: match sides {
                Sides::BeforeOnly => None,
                _ => resource.after_unknown.as_ref(),
            },
        };

        let mut changes = BTreeMap::new();
        self.compare_level("", before, after, markers, sides, 0, &mut changes);

        changes.into_values().collect()
    }

    /// Compare the children of two nodes; non-map nodes have no children
    #[allow(clippy::too_many_arguments)]
    fn compare_level(
        &self,
        prefix: &str,
        before: Option<&Value>,
        after: Option<&Value>,
        markers: Markers<'_>,
        sides: Sides,
        depth: usize,
        out: &mut BTreeMap<String, PropertyChange>,
    ) {
        if depth > self.max_depth {
            log::debug!("Diff depth limit reached at '{}'", prefix);
            return;
        }

        let empty = Map::new();
        let before_map = before.and_then(|v| v.as_object()).unwrap_or(&empty);
        let after_map = after.and_then(|v| v.as_object()).unwrap_or(&empty);

        let keys: BTreeSet<&String> = before_map.keys().chain(after_map.keys()).collect();

        for key in keys {
            let path = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", prefix, key)
            };

            let before_value = before_map.get(key).unwrap_or(&NULL);
            let after_value = after_map.get(key).unwrap_or(&NULL);

            self.compare_property(
                path,
                before_value,
                after_value,
                markers.child(key),
                sides,
                depth,
                out,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn compare_property(
        &self,
        path: String,
        before: &Value,
        after: &Value,
        markers: Markers<'_>,
        sides: Sides,
        depth: usize,
        out: &mut BTreeMap<String, PropertyChange>,
    ) {
        let sensitive = markers.is_sensitive();

        // Nothing below an unknown value can be diffed
        if markers.is_unknown() {
            let change = PropertyChange::new(&path, before.clone(), Value::Null)
                .with_sensitive(sensitive || markers.covers_sensitive())
                .with_computed(true);
            out.entry(path).or_insert(change);
            return;
        }

        if before == after && !sensitive {
            return;
        }

        if sides.descends(before, after) && !sensitive {
            self.compare_level(&path, Some(before), Some(after), markers, sides, depth + 1, out);
            return;
        }

        if sensitive {
            if before.is_null() && after.is_null() {
                return;
            }
        } else if is_empty_value(before) && is_empty_value(after) {
            return;
        }

        let hidden = sensitive || markers.covers_sensitive();
        let change = PropertyChange::new(&path, before.clone(), after.clone()).with_sensitive(hidden);
        out.entry(path).or_insert(change);
    }
}
