use serde::Serialize;
use serde_json::Value;

/// How a property differs between the two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyChangeKind {
    Addition,
    Removal,
    Modification,
}

impl PropertyChangeKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            PropertyChangeKind::Addition => "+",
            PropertyChangeKind::Removal => "-",
            PropertyChangeKind::Modification => "~",
        }
    }

    /// CSS class used by the HTML report
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyChangeKind::Addition => "addition",
            PropertyChangeKind::Removal => "removal",
            PropertyChangeKind::Modification => "modification",
        }
    }
}

/// A single property-level difference within one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyChange {
    /// Dot-joined path from the resource root (e.g., "tags.Name")
    pub property_path: String,

    /// Value before the change, `Null` when absent
    pub before_value: Value,

    /// Value after the change, `Null` when absent or not yet known
    pub after_value: Value,

    pub is_sensitive: bool,

    /// The after value is known only after apply
    pub is_computed: bool,
}

impl PropertyChange {
    pub fn new(path: &str, before_value: Value, after_value: Value) -> Self {
        Self {
            property_path: path.to_string(),
            before_value,
            after_value,
            is_sensitive: false,
            is_computed: false,
        }
    }

    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.is_sensitive = sensitive;
        self
    }

    pub fn with_computed(mut self, computed: bool) -> Self {
        self.is_computed = computed;
        self
    }

    /// Classify the change; a computed after value counts as present
    pub fn kind(&self) -> PropertyChangeKind {
        if self.before_value.is_null() {
            PropertyChangeKind::Addition
        } else if self.after_value.is_null() && !self.is_computed {
            PropertyChangeKind::Removal
        } else {
            PropertyChangeKind::Modification
        }
    }

    pub fn is_addition(&self) -> bool {
        self.kind() == PropertyChangeKind::Addition
    }

    pub fn is_removal(&self) -> bool {
        self.kind() == PropertyChangeKind::Removal
    }

    pub fn is_modification(&self) -> bool {
        self.kind() == PropertyChangeKind::Modification
    }

    /// First path segment, used for property filters
    pub fn base_property(&self) -> &str {
        self.property_path
            .split('.')
            .next()
            .unwrap_or(&self.property_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_classification() {
        assert!(PropertyChange::new("a", Value::Null, json!("x")).is_addition());
        assert!(PropertyChange::new("a", json!("x"), Value::Null).is_removal());
        assert!(PropertyChange::new("a", json!("x"), json!("y")).is_modification());
    }

    #[test]
    fn test_computed_is_never_a_removal() {
        let created = PropertyChange::new("id", Value::Null, Value::Null).with_computed(true);
        assert!(created.is_addition());

        let updated = PropertyChange::new("arn", json!("old"), Value::Null).with_computed(true);
        assert!(updated.is_modification());
    }

    #[test]
    fn test_base_property() {
        let change = PropertyChange::new("tags.Name", Value::Null, json!("x"));
        assert_eq!(change.base_property(), "tags");

        let top = PropertyChange::new("ami", Value::Null, json!("x"));
        assert_eq!(top.base_property(), "ami");
    }
}
