//! The item record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the partition key attribute. Every stored item carries it.
pub const KEY_ATTRIBUTE: &str = "id";

/// Name of the one business field validated at creation.
pub const NAME_ATTRIBUTE: &str = "name";

/// A single addressable record: an open field map keyed by `id`.
///
/// Apart from `id` and `name` the fields are opaque passthrough data.
/// Field order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// The item's identifier, if present and a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(KEY_ATTRIBUTE).and_then(Value::as_str)
    }

    /// The `name` field when it is a non-empty string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0
            .get(NAME_ATTRIBUTE)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Replace (or add) the identifier. The `id` field is moved to the front
    /// so serialized items lead with their key.
    pub fn assign_id(&mut self, id: String) {
        let previous = std::mem::take(&mut self.0);
        let mut fields = Map::with_capacity(previous.len() + 1);
        fields.insert(KEY_ATTRIBUTE.to_string(), Value::String(id));
        for (field, value) in previous {
            if field != KEY_ATTRIBUTE {
                fields.insert(field, value);
            }
        }
        self.0 = fields;
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Item {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Object(item.0)
    }
}
