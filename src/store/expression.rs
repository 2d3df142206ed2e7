//! Partial-update compilation.
//!
//! Each submitted field becomes one `#k<i> = :v<i>` assignment. Field names
//! and values only ever appear in the placeholder maps, so the expression
//! text stays well-formed whatever the caller names its fields (including
//! reserved words such as `name`, `status` or `size`).

use serde_json::{Map, Value};
use tracing::trace;

/// Accumulates `SET` assignments for one conditional update.
#[derive(Debug, Clone)]
pub struct UpdateExpressionBuilder {
    key_attribute: String,
    assignments: Vec<String>,
    names: Vec<(String, String)>,
    values: Vec<(String, Value)>,
}

impl UpdateExpressionBuilder {
    /// Start a builder for a table whose partition key is `key_attribute`.
    /// The key attribute can never be assigned.
    #[must_use]
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            key_attribute: key_attribute.into(),
            assignments: Vec::new(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Assign `value` to `field`. Assignments to the key attribute are
    /// dropped. Returns whether the assignment was recorded.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> bool {
        let field = field.into();
        if field == self.key_attribute {
            trace!(field = %field, "skipping key attribute in update");
            return false;
        }
        let index = self.assignments.len();
        let name_placeholder = format!("#k{index}");
        let value_placeholder = format!(":v{index}");
        self.assignments
            .push(format!("{name_placeholder} = {value_placeholder}"));
        self.names.push((name_placeholder, field));
        self.values.push((value_placeholder, value));
        true
    }

    /// Assign every field of `fields`, in map order.
    #[must_use]
    pub fn extend(mut self, fields: Map<String, Value>) -> Self {
        for (field, value) in fields {
            self.set(field, value);
        }
        self
    }

    /// Number of recorded assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finish the instruction. `None` when nothing would be updated.
    #[must_use]
    pub fn build(self) -> Option<UpdateInstruction> {
        if self.assignments.is_empty() {
            return None;
        }
        Some(UpdateInstruction {
            update_expression: format!("SET {}", self.assignments.join(", ")),
            condition_expression: format!("attribute_exists({})", self.key_attribute),
            names: self.names,
            values: self.values,
        })
    }
}

/// A compiled conditional partial update.
///
/// Holds the expression texts plus the two placeholder maps. The
/// placeholders of assignment `i` are `#k<i>` and `:v<i>`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInstruction {
    update_expression: String,
    condition_expression: String,
    names: Vec<(String, String)>,
    values: Vec<(String, Value)>,
}

impl UpdateInstruction {
    /// `SET #k0 = :v0, #k1 = :v1, ...`
    #[must_use]
    pub fn update_expression(&self) -> &str {
        &self.update_expression
    }

    /// `attribute_exists(<key attribute>)`
    #[must_use]
    pub fn condition_expression(&self) -> &str {
        &self.condition_expression
    }

    /// Name placeholder → field name, in assignment order.
    #[must_use]
    pub fn names(&self) -> &[(String, String)] {
        &self.names
    }

    /// Value placeholder → value, in assignment order.
    #[must_use]
    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// The `(field, value)` pairs this instruction sets, resolved from the
    /// placeholder maps.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names
            .iter()
            .zip(self.values.iter())
            .map(|((_, field), (_, value))| (field.as_str(), value))
    }

    /// Field names this instruction sets.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(_, field)| field.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn assignments_use_placeholders_in_body_order() {
        let instruction = UpdateExpressionBuilder::new("id")
            .extend(fields(json!({"name": "Updated Item", "price": 15.99})))
            .build()
            .unwrap();

        assert_eq!(instruction.update_expression(), "SET #k0 = :v0, #k1 = :v1");
        assert_eq!(instruction.condition_expression(), "attribute_exists(id)");
        assert_eq!(
            instruction.names(),
            &[
                ("#k0".to_string(), "name".to_string()),
                ("#k1".to_string(), "price".to_string())
            ]
        );
        assert_eq!(
            instruction.values(),
            &[
                (":v0".to_string(), json!("Updated Item")),
                (":v1".to_string(), json!(15.99))
            ]
        );
    }

    #[test]
    fn key_attribute_is_never_assigned() {
        let builder = UpdateExpressionBuilder::new("id")
            .extend(fields(json!({"id": "other", "name": "New"})));
        assert_eq!(builder.len(), 1);
        let instruction = builder.build().unwrap();
        assert_eq!(instruction.fields().collect::<Vec<_>>(), ["name"]);
        assert_eq!(instruction.update_expression(), "SET #k0 = :v0");
    }

    #[test]
    fn only_key_attribute_builds_nothing() {
        let builder = UpdateExpressionBuilder::new("id").extend(fields(json!({"id": "x"})));
        assert!(builder.is_empty());
        assert!(builder.build().is_none());
    }

    #[test]
    fn hostile_field_names_stay_out_of_the_expression() {
        let awkward = "size = :v0, #k0 REMOVE name";
        let mut builder = UpdateExpressionBuilder::new("id");
        assert!(builder.set(awkward, json!(1)));
        assert!(builder.set("status", json!("open")));
        let instruction = builder.build().unwrap();

        assert_eq!(instruction.update_expression(), "SET #k0 = :v0, #k1 = :v1");
        assert!(!instruction.update_expression().contains("status"));
        let resolved: Vec<(&str, &Value)> = instruction.assignments().collect();
        assert_eq!(resolved[0], (awkward, &json!(1)));
        assert_eq!(resolved[1], ("status", &json!("open")));
    }

    #[test]
    fn nested_values_pass_through_untouched() {
        let nested = json!({"dims": {"w": 2, "h": [1, 2, 3]}, "tags": null});
        let instruction = UpdateExpressionBuilder::new("id")
            .extend(fields(nested))
            .build()
            .unwrap();
        assert_eq!(instruction.values()[0].1, json!({"w": 2, "h": [1, 2, 3]}));
        assert_eq!(instruction.values()[1].1, Value::Null);
    }
}
