//! Iteration bindings and the scope stack used while expanding `for` nodes.

use crate::compiler::CompileError;
use serde_json::{Map, Value};

/// Top-level values available to a compilation: sequences for `for` nodes
/// (`{"products": [{..}, {..}]}`) and plain values for variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: Map<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of bindings
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let value: Value = serde_json::from_str(json).map_err(|err| CompileError::InvalidBindings(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CompileError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(CompileError::InvalidBindings(format!(
                "expected a JSON object, found {}",
                type_name(&other)
            ))),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup_path(&self.values, key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `a.b.c` lookup through nested objects
fn lookup_path<'a>(values: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = values.get(key) {
        return Some(value);
    }
    let mut parts = key.split('.');
    let mut current = values.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Name under which the innermost iteration context is bound, so that
/// sequences of scalars (`{"tags": ["a", "b"]}`) can be rendered.
pub const CURRENT_ITEM: &str = "this";

/// Stack of iteration contexts over the top-level bindings. Lookups try the
/// innermost context first. `this` and `this.field` address the innermost
/// context itself.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    bindings: &'a Bindings,
    frames: Vec<&'a Value>,
}

impl<'a> Scope<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self {
            bindings,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, context: &'a Value) {
        self.frames.push(context);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn lookup(&self, key: &str) -> Option<&'a Value> {
        if let Some(current) = self.frames.last() {
            if key == CURRENT_ITEM {
                return Some(current);
            }
            if let Some(field) = key.strip_prefix("this.") {
                return current.as_object().and_then(|object| lookup_path(object, field));
            }
        }
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.as_object().and_then(|object| lookup_path(object, key)) {
                return Some(value);
            }
        }
        self.bindings.get(key)
    }

    /// Items bound to `key`, if it names an array.
    pub fn sequence(&self, key: &str) -> Option<&'a [Value]> {
        self.lookup(key).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Whether `key` is bound to a truthy value; `None` when unbound.
    pub fn truthy(&self, key: &str) -> Option<bool> {
        self.lookup(key).map(is_truthy)
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Text for a scalar value; `None` for null, arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_requires_object() {
        assert!(Bindings::from_json(r#"{"items": []}"#).is_ok());
        assert!(matches!(
            Bindings::from_json("[1, 2]"),
            Err(CompileError::InvalidBindings(_))
        ));
        assert!(Bindings::from_json("{").is_err());
    }

    #[test]
    fn test_scope_prefers_innermost_context() {
        let bindings = Bindings::new().with("name", "top").with("shop", json!({"city": "Oslo"}));
        let item = json!({"name": "inner"});
        let mut scope = Scope::new(&bindings);

        assert_eq!(scope.lookup("name"), Some(&json!("top")));
        scope.push(&item);
        assert_eq!(scope.lookup("name"), Some(&json!("inner")));
        assert_eq!(scope.lookup("shop.city"), Some(&json!("Oslo")));
        scope.pop();
        assert_eq!(scope.lookup("name"), Some(&json!("top")));
    }

    #[test]
    fn test_current_item_names_innermost_context() {
        let bindings = Bindings::new().with("this", "top");
        let tag = json!("sale");
        let product = json!({"name": "Mug"});
        let mut scope = Scope::new(&bindings);

        assert_eq!(scope.lookup("this"), Some(&json!("top")));
        scope.push(&product);
        assert_eq!(scope.lookup("this.name"), Some(&json!("Mug")));
        scope.push(&tag);
        assert_eq!(scope.lookup("this"), Some(&json!("sale")));
        assert_eq!(scope.lookup("this.name"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!({})));
    }
}
