// Shape summaries of API responses, for debugging upstream payload drift
use serde_json::{Map, Value, json};
use std::path::Path;

/// Describe the structure of a JSON value: primitive type names, objects by
/// key, and lists as `{ "list_item": <merged item shape> }`.
pub fn shape_of(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let result: Map<String, Value> =
                map.iter().map(|(key, v)| (key.clone(), shape_of(v))).collect();
            Value::Object(result)
        }
        Value::Array(items) => {
            let item_shape = items
                .iter()
                .fold(None, |acc, item| merge_shapes(acc, Some(shape_of(item))));
            json!({ "list_item": item_shape.unwrap_or_else(|| json!("empty")) })
        }
        other => Value::String(type_name(other).to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn merge_shapes(a: Option<Value>, b: Option<Value>) -> Option<Value> {
    let (a, b) = match (a, b) {
        (None, b) => return b,
        (a, None) => return a,
        (Some(a), Some(b)) => (a, b),
    };
    // unions are always merged from the list side
    let (a, b) = match (a, b) {
        (name @ Value::String(_), names @ Value::Array(_)) => (names, name),
        other => other,
    };

    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            if a == b {
                Some(Value::String(a))
            } else {
                Some(sorted_union(vec![a, b]))
            }
        }
        (Value::Array(names), Value::String(b)) if names.iter().all(Value::is_string) => {
            let mut names: Vec<String> = names
                .into_iter()
                .filter_map(|n| n.as_str().map(str::to_string))
                .collect();
            if !names.contains(&b) {
                names.push(b);
            }
            Some(sorted_union(names))
        }
        (a, b) if is_shape_object(&a) && is_shape_object(&b) => {
            let (Value::Object(mut a), Value::Object(mut b)) = (a, b) else {
                return None;
            };
            let keys: Vec<String> = a.keys().chain(b.keys()).cloned().collect();
            let mut result = Map::new();
            for key in keys {
                if result.contains_key(&key) {
                    continue;
                }
                let merged = merge_shapes(a.remove(&key), b.remove(&key));
                result.insert(key, merged.unwrap_or(Value::Null));
            }
            Some(Value::Object(result))
        }
        (a, b) => Some(any_of(a, b)),
    }
}

fn is_shape_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.contains_key("anyOf"))
}

fn sorted_union(mut names: Vec<String>) -> Value {
    names.sort();
    names.dedup();
    Value::Array(names.into_iter().map(Value::String).collect())
}

fn any_of(a: Value, b: Value) -> Value {
    let variants = |v: Value| -> Vec<Value> {
        match v {
            Value::Object(mut map) if map.contains_key("anyOf") => match map.remove("anyOf") {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => Vec::new(),
            },
            other => vec![other],
        }
    };

    let mut deduped: Vec<Value> = Vec::new();
    for shape in variants(a).into_iter().chain(variants(b)) {
        if shape.is_string() && deduped.contains(&shape) {
            continue;
        }
        deduped.push(shape);
    }
    json!({ "anyOf": deduped })
}

/// Write the shape of `value` as pretty JSON
pub async fn write_shape(value: &Value, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(&shape_of(value))?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(shape_of(&json!(null)), json!("null"));
        assert_eq!(shape_of(&json!(true)), json!("bool"));
        assert_eq!(shape_of(&json!(3)), json!("int"));
        assert_eq!(shape_of(&json!(3.5)), json!("float"));
        assert_eq!(shape_of(&json!("x")), json!("str"));
        assert_eq!(shape_of(&json!([])), json!({ "list_item": "empty" }));
    }

    #[test]
    fn test_list_items_are_merged() {
        let value = json!([
            { "id": "a", "statistics": { "viewCount": "1" } },
            { "id": "b", "statistics": { "viewCount": 2, "likeCount": "3" } }
        ]);

        assert_eq!(
            shape_of(&value),
            json!({
                "list_item": {
                    "id": "str",
                    "statistics": { "viewCount": ["int", "str"], "likeCount": "str" }
                }
            })
        );
    }

    #[test]
    fn test_mixed_kinds_become_any_of() {
        let value = json!([{ "duration": "PT1M" }, { "duration": { "raw": 60 } }, { "duration": "PT2M" }]);

        assert_eq!(
            shape_of(&value),
            json!({ "list_item": { "duration": { "anyOf": ["str", { "raw": "int" }] } } })
        );
    }

    #[tokio::test]
    async fn test_write_shape() {
        let path = std::env::temp_dir().join(format!("shape-{}.json", std::process::id()));
        write_shape(&json!({ "items": [1, 2] }), &path).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({ "items": { "list_item": "int" } }));
        let _ = std::fs::remove_file(&path);
    }
}
