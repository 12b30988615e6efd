//! Dotted-path updates on a JSON tree
//!
//! `hero.cta.primary.text`, `sections.order.0`, `services.2.title`. Numeric
//! segments index arrays; an index equal to the length appends. Missing
//! intermediate nodes are created. Everything off the path is left as is.

use serde_json::{Map, Value};

/// Set the node at `path` to `value`. An empty path replaces the root.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), String> {
    let path = path.trim();
    if path.is_empty() {
        *root = value;
        return Ok(());
    }

    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|seg| seg.is_empty()) {
        return Err("empty path segment".to_string());
    }

    let Some((last, parents)) = segments.split_last() else {
        return Err("empty path".to_string());
    };

    let mut node = root;
    for seg in parents {
        node = child_mut(node, seg)?;
    }
    assign(node, last, value)
}

fn parse_index(seg: &str) -> Option<usize> {
    if seg.chars().all(|c| c.is_ascii_digit()) {
        seg.parse().ok()
    } else {
        None
    }
}

fn empty_container(seg: &str) -> Value {
    match parse_index(seg) {
        Some(_) => Value::Array(Vec::new()),
        None => Value::Object(Map::new()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn child_mut<'a>(node: &'a mut Value, seg: &str) -> Result<&'a mut Value, String> {
    if node.is_null() {
        *node = empty_container(seg);
    }
    match node {
        Value::Object(map) => Ok(map.entry(seg).or_insert(Value::Null)),
        Value::Array(items) => {
            let index =
                parse_index(seg).ok_or_else(|| format!("`{}` is not an array index", seg))?;
            if index == items.len() {
                items.push(Value::Null);
            }
            let len = items.len();
            items
                .get_mut(index)
                .ok_or_else(|| format!("index {} is out of bounds (length {})", index, len))
        }
        other => Err(format!("cannot descend into {} at `{}`", kind(other), seg)),
    }
}

fn assign(node: &mut Value, seg: &str, value: Value) -> Result<(), String> {
    if node.is_null() {
        *node = empty_container(seg);
    }
    match node {
        Value::Object(map) => {
            map.insert(seg.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index =
                parse_index(seg).ok_or_else(|| format!("`{}` is not an array index", seg))?;
            match index.cmp(&items.len()) {
                std::cmp::Ordering::Less => items[index] = value,
                std::cmp::Ordering::Equal => items.push(value),
                std::cmp::Ordering::Greater => {
                    return Err(format!(
                        "index {} is out of bounds (length {})",
                        index,
                        items.len()
                    ))
                }
            }
            Ok(())
        }
        other => Err(format!("cannot set `{}` on {}", seg, kind(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_set_keeps_siblings() {
        let mut doc = json!({
            "hero": {"title": "Old", "subtitle": "Keep", "cta": {"primary": {"text": "Go"}}},
            "sections": {"order": ["services"]}
        });
        set_path(&mut doc, "hero.cta.primary.text", json!("Book")).unwrap();
        assert_eq!(
            doc,
            json!({
                "hero": {"title": "Old", "subtitle": "Keep", "cta": {"primary": {"text": "Book"}}},
                "sections": {"order": ["services"]}
            })
        );
    }

    #[test]
    fn test_creates_missing_nodes() {
        let mut doc = json!({});
        set_path(&mut doc, "sections.faq.items.0.question", json!("Why?")).unwrap();
        assert_eq!(doc["sections"]["faq"]["items"][0]["question"], "Why?");
    }

    #[test]
    fn test_array_index_and_append() {
        let mut doc = json!({"order": ["a", "b"]});
        set_path(&mut doc, "order.1", json!("c")).unwrap();
        set_path(&mut doc, "order.2", json!("d")).unwrap();
        assert_eq!(doc, json!({"order": ["a", "c", "d"]}));
        assert!(set_path(&mut doc, "order.9", json!("x")).is_err());
        assert!(set_path(&mut doc, "order.first", json!("x")).is_err());
    }

    #[test]
    fn test_cannot_descend_into_scalar() {
        let mut doc = json!({"hero": {"title": "T"}});
        let err = set_path(&mut doc, "hero.title.text", json!("x")).unwrap_err();
        assert!(err.contains("a string"));
        assert_eq!(doc, json!({"hero": {"title": "T"}}));
    }

    #[test]
    fn test_empty_path_replaces_root() {
        let mut doc = json!({"a": 1});
        set_path(&mut doc, "", json!({"b": 2})).unwrap();
        assert_eq!(doc, json!({"b": 2}));
        assert!(set_path(&mut doc, "a..b", json!(1)).is_err());
    }
}
