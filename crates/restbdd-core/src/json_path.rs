//! Dotted path extraction over JSON bodies.
//!
//! Paths look like `data.first_name`, `data[1].email` or `support.url`. A
//! name applied to an array is applied to every element, so `data.id` on a
//! list of users yields the list of their ids.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

fn parse(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();

    for part in path.trim().split('.') {
        if part.is_empty() {
            return None;
        }

        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };

        if !name.is_empty() {
            segments.push(Segment::Key(name.to_string()));
        }

        while !rest.is_empty() {
            let close = rest.find(']')?;
            if !rest.starts_with('[') {
                return None;
            }
            let index = rest[1..close].trim().parse::<usize>().ok()?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
        }
    }

    Some(segments)
}

/// Look up `path` in `root`; `None` when any segment is missing
pub fn select(root: &Value, path: &str) -> Option<Value> {
    let segments = parse(path)?;
    let mut current = root.clone();

    for segment in segments {
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(mut map)) => map.remove(&key)?,
            (Segment::Key(key), Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| item.get(&key).cloned().unwrap_or(Value::Null))
                    .collect(),
            ),
            (Segment::Index(index), Value::Array(mut items)) => {
                if index >= items.len() {
                    return None;
                }
                items.swap_remove(index)
            }
            _ => return None,
        };
    }

    Some(current)
}

/// Render a selected value the way a step compares it.
///
/// `null` and missing values render as `None`; strings render without
/// quotes; arrays render as `[a, b]`.
pub fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| render(item).unwrap_or_else(|| "null".to_string()))
                .collect();
            Some(format!("[{}]", rendered.join(", ")))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// `select` followed by `render`
pub fn select_string(root: &Value, path: &str) -> Option<String> {
    select(root, path).as_ref().and_then(render)
}
