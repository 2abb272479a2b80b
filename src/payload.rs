//! Locates the record array inside an upstream JSON payload.

use std::collections::VecDeque;

use serde_json::Value;

/// Keys under which the gateway usually nests its record list.
const COMMON_KEYS: &[&str] = &[
    "data", "list", "items", "item", "result", "results", "body", "response",
];

/// Finds the first array in `root`.
///
/// `root` itself wins if it is an array, then the [`COMMON_KEYS`] at the top
/// level, then a breadth-first walk over nested objects.
pub fn find_first_array(root: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(arr) = root {
        return Some(arr);
    }
    let obj = root.as_object()?;

    if let Some(arr) = COMMON_KEYS.iter().find_map(|k| obj.get(*k).and_then(Value::as_array)) {
        return Some(arr);
    }

    let mut queue: VecDeque<&Value> = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        let Some(obj) = current.as_object() else {
            continue;
        };
        for value in obj.values() {
            match value {
                Value::Array(arr) => return Some(arr),
                Value::Object(_) => queue.push_back(value),
                _ => {}
            }
        }
    }

    None
}
