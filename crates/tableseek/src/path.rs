//! Dot-separated field path resolution.

use serde_json::Value as Json;

/// Resolves a dot-separated path (`"team.name"`) against a JSON tree.
///
/// Each segment is a key lookup on an object, or an index on an array.
/// Resolution stops with `None` as soon as an intermediate value is missing,
/// null, or a scalar; it never panics. A path whose final segment holds
/// `null` resolves to `Some(&Value::Null)`.
///
/// ```
/// use serde_json::json;
/// use tableseek::resolve;
///
/// let record = json!({"team": {"name": "Plumbing"}, "a": {"b": null}});
/// assert_eq!(resolve(&record, "team.name"), Some(&json!("Plumbing")));
/// assert_eq!(resolve(&record, "a.b.c"), None);
/// ```
pub fn resolve<'a>(record: &'a Json, path: &str) -> Option<&'a Json> {
    path.split('.').try_fold(record, step)
}

pub(crate) fn step<'a>(current: &'a Json, key: &str) -> Option<&'a Json> {
    match current {
        Json::Object(map) => map.get(key),
        Json::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
