//! The [`Record`] trait: anything the engine can address by field path.

use serde_json::{Map, Value as Json};

use crate::path::{resolve, step};

/// A row the query engine can read fields from.
///
/// The engine never looks inside a record except through this trait, so
/// the shape of a row stays opaque beyond its field paths. Implementations
/// are provided for a whole JSON value and for a JSON object map.
///
/// # Manual Implementation
///
/// ```
/// use serde_json::{json, Value};
/// use tableseek::{resolve, Record};
///
/// struct Report {
///     id: u32,
///     payload: Value,
/// }
///
/// impl Record for Report {
///     fn field(&self, path: &str) -> Option<&Value> {
///         resolve(&self.payload, path)
///     }
/// }
///
/// let report = Report { id: 1, payload: json!({"status": "pending"}) };
/// assert_eq!(report.field("status"), Some(&json!("pending")));
/// ```
pub trait Record {
    /// Returns the value at a dot-separated field path.
    ///
    /// `None` means the path does not resolve. `Some(&Value::Null)` means
    /// it resolved to an explicit null.
    fn field(&self, path: &str) -> Option<&Json>;
}

impl Record for Json {
    fn field(&self, path: &str) -> Option<&Json> {
        resolve(self, path)
    }
}

impl Record for Map<String, Json> {
    fn field(&self, path: &str) -> Option<&Json> {
        let mut segments = path.split('.');
        let head = self.get(segments.next()?)?;
        segments.try_fold(head, step)
    }
}
