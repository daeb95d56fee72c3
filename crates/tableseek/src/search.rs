//! Free-text search across a set of field paths.

use crate::traits::Record;
use crate::value::display_string;

/// Keeps the records where any of `fields` contains `term`, ignoring case.
///
/// Each field is compared through its string form; absent and null fields
/// read as the empty string. A blank term (empty or whitespace only) or an
/// empty field list keeps every record. The term is not trimmed when it is
/// matched.
///
/// ```
/// use serde_json::json;
/// use tableseek::apply_search;
///
/// let data = vec![
///     json!({"title": "Fix water leak", "team": {"name": "Plumbing"}}),
///     json!({"title": "Electrical repair", "team": {"name": "Electrical"}}),
/// ];
/// let found = apply_search(&data, "PLUMB", &["title", "team.name"]);
/// assert_eq!(found.len(), 1);
/// ```
pub fn apply_search<'a, R, I, S>(data: I, term: &str, fields: &[S]) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: Record + ?Sized + 'a,
    S: AsRef<str>,
{
    if term.trim().is_empty() || fields.is_empty() {
        return data.into_iter().collect();
    }

    let needle = term.to_lowercase();
    data.into_iter()
        .filter(|record| {
            fields.iter().any(|field| {
                display_string(record.field(field.as_ref()))
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .collect()
}
