//! Single-key and multi-key sorting.
//!
//! Sorting is stable and always places records with no value for the
//! active key (absent or null) after every record that has one, whatever
//! the direction. A column uses the declared [`FieldKind`]'s comparator
//! when every value can be read by it. Otherwise each value is keyed by its
//! own JSON type: booleans, then numbers, then everything else by string
//! form, each group ordered natively.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::op::{Comparator, FieldKind};
use crate::traits::Record;
use crate::value::{bool_from_json, defined, display_string, Number, Timestamp};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single-key sort specification.
///
/// An empty `field` means "do not sort".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field path to sort by.
    pub field: String,
    /// Direction.
    #[serde(default)]
    pub order: Dir,
    /// Declared kind of the field; picks the comparator when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
}

impl SortSpec {
    /// Creates a sort spec.
    pub fn new(field: impl Into<String>, order: Dir) -> Self {
        SortSpec {
            field: field.into(),
            order,
            kind: None,
        }
    }

    /// Creates an ascending sort spec.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Dir::Asc)
    }

    /// Creates a descending sort spec.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::new(field, Dir::Desc)
    }

    /// Sets the declared field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns `true` if this spec sorts anything.
    pub fn is_active(&self) -> bool {
        !self.field.is_empty()
    }
}

/// One column of a multi-key sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    /// Field path to sort by.
    pub field: String,
    /// Direction.
    #[serde(default)]
    pub order: Dir,
    /// Rank among columns; lower values are compared first.
    pub priority: i32,
    /// Declared kind of the field; picks the comparator when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
}

impl SortColumn {
    /// Creates a sort column.
    pub fn new(field: impl Into<String>, order: Dir, priority: i32) -> Self {
        SortColumn {
            field: field.into(),
            order,
            priority,
            kind: None,
        }
    }

    /// Sets the declared field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Multi-key sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiSortSpec {
    /// Columns in any order; evaluated by ascending `priority`.
    #[serde(default)]
    pub columns: Vec<SortColumn>,
}

impl MultiSortSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        MultiSortSpec::default()
    }

    /// Adds a column.
    pub fn column(mut self, column: SortColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a column ranked after every existing one.
    pub fn then_by(self, field: impl Into<String>, order: Dir) -> Self {
        let priority = self
            .columns
            .iter()
            .map(|c| c.priority)
            .max()
            .map_or(1, |p| p.saturating_add(1));
        self.column(SortColumn::new(field, order, priority))
    }

    /// Returns the columns in evaluation order (ascending priority, ties
    /// kept in declaration order).
    pub fn ordered_columns(&self) -> Vec<&SortColumn> {
        let mut columns: Vec<&SortColumn> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.priority);
        columns
    }
}

impl From<SortSpec> for MultiSortSpec {
    fn from(spec: SortSpec) -> Self {
        let mut column = SortColumn::new(spec.field, spec.order, 1);
        column.kind = spec.kind;
        MultiSortSpec {
            columns: vec![column],
        }
    }
}

/// Stable-sorts records by one key.
///
/// An empty `spec.field` returns the records in input order.
pub fn apply_sorting<'a, R, I>(data: I, spec: &SortSpec) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: Record + ?Sized + 'a,
{
    let rows: Vec<&'a R> = data.into_iter().collect();
    if !spec.is_active() {
        return rows;
    }
    let key = KeySpec {
        field: &spec.field,
        order: spec.order,
        kind: spec.kind,
    };
    sort_rows(rows, &[key])
}

/// Stable-sorts records by several keys in priority order.
///
/// The first column (lowest priority value) that tells two records apart
/// decides their order; records equal on every column keep their input
/// order. A spec with no columns returns the records in input order.
pub fn apply_multi_sorting<'a, R, I>(data: I, spec: &MultiSortSpec) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: Record + ?Sized + 'a,
{
    let rows: Vec<&'a R> = data.into_iter().collect();
    if spec.columns.is_empty() {
        return rows;
    }
    let keys: Vec<KeySpec<'_>> = spec
        .ordered_columns()
        .into_iter()
        .map(|column| KeySpec {
            field: &column.field,
            order: column.order,
            kind: column.kind,
        })
        .collect();
    sort_rows(rows, &keys)
}

struct KeySpec<'s> {
    field: &'s str,
    order: Dir,
    kind: Option<FieldKind>,
}

fn sort_rows<'a, R>(rows: Vec<&'a R>, keys: &[KeySpec<'_>]) -> Vec<&'a R>
where
    R: Record + ?Sized,
{
    let columns: Vec<(Dir, Vec<Option<SortKey>>)> = keys
        .iter()
        .map(|key| (key.order, column_keys(&rows, key.field, key.kind)))
        .collect();

    let mut positions: Vec<usize> = (0..rows.len()).collect();
    positions.sort_by(|&a, &b| {
        columns
            .iter()
            .map(|(dir, keys)| compare_keys(keys[a].as_ref(), keys[b].as_ref(), *dir))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    positions.into_iter().map(|i| rows[i]).collect()
}

/// Sort key of one record in one column.
///
/// Keys of different variants order by rank (booleans, numbers, times,
/// then text); keys of one variant compare natively.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(Number),
    Time(Timestamp),
    Bool(bool),
    Text(String),
}

impl SortKey {
    fn read(comparator: Comparator, value: &Json) -> Option<SortKey> {
        match comparator {
            Comparator::Numeric => Number::from_json(value).map(SortKey::Number),
            Comparator::Chronological => Timestamp::from_json(value).map(SortKey::Time),
            Comparator::Boolean => bool_from_json(value).map(SortKey::Bool),
            Comparator::Textual => Some(SortKey::natural(value)),
        }
    }

    /// Key from the value's own JSON type.
    fn natural(value: &Json) -> SortKey {
        match value {
            Json::Bool(b) => SortKey::Bool(*b),
            Json::Number(_) => Number::from_json(value)
                .map(SortKey::Number)
                .unwrap_or_else(|| SortKey::text(value)),
            _ => SortKey::text(value),
        }
    }

    fn text(value: &Json) -> SortKey {
        SortKey::Text(display_string(Some(value)).into_owned())
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Time(_) => 2,
            SortKey::Text(_) => 3,
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.compare(*b),
            (SortKey::Time(a), SortKey::Time(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn column_keys<R>(rows: &[&R], field: &str, kind: Option<FieldKind>) -> Vec<Option<SortKey>>
where
    R: Record + ?Sized,
{
    let values: Vec<Option<&Json>> = rows.iter().map(|row| defined(row.field(field))).collect();

    if let Some(comparator) = kind.map(FieldKind::comparator) {
        let typed: Option<Vec<Option<SortKey>>> = values
            .iter()
            .map(|value| match value {
                None => Some(None),
                Some(v) => SortKey::read(comparator, v).map(Some),
            })
            .collect();
        if let Some(keys) = typed {
            return keys;
        }
    }

    values
        .iter()
        .map(|value| value.map(SortKey::natural))
        .collect()
}

/// Single-key comparison: missing keys last regardless of direction.
fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, dir: Dir) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => dir.apply(a.compare(b)),
    }
}
