//! Filter groups and quick filters.
//!
//! Conditions inside a [`FilterGroup`] combine with the group's
//! [`JoinOperator`]; groups combine with OR:
//!
//! ```text
//! keep(record) = groups is empty
//!              ∨ ∃ group: group.conditions is empty
//!                       ∨ (AND: every condition holds)
//!                       ∨ (OR:  some condition holds)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::condition::{ConditionEvaluator, FilterCondition};
use crate::traits::Record;

/// How the conditions of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOperator {
    /// Every condition must hold.
    #[default]
    And,
    /// At least one condition must hold.
    Or,
}

/// A set of conditions combined by one join operator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    /// Caller-assigned identifier; not used by evaluation.
    #[serde(default)]
    pub id: String,
    /// How `conditions` combine.
    #[serde(default)]
    pub join_operator: JoinOperator,
    /// The conditions, in display order.
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

impl FilterGroup {
    /// Creates an empty group with the given join operator.
    pub fn new(join_operator: JoinOperator) -> Self {
        FilterGroup {
            id: String::new(),
            join_operator,
            conditions: Vec::new(),
        }
    }

    /// Creates an empty AND group.
    pub fn all() -> Self {
        FilterGroup::new(JoinOperator::And)
    }

    /// Creates an empty OR group.
    pub fn any() -> Self {
        FilterGroup::new(JoinOperator::Or)
    }

    /// Adds a condition.
    pub fn with(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns `true` if the record passes this group.
    ///
    /// An empty group passes every record.
    pub fn passes<R>(&self, record: &R, evaluator: &ConditionEvaluator<'_>) -> bool
    where
        R: Record + ?Sized,
    {
        if self.conditions.is_empty() {
            return true;
        }
        let mut results = self
            .conditions
            .iter()
            .map(|condition| evaluator.matches(record, condition));
        match self.join_operator {
            JoinOperator::And => results.all(|held| held),
            JoinOperator::Or => results.any(|held| held),
        }
    }
}

/// Keeps the records that pass at least one group.
///
/// With no groups every record is kept. Input order is preserved.
pub fn apply_filters<'a, R, I>(
    data: I,
    groups: &[FilterGroup],
    evaluator: &ConditionEvaluator<'_>,
) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: Record + ?Sized + 'a,
{
    if groups.is_empty() {
        return data.into_iter().collect();
    }
    data.into_iter()
        .filter(|record| groups.iter().any(|group| group.passes(*record, evaluator)))
        .collect()
}

/// Value of a quick filter that means "no restriction".
pub const QUICK_FILTER_ALL: &str = "all";

/// Keeps the records whose fields equal every active quick filter.
///
/// A quick filter is a `field → value` pair. Entries whose value is empty
/// or `"all"` are inactive. Active entries match by strict equality with
/// the field's string value.
pub fn apply_quick_filters<'a, R, I>(data: I, filters: &BTreeMap<String, String>) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: Record + ?Sized + 'a,
{
    let active: Vec<(&str, &str)> = active_quick_filters(filters).collect();
    data.into_iter()
        .filter(|record| {
            active.iter().all(|(field, wanted)| {
                matches!(record.field(field), Some(Json::String(s)) if s == wanted)
            })
        })
        .collect()
}

pub(crate) fn active_quick_filters(
    filters: &BTreeMap<String, String>,
) -> impl Iterator<Item = (&str, &str)> {
    filters
        .iter()
        .filter(|(_, value)| !value.is_empty() && value.as_str() != QUICK_FILTER_ALL)
        .map(|(field, value)| (field.as_str(), value.as_str()))
}
