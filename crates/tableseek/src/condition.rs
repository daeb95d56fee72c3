//! Filter conditions and their evaluation.
//!
//! A [`FilterCondition`] is one `(field, operator, operand)` triple plus the
//! field's declared [`FieldKind`]. [`ConditionEvaluator`] turns it into a
//! boolean for a given record. Evaluation is total: malformed operands and
//! type mismatches evaluate to `false`, and operators the engine cannot
//! judge evaluate to `true` with a diagnostic (fail-open).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::op::{Comparator, FieldKind, Operator, OperatorFamily};
use crate::traits::Record;
use crate::value::{bool_from_json, defined, display_string, is_empty_value, Number, Timestamp};

/// A single filter predicate.
///
/// The shape of `value` depends on the operator: a scalar, an array for
/// `inArray`/`notInArray`, or an object with `min`/`max` or `start`/`end`
/// for `isBetween`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tableseek::{FieldKind, FilterCondition, Operator};
///
/// let condition = FilterCondition::new("latitude", Operator::IsBetween, json!({"min": 40.7, "max": 40.75}))
///     .with_kind(FieldKind::Range);
/// assert_eq!(condition.variant, FieldKind::Range);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Caller-assigned identifier; not used by evaluation.
    #[serde(default)]
    pub id: String,
    /// Dot-separated field path.
    pub field: String,
    /// The operator.
    pub operator: Operator,
    /// The operand.
    #[serde(default)]
    pub value: Json,
    /// Declared kind of the field; selects the comparator.
    #[serde(default)]
    pub variant: FieldKind,
}

impl FilterCondition {
    /// Creates a text condition with an empty id.
    pub fn new(field: impl Into<String>, operator: impl Into<Operator>, value: Json) -> Self {
        FilterCondition {
            id: String::new(),
            field: field.into(),
            operator: operator.into(),
            value,
            variant: FieldKind::Text,
        }
    }

    /// Creates a blank condition for a field: the kind's default operator
    /// and a null operand.
    pub fn for_field(field: impl Into<String>, kind: FieldKind) -> Self {
        FilterCondition {
            id: String::new(),
            field: field.into(),
            operator: kind.default_operator(),
            value: Json::Null,
            variant: kind,
        }
    }

    /// Sets the declared field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.variant = kind;
        self
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Why a condition evaluated to `false` without a real comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Malformed {
    /// `isBetween` operand lacks `min`/`max` and `start`/`end`, or a bound
    /// or date could not be read.
    RangeOperand,
    /// Value or operand has the wrong shape for the operator, e.g. a
    /// non-array operand to `inArray`, or text where a number is required.
    TypeMismatch,
}

/// Why a condition was passed without being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOpen {
    /// Known operator that cannot be evaluated in memory.
    Unsupported,
    /// Unrecognized operator.
    Unknown,
}

/// Result of evaluating one condition.
///
/// Only [`Outcome::Matched`] and [`Outcome::FailOpen`] keep a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The condition holds.
    Matched,
    /// The condition does not hold.
    Unmatched,
    /// The condition could not be evaluated because its input is malformed.
    Malformed(Malformed),
    /// The condition was let through unevaluated.
    FailOpen(FailOpen),
}

impl Outcome {
    /// Returns `true` if a record with this outcome is kept.
    pub fn is_kept(self) -> bool {
        matches!(self, Outcome::Matched | Outcome::FailOpen(_))
    }

    fn from_bool(matched: bool) -> Outcome {
        if matched {
            Outcome::Matched
        } else {
            Outcome::Unmatched
        }
    }

    fn negate(self) -> Outcome {
        match self {
            Outcome::Matched => Outcome::Unmatched,
            Outcome::Unmatched => Outcome::Matched,
            other => other,
        }
    }
}

/// Evaluates filter conditions, reporting fail-open cases to a sink.
///
/// The evaluator owns no state besides the borrowed sink, so one instance
/// can be shared by every stage of a query.
#[derive(Clone, Copy)]
pub struct ConditionEvaluator<'s> {
    sink: &'s dyn DiagnosticSink,
}

static TRACING_SINK: TracingSink = TracingSink;

impl Default for ConditionEvaluator<'static> {
    /// An evaluator that reports to `tracing`.
    fn default() -> Self {
        ConditionEvaluator::new(&TRACING_SINK)
    }
}

impl std::fmt::Debug for ConditionEvaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionEvaluator").finish_non_exhaustive()
    }
}

impl<'s> ConditionEvaluator<'s> {
    /// Creates an evaluator reporting to `sink`.
    pub fn new(sink: &'s dyn DiagnosticSink) -> Self {
        ConditionEvaluator { sink }
    }

    /// Evaluates `value <operator> operand` under the comparator of `kind`.
    ///
    /// `value` is `None` when the field path did not resolve. Never panics.
    pub fn evaluate(
        &self,
        value: Option<&Json>,
        operator: &Operator,
        operand: &Json,
        kind: FieldKind,
    ) -> bool {
        self.judge(value, operator, operand, kind, None)
    }

    /// Evaluates a condition against a record.
    pub fn matches<R>(&self, record: &R, condition: &FilterCondition) -> bool
    where
        R: Record + ?Sized,
    {
        self.judge(
            record.field(&condition.field),
            &condition.operator,
            &condition.value,
            condition.variant,
            Some(&condition.field),
        )
    }

    fn judge(
        &self,
        value: Option<&Json>,
        operator: &Operator,
        operand: &Json,
        kind: FieldKind,
        field: Option<&str>,
    ) -> bool {
        let outcome = outcome(value, operator, operand, kind);
        if let Outcome::FailOpen(reason) = outcome {
            self.sink.emit(&Diagnostic::fail_open(reason, operator, field));
        }
        outcome.is_kept()
    }
}

/// Computes the [`Outcome`] of `value <operator> operand` without side effects.
pub fn outcome(value: Option<&Json>, operator: &Operator, operand: &Json, kind: FieldKind) -> Outcome {
    let comparator = kind.comparator();
    match operator.family() {
        OperatorFamily::Comparison => compare_outcome(value, operator, operand, comparator),
        OperatorFamily::Text => {
            let haystack = display_string(value).to_lowercase();
            let needle = display_string(Some(operand)).to_lowercase();
            let found = Outcome::from_bool(haystack.contains(&needle));
            if operator.is_negated() {
                found.negate()
            } else {
                found
            }
        }
        OperatorFamily::Emptiness => {
            let empty = Outcome::from_bool(is_empty_value(value));
            if operator.is_negated() {
                empty.negate()
            } else {
                empty
            }
        }
        OperatorFamily::Membership => {
            let Json::Array(items) = operand else {
                return Outcome::Malformed(Malformed::TypeMismatch);
            };
            let member = Outcome::from_bool(value.is_some_and(|v| {
                items.iter().any(|item| values_equal(comparator, v, item))
            }));
            if operator.is_negated() {
                member.negate()
            } else {
                member
            }
        }
        OperatorFamily::Range => between(value, operand),
        OperatorFamily::Unsupported => Outcome::FailOpen(FailOpen::Unsupported),
        OperatorFamily::Unknown => Outcome::FailOpen(FailOpen::Unknown),
    }
}

fn compare_outcome(
    value: Option<&Json>,
    operator: &Operator,
    operand: &Json,
    comparator: Comparator,
) -> Outcome {
    match operator {
        Operator::Eq | Operator::Ne => {
            let equal = Outcome::from_bool(value.is_some_and(|v| values_equal(comparator, v, operand)));
            if operator.is_negated() {
                equal.negate()
            } else {
                equal
            }
        }
        _ => {
            let Some(value) = defined(value) else {
                return Outcome::Unmatched;
            };
            match compare_as(comparator, value, operand) {
                Some(ordering) => Outcome::from_bool(operator.eval_ordering(ordering)),
                None => Outcome::Malformed(Malformed::TypeMismatch),
            }
        }
    }
}

/// Compares two values through a comparator.
///
/// Returns `None` when either side cannot be read by the comparator. The
/// textual comparator orders two JSON numbers numerically and every other
/// pair by string form.
pub fn compare_as(comparator: Comparator, a: &Json, b: &Json) -> Option<Ordering> {
    match comparator {
        Comparator::Textual => match (a, b) {
            (Json::Null, _) | (_, Json::Null) => None,
            (Json::Number(_), Json::Number(_)) => {
                Some(Number::from_json(a)?.compare(Number::from_json(b)?))
            }
            _ => Some(display_string(Some(a)).cmp(&display_string(Some(b)))),
        },
        Comparator::Numeric => Some(Number::from_json(a)?.compare(Number::from_json(b)?)),
        Comparator::Chronological => {
            Some(Timestamp::from_json(a)?.cmp(&Timestamp::from_json(b)?))
        }
        Comparator::Boolean => Some(bool_from_json(a)?.cmp(&bool_from_json(b)?)),
    }
}

/// Strict equality under a comparator.
///
/// Textual equality is exact JSON equality. Other comparators compare the
/// coerced values when both sides coerce, and fall back to exact JSON
/// equality otherwise.
fn values_equal(comparator: Comparator, a: &Json, b: &Json) -> bool {
    match comparator {
        Comparator::Textual => a == b,
        _ => match compare_as(comparator, a, b) {
            Some(ordering) => ordering == Ordering::Equal,
            None => a == b,
        },
    }
}

fn between(value: Option<&Json>, operand: &Json) -> Outcome {
    let Json::Object(bounds) = operand else {
        return Outcome::Malformed(Malformed::RangeOperand);
    };

    if let (Some(min), Some(max)) = (bounds.get("min"), bounds.get("max")) {
        let (Some(min), Some(max)) = (Number::from_json(min), Number::from_json(max)) else {
            return Outcome::Malformed(Malformed::RangeOperand);
        };
        let Some(value) = defined(value) else {
            return Outcome::Unmatched;
        };
        return match Number::from_json(value) {
            Some(n) => Outcome::from_bool(
                min.compare(n) != Ordering::Greater && n.compare(max) != Ordering::Greater,
            ),
            None => Outcome::Malformed(Malformed::TypeMismatch),
        };
    }

    if let (Some(start), Some(end)) = (present_bound(bounds, "start"), present_bound(bounds, "end")) {
        let parsed = (
            Timestamp::from_json(start),
            Timestamp::from_json(end),
            defined(value).and_then(Timestamp::from_json),
        );
        return match parsed {
            (Some(start), Some(end), Some(at)) => Outcome::from_bool(start <= at && at <= end),
            _ => Outcome::Malformed(Malformed::RangeOperand),
        };
    }

    Outcome::Malformed(Malformed::RangeOperand)
}

fn present_bound<'a>(bounds: &'a Map<String, Json>, key: &str) -> Option<&'a Json> {
    bounds.get(key).filter(|bound| !is_empty_value(Some(bound)))
}
