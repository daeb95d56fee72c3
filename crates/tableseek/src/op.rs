//! Filter operators and field kinds.
//!
//! The [`Operator`] enum covers every operator tag a filter condition can
//! carry. Tags the engine does not know are kept verbatim in
//! [`Operator::Unknown`] so they can be reported, never rejected.
//! [`FieldKind`] is the declared type of a column; it decides which
//! comparator a condition uses and which operators a UI should offer.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operator of a filter condition.
///
/// Serialized as its wire tag (`"eq"`, `"iLike"`, `"isBetween"`, ...).
/// Parsing never fails: unrecognized tags become [`Operator::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    // Comparison
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,

    // Text
    /// Case-insensitive substring match.
    ILike,
    /// Negated case-insensitive substring match.
    NotILike,

    // Emptiness
    /// Null, absent, `""`, `false` or zero.
    IsEmpty,
    /// Negation of `IsEmpty`.
    IsNotEmpty,

    // Membership
    /// Value is one of the operand array's elements.
    InArray,
    /// Value is none of the operand array's elements.
    NotInArray,

    // Range
    /// Inclusive `{min, max}` or `{start, end}` range.
    IsBetween,

    // Unsupported
    /// Relative date filter; needs a clock and a timezone the engine does not have.
    IsRelativeToToday,

    /// Any tag the engine does not recognize.
    Unknown(String),
}

/// Group an [`Operator`] belongs to, used to dispatch evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    /// `eq`, `ne`, `lt`, `lte`, `gt`, `gte`.
    Comparison,
    /// `iLike`, `notILike`.
    Text,
    /// `isEmpty`, `isNotEmpty`.
    Emptiness,
    /// `inArray`, `notInArray`.
    Membership,
    /// `isBetween`.
    Range,
    /// Recognized but not evaluable in memory.
    Unsupported,
    /// Not recognized.
    Unknown,
}

impl Operator {
    /// Parses a wire tag. Unrecognized tags become [`Operator::Unknown`].
    pub fn parse(tag: &str) -> Operator {
        match tag {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "iLike" => Operator::ILike,
            "notILike" => Operator::NotILike,
            "isEmpty" => Operator::IsEmpty,
            "isNotEmpty" => Operator::IsNotEmpty,
            "inArray" => Operator::InArray,
            "notInArray" => Operator::NotInArray,
            "isBetween" => Operator::IsBetween,
            "isRelativeToToday" => Operator::IsRelativeToToday,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Returns the family this operator is evaluated by.
    pub fn family(&self) -> OperatorFamily {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Lte
            | Operator::Gt
            | Operator::Gte => OperatorFamily::Comparison,
            Operator::ILike | Operator::NotILike => OperatorFamily::Text,
            Operator::IsEmpty | Operator::IsNotEmpty => OperatorFamily::Emptiness,
            Operator::InArray | Operator::NotInArray => OperatorFamily::Membership,
            Operator::IsBetween => OperatorFamily::Range,
            Operator::IsRelativeToToday => OperatorFamily::Unsupported,
            Operator::Unknown(_) => OperatorFamily::Unknown,
        }
    }

    /// Returns `true` for the negated forms (`ne`, `notILike`, `isNotEmpty`, `notInArray`).
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Operator::Ne | Operator::NotILike | Operator::IsNotEmpty | Operator::NotInArray
        )
    }

    /// Evaluates an ordering operator given the ordering of value vs. operand.
    ///
    /// Returns `false` for operators that are not ordering-based.
    pub fn eval_ordering(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire tag of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::ILike => "iLike",
            Operator::NotILike => "notILike",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::InArray => "inArray",
            Operator::NotInArray => "notInArray",
            Operator::IsBetween => "isBetween",
            Operator::IsRelativeToToday => "isRelativeToToday",
            Operator::Unknown(tag) => tag,
        }
    }
}

impl FromStr for Operator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Operator::parse(s))
    }
}

impl From<&str> for Operator {
    fn from(tag: &str) -> Self {
        Operator::parse(tag)
    }
}

impl From<String> for Operator {
    fn from(tag: String) -> Self {
        match Operator::parse(&tag) {
            Operator::Unknown(_) => Operator::Unknown(tag),
            known => known,
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparator selected by a [`FieldKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Lexicographic comparison of string forms.
    Textual,
    /// Numeric comparison; numeric strings are accepted.
    Numeric,
    /// Comparison of parsed timestamps.
    Chronological,
    /// `false < true`.
    Boolean,
}

/// Declared kind of a field (the condition's `variant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// Single number.
    Number,
    /// Numeric range.
    Range,
    /// Single date.
    Date,
    /// Date range.
    DateRange,
    /// One of a fixed set of options.
    Select,
    /// Several of a fixed set of options.
    MultiSelect,
    /// Yes/no.
    Boolean,
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::ILike,
    Operator::NotILike,
    Operator::Eq,
    Operator::Ne,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Lt,
    Operator::Lte,
    Operator::Gt,
    Operator::Gte,
    Operator::IsBetween,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const DATE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Lt,
    Operator::Lte,
    Operator::Gt,
    Operator::Gte,
    Operator::IsBetween,
    Operator::IsRelativeToToday,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const SELECT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const MULTI_SELECT_OPERATORS: &[Operator] = &[
    Operator::InArray,
    Operator::NotInArray,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ne];

impl FieldKind {
    /// Returns the comparator used for ordering and equality on this kind.
    pub fn comparator(self) -> Comparator {
        match self {
            FieldKind::Text | FieldKind::Select | FieldKind::MultiSelect => Comparator::Textual,
            FieldKind::Number | FieldKind::Range => Comparator::Numeric,
            FieldKind::Date | FieldKind::DateRange => Comparator::Chronological,
            FieldKind::Boolean => Comparator::Boolean,
        }
    }

    /// Returns the operators that make sense for this kind, in display order.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            FieldKind::Text => TEXT_OPERATORS,
            FieldKind::Number | FieldKind::Range => NUMERIC_OPERATORS,
            FieldKind::Date | FieldKind::DateRange => DATE_OPERATORS,
            FieldKind::Select => SELECT_OPERATORS,
            FieldKind::MultiSelect => MULTI_SELECT_OPERATORS,
            FieldKind::Boolean => BOOLEAN_OPERATORS,
        }
    }

    /// Returns the operator a new condition on this kind starts with.
    pub fn default_operator(self) -> Operator {
        self.operators().first().cloned().unwrap_or(Operator::Eq)
    }

    /// Returns `true` if `op` is offered for this kind.
    pub fn supports(self, op: &Operator) -> bool {
        self.operators().contains(op)
    }
}
