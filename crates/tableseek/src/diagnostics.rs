//! Diagnostics for conditions the engine lets through without judging them.
//!
//! When a condition uses an operator the engine cannot evaluate, the
//! condition passes (fail-open) and a [`Diagnostic`] is emitted to the
//! [`DiagnosticSink`] injected into the evaluator. Sinks are write-only:
//! `emit` returns nothing, so a sink can never change a filter result.

use crate::condition::FailOpen;
use crate::op::Operator;

/// Advisory event about a condition that was passed without evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The operator is known but cannot be evaluated in memory.
    UnsupportedOperator {
        operator: String,
        field: Option<String>,
    },
    /// The operator tag is not recognized.
    UnknownOperator {
        operator: String,
        field: Option<String>,
    },
}

impl Diagnostic {
    pub(crate) fn fail_open(reason: FailOpen, operator: &Operator, field: Option<&str>) -> Self {
        let operator = operator.as_str().to_string();
        let field = field.map(str::to_string);
        match reason {
            FailOpen::Unsupported => Diagnostic::UnsupportedOperator { operator, field },
            FailOpen::Unknown => Diagnostic::UnknownOperator { operator, field },
        }
    }

    /// Returns the operator tag this diagnostic is about.
    pub fn operator(&self) -> &str {
        match self {
            Diagnostic::UnsupportedOperator { operator, .. }
            | Diagnostic::UnknownOperator { operator, .. } => operator,
        }
    }

    /// Returns the field path of the condition, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Diagnostic::UnsupportedOperator { field, .. }
            | Diagnostic::UnknownOperator { field, .. } => field.as_deref(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedOperator { operator, .. } => write!(
                f,
                "Operator \"{}\" is not supported in client-side filtering",
                operator
            ),
            Diagnostic::UnknownOperator { operator, .. } => {
                write!(f, "Unknown operator: {}", operator)
            }
        }
    }
}

/// Receiver of [`Diagnostic`] events.
///
/// Implementations must not block and must swallow their own failures.
/// Any `Fn(&Diagnostic)` closure is a sink, which keeps tests simple:
///
/// ```
/// use std::cell::RefCell;
/// use serde_json::json;
/// use tableseek::{ConditionEvaluator, Diagnostic, FieldKind, Operator};
///
/// let seen = RefCell::new(Vec::new());
/// let sink = |d: &Diagnostic| seen.borrow_mut().push(d.to_string());
/// let evaluator = ConditionEvaluator::new(&sink);
///
/// let value = json!("2024-01-15");
/// assert!(evaluator.evaluate(
///     Some(&value),
///     &Operator::IsRelativeToToday,
///     &json!("today"),
///     FieldKind::Date,
/// ));
/// assert_eq!(
///     seen.borrow().as_slice(),
///     ["Operator \"isRelativeToToday\" is not supported in client-side filtering"]
/// );
/// ```
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic),
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that forwards diagnostics to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            operator = diagnostic.operator(),
            field = diagnostic.field(),
            "{}",
            diagnostic
        );
    }
}

/// Sink that discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}
