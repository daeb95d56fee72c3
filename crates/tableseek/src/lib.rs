//! Tableseek - In-memory query engine for data tables.
//!
//! Tableseek answers the questions a data table asks of its rows, over
//! schema-less JSON records addressed by dot-separated field paths. It
//! supports:
//!
//! - Free-text search across a list of field paths
//! - Quick filters (field equals value, `"all"` disables)
//! - Filter groups: conditions joined by AND or OR, groups joined by OR
//! - Single-key and multi-key stable sorting, with nulls always last
//! - Pagination with 1-based display metadata
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tableseek::{
//!     ConditionEvaluator, Dir, FieldKind, FilterCondition, FilterGroup, Operator, TableQuery,
//! };
//!
//! let rows = vec![
//!     json!({"title": "Fix water leak", "status": "pending", "team": {"name": "Plumbing Team"}}),
//!     json!({"title": "Electrical repair", "status": "in_progress", "team": {"name": "Electrical Team"}}),
//!     json!({"title": "HVAC maintenance", "status": "completed", "team": {"name": "HVAC Team"}}),
//! ];
//!
//! let query = TableQuery::new()
//!     .search("team")
//!     .search_fields(["title", "team.name"])
//!     .group(
//!         FilterGroup::any()
//!             .with(FilterCondition::new("status", Operator::Eq, json!("pending")).with_kind(FieldKind::Select))
//!             .with(FilterCondition::new("status", Operator::Eq, json!("completed")).with_kind(FieldKind::Select)),
//!     )
//!     .then_by("status", Dir::Asc)
//!     .build();
//!
//! let page = query.run(&rows, &ConditionEvaluator::default());
//! assert_eq!(page.pagination.total_items, 2);
//! assert_eq!(page.data[0]["status"], "completed");
//! ```
//!
//! # Filter Semantics
//!
//! ```text
//! keep = groups is empty
//!      ∨ ∃ group: (group is empty)
//!               ∨ (AND and every condition holds)
//!               ∨ (OR and some condition holds)
//! ```
//!
//! A condition never fails. Malformed operands and type mismatches make it
//! false. Operators that cannot be judged in memory (`isRelativeToToday`,
//! unrecognized tags) make it true and emit a [`Diagnostic`] to the
//! [`DiagnosticSink`] the [`ConditionEvaluator`] was built with.
//!
//! # Field Kinds and Operators
//!
//! | Kind | Operators | Comparator |
//! |------|-----------|------------|
//! | `text` | `iLike`, `notILike`, `eq`, `ne`, `isEmpty`, `isNotEmpty` | textual |
//! | `number`, `range` | `eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `isBetween`, `isEmpty`, `isNotEmpty` | numeric |
//! | `date`, `dateRange` | as number, plus `isRelativeToToday` | chronological |
//! | `select` | `eq`, `ne`, `isEmpty`, `isNotEmpty` | textual |
//! | `multiSelect` | `inArray`, `notInArray`, `isEmpty`, `isNotEmpty` | textual |
//! | `boolean` | `eq`, `ne` | boolean |

mod condition;
mod config;
mod diagnostics;
mod error;
mod filter;
mod op;
mod ordering;
mod pagination;
mod path;
mod query;
mod search;
mod traits;
mod value;

// Re-export public API
pub use condition::{compare_as, outcome, ConditionEvaluator, FailOpen, FilterCondition, Malformed, Outcome};
pub use config::QueryConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, SilentSink, TracingSink};
pub use error::{QueryError, Result};
pub use filter::{apply_filters, apply_quick_filters, FilterGroup, JoinOperator, QUICK_FILTER_ALL};
pub use op::{Comparator, FieldKind, Operator, OperatorFamily};
pub use ordering::{apply_multi_sorting, apply_sorting, Dir, MultiSortSpec, SortColumn, SortSpec};
pub use pagination::{
    apply_pagination, page_info, PageInfo, PageRequest, PaginationResult, DEFAULT_PAGE_SIZE,
    PAGE_SIZE_OPTIONS,
};
pub use path::resolve;
pub use query::{Sorting, TableQuery};
pub use search::apply_search;
pub use traits::Record;
pub use value::{bool_from_json, defined, display_string, is_empty_value, Number, Timestamp};
