//! Data-table scenarios over a small work-order fixture.

use std::cell::RefCell;

use serde_json::{json, Value as Json};
use tableseek::{
    apply_filters, apply_multi_sorting, apply_pagination, apply_quick_filters, apply_search,
    apply_sorting, resolve, ConditionEvaluator, Diagnostic, Dir, FieldKind, FilterCondition,
    FilterGroup, MultiSortSpec, Operator, QueryConfig, SilentSink, SortColumn, SortSpec,
    TableQuery,
};

// ============================================================================
// Fixture
// ============================================================================

fn work_orders() -> Vec<Json> {
    vec![
        json!({
            "id": "1",
            "title": "Fix water leak",
            "description": "Emergency water leak in kitchen",
            "status": "pending",
            "created_at": "2024-01-15T10:00:00Z",
            "neighbourhood": {"id": "1", "name": "Downtown"},
            "team": {"id": "1", "name": "Plumbing Team"},
            "latitude": 40.7128,
            "longitude": -74.006
        }),
        json!({
            "id": "2",
            "title": "Electrical repair",
            "description": "Power outage in office building",
            "status": "in_progress",
            "created_at": "2024-01-20T14:30:00Z",
            "neighbourhood": {"id": "2", "name": "Midtown"},
            "team": {"id": "2", "name": "Electrical Team"},
            "latitude": 40.7589,
            "longitude": -73.9851
        }),
        json!({
            "id": "3",
            "title": "HVAC maintenance",
            "description": "Regular maintenance check",
            "status": "completed",
            "created_at": "2024-01-25T09:15:00Z",
            "neighbourhood": {"id": "1", "name": "Downtown"},
            "team": {"id": "3", "name": "HVAC Team"},
            "latitude": 40.7505,
            "longitude": -73.9934
        }),
    ]
}

fn ids(rows: &[&Json]) -> Vec<String> {
    rows.iter()
        .map(|row| row["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn silent() -> ConditionEvaluator<'static> {
    ConditionEvaluator::new(&SilentSink)
}

fn condition(field: &str, op: Operator, value: Json, kind: FieldKind) -> FilterCondition {
    FilterCondition::new(field, op, value).with_kind(kind)
}

// ============================================================================
// Path resolution
// ============================================================================

#[test]
fn resolve_through_null_is_absent() {
    assert_eq!(resolve(&json!({"a": {"b": null}}), "a.b.c"), None);
    assert_eq!(resolve(&json!({"a": {"b": null}}), "a.b"), Some(&Json::Null));
}

#[test]
fn resolve_nested_fixture_fields() {
    let data = work_orders();
    assert_eq!(resolve(&data[1], "team.name"), Some(&json!("Electrical Team")));
    assert_eq!(resolve(&data[1], "team.lead.name"), None);
}

// ============================================================================
// Condition evaluation
// ============================================================================

#[test]
fn between_numbers_and_malformed_ranges() {
    let evaluator = silent();
    let fifteen = json!(15);
    assert!(evaluator.evaluate(Some(&fifteen), &Operator::IsBetween, &json!({"min": 10, "max": 20}), FieldKind::Range));
    assert!(!evaluator.evaluate(Some(&fifteen), &Operator::IsBetween, &json!({}), FieldKind::Range));
}

#[test]
fn in_array_requires_an_array_operand() {
    let evaluator = silent();
    let apple = json!("apple");
    assert!(!evaluator.evaluate(Some(&apple), &Operator::InArray, &json!("not-an-array"), FieldKind::MultiSelect));
    assert!(evaluator.evaluate(Some(&apple), &Operator::InArray, &json!(["apple", "pear"]), FieldKind::MultiSelect));
}

#[test]
fn unsupported_and_unknown_operators_keep_rows_and_report() {
    let data = work_orders();
    let seen = RefCell::new(Vec::new());
    let sink = |d: &Diagnostic| seen.borrow_mut().push(d.to_string());
    let evaluator = ConditionEvaluator::new(&sink);

    let groups = [FilterGroup::all()
        .with(condition("created_at", Operator::IsRelativeToToday, json!("past7days"), FieldKind::Date))
        .with(condition("title", Operator::parse("soundsLike"), json!("leek"), FieldKind::Text))];
    let rows = apply_filters(&data, &groups, &evaluator);

    assert_eq!(rows.len(), 3);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 6);
    assert_eq!(
        seen[0],
        "Operator \"isRelativeToToday\" is not supported in client-side filtering"
    );
    assert_eq!(seen[1], "Unknown operator: soundsLike");
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn filter_by_status() {
    let data = work_orders();
    let groups = [FilterGroup::all().with(condition("status", Operator::Eq, json!("pending"), FieldKind::Select))];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["1"]);
}

#[test]
fn filter_by_nested_field_with_ilike() {
    let data = work_orders();
    let groups = [FilterGroup::all().with(condition("team.name", Operator::ILike, json!("electrical"), FieldKind::Text))];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["2"]);
}

#[test]
fn filter_by_latitude_range() {
    let data = work_orders();
    let groups = [FilterGroup::all().with(condition(
        "latitude",
        Operator::IsBetween,
        json!({"min": 40.75, "max": 40.76}),
        FieldKind::Range,
    ))];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["2", "3"]);
}

#[test]
fn numeric_field_without_variant_compares_numerically() {
    let data = vec![
        json!({"id": "a", "priority": 9}),
        json!({"id": "b", "priority": 100}),
        json!({"id": "c", "priority": 20}),
    ];
    let condition: FilterCondition =
        serde_json::from_str(r#"{"field": "priority", "operator": "gt", "value": 10}"#).unwrap();
    assert_eq!(condition.variant, FieldKind::Text);

    let groups = [FilterGroup::all().with(condition)];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["b", "c"]);
}

#[test]
fn filter_by_date_range() {
    let data = work_orders();
    let groups = [FilterGroup::all().with(condition(
        "created_at",
        Operator::IsBetween,
        json!({"start": "2024-01-16", "end": "2024-01-24"}),
        FieldKind::DateRange,
    ))];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["2"]);
}

#[test]
fn filter_dates_after() {
    let data = work_orders();
    let groups = [FilterGroup::all().with(condition(
        "created_at",
        Operator::Gt,
        json!("2024-01-18"),
        FieldKind::Date,
    ))];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["2", "3"]);
}

#[test]
fn or_group_and_or_across_groups() {
    let data = work_orders();
    let groups = [
        FilterGroup::any()
            .with(condition("status", Operator::Eq, json!("pending"), FieldKind::Select))
            .with(condition("status", Operator::Eq, json!("completed"), FieldKind::Select)),
        FilterGroup::all()
            .with(condition("neighbourhood.name", Operator::Eq, json!("Midtown"), FieldKind::Select)),
    ];
    assert_eq!(ids(&apply_filters(&data, &groups, &silent())), ["1", "2", "3"]);
}

#[test]
fn quick_filter_by_nested_name() {
    let data = work_orders();
    let filters = [("neighbourhood.name".to_string(), "Downtown".to_string())]
        .into_iter()
        .collect();
    assert_eq!(ids(&apply_quick_filters(&data, &filters)), ["1", "3"]);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn search_title_description_and_nested_fields() {
    let data = work_orders();
    let fields = ["title", "description", "neighbourhood.name", "team.name"];
    assert_eq!(ids(&apply_search(&data, "water", &fields)), ["1"]);
    assert_eq!(ids(&apply_search(&data, "MAINTENANCE", &fields)), ["3"]);
    assert_eq!(ids(&apply_search(&data, "downtown", &fields)), ["1", "3"]);
    assert!(apply_search(&data, "nonexistent", &fields).is_empty());
    assert_eq!(apply_search(&data, "", &fields).len(), 3);
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn sort_by_title_ascending() {
    let data = work_orders();
    let sorted = apply_sorting(&data, &SortSpec::asc("title"));
    assert_eq!(ids(&sorted), ["2", "1", "3"]);
}

#[test]
fn sort_by_latitude_descending() {
    let data = work_orders();
    let sorted = apply_sorting(&data, &SortSpec::desc("latitude"));
    assert_eq!(sorted[0]["latitude"], 40.7589);
    assert_eq!(ids(&sorted), ["2", "3", "1"]);
}

#[test]
fn sort_by_nested_field_puts_null_last() {
    let mut data = work_orders();
    data[0]["neighbourhood"] = Json::Null;
    for spec in [SortSpec::asc("neighbourhood.name"), SortSpec::desc("neighbourhood.name")] {
        let sorted = apply_sorting(&data, &spec);
        assert_eq!(ids(&sorted)[2], "1");
    }
}

#[test]
fn sort_by_created_at_chronologically() {
    let data = work_orders();
    let sorted = apply_sorting(&data, &SortSpec::desc("created_at").with_kind(FieldKind::Date));
    assert_eq!(ids(&sorted), ["3", "2", "1"]);
}

#[test]
fn multi_sort_by_status() {
    let data = work_orders();
    let spec = MultiSortSpec::new().column(SortColumn::new("status", Dir::Asc, 1));
    let sorted = apply_multi_sorting(&data, &spec);
    let statuses: Vec<&Json> = sorted.iter().map(|row| &row["status"]).collect();
    assert_eq!(statuses, [&json!("completed"), &json!("in_progress"), &json!("pending")]);
}

#[test]
fn multi_sort_three_columns() {
    let mut data = work_orders();
    data.push(json!({
        "id": "4",
        "title": "Fix water leak",
        "status": "pending",
        "created_at": "2024-01-10T08:00:00Z"
    }));

    let spec = MultiSortSpec::new()
        .column(SortColumn::new("status", Dir::Asc, 1))
        .column(SortColumn::new("title", Dir::Asc, 2))
        .column(SortColumn::new("created_at", Dir::Desc, 3));
    let sorted = apply_multi_sorting(&data, &spec);

    assert_eq!(ids(&sorted), ["3", "2", "1", "4"]);
    assert_eq!(sorted[2]["created_at"], "2024-01-15T10:00:00Z");
    assert_eq!(sorted[3]["created_at"], "2024-01-10T08:00:00Z");
}

#[test]
fn multi_sort_follows_priority_not_declaration_order() {
    let data = work_orders();
    let spec = MultiSortSpec::new()
        .column(SortColumn::new("title", Dir::Asc, 2))
        .column(SortColumn::new("status", Dir::Desc, 1));
    let sorted = apply_multi_sorting(&data, &spec);
    assert_eq!(sorted[0]["status"], "pending");
}

#[test]
fn identical_records_keep_their_order() {
    let data = vec![
        json!({"name": "same", "n": 1}),
        json!({"name": "same", "n": 2}),
        json!({"name": "same", "n": 3}),
    ];
    let sorted = apply_multi_sorting(&data, &MultiSortSpec::new().then_by("name", Dir::Desc));
    let order: Vec<&Json> = sorted.iter().map(|row| &row["n"]).collect();
    assert_eq!(order, [&json!(1), &json!(2), &json!(3)]);
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn first_page_of_two() {
    let data = work_orders();
    let page = apply_pagination(&data, 1, 2);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next_page);
    assert!(!page.pagination.has_prev_page);
}

#[test]
fn second_page_of_two() {
    let data = work_orders();
    let page = apply_pagination(&data, 2, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.start_index, 3);
    assert_eq!(page.pagination.end_index, 3);
    assert!(!page.pagination.has_next_page);
    assert!(page.pagination.has_prev_page);
}

#[test]
fn page_larger_than_data() {
    let data = work_orders();
    let page = apply_pagination(&data, 1, 10);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.pagination.total_pages, 1);
    assert!(!page.pagination.has_next_page);
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn table_query_end_to_end() {
    let data = work_orders();
    let config = QueryConfig::from_yaml_str("default_page_size: 10\npage_size_options: [1, 10]\n").unwrap();

    let query = TableQuery::new()
        .search("downtown")
        .search_fields(["title", "neighbourhood.name"])
        .group(FilterGroup::all().with(condition("status", Operator::Ne, json!("in_progress"), FieldKind::Select)))
        .sort_by(SortSpec::desc("created_at").with_kind(FieldKind::Date))
        .paginate(config.page_request(1))
        .page_size(config.normalize_page_size(1))
        .build();

    let page = query.run(&data, &silent());
    assert_eq!(ids(&page.data), ["3"]);
    assert_eq!(page.pagination.total_items, 2);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next_page);

    let export = query.select(&data, &silent());
    assert_eq!(ids(&export), ["3", "1"]);
}

#[test]
fn table_query_from_ui_state() {
    let data = work_orders();
    let query = TableQuery::from_json_str(
        r#"{
            "quickFilters": {"neighbourhood.name": "Downtown", "status": "all"},
            "filterGroups": [{
                "id": "g1",
                "joinOperator": "or",
                "conditions": [
                    {"id": "c1", "field": "team.name", "operator": "iLike", "value": "hvac", "variant": "text"},
                    {"id": "c2", "field": "latitude", "operator": "lt", "value": 40.72, "variant": "number"}
                ]
            }],
            "sort": {"multi": {"columns": [{"field": "title", "order": "desc", "priority": 1}]}},
            "page": {"page": 1, "pageSize": 20}
        }"#,
    )
    .unwrap();

    let rows = query.select(&data, &silent());
    assert_eq!(ids(&rows), ["3", "1"]);
}
