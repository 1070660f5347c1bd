mod common;

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use common::{int_column, table, text_column};
use tablescope::data::Value;
use tablescope::error::PipelineError;
use tablescope::filter::{FilterSpec, NumericRange};
use tablescope::table::Table;

fn people() -> Table {
    table(vec![
        text_column(
            "city",
            &[Some("Lisbon"), Some("Porto"), Some("Lisbon"), Some("Braga")],
        ),
        int_column("age", &[Some(18), Some(30), Some(40), Some(65)]),
        int_column("score", &[Some(1), Some(2), Some(3), Some(4)]),
    ])
}

#[test]
fn projection_preserves_source_column_order() {
    let spec = FilterSpec {
        selected_columns: BTreeSet::from(["score".to_string(), "city".to_string()]),
        ..FilterSpec::default()
    };
    let filtered = spec.apply(&people()).unwrap();
    assert_eq!(filtered.column_names(), vec!["city", "score"]);
    assert_eq!(filtered.row_count(), 4);
}

#[test]
fn numeric_range_keeps_boundary_rows() {
    let source = people();
    let mut spec = FilterSpec::all_inclusive(&source);
    spec.ranges
        .insert("age".to_string(), NumericRange { min: 30.0, max: 40.0 });
    let filtered = spec.apply(&source).unwrap();
    assert_eq!(
        filtered.column("age").unwrap().values,
        vec![Some(Value::Integer(30)), Some(Value::Integer(40))]
    );
}

#[test]
fn filters_compose_as_set_intersection() {
    let source = people();
    let mut spec = FilterSpec::all_inclusive(&source);
    spec.categorical.insert(
        "city".to_string(),
        BTreeSet::from(["Lisbon".to_string(), "Braga".to_string()]),
    );
    spec.ranges
        .insert("age".to_string(), NumericRange { min: 20.0, max: 70.0 });
    let filtered = spec.apply(&source).unwrap();
    // Lisbon@18 fails the range; Porto@30 fails the allow-list.
    assert_eq!(filtered.row_count(), 2);
    assert_eq!(
        filtered.column("score").unwrap().values,
        vec![Some(Value::Integer(3)), Some(Value::Integer(4))]
    );
}

#[test]
fn filtering_away_every_row_yields_a_valid_empty_table() {
    let source = people();
    let mut spec = FilterSpec::all_inclusive(&source);
    spec.categorical
        .insert("city".to_string(), BTreeSet::from(["Faro".to_string()]));
    let filtered = spec.apply(&source).unwrap();
    assert_eq!(filtered.row_count(), 0);
    assert_eq!(filtered.column_count(), 3);
}

#[test]
fn empty_selection_is_distinct_from_empty_table() {
    let spec = FilterSpec::default();
    assert!(matches!(
        spec.apply(&people()),
        Err(PipelineError::NoDataAfterFilter)
    ));
}

#[test]
fn all_inclusive_round_trips_tables_with_missing_cells() {
    let source = table(vec![
        text_column("status", &[Some("active"), None, Some("inactive")]),
        int_column("amount", &[Some(5), Some(9), None]),
    ]);
    let spec = FilterSpec::all_inclusive(&source);
    assert_eq!(spec.apply(&source).unwrap(), source);
}

#[test]
fn disjoint_narrowed_filters_commute_despite_missing_cells() {
    let source = table(vec![
        text_column("group", &[Some("x"), Some("y"), Some("x")]),
        int_column("score", &[Some(1), Some(5), None]),
    ]);
    let categorical_only = FilterSpec {
        selected_columns: full_selection(),
        categorical: BTreeMap::from([(
            "group".to_string(),
            BTreeSet::from(["x".to_string()]),
        )]),
        ..FilterSpec::default()
    };
    let range_only = FilterSpec {
        selected_columns: full_selection(),
        ranges: BTreeMap::from([("score".to_string(), NumericRange { min: 1.0, max: 2.0 })]),
        ..FilterSpec::default()
    };

    let cat_then_range = range_only
        .apply(&categorical_only.apply(&source).unwrap())
        .unwrap();
    let range_then_cat = categorical_only
        .apply(&range_only.apply(&source).unwrap())
        .unwrap();
    assert_eq!(cat_then_range, range_then_cat);
    // The row with a missing score passes the range, so both orders keep
    // both "x" rows.
    assert_eq!(
        cat_then_range.column("score").unwrap().values,
        vec![Some(Value::Integer(1)), None]
    );
}

#[test]
fn filter_spec_survives_a_serde_round_trip() {
    let source = people();
    let mut spec = FilterSpec::all_inclusive(&source);
    spec.ranges
        .insert("age".to_string(), NumericRange { min: 21.0, max: 60.0 });
    let encoded = serde_json::to_string(&spec).expect("serialize spec");
    let decoded: FilterSpec = serde_json::from_str(&encoded).expect("deserialize spec");
    assert_eq!(decoded, spec);
    assert_eq!(decoded.apply(&source).unwrap(), spec.apply(&source).unwrap());
}

// Rows with missing cells in either column are part of the generated
// space, since they are exactly where filtering subtleties live.
fn arbitrary_rows() -> impl Strategy<Value = Vec<(Option<String>, Option<i64>)>> {
    prop::collection::vec(
        (
            prop::option::weighted(
                0.8,
                prop::sample::select(vec![
                    "alpha".to_string(),
                    "beta".to_string(),
                    "gamma".to_string(),
                    "delta".to_string(),
                ]),
            ),
            prop::option::weighted(0.8, -100i64..=100),
        ),
        1..40,
    )
}

fn build_table(rows: &[(Option<String>, Option<i64>)]) -> Table {
    let groups: Vec<Option<&str>> = rows.iter().map(|(g, _)| g.as_deref()).collect();
    let scores: Vec<Option<i64>> = rows.iter().map(|(_, s)| *s).collect();
    table(vec![
        text_column("group", &groups),
        int_column("score", &scores),
    ])
}

fn full_selection() -> BTreeSet<String> {
    BTreeSet::from(["group".to_string(), "score".to_string()])
}

proptest! {
    #[test]
    fn filters_on_disjoint_columns_commute(
        rows in arbitrary_rows(),
        allowed in prop::collection::btree_set(
            prop::sample::select(vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "delta".to_string(),
            ]),
            1..4,
        ),
        bounds in (-100i64..=100, -100i64..=100),
    ) {
        let source = build_table(&rows);
        let (lo, hi) = (bounds.0.min(bounds.1) as f64, bounds.0.max(bounds.1) as f64);

        let categorical_only = FilterSpec {
            selected_columns: full_selection(),
            categorical: BTreeMap::from([("group".to_string(), allowed)]),
            ..FilterSpec::default()
        };

        let range_only = FilterSpec {
            selected_columns: full_selection(),
            ranges: BTreeMap::from([("score".to_string(), NumericRange { min: lo, max: hi })]),
            ..FilterSpec::default()
        };

        let cat_then_range = range_only
            .apply(&categorical_only.apply(&source).unwrap())
            .unwrap();
        let range_then_cat = categorical_only
            .apply(&range_only.apply(&source).unwrap())
            .unwrap();
        prop_assert_eq!(cat_then_range, range_then_cat);
    }

    #[test]
    fn applying_the_same_spec_twice_changes_nothing(
        rows in arbitrary_rows(),
        bounds in (-100i64..=100, -100i64..=100),
    ) {
        let source = build_table(&rows);
        let mut spec = FilterSpec::all_inclusive(&source);
        let (lo, hi) = (bounds.0.min(bounds.1) as f64, bounds.0.max(bounds.1) as f64);
        spec.ranges
            .insert("score".to_string(), NumericRange { min: lo, max: hi });

        let once = spec.apply(&source).unwrap();
        let twice = spec.apply(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
