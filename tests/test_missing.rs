//! Unit tests for missing value analysis and sparse column removal

use credit_eda::pipeline::{
    analyze_missing_values, drop_sparse_columns, get_sparse_columns, non_null_threshold, EdaError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_analyze_missing_values_basic() {
    let df = df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df);
    let ratio_map: std::collections::HashMap<_, _> = ratios.into_iter().collect();

    common::assert_close(ratio_map["col_complete"], 0.0, 1e-9);
    common::assert_close(ratio_map["col_partial_missing"], 0.4, 1e-9);
    common::assert_close(ratio_map["col_all_missing"], 1.0, 1e-9);
}

#[test]
fn test_analyze_missing_values_sorted_descending() {
    let df = common::create_application_dataframe();

    let ratios = analyze_missing_values(&df);

    assert_eq!(ratios.len(), df.width());
    assert_eq!(ratios[0].0, "COMMONAREA_AVG");
    for pair in ratios.windows(2) {
        assert!(
            pair[0].1 >= pair[1].1,
            "Ratios should be sorted descending: {} >= {}",
            pair[0].1,
            pair[1].1
        );
    }
}

#[test]
fn test_empty_table_has_no_ratios() {
    let df = df! { "a" => Vec::<f64>::new() }.unwrap();
    assert!(analyze_missing_values(&df).is_empty());
}

#[test]
fn test_application_threshold_drops_sparse_columns_only() {
    let df = common::create_application_dataframe();
    let width = df.width();

    let (cleaned, dropped) = drop_sparse_columns(df, 47.0).unwrap();

    // floor(0.53 * 10) = 5 non-null values required
    assert_eq!(dropped, vec!["COMMONAREA_AVG".to_string()]);
    assert_eq!(cleaned.width(), width - 1);
    common::assert_has_columns(&cleaned, &["OCCUPATION_TYPE", "EXT_SOURCE_3"]);
}

#[test]
fn test_threshold_boundary_at_pinned_row_count() {
    // 100 rows at 49%: 51 non-null values required
    assert_eq!(non_null_threshold(100, 49.0), 51);

    let at_threshold: Vec<Option<i64>> = (0..100).map(|i| (i < 51).then_some(i)).collect();
    let below_threshold: Vec<Option<i64>> = (0..100).map(|i| (i < 50).then_some(i)).collect();
    let df = DataFrame::new(vec![
        Column::new("kept".into(), at_threshold),
        Column::new("dropped".into(), below_threshold),
    ])
    .unwrap();

    assert_eq!(get_sparse_columns(&df, 49.0), vec!["dropped".to_string()]);
}

#[test]
fn test_all_null_column_dropped() {
    let df = df! {
        "empty" => [None::<f64>, None, None],
        "full" => [1.0f64, 2.0, 3.0],
    }
    .unwrap();

    let (cleaned, dropped) = drop_sparse_columns(df, 50.0).unwrap();

    assert_eq!(dropped, vec!["empty".to_string()]);
    common::assert_missing_columns(&cleaned, &["empty"]);
}

#[test]
fn test_hundred_percent_threshold_keeps_everything() {
    let df = common::create_application_dataframe();
    let width = df.width();

    let (cleaned, dropped) = drop_sparse_columns(df, 100.0).unwrap();

    assert!(dropped.is_empty());
    assert_eq!(cleaned.width(), width);
}

#[test]
fn test_out_of_range_threshold_is_config_error() {
    let df = common::create_application_dataframe();

    let err = drop_sparse_columns(df, 120.0).unwrap_err();

    assert!(matches!(err.downcast_ref::<EdaError>(), Some(EdaError::Config(_))));
}
