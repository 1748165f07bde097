//! Tests for the descriptive analyses and the merged-table pivot

use credit_eda::analysis::{
    analyze_application, categorical_columns, categorical_distribution, correlation_matrix,
    dispersion_summary, gaussian_kde, pivot_mean, target_density, AnalysisConfig, PivotSpec,
    GRID_SIZE,
};
use credit_eda::config::EdaConfig;
use credit_eda::pipeline::{clean_table, merge_tables, EdaError, AGE_CATEGORY, AMT_CREDIT_CATEGORY};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn cleaned_application() -> DataFrame {
    let config = EdaConfig::default();
    let (df, _) = clean_table(common::create_application_dataframe(), &config.app_cleaning()).unwrap();
    df
}

#[test]
fn test_distribution_percentages_sum_to_100() {
    let df = cleaned_application();

    for name in categorical_columns(&df, &[]) {
        let dist = categorical_distribution(&df, &name).unwrap();
        let total: f64 = dist.shares.iter().map(|s| s.percent).sum();
        if dist.total > 0 {
            common::assert_close(total, 100.0, 1e-9);
        }
    }
}

#[test]
fn test_distribution_sorted_by_count() {
    let df = cleaned_application();

    let dist = categorical_distribution(&df, "NAME_INCOME_TYPE").unwrap();

    assert_eq!(dist.total, 10);
    assert_eq!(dist.shares[0].category, "Working");
    assert_eq!(dist.shares[0].count, 6);
    common::assert_close(dist.shares[0].percent, 60.0, 1e-9);
    // Ties broken alphabetically
    assert_eq!(dist.shares[1].category, "Commercial associate");
    assert_eq!(dist.shares[2].category, "Pensioner");
}

#[test]
fn test_derived_categories_excluded_from_pies() {
    let df = cleaned_application();

    let analysis = analyze_application(&df, &AnalysisConfig::default()).unwrap();

    assert!(!analysis.categorical_columns.contains(&AMT_CREDIT_CATEGORY.to_string()));
    assert!(!analysis.categorical_columns.contains(&AGE_CATEGORY.to_string()));
    assert_eq!(
        analysis.pie_columns,
        vec!["NAME_CONTRACT_TYPE", "CODE_GENDER", "FLAG_OWN_CAR"]
    );
    assert_eq!(analysis.boxplots.len(), 3);
    assert!(analysis.density.is_some());
    assert!(analysis.correlation.is_some());
    assert!(analysis.skipped.is_empty());
}

#[test]
fn test_numeric_columns_listed_alongside_categorical() {
    let df = cleaned_application();

    let analysis = analyze_application(&df, &AnalysisConfig::default()).unwrap();

    for name in ["SK_ID_CURR", "TARGET", "AMT_CREDIT", "YEAR_BIRTH", "YEAR_EMPLOYED"] {
        assert!(analysis.numeric_columns.contains(&name.to_string()), "{} not listed", name);
    }
    assert!(!analysis.numeric_columns.contains(&"OCCUPATION_TYPE".to_string()));
    assert!(analysis
        .numeric_columns
        .iter()
        .all(|name| !analysis.categorical_columns.contains(name)));
    assert_eq!(
        analysis.numeric_columns.len() + analysis.categorical_columns.len() + 2,
        df.width()
    );
}

#[test]
fn test_box_summary_quartiles() {
    let df = df! { "AMT_INCOME_TOTAL" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 100.0] }.unwrap();

    let summary = dispersion_summary(&df, "AMT_INCOME_TOTAL").unwrap();

    assert_eq!(summary.count, 6);
    common::assert_close(summary.q1, 2.25, 1e-12);
    common::assert_close(summary.median, 3.5, 1e-12);
    common::assert_close(summary.q3, 4.75, 1e-12);
    common::assert_close(summary.iqr(), 2.5, 1e-12);
    assert_eq!(summary.upper_whisker, 5.0);
    assert_eq!(summary.outliers, 1);
    assert_eq!(summary.max, 100.0);
}

#[test]
fn test_all_null_boxplot_column_is_skipped() {
    let mut df = cleaned_application();
    let empty: Vec<Option<f64>> = vec![None; df.height()];
    df.with_column(Column::new("AMT_GOODS_PRICE".into(), empty)).unwrap();

    let analysis = analyze_application(&df, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.boxplots.len(), 2);
    assert!(analysis
        .skipped
        .iter()
        .any(|s| s.analysis == "boxplot of AMT_GOODS_PRICE"));
}

#[test]
fn test_density_curves_per_target_class() {
    let df = cleaned_application();

    let density = target_density(&df, "TARGET", "AMT_GOODS_PRICE").unwrap();

    assert_eq!(density.curves.len(), 2);
    assert_eq!(density.curves[0].target, 0);
    assert_eq!(density.curves[0].count, 7);
    assert_eq!(density.curves[1].count, 3);
    for curve in &density.curves {
        assert_eq!(curve.points.len(), GRID_SIZE);
        assert!(curve.points.iter().all(|(_, y)| *y >= 0.0));
        common::assert_close(curve.area(), 1.0, 0.02);
    }
}

#[test]
fn test_kde_needs_variance() {
    assert!(gaussian_kde(&[5.0]).is_none());
    assert!(gaussian_kde(&[5.0, 5.0, 5.0]).is_none());
    assert!(gaussian_kde(&[1.0, 2.0, 4.0]).is_some());
}

#[test]
fn test_correlation_matrix_symmetric_with_unit_diagonal() {
    let df = cleaned_application();
    let columns = AnalysisConfig::default().correlation_columns;

    let matrix = correlation_matrix(&df, &columns).unwrap();

    for a in &columns {
        common::assert_close(matrix.get(a, a).unwrap(), 1.0, 1e-12);
        for b in &columns {
            let ab = matrix.get(a, b).unwrap();
            let ba = matrix.get(b, a).unwrap();
            common::assert_close(ab, ba, 1e-12);
            assert!((-1.0..=1.0 + 1e-12).contains(&ab));
        }
    }
}

#[test]
fn test_correlation_of_linear_columns() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0],
        "c" => [4.0f64, 3.0, 2.0, 1.0],
        "k" => [7.0f64, 7.0, 7.0, 7.0],
    }
    .unwrap();
    let columns: Vec<String> = ["a", "b", "c", "k"].iter().map(|s| s.to_string()).collect();

    let matrix = correlation_matrix(&df, &columns).unwrap();

    common::assert_close(matrix.get("a", "b").unwrap(), 1.0, 1e-12);
    common::assert_close(matrix.get("a", "c").unwrap(), -1.0, 1e-12);
    assert_eq!(matrix.get("a", "k"), None);
    assert_eq!(matrix.get("k", "k"), None);
}

#[test]
fn test_correlation_missing_column_is_skippable() {
    let df = df! { "AMT_CREDIT" => [1.0f64, 2.0] }.unwrap();
    let columns = vec!["AMT_CREDIT".to_string(), "YEAR_BIRTH".to_string()];

    let err = correlation_matrix(&df, &columns).unwrap_err();

    let eda = err.downcast_ref::<EdaError>().unwrap();
    assert!(eda.is_skippable());
}

#[test]
fn test_pivot_means_on_merged_table() {
    let config = EdaConfig::default();
    let (app, _) = clean_table(common::create_application_dataframe(), &config.app_cleaning()).unwrap();
    let (prev, _) = clean_table(common::create_previous_dataframe(), &config.prev_cleaning()).unwrap();
    let (merged, _) = merge_tables(&app, &prev, &config.merge_options()).unwrap();

    let pivot = pivot_mean(&merged, &PivotSpec::default()).unwrap().unwrap();

    assert_eq!(pivot.column_keys, vec![0, 1]);
    // Applicant 100 (Working, TARGET 0) has two Repeater rows with AMT_CREDIT 406597.5
    common::assert_close(pivot.get(&["Working", "Repeater"], 0).unwrap(), 406597.5, 1e-6);
    // Applicant 101 (Working, TARGET 1) has one New row
    common::assert_close(pivot.get(&["Working", "New"], 1).unwrap(), 1293502.5, 1e-6);
    // Applicant 102 (Pensioner, TARGET 0): two Repeater rows and one Refreshed row
    common::assert_close(pivot.get(&["Pensioner", "Repeater"], 0).unwrap(), 135000.0, 1e-6);
    assert_eq!(pivot.get(&["Pensioner", "Repeater"], 1), None);
    // Unmatched applicants have a null client type and stay out of the table
    assert_eq!(pivot.rows.len(), 5);
}

#[test]
fn test_pivot_skipped_without_client_type() {
    let df = cleaned_application();

    let pivot = pivot_mean(&df, &PivotSpec::default()).unwrap();

    assert!(pivot.is_none());
    assert_eq!(
        PivotSpec::default().missing_columns(&df),
        vec!["NAME_CLIENT_TYPE".to_string()]
    );
}
