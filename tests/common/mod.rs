//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small application table with known characteristics
///
/// This DataFrame includes:
/// - `SK_ID_CURR`: applicant keys 100..=109
/// - `TARGET`: 3 of 10 applicants in payment difficulty
/// - `OCCUPATION_TYPE`: 30% missing (kept at 47%, filled with "Others")
/// - `EXT_SOURCE_3`: 20% missing (median fill)
/// - `COMMONAREA_AVG`: 80% missing (dropped at 47%)
/// - `DAYS_*`: non-positive day offsets; applicant 100 is exactly 25 years old
/// - `FLAG_OWN_CAR`, `FLAG_MOBIL`: flag family removed by the merge
pub fn create_application_dataframe() -> DataFrame {
    df! {
        "SK_ID_CURR" => [100i64, 101, 102, 103, 104, 105, 106, 107, 108, 109],
        "TARGET" => [0i64, 1, 0, 0, 1, 0, 0, 1, 0, 0],
        "NAME_CONTRACT_TYPE" => ["Cash loans", "Cash loans", "Revolving loans", "Cash loans", "Cash loans",
                                 "Revolving loans", "Cash loans", "Cash loans", "Cash loans", "Revolving loans"],
        "CODE_GENDER" => ["F", "M", "F", "F", "M", "F", "M", "F", "F", "M"],
        "FLAG_OWN_CAR" => ["N", "Y", "N", "N", "Y", "N", "Y", "N", "N", "N"],
        "NAME_INCOME_TYPE" => ["Working", "Working", "Pensioner", "Commercial associate", "Working",
                               "Pensioner", "Working", "Commercial associate", "Working", "Working"],
        "OCCUPATION_TYPE" => [Some("Laborers"), None, Some("Core staff"), Some("Laborers"), None,
                              Some("Drivers"), Some("Laborers"), None, Some("Core staff"), Some("Managers")],
        "AMT_INCOME_TOTAL" => [202500.0f64, 270000.0, 67500.0, 135000.0, 121500.0,
                               99000.0, 171000.0, 360000.0, 112500.0, 135000.0],
        "AMT_CREDIT" => [406597.5f64, 1293502.5, 135000.0, 312682.5, 513000.0,
                         490495.5, 1560726.0, 1530000.0, 1019610.0, 405000.0],
        "AMT_ANNUITY" => [24700.5f64, 35698.5, 6750.0, 29686.5, 21865.5,
                          27517.5, 41301.0, 42075.0, 33826.5, 20250.0],
        "AMT_GOODS_PRICE" => [Some(351000.0f64), Some(1129500.0), Some(135000.0), Some(297000.0), None,
                              Some(454500.0), Some(1395000.0), Some(1530000.0), Some(913500.0), Some(405000.0)],
        "EXT_SOURCE_3" => [Some(0.139f64), None, Some(0.729), Some(0.5), Some(0.651),
                           None, Some(0.363), Some(0.176), Some(0.554), Some(0.472)],
        "COMMONAREA_AVG" => [Some(0.0143f64), None, None, None, None, None, None, None, Some(0.0022), None],
        "DAYS_BIRTH" => [-9125i64, -16765, -19046, -19005, -19932, -16941, -13778, -18850, -20099, -14469],
        "DAYS_EMPLOYED" => [-637i64, -1188, -225, -3039, -3038, -1588, -3130, -449, 365243, -2019],
        "DAYS_REGISTRATION" => [-3648.0f64, -1186.0, -4260.0, -9833.0, -4311.0,
                                -4970.0, -1213.0, -4597.0, -7427.0, -14437.0],
        "DAYS_ID_PUBLISH" => [-2120i64, -291, -2531, -2437, -3458, -477, -619, -2379, -3514, -3992],
        "DAYS_LAST_PHONE_CHANGE" => [Some(-1134.0f64), Some(-828.0), Some(-815.0), None, Some(-1106.0),
                                     Some(-2536.0), Some(-1562.0), Some(-1070.0), Some(0.0), Some(-1673.0)],
        "FLAG_MOBIL" => [1i64; 10],
    }
    .unwrap()
}

/// Application table with an extra `EXT_SOURCE_1` column, 2 of 10 values
/// missing, that no default fill rule covers
pub fn create_application_with_uncovered_nulls() -> DataFrame {
    let mut df = create_application_dataframe();
    let ext1 = vec![
        Some(0.083f64), Some(0.311), None, Some(0.506), Some(0.262),
        Some(0.625), None, Some(0.419), Some(0.702), Some(0.358),
    ];
    df.with_column(Column::new("EXT_SOURCE_1".into(), ext1)).unwrap();
    df
}

/// Create a previous-application table matching `create_application_dataframe`
///
/// Applicant 100 has 2 previous applications, 101 has 1, 102 has 3, 105 has 1,
/// the rest none. Key 200 has no applicant and disappears in the left join.
/// `RATE_INTEREST_PRIMARY` is 7/8 missing (dropped at 49%).
pub fn create_previous_dataframe() -> DataFrame {
    df! {
        "SK_ID_PREV" => [2030495i64, 2802425, 2523466, 2819243, 1784265, 1383531, 2396755, 1715995],
        "SK_ID_CURR" => [100i64, 100, 101, 102, 102, 102, 105, 200],
        "NAME_CONTRACT_TYPE" => ["Consumer loans", "Cash loans", "Cash loans", "Consumer loans",
                                 "Cash loans", "Cash loans", "Consumer loans", "Cash loans"],
        "AMT_APPLICATION" => [17145.0f64, 607500.0, 112500.0, 450000.0, 337500.0, 315000.0, 47041.0, 0.0],
        "AMT_CREDIT" => [17145.0f64, 679671.0, 136444.5, 470790.0, 404055.0, 340573.5, 47970.0, 0.0],
        "NAME_CONTRACT_STATUS" => ["Approved", "Approved", "Approved", "Refused",
                                  "Approved", "Canceled", "Approved", "Refused"],
        "NAME_CLIENT_TYPE" => ["Repeater", "Repeater", "New", "Repeater", "Repeater", "Refreshed", "New", "New"],
        "DAYS_DECISION" => [-73i64, -164, -301, -512, -781, -684, -14, -735],
        "FLAG_LAST_APPL_PER_CONTRACT" => ["Y", "Y", "Y", "Y", "N", "Y", "Y", "Y"],
        "RATE_INTEREST_PRIMARY" => [Some(0.18f64), None, None, None, None, None, None, None],
    }
    .unwrap()
}

/// Write `df` as CSV named `name` inside `dir`
pub fn write_csv(df: &mut DataFrame, dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv(df, &temp_dir, "test_data.csv");
    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Write both fixture tables as CSV into a fresh temp directory
pub fn create_input_files() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let app_path = write_csv(
        &mut create_application_dataframe(),
        &temp_dir,
        "application_data.csv",
    );
    let prev_path = write_csv(
        &mut create_previous_dataframe(),
        &temp_dir,
        "previous_application.csv",
    );
    (temp_dir, app_path, prev_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Assert that two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "Expected {} (±{}), got {}",
        expected,
        tol,
        actual
    );
}
