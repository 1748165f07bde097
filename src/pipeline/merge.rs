//! Left join of the application table onto previous applications

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::require_column;

/// Join settings
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub join_key: String,
    /// Suffix for previous-application columns that clash with application columns
    pub suffix: String,
    /// Columns starting with this prefix are dropped after the join
    pub flag_prefix: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            join_key: "SK_ID_CURR".to_string(),
            suffix: "_PREV".to_string(),
            flag_prefix: "FLAG".to_string(),
        }
    }
}

/// Columns of `df` whose names start with `prefix`
pub fn columns_with_prefix(df: &DataFrame, prefix: &str) -> Vec<String> {
    df.get_column_names()
        .iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| name.to_string())
        .collect()
}

/// Left-join `prev` onto `app` and drop the flag column family.
///
/// Inputs are borrowed and left untouched. Returns the merged table and the
/// names of the dropped flag columns.
pub fn merge_tables(
    app: &DataFrame,
    prev: &DataFrame,
    options: &MergeOptions,
) -> Result<(DataFrame, Vec<String>)> {
    let key = options.join_key.as_str();
    require_column(app, key, "merge (application side)")?;
    require_column(prev, key, "merge (previous application side)")?;

    let merged = app
        .clone()
        .lazy()
        .join(
            prev.clone().lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Left).with_suffix(Some(options.suffix.as_str().into())),
        )
        .collect()
        .with_context(|| format!("Failed to join tables on '{}'", key))?;

    let flags = columns_with_prefix(&merged, &options.flag_prefix);
    let merged = merged.drop_many(&flags);

    Ok((merged, flags))
}
