//! Reshape feature tables to the column order a fitted normaliser expects.

use std::borrow::Cow;

use relocation_core::FeatureTable;

/// Return `table` reshaped to exactly `target`, in order.
///
/// Target columns absent from `table` are added and filled with `0.0`; columns
/// not in `target` are dropped. With no target the input is borrowed back
/// unchanged. The caller's table is never modified.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use relocation_core::FeatureTable;
/// use relocation_scorer::align_features;
///
/// let table = FeatureTable::new(vec!["b".to_owned()], vec![vec![4.0]]).unwrap();
/// let target = ["a", "b", "c"].map(str::to_owned);
/// let aligned = align_features(&table, Some(&target));
/// assert_eq!(aligned.columns(), ["a", "b", "c"]);
/// assert_eq!(*aligned.cells(), array![[0.0, 4.0, 0.0]]);
/// ```
#[must_use]
pub fn align_features<'a>(
    table: &'a FeatureTable<f64>,
    target: Option<&[String]>,
) -> Cow<'a, FeatureTable<f64>> {
    let Some(columns) = target else {
        return Cow::Borrowed(table);
    };
    if table.columns() == columns {
        return Cow::Borrowed(table);
    }
    let padded: Vec<&str> = columns
        .iter()
        .filter(|column| table.column_index(column).is_none())
        .map(String::as_str)
        .collect();
    if !padded.is_empty() {
        log::debug!("padding absent feature columns with zero: {padded:?}");
    }
    Cow::Owned(table.reindex(columns, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| (*c).to_owned()).collect()
    }

    #[rstest]
    fn pads_missing_columns_with_zero() {
        let table = FeatureTable::new(names(&["b"]), vec![vec![1.5], vec![-2.0]])
            .expect("valid table");
        let target = names(&["a", "b", "c"]);
        let aligned = align_features(&table, Some(&target));
        assert_eq!(aligned.columns(), target);
        assert_eq!(*aligned.cells(), array![[0.0, 1.5, 0.0], [0.0, -2.0, 0.0]]);
        assert_eq!(table.columns(), ["b"]);
    }

    #[rstest]
    fn drops_extra_columns_and_reorders() {
        let table = FeatureTable::new(names(&["c", "x", "a"]), vec![vec![3.0, 9.0, 1.0]])
            .expect("valid table");
        let aligned = align_features(&table, Some(&names(&["a", "c"])));
        assert_eq!(aligned.columns(), ["a", "c"]);
        assert_eq!(*aligned.cells(), array![[1.0, 3.0]]);
    }

    #[rstest]
    fn passes_through_without_a_target() {
        let table = FeatureTable::new(names(&["z"]), vec![vec![7.0]]).expect("valid table");
        let aligned = align_features(&table, None);
        assert!(matches!(aligned, Cow::Borrowed(_)));
        assert_eq!(*aligned, table);
    }
}
