//! Fill gaps in raw feature tables before they reach a fitted model.

use std::collections::BTreeMap;

use relocation_core::FeatureTable;

/// Strategy for replacing missing feature cells.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use relocation_core::FeatureTable;
/// use relocation_scorer::Imputation;
///
/// let raw = FeatureTable::new(
///     vec!["x".to_owned()],
///     vec![vec![Some(1.0)], vec![None], vec![Some(5.0)]],
/// )
/// .unwrap();
/// let filled = Imputation::BatchMedian.fill(&raw);
/// assert_eq!(*filled.cells(), array![[1.0], [3.0], [5.0]]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Imputation {
    /// Use the median of the present values in the rows being scored.
    ///
    /// A destination's features can therefore depend on which other
    /// destinations are in the same batch.
    #[default]
    BatchMedian,
    /// Use medians recorded at training time, falling back to the batch median
    /// for columns the map does not cover.
    TrainingMedians(BTreeMap<String, f64>),
}

impl Imputation {
    /// Replace every missing cell of `raw`.
    ///
    /// A column with no value in any row and no training median is filled with
    /// `0.0`.
    #[must_use]
    pub fn fill(&self, raw: &FeatureTable<Option<f64>>) -> FeatureTable<f64> {
        let fills: Vec<f64> = raw
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| self.fill_value(raw, index, column))
            .collect();
        raw.map_cells(|index, cell| {
            cell.or_else(|| fills.get(index).copied())
                .unwrap_or_default()
        })
    }

    fn fill_value(&self, raw: &FeatureTable<Option<f64>>, index: usize, column: &str) -> f64 {
        if let Self::TrainingMedians(medians) = self
            && let Some(median) = medians.get(column)
        {
            return *median;
        }
        let present: Vec<f64> = raw.column_cells(index).filter_map(|cell| *cell).collect();
        median(present).unwrap_or_else(|| {
            if raw.row_count() > 0 {
                log::warn!("feature column {column} has no values; filling with 0");
            }
            0.0
        })
    }
}

/// Median of `values`, averaging the middle pair for even counts.
#[expect(
    clippy::integer_division,
    reason = "the middle index of a sorted list is its length halved"
)]
fn median(mut values: Vec<f64>) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    let middle = values.len() / 2;
    let upper = values.get(middle).copied()?;
    if !values.len().is_multiple_of(2) {
        return Some(upper);
    }
    let lower = values.get(middle.checked_sub(1)?).copied()?;
    Some(lower.midpoint(upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    fn table(columns: &[&str], rows: Vec<Vec<Option<f64>>>) -> FeatureTable<Option<f64>> {
        let names = columns.iter().map(|c| (*c).to_owned()).collect();
        FeatureTable::new(names, rows).expect("valid table")
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec![4.0], Some(4.0))]
    #[case(vec![3.0, 1.0, 2.0], Some(2.0))]
    #[case(vec![4.0, 1.0, 3.0, 2.0], Some(2.5))]
    fn median_handles_odd_and_even_counts(#[case] values: Vec<f64>, #[case] expected: Option<f64>) {
        assert_eq!(median(values), expected);
    }

    #[rstest]
    fn batch_median_depends_only_on_the_batch() {
        let raw = table(
            &["a", "b"],
            vec![vec![Some(1.0), None], vec![None, None], vec![Some(3.0), None]],
        );
        let filled = Imputation::BatchMedian.fill(&raw);
        assert_eq!(*filled.cells(), array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]);
    }

    #[rstest]
    fn training_medians_ignore_the_batch() {
        let medians = BTreeMap::from([("a".to_owned(), 10.0)]);
        let raw = table(&["a", "b"], vec![vec![None, Some(2.0)], vec![Some(1.0), None]]);
        let filled = Imputation::TrainingMedians(medians).fill(&raw);
        // Column b has no training median and falls back to the batch.
        assert_eq!(*filled.cells(), array![[10.0, 2.0], [1.0, 2.0]]);
    }
}
