//! Feature schemas and the rectangular tables fed to fitted models.
//!
//! A [`FeatureSchema`] is an ordered list of column names. A
//! [`FeatureTable`] pairs such a list with an [`Array2`] of cells whose
//! column count always matches the list.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{COUNTRY_FEATURE_COLUMNS, USER_FEATURE_COLUMNS};

/// Ordered list of feature column names.
///
/// # Examples
/// ```
/// use relocation_core::FeatureSchema;
///
/// let available = vec!["b".to_owned(), "a".to_owned()];
/// let schema = FeatureSchema::resolve(["a", "b", "c"], &available);
/// assert_eq!(schema.columns(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from column names in order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Keep the candidates that `available` actually carries, preserving
    /// candidate order.
    ///
    /// Columns missing from the source are silently dropped; inspect the
    /// result to see which columns survived.
    pub fn resolve<I, S>(candidates: I, available: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = candidates
            .into_iter()
            .filter(|candidate| available.iter().any(|column| column == candidate.as_ref()))
            .map(|candidate| candidate.as_ref().to_owned())
            .collect();
        Self { columns }
    }

    /// The full set of user columns the model was trained with.
    #[must_use]
    pub fn user_features() -> Self {
        Self::new(USER_FEATURE_COLUMNS)
    }

    /// The full set of country columns, including the id column.
    #[must_use]
    pub fn country_features() -> Self {
        Self::new(COUNTRY_FEATURE_COLUMNS)
    }

    /// Return a copy without `column`.
    #[must_use]
    pub fn excluding(&self, column: &str) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|name| name.as_str() != column)
                .cloned()
                .collect(),
        }
    }

    /// Concatenate two schemas, `self` first.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            columns: self.columns.iter().chain(&other.columns).cloned().collect(),
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Report whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl std::fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        f.write_str(&self.columns.join(", "))?;
        f.write_str("]")
    }
}

/// Errors raised while assembling a [`FeatureTable`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureTableError {
    /// A row did not match the number of columns.
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    RowWidth {
        /// Index of the offending row.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
    /// The cells could not be laid out as a matrix.
    #[error("cannot lay out {rows} rows of {columns} columns")]
    Shape {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        columns: usize,
    },
}

/// Rectangular table of feature cells, one row per destination.
///
/// `FeatureTable<Option<f64>>` holds raw values with gaps;
/// `FeatureTable<f64>` holds fully resolved values ready for a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable<T> {
    columns: Vec<String>,
    cells: Array2<T>,
}

impl<T> FeatureTable<T> {
    /// Construct a table, checking every row against the column count.
    ///
    /// # Errors
    /// Returns [`FeatureTableError::RowWidth`] for the first row whose width
    /// differs from `columns.len()`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<T>>) -> Result<Self, FeatureTableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(FeatureTableError::RowWidth {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        let (row_count, width) = (rows.len(), columns.len());
        let cells = Array2::from_shape_vec((row_count, width), rows.into_iter().flatten().collect())
            .map_err(|_| FeatureTableError::Shape {
                rows: row_count,
                columns: width,
            })?;
        Ok(Self { columns, cells })
    }

    /// Build a table cell by cell from `(row, column)` positions.
    #[must_use]
    pub fn from_fn<F>(columns: Vec<String>, row_count: usize, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let cells = Array2::from_shape_fn((row_count, columns.len()), |(row, column)| {
            cell(row, column)
        });
        Self { columns, cells }
    }

    /// Transform every cell, keeping columns and shape.
    ///
    /// The closure receives the column index alongside the cell.
    #[must_use]
    pub fn map_cells<U, F>(&self, mut f: F) -> FeatureTable<U>
    where
        F: FnMut(usize, &T) -> U,
    {
        FeatureTable {
            columns: self.columns.clone(),
            cells: Zip::indexed(&self.cells).map_collect(|(_, column), cell| f(column, cell)),
        }
    }

    /// Return a table with exactly `columns`, in that order.
    ///
    /// Cells of columns absent from `self` take `fill`; columns of `self` not
    /// listed are dropped. `self` is left untouched.
    ///
    /// # Examples
    /// ```
    /// use ndarray::array;
    /// use relocation_core::FeatureTable;
    ///
    /// let table = FeatureTable::new(vec!["b".to_owned()], vec![vec![7.0]]).unwrap();
    /// let target = ["a", "b", "c"].map(str::to_owned);
    /// let aligned = table.reindex(&target, 0.0);
    /// assert_eq!(aligned.columns(), ["a", "b", "c"]);
    /// assert_eq!(*aligned.cells(), array![[0.0, 7.0, 0.0]]);
    /// ```
    #[must_use]
    pub fn reindex(&self, columns: &[String], fill: T) -> Self
    where
        T: Clone,
    {
        let sources: Vec<Option<usize>> = columns
            .iter()
            .map(|column| self.column_index(column))
            .collect();
        let cells = Array2::from_shape_fn((self.row_count(), columns.len()), |(row, column)| {
            sources
                .get(column)
                .copied()
                .flatten()
                .and_then(|source| self.cells.get((row, source)))
                .cloned()
                .unwrap_or_else(|| fill.clone())
        });
        Self {
            columns: columns.to_vec(),
            cells,
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cells as a matrix of rows by columns.
    #[must_use]
    pub const fn cells(&self) -> &Array2<T> {
        &self.cells
    }

    /// Position of `column`, if present.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Cells of the column at `index`, one per row.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &T> + '_ {
        self.cells.columns().into_iter().nth(index).into_iter().flatten()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    fn resolve_drops_absent_columns_and_keeps_candidate_order() {
        let available: Vec<String> = ["min_budget_required", "country_code", "safety_index"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        let schema = FeatureSchema::resolve(COUNTRY_FEATURE_COLUMNS, &available);
        assert_eq!(
            schema.columns(),
            ["country_code", "safety_index", "min_budget_required"]
        );
        assert_eq!(
            schema.excluding("country_code").columns(),
            ["safety_index", "min_budget_required"]
        );
    }

    #[rstest]
    fn concat_places_self_first() {
        let left = FeatureSchema::new(["a"]);
        let right = FeatureSchema::new(["b", "c"]);
        assert_eq!(left.concat(&right).to_string(), "[a, b, c]");
    }

    #[rstest]
    fn table_rejects_ragged_rows() {
        let result = FeatureTable::new(
            vec!["a".to_owned(), "b".to_owned()],
            vec![vec![1.0, 2.0], vec![3.0]],
        );
        assert_eq!(
            result,
            Err(FeatureTableError::RowWidth {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[rstest]
    fn column_cells_follow_rows() {
        let table = FeatureTable::new(
            vec!["a".to_owned(), "b".to_owned()],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .expect("valid table");
        let index = table.column_index("b").expect("column b");
        let cells: Vec<f64> = table.column_cells(index).copied().collect();
        assert_eq!(cells, [2.0, 4.0]);
        assert_eq!(table.column_cells(5).count(), 0);
    }

    #[rstest]
    fn rows_lay_out_as_a_matrix() {
        let table = FeatureTable::new(
            vec!["a".to_owned(), "b".to_owned()],
            vec![vec![1, 2], vec![3, 4], vec![5, 6]],
        )
        .expect("valid table");
        assert_eq!(table.cells().dim(), (3, 2));
        assert_eq!(*table.cells(), array![[1, 2], [3, 4], [5, 6]]);
        let tagged = table.map_cells(|column, cell| cell * 10 + i32::try_from(column).unwrap_or(0));
        assert_eq!(*tagged.cells(), array![[10, 21], [30, 41], [50, 61]]);
    }

    #[rstest]
    fn empty_tables_keep_their_columns() {
        let table: FeatureTable<f64> =
            FeatureTable::new(vec!["a".to_owned()], Vec::new()).expect("valid table");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.cells().dim(), (0, 1));
    }
}
