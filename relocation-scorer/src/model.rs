//! Learned scoring through a fitted normaliser and regressor.
//!
//! [`ModelScorer`] turns one user and a batch of destinations into a feature
//! table (user columns followed by country columns), fills gaps, aligns the
//! table to the normaliser's schema and returns one prediction per
//! destination.

use ndarray::{Array1, Array2, ArrayView2};
use relocation_core::{
    COUNTRY_FEATURE_COLUMNS, COUNTRY_ID_COLUMN, CountryRecord, FeatureSchema, FeatureTable,
    ScoreError, Scorer, USER_FEATURE_COLUMNS, UserProfile,
};

use crate::{ArtefactError, Imputation, MlpRegressor, ModelArtefacts, StandardScaler, align_features};

/// Fitted transformation applied to aligned feature tables.
pub trait Normaliser: Send + Sync {
    /// Ordered column names the normaliser was fitted on, if recorded.
    fn feature_names(&self) -> Option<&[String]>;

    /// Number of features per row the normaliser consumes and produces.
    fn width(&self) -> usize;

    /// Transform every row of `table` into a matrix of the same shape.
    ///
    /// # Errors
    /// Returns [`ScoreError::FeatureWidth`] when `table` has the wrong number
    /// of columns.
    fn transform(&self, table: &FeatureTable<f64>) -> Result<Array2<f64>, ScoreError>;
}

/// Fitted regressor producing one value per normalised row.
pub trait Regressor: Send + Sync {
    /// Number of features per row the regressor consumes.
    fn input_width(&self) -> usize;

    /// Predict one value per row.
    ///
    /// # Errors
    /// Returns [`ScoreError::FeatureWidth`] when the rows have the wrong width.
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ScoreError>;
}

/// Resolve the user and country schemas against the columns two sources
/// actually carry.
///
/// The country schema never includes the id column. Both schemas are logged
/// so drift between training and serving data is visible.
#[must_use]
pub fn resolve_feature_schemas(
    user_columns: &[String],
    country_columns: &[String],
) -> (FeatureSchema, FeatureSchema) {
    let user = FeatureSchema::resolve(USER_FEATURE_COLUMNS, user_columns);
    let country =
        FeatureSchema::resolve(COUNTRY_FEATURE_COLUMNS, country_columns).excluding(COUNTRY_ID_COLUMN);
    log::debug!("resolved user feature schema {user}");
    log::debug!("resolved country feature schema {country}");
    (user, country)
}

enum CellSource<'a> {
    User(Option<f64>),
    Country(&'a str),
}

/// Scores destinations with a fitted normaliser and regressor.
#[derive(Debug, Clone)]
pub struct ModelScorer<N = StandardScaler, R = MlpRegressor> {
    normaliser: N,
    regressor: R,
    user_schema: FeatureSchema,
    country_schema: FeatureSchema,
    imputation: Imputation,
}

impl ModelScorer {
    /// Build a scorer from loaded artefacts.
    #[must_use]
    pub fn from_artefacts(
        artefacts: ModelArtefacts,
        user_schema: FeatureSchema,
        country_schema: &FeatureSchema,
    ) -> Self {
        let (normaliser, regressor) = artefacts.into_parts();
        Self::assemble(normaliser, regressor, user_schema, country_schema)
    }

    /// Impute with the medians stored alongside the scaler.
    ///
    /// Columns the scaler recorded no median for still use the batch median.
    #[must_use]
    pub fn with_training_medians(self) -> Self {
        let medians = self.normaliser.medians().clone();
        self.with_imputation(Imputation::TrainingMedians(medians))
    }
}

impl<N: Normaliser, R: Regressor> ModelScorer<N, R> {
    /// Pair a normaliser with a regressor.
    ///
    /// The id column is removed from `country_schema`. Imputation defaults to
    /// [`Imputation::BatchMedian`].
    ///
    /// # Errors
    /// Returns [`ArtefactError::WidthMismatch`] when the normaliser's output
    /// width differs from the regressor's input width.
    pub fn new(
        normaliser: N,
        regressor: R,
        user_schema: FeatureSchema,
        country_schema: &FeatureSchema,
    ) -> Result<Self, ArtefactError> {
        if normaliser.width() != regressor.input_width() {
            return Err(ArtefactError::WidthMismatch {
                scaler: normaliser.width(),
                model: regressor.input_width(),
            });
        }
        Ok(Self::assemble(normaliser, regressor, user_schema, country_schema))
    }

    fn assemble(
        normaliser: N,
        regressor: R,
        user_schema: FeatureSchema,
        country_schema: &FeatureSchema,
    ) -> Self {
        Self {
            normaliser,
            regressor,
            user_schema,
            country_schema: country_schema.excluding(COUNTRY_ID_COLUMN),
            imputation: Imputation::default(),
        }
    }

    /// Replace the imputation strategy.
    #[must_use]
    pub fn with_imputation(mut self, imputation: Imputation) -> Self {
        self.imputation = imputation;
        self
    }

    /// User columns read for each prediction.
    #[must_use]
    pub const fn user_schema(&self) -> &FeatureSchema {
        &self.user_schema
    }

    /// Country columns read for each prediction.
    #[must_use]
    pub const fn country_schema(&self) -> &FeatureSchema {
        &self.country_schema
    }

    /// Active imputation strategy.
    #[must_use]
    pub const fn imputation(&self) -> &Imputation {
        &self.imputation
    }

    /// Fitted normaliser.
    #[must_use]
    pub const fn normaliser(&self) -> &N {
        &self.normaliser
    }

    /// Build the raw table for one user against `countries`.
    ///
    /// Each row holds the user's values followed by that destination's values;
    /// missing values stay `None`.
    #[must_use]
    pub fn feature_table(
        &self,
        user: &UserProfile,
        countries: &[CountryRecord],
    ) -> FeatureTable<Option<f64>> {
        let sources: Vec<CellSource<'_>> = self
            .user_schema
            .columns()
            .iter()
            .map(|column| CellSource::User(user.feature(column)))
            .chain(
                self.country_schema
                    .columns()
                    .iter()
                    .map(|column| CellSource::Country(column.as_str())),
            )
            .collect();
        let columns = self.user_schema.concat(&self.country_schema).columns().to_vec();
        FeatureTable::from_fn(columns, countries.len(), |row, column| {
            match sources.get(column) {
                Some(CellSource::User(value)) => *value,
                Some(CellSource::Country(name)) => {
                    countries.get(row).and_then(|country| country.attribute(name))
                }
                None => None,
            }
        })
    }

    /// Normalise an aligned table and predict one score per row.
    ///
    /// # Errors
    /// Returns [`ScoreError::FeatureWidth`] when the table does not match the
    /// fitted width.
    pub fn predict(&self, aligned: &FeatureTable<f64>) -> Result<Vec<f64>, ScoreError> {
        let normalised = self.normaliser.transform(aligned)?;
        Ok(self.regressor.predict(normalised.view())?.to_vec())
    }
}

impl<N: Normaliser, R: Regressor> Scorer for ModelScorer<N, R> {
    fn name(&self) -> &'static str {
        "model"
    }

    fn score_batch(
        &self,
        user: &UserProfile,
        countries: &[CountryRecord],
    ) -> Result<Vec<f64>, ScoreError> {
        log::debug!("model scoring {} destinations", countries.len());
        let raw = self.feature_table(user, countries);
        let filled = self.imputation.fill(&raw);
        let aligned = align_features(&filled, self.normaliser.feature_names());
        self.predict(&aligned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::{Activation, DenseLayer};
    use ndarray::array;
    use relocation_core::test_support::{gulf_user, uae};
    use rstest::{fixture, rstest};

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| (*c).to_owned()).collect()
    }

    /// Scaler over `[budget_estimated_usd, safety_index]` and a model summing
    /// its inputs.
    fn summing_artefacts(medians: BTreeMap<String, f64>) -> ModelArtefacts {
        let scaler = StandardScaler::new(
            Some(names(&["budget_estimated_usd", "safety_index"])),
            vec![500.0, 0.0],
            vec![100.0, 1.0],
        )
        .expect("valid scaler")
        .with_medians(medians);
        let model = MlpRegressor::new(
            Activation::Identity,
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                biases: vec![0.0],
            }],
        )
        .expect("valid model");
        ModelArtefacts::new(scaler, model).expect("consistent artefacts")
    }

    fn scorer_from(artefacts: ModelArtefacts) -> ModelScorer {
        ModelScorer::from_artefacts(
            artefacts,
            FeatureSchema::new(["budget_estimated_usd", "pref_gulf"]),
            &FeatureSchema::new(["country_code", "safety_index", "cost_of_living_index"]),
        )
    }

    #[fixture]
    fn scorer() -> ModelScorer {
        scorer_from(summing_artefacts(BTreeMap::new()))
    }

    fn with_safety(code: &str, safety: Option<f64>) -> CountryRecord {
        let mut record = CountryRecord::new(code);
        record.safety_index = safety;
        record
    }

    fn score_of(scores: &[f64], index: usize) -> f64 {
        scores.get(index).copied().expect("score for every destination")
    }

    #[rstest]
    fn feature_table_concatenates_user_and_country_columns(scorer: ModelScorer) {
        let table = scorer.feature_table(&gulf_user(800.0), &[uae()]);
        assert_eq!(
            table.columns(),
            [
                "budget_estimated_usd",
                "pref_gulf",
                "safety_index",
                "cost_of_living_index"
            ]
        );
        assert_eq!(
            *table.cells(),
            array![[Some(800.0), Some(1.0), Some(0.8), Some(0.6)]]
        );
    }

    #[rstest]
    fn score_batch_aligns_normalises_and_predicts(scorer: ModelScorer) {
        let scores = scorer
            .score_batch(&gulf_user(700.0), &[uae()])
            .expect("scores");
        // (700 - 500) / 100 + 0.8
        assert_eq!(scores.len(), 1);
        assert!(scores.first().is_some_and(|s| (s - 2.8).abs() < 1e-12));
    }

    #[rstest]
    fn missing_user_budget_takes_the_batch_median(scorer: ModelScorer) {
        let scores = scorer
            .score_batch(&UserProfile::new(), &[uae()])
            .expect("scores");
        // The budget column is empty in every row so it is filled with zero.
        assert!(scores.first().is_some_and(|s| (s - (-5.0 + 0.8)).abs() < 1e-12));
    }

    #[rstest]
    fn missing_country_values_score_as_the_batch_median(scorer: ModelScorer) {
        let user = gulf_user(700.0);
        let batch = [
            with_safety("AA", Some(0.4)),
            with_safety("BB", None),
            with_safety("CC", Some(0.8)),
        ];

        let scores = scorer.score_batch(&user, &batch).expect("scores");
        let explicit = scorer
            .score_batch(&user, &[with_safety("BB", Some(0.6))])
            .expect("scores");

        assert_eq!(scores.len(), batch.len());
        // (700 - 500) / 100 + median(0.4, 0.8)
        assert!((score_of(&scores, 1) - 2.6).abs() < 1e-12);
        assert!((score_of(&scores, 1) - score_of(&explicit, 0)).abs() < 1e-12);
    }

    #[rstest]
    fn training_medians_make_scores_independent_of_the_batch() {
        let medians = BTreeMap::from([("safety_index".to_owned(), 0.3)]);
        let scorer = scorer_from(summing_artefacts(medians)).with_training_medians();
        let user = gulf_user(700.0);

        let small = scorer
            .score_batch(&user, &[with_safety("AA", Some(0.4)), with_safety("BB", None)])
            .expect("scores");
        let large = scorer
            .score_batch(
                &user,
                &[
                    with_safety("CC", Some(0.9)),
                    with_safety("DD", Some(0.95)),
                    with_safety("BB", None),
                ],
            )
            .expect("scores");

        assert!((score_of(&small, 1) - 2.3).abs() < 1e-12);
        assert!((score_of(&large, 2) - score_of(&small, 1)).abs() < 1e-12);
        assert_eq!(
            scorer.imputation(),
            &Imputation::TrainingMedians(BTreeMap::from([("safety_index".to_owned(), 0.3)]))
        );
    }

    #[rstest]
    fn batch_medians_shift_with_the_other_destinations(scorer: ModelScorer) {
        let user = gulf_user(700.0);
        let low = scorer
            .score_batch(&user, &[with_safety("AA", Some(0.2)), with_safety("BB", None)])
            .expect("scores");
        let high = scorer
            .score_batch(&user, &[with_safety("CC", Some(0.9)), with_safety("BB", None)])
            .expect("scores");
        assert!((score_of(&high, 1) - score_of(&low, 1) - 0.7).abs() < 1e-12);
    }

    #[rstest]
    fn empty_batches_yield_no_scores(scorer: ModelScorer) {
        let scores = scorer
            .score_batch(&gulf_user(700.0), &[])
            .expect("scores");
        assert!(scores.is_empty());
    }

    #[rstest]
    fn new_rejects_mismatched_widths() {
        let scaler = StandardScaler::new(None, vec![0.0], vec![1.0]).expect("valid scaler");
        let model = MlpRegressor::new(
            Activation::Relu,
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                biases: vec![0.0],
            }],
        )
        .expect("valid model");
        let err = ModelScorer::new(
            scaler,
            model,
            FeatureSchema::default(),
            &FeatureSchema::default(),
        )
        .expect_err("width mismatch");
        assert!(matches!(
            err,
            ArtefactError::WidthMismatch { scaler: 1, model: 2 }
        ));
    }

    #[rstest]
    fn unnamed_scalers_report_width_mismatches_as_score_errors() {
        let scaler = StandardScaler::new(None, vec![0.0], vec![1.0]).expect("valid scaler");
        let model = MlpRegressor::new(
            Activation::Relu,
            vec![DenseLayer {
                weights: vec![vec![1.0]],
                biases: vec![0.0],
            }],
        )
        .expect("valid model");
        let scorer = ModelScorer::new(
            scaler,
            model,
            FeatureSchema::new(["budget_estimated_usd"]),
            &FeatureSchema::new(["safety_index"]),
        )
        .expect("consistent artefacts");
        let err = scorer
            .score_batch(&gulf_user(700.0), &[uae()])
            .expect_err("two columns against a one-column scaler");
        assert_eq!(
            err,
            ScoreError::FeatureWidth {
                stage: "scaler",
                expected: 1,
                found: 2
            }
        );
    }

    #[rstest]
    fn resolved_country_schema_drops_the_id_column() {
        let (user, country) = resolve_feature_schemas(
            &names(&["pref_gulf", "cluster", "age_group_ord"]),
            &names(&["country_code", "min_budget_required", "safety_index"]),
        );
        assert_eq!(user.columns(), ["age_group_ord", "pref_gulf"]);
        assert_eq!(country.columns(), ["safety_index", "min_budget_required"]);
    }
}
