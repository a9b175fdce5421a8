//! Fitted standard scaler: per-column centring and unit scaling.

use std::collections::BTreeMap;
use std::num::FpCategory;

use ndarray::{Array1, Array2};
use relocation_core::{FeatureTable, ScoreError};
use serde::{Deserialize, Serialize};

use crate::{ArtefactError, Normaliser};

const KIND: &str = "scaler";

/// On-disk form of [`StandardScaler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScalerDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) feature_names_in: Option<Vec<String>>,
    pub(crate) mean: Vec<f64>,
    pub(crate) scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) medians: BTreeMap<String, f64>,
}

/// Standardise features with means and scales fitted at training time.
///
/// When the scaler knows the column names it was fitted on, callers align
/// their tables to [`StandardScaler::feature_names`] before transforming.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use relocation_core::FeatureTable;
/// use relocation_scorer::{Normaliser, StandardScaler};
///
/// let scaler = StandardScaler::new(None, vec![10.0], vec![2.0]).unwrap();
/// let table = FeatureTable::new(vec!["x".to_owned()], vec![vec![14.0]]).unwrap();
/// assert_eq!(scaler.transform(&table).unwrap(), array![[2.0]]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    feature_names: Option<Vec<String>>,
    mean: Array1<f64>,
    scale: Array1<f64>,
    medians: BTreeMap<String, f64>,
}

impl StandardScaler {
    /// Validate and construct a scaler.
    ///
    /// Zero scales are treated as `1.0`, leaving constant columns centred but
    /// otherwise untouched.
    ///
    /// # Errors
    /// Returns [`ArtefactError::Invalid`] when the vectors are empty, differ
    /// in length, or hold non-finite values.
    pub fn new(
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, ArtefactError> {
        if mean.is_empty() {
            return Err(invalid("mean is empty"));
        }
        if scale.len() != mean.len() {
            return Err(invalid(format!(
                "scale has {} entries but mean has {}",
                scale.len(),
                mean.len()
            )));
        }
        if let Some(names) = &feature_names
            && names.len() != mean.len()
        {
            return Err(invalid(format!(
                "feature_names_in has {} entries but mean has {}",
                names.len(),
                mean.len()
            )));
        }
        if mean.iter().chain(&scale).any(|value| !value.is_finite()) {
            return Err(invalid("mean and scale must be finite"));
        }
        let unit_safe_scale = Array1::from(scale).mapv_into(|value| {
            if value.classify() == FpCategory::Zero {
                1.0
            } else {
                value
            }
        });
        Ok(Self {
            feature_names,
            mean: Array1::from(mean),
            scale: unit_safe_scale,
            medians: BTreeMap::new(),
        })
    }

    /// Attach training-time medians keyed by column name.
    ///
    /// Non-finite medians are discarded.
    #[must_use]
    pub fn with_medians(mut self, medians: BTreeMap<String, f64>) -> Self {
        self.medians = medians
            .into_iter()
            .filter(|(_, value)| value.is_finite())
            .collect();
        self
    }

    /// Per-column medians recorded at training time, if the artefact has them.
    #[must_use]
    pub const fn medians(&self) -> &BTreeMap<String, f64> {
        &self.medians
    }

    pub(crate) fn from_document(document: ScalerDocument) -> Result<Self, ArtefactError> {
        let ScalerDocument {
            feature_names_in,
            mean,
            scale,
            medians,
        } = document;
        Ok(Self::new(feature_names_in, mean, scale)?.with_medians(medians))
    }
}

impl Normaliser for StandardScaler {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, table: &FeatureTable<f64>) -> Result<Array2<f64>, ScoreError> {
        if table.column_count() != self.width() {
            return Err(ScoreError::FeatureWidth {
                stage: KIND,
                expected: self.width(),
                found: table.column_count(),
            });
        }
        // Mean and scale broadcast across every row.
        Ok((table.cells() - &self.mean) / &self.scale)
    }
}

fn invalid(reason: impl Into<String>) -> ArtefactError {
    ArtefactError::Invalid {
        kind: KIND,
        reason: reason.into(),
    }
}
