//! Score destinations for a user and blend competing scores.
//!
//! The [`Scorer`] trait is the seam shared by the transparent heuristic and
//! the learned model. The [`Blend`] trait combines their outputs into the
//! ranking key so the combination rule can change without touching either
//! scorer.

use thiserror::Error;

use crate::{CountryRecord, UserProfile};

/// Errors raised while scoring a batch of destinations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// A fitted transformation received rows of the wrong width.
    #[error("{stage} expects {expected} features per row but received {found}")]
    FeatureWidth {
        /// Stage that rejected the input.
        stage: &'static str,
        /// Width the stage was fitted on.
        expected: usize,
        /// Width actually supplied.
        found: usize,
    },
    /// A scorer returned a different number of scores than destinations.
    #[error("{scorer} returned {found} scores for {expected} destinations")]
    ScoreCount {
        /// Name of the scorer.
        scorer: &'static str,
        /// Number of destinations scored.
        expected: usize,
        /// Number of scores returned.
        found: usize,
    },
}

/// Assign one score per destination for a single user.
///
/// Implementations must return exactly one score per entry of `countries`, in
/// the same order. Scores are unbounded reals; only their relative order for
/// one user matters. Implementations must be `Send + Sync` so loaded scorers
/// can be shared across request handlers.
///
/// # Examples
///
/// ```rust
/// use relocation_core::{CountryRecord, ScoreError, Scorer, UserProfile};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn name(&self) -> &'static str {
///         "unit"
///     }
///
///     fn score_batch(
///         &self,
///         _user: &UserProfile,
///         countries: &[CountryRecord],
///     ) -> Result<Vec<f64>, ScoreError> {
///         Ok(vec![1.0; countries.len()])
///     }
/// }
///
/// let countries = [CountryRecord::new("AE"), CountryRecord::new("KE")];
/// let scores = UnitScorer.score_batch(&UserProfile::new(), &countries);
/// assert_eq!(scores, Ok(vec![1.0, 1.0]));
/// ```
pub trait Scorer: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Return one score per destination.
    ///
    /// # Errors
    /// Returns [`ScoreError`] when fitted artefacts reject the input shape.
    fn score_batch(
        &self,
        user: &UserProfile,
        countries: &[CountryRecord],
    ) -> Result<Vec<f64>, ScoreError>;
}

/// Combine a baseline score and a model score into a ranking key.
pub trait Blend: Send + Sync {
    /// Return the combined score.
    fn blend(&self, baseline: f64, model: f64) -> f64;
}

/// Convex combination `alpha * baseline + (1 - alpha) * model`.
///
/// # Examples
/// ```
/// use relocation_core::{Blend, LinearBlend};
///
/// assert_eq!(LinearBlend::new(1.0).blend(0.4, 0.9), 0.4);
/// assert_eq!(LinearBlend::new(0.0).blend(0.4, 0.9), 0.9);
/// assert_eq!(LinearBlend::new(3.0).alpha(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearBlend {
    alpha: f64,
}

impl LinearBlend {
    /// Weight applied when the caller supplies a non-finite alpha.
    pub const DEFAULT_ALPHA: f64 = 0.5;

    /// Construct a blend, clamping `alpha` into `0.0..=1.0`.
    ///
    /// Non-finite values fall back to [`LinearBlend::DEFAULT_ALPHA`].
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        let clamped = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_ALPHA
        };
        if !(0.0..=1.0).contains(&alpha) {
            log::warn!("blend weight {alpha} is outside 0.0..=1.0; using {clamped}");
        }
        Self { alpha: clamped }
    }

    /// Weight given to the baseline score.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for LinearBlend {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
        }
    }
}

impl Blend for LinearBlend {
    #[expect(
        clippy::float_arithmetic,
        reason = "blending is a weighted sum of two scores"
    )]
    fn blend(&self, baseline: f64, model: f64) -> f64 {
        if self.alpha >= 1.0 {
            return baseline;
        }
        if self.alpha <= 0.0 {
            return model;
        }
        self.alpha * baseline + (1.0 - self.alpha) * model
    }
}
