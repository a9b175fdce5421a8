//! Orchestrate scoring, blending, ordering and explanation for one user.

use std::num::FpCategory;

use relocation_core::{
    Blend, CountryCatalog, CountryRecord, IdColumn, LinearBlend, RecommendationResult, ScoreError,
    Scorer, UserProfile,
};

use crate::{Explainer, HeuristicScorer, ModelScorer};

/// Caller-controlled ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    /// Maximum number of results; `0` is treated as `1`.
    pub top_k: usize,
    /// Weight of the baseline score in the blend; clamped into `0.0..=1.0`.
    pub alpha: f64,
    /// Field used to identify destinations in the output.
    pub id_column: IdColumn,
}

impl RankOptions {
    /// Number of results returned when the caller does not choose.
    pub const DEFAULT_TOP_K: usize = 5;

    fn effective_top_k(&self) -> usize {
        if self.top_k == 0 {
            log::warn!("top_k of 0 requested; returning a single result");
            1
        } else {
            self.top_k
        }
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: Self::DEFAULT_TOP_K,
            alpha: LinearBlend::DEFAULT_ALPHA,
            id_column: IdColumn::default(),
        }
    }
}

struct Scored {
    index: usize,
    baseline: f64,
    model: f64,
    blended: f64,
}

/// Ranks destinations for one user by blending a baseline and a model scorer.
///
/// # Examples
/// ```
/// use relocation_core::test_support::{TableScorer, gulf_user, sample_catalog};
/// use relocation_scorer::{HeuristicScorer, RankOptions, Ranker};
///
/// let ranker = Ranker::new(HeuristicScorer::default(), TableScorer::new(0.0));
/// let options = RankOptions { top_k: 2, alpha: 1.0, ..RankOptions::default() };
/// let results = ranker.rank(&gulf_user(800.0), &sample_catalog(), &options).unwrap();
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].final_score, results[0].baseline_score);
/// ```
#[derive(Debug, Clone)]
pub struct Ranker<B = HeuristicScorer, M = ModelScorer> {
    baseline: B,
    model: M,
    explainer: Explainer,
}

impl<B: Scorer, M: Scorer> Ranker<B, M> {
    /// Combine a baseline scorer with a model scorer.
    #[must_use]
    pub fn new(baseline: B, model: M) -> Self {
        Self {
            baseline,
            model,
            explainer: Explainer::default(),
        }
    }

    /// Replace the explanation rules.
    #[must_use]
    pub fn with_explainer(mut self, explainer: Explainer) -> Self {
        self.explainer = explainer;
        self
    }

    /// Rank every destination in `catalog` for `user`.
    ///
    /// Results are ordered by `final_score` descending, ties keeping catalogue
    /// order, and truncated to `options.top_k`.
    ///
    /// # Errors
    /// Returns [`ScoreError`] when the model rejects the feature shape or a
    /// scorer returns the wrong number of scores.
    pub fn rank(
        &self,
        user: &UserProfile,
        catalog: &CountryCatalog,
        options: &RankOptions,
    ) -> Result<Vec<RecommendationResult>, ScoreError> {
        let blend = LinearBlend::new(options.alpha);
        self.rank_with(user, catalog.countries(), options, &blend)
    }

    /// Rank `countries` using a caller-supplied blend.
    ///
    /// `options.alpha` is ignored; the blend decides how scores combine.
    ///
    /// # Errors
    /// See [`Ranker::rank`].
    pub fn rank_with(
        &self,
        user: &UserProfile,
        countries: &[CountryRecord],
        options: &RankOptions,
        blend: &dyn Blend,
    ) -> Result<Vec<RecommendationResult>, ScoreError> {
        let top_k = options.effective_top_k();
        let model_scores = score_checked(&self.model, user, countries)?;
        let baseline_scores = score_checked(&self.baseline, user, countries)?;

        let mut scored: Vec<Scored> = baseline_scores
            .into_iter()
            .zip(model_scores)
            .enumerate()
            .map(|(index, (baseline, model))| Scored {
                index,
                baseline,
                model,
                blended: blend.blend(baseline, model),
            })
            .collect();
        scored.sort_by(|left, right| sort_key(right.blended).total_cmp(&sort_key(left.blended)));
        scored.truncate(top_k);
        log::debug!(
            "ranked {} destinations, returning {}",
            countries.len(),
            scored.len()
        );

        Ok(scored
            .into_iter()
            .filter_map(|entry| {
                let country = countries.get(entry.index)?;
                Some(RecommendationResult {
                    country_code: options.id_column.identify(country),
                    country_name: country.display_name().to_owned(),
                    final_score: entry.blended,
                    model_score: entry.model,
                    baseline_score: entry.baseline,
                    explanation: self.explainer.explain(user, country),
                })
            })
            .collect())
    }
}

fn score_checked(
    scorer: &dyn Scorer,
    user: &UserProfile,
    countries: &[CountryRecord],
) -> Result<Vec<f64>, ScoreError> {
    let scores = scorer.score_batch(user, countries)?;
    if scores.len() != countries.len() {
        return Err(ScoreError::ScoreCount {
            scorer: scorer.name(),
            expected: countries.len(),
            found: scores.len(),
        });
    }
    Ok(scores)
}

/// NaN sorts last rather than first, and both zeros tie.
const fn sort_key(score: f64) -> f64 {
    match score.classify() {
        FpCategory::Nan => f64::NEG_INFINITY,
        FpCategory::Zero => 0.0,
        _ => score,
    }
}
