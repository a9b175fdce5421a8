//! Transparent heuristic scoring from a fixed weighted formula.

use relocation_core::{CountryRecord, ScoreError, Scorer, UserProfile};

/// Weights applied by [`HeuristicScorer`].
///
/// Cost of living carries a negative weight so that cheaper destinations
/// score higher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineWeights {
    /// Multiplier for `safety_index`.
    pub safety: f64,
    /// Multiplier for `cost_of_living_index`.
    pub cost_of_living: f64,
    /// Multiplier for `diaspora_presence_score`.
    pub diaspora: f64,
    /// Multiplier for `cultural_compatibility_score`.
    pub cultural: f64,
    /// Multiplier for `visa_policy_sudanese_score`.
    pub visa: f64,
    /// Bonus when the budget covers the minimum, penalty when it does not.
    pub budget: f64,
}

impl Default for BaselineWeights {
    fn default() -> Self {
        Self {
            safety: 0.30,
            cost_of_living: -0.10,
            diaspora: 0.20,
            cultural: 0.10,
            visa: 0.10,
            budget: 0.15,
        }
    }
}

/// Scores destinations with [`BaselineWeights`].
///
/// Absent attributes contribute nothing. The budget term applies only when
/// both the user's budget and the destination's minimum are known. Scores are
/// not clamped.
///
/// # Examples
/// ```
/// use relocation_core::{CountryRecord, Region, UserProfile};
/// use relocation_scorer::HeuristicScorer;
///
/// let mut country = CountryRecord::new("AE");
/// country.safety_index = Some(1.0);
/// country.min_budget_required = Some(600.0);
/// let user = UserProfile::new().with_budget(800.0);
/// let score = HeuristicScorer::default().score(&user, &country);
/// assert!((score - 0.45).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicScorer {
    weights: BaselineWeights,
}

impl HeuristicScorer {
    /// Build a scorer with custom weights.
    #[must_use]
    pub const fn new(weights: BaselineWeights) -> Self {
        Self { weights }
    }

    /// Score one destination for one user.
    #[must_use]
    pub fn score(&self, user: &UserProfile, country: &CountryRecord) -> f64 {
        let weights = self.weights;
        let terms = [
            (weights.safety, country.safety_index),
            (weights.cost_of_living, country.cost_of_living_index),
            (weights.diaspora, country.diaspora_presence_score),
            (weights.cultural, country.cultural_compatibility_score),
            (weights.visa, country.visa_policy_sudanese_score),
            (1.0, self.budget_term(user, country)),
        ];
        weighted_sum(&terms)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "an unmet budget negates the bonus"
    )]
    fn budget_term(&self, user: &UserProfile, country: &CountryRecord) -> Option<f64> {
        let budget = user.budget_estimated_usd?;
        let minimum = country.min_budget_required?;
        Some(if budget >= minimum {
            self.weights.budget
        } else {
            -self.weights.budget
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the baseline is a weighted linear sum"
)]
fn weighted_sum(terms: &[(f64, Option<f64>)]) -> f64 {
    terms
        .iter()
        .filter_map(|(weight, value)| value.map(|present| weight * present))
        .sum()
}

impl Scorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn score_batch(
        &self,
        user: &UserProfile,
        countries: &[CountryRecord],
    ) -> Result<Vec<f64>, ScoreError> {
        Ok(countries
            .iter()
            .map(|country| self.score(user, country))
            .collect())
    }
}
