//! Fixture destinations and stub scorers shared by unit and behaviour tests.

use std::collections::HashMap;

use crate::{CountryCatalog, CountryRecord, Region, ScoreError, Scorer, UserProfile};

/// The United Arab Emirates as used throughout the ranking scenarios.
#[must_use]
pub fn uae() -> CountryRecord {
    country(
        "AE",
        "UAE",
        Region::Gulf,
        [0.8, 0.6, 0.9, 0.5, 0.8],
        Some(600.0),
    )
}

/// A small, varied set of destinations.
///
/// Kenya has no minimum budget and Germany has no diaspora score, so callers
/// exercise missing-value paths without extra setup.
#[must_use]
pub fn sample_countries() -> Vec<CountryRecord> {
    let kenya = country(
        "KE",
        "Kenya",
        Region::EastAfrica,
        [0.5, 0.3, 0.6, 0.8, 0.5],
        None,
    );
    let mut germany = country(
        "DE",
        "Germany",
        Region::Europe,
        [0.9, 0.8, 0.0, 0.3, 0.3],
        Some(1500.0),
    );
    germany.diaspora_presence_score = None;
    vec![
        uae(),
        country(
            "EG",
            "Egypt",
            Region::NorthAfrica,
            [0.6, 0.2, 1.0, 0.9, 0.9],
            Some(300.0),
        ),
        kenya,
        germany,
        country(
            "CA",
            "Canada",
            Region::Canada,
            [0.9, 0.7, 0.3, 0.4, 0.4],
            Some(1800.0),
        ),
        country(
            "MY",
            "Malaysia",
            Region::Asia,
            [0.7, 0.4, 0.2, 0.6, 0.6],
            Some(700.0),
        ),
    ]
}

/// [`sample_countries`] wrapped in a catalogue.
///
/// # Panics
/// Never in practice: the fixture codes are unique.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "fixture codes are unique so construction cannot fail"
)]
pub fn sample_catalog() -> CountryCatalog {
    CountryCatalog::from_records(sample_countries()).expect("fixture codes are unique")
}

/// A user with a budget who prefers the Gulf.
#[must_use]
pub fn gulf_user(budget: f64) -> UserProfile {
    UserProfile::new()
        .with_budget(budget)
        .with_preference(Region::Gulf, true)
}

/// Build a record from `[safety, cost, diaspora, visa, culture]`.
#[must_use]
pub fn country(
    code: &str,
    name: &str,
    region: Region,
    [safety, cost, diaspora, visa, culture]: [f64; 5],
    min_budget: Option<f64>,
) -> CountryRecord {
    CountryRecord {
        country_code: code.to_owned(),
        country_name: Some(name.to_owned()),
        region_group: Some(region),
        safety_index: Some(safety),
        cost_of_living_index: Some(cost),
        diaspora_presence_score: Some(diaspora),
        visa_policy_sudanese_score: Some(visa),
        cultural_compatibility_score: Some(culture),
        min_budget_required: min_budget,
    }
}

/// Stub `Scorer` returning fixed scores keyed by country code.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    scores: HashMap<String, f64>,
    fallback: f64,
}

impl TableScorer {
    /// Score every destination with `fallback` unless overridden.
    #[must_use]
    pub fn new(fallback: f64) -> Self {
        Self {
            scores: HashMap::new(),
            fallback,
        }
    }

    /// Override the score for `code`.
    #[must_use]
    pub fn with_score(mut self, code: &str, score: f64) -> Self {
        self.scores.insert(code.to_owned(), score);
        self
    }
}

impl Scorer for TableScorer {
    fn name(&self) -> &'static str {
        "table"
    }

    fn score_batch(
        &self,
        _user: &UserProfile,
        countries: &[CountryRecord],
    ) -> Result<Vec<f64>, ScoreError> {
        Ok(countries
            .iter()
            .map(|c| {
                self.scores
                    .get(&c.country_code)
                    .copied()
                    .unwrap_or(self.fallback)
            })
            .collect())
    }
}
