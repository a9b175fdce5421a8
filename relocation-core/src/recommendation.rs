//! Ranked output records.

use serde::{Deserialize, Serialize};

use crate::CountryRecord;

/// Which country field identifies a destination in ranked output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdColumn {
    /// Use `country_code`.
    #[default]
    CountryCode,
    /// Use `country_name`, falling back to the code.
    CountryName,
}

impl IdColumn {
    /// Return the dataset column this variant reads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CountryCode => crate::COUNTRY_ID_COLUMN,
            Self::CountryName => crate::COUNTRY_NAME_COLUMN,
        }
    }

    /// Extract the identifier from `country`.
    #[must_use]
    pub fn identify(self, country: &CountryRecord) -> String {
        match self {
            Self::CountryCode => country.country_code.clone(),
            Self::CountryName => country.display_name().to_owned(),
        }
    }
}

/// One ranked destination for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Destination identifier, chosen by [`IdColumn`].
    pub country_code: String,
    /// Display name.
    pub country_name: String,
    /// Blended ranking key.
    pub final_score: f64,
    /// Regression model prediction.
    pub model_score: f64,
    /// Heuristic score.
    pub baseline_score: f64,
    /// Human-readable reasons for the recommendation.
    pub explanation: String,
}
