//! User profiles: demographics, budget, intent flags and region preferences.
//!
//! Every numeric attribute is optional so that partially filled survey rows
//! flow through scoring without special casing. Columns are addressed by the
//! names used in the user dataset; see [`USER_FEATURE_COLUMNS`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Region;

/// Candidate user columns consumed by the regression model, in model order.
pub const USER_FEATURE_COLUMNS: [&str; 15] = [
    "age_group_ord",
    "dependents_estimated",
    "experience_years_est",
    "budget_estimated_usd",
    "remote_capable",
    "actively_seeking",
    "pref_gulf",
    "pref_east_africa",
    "pref_north_africa",
    "pref_europe",
    "pref_uk_ireland",
    "pref_canada",
    "pref_usa",
    "pref_asia",
    "pref_anywhere",
];

/// Column holding the free-text cultural preference.
pub const CULTURAL_PREFERENCE_COLUMN: &str = "cultural_preference";

/// Column holding the English-speaking flag.
pub const LANG_ENGLISH_COLUMN: &str = "lang_english";

/// Attributes describing one person considering relocation.
///
/// # Examples
/// ```
/// use relocation_core::{Region, UserProfile};
///
/// let user = UserProfile::new()
///     .with_budget(800.0)
///     .with_preference(Region::Gulf, true);
/// assert_eq!(user.feature("budget_estimated_usd"), Some(800.0));
/// assert_eq!(user.feature("pref_gulf"), Some(1.0));
/// assert_eq!(user.feature("pref_europe"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Ordinal age bracket (`0` for 18-24 up to `4` for 55+).
    pub age_group_ord: Option<f64>,
    /// Estimated number of dependents.
    pub dependents_estimated: Option<f64>,
    /// Estimated years of professional experience.
    pub experience_years_est: Option<f64>,
    /// Estimated monthly living budget in USD.
    pub budget_estimated_usd: Option<f64>,
    /// Whether the person can work remotely.
    pub remote_capable: Option<bool>,
    /// Whether the person is actively looking to relocate.
    pub actively_seeking: Option<bool>,
    /// Explicit region preference flags; absent regions are unknown.
    #[serde(default)]
    pub region_preferences: BTreeMap<Region, bool>,
    /// Free-text cultural preference, used only for explanations.
    pub cultural_preference: Option<String>,
    /// Whether the person communicates in English, used only for explanations.
    pub lang_english: Option<bool>,
    /// Further numeric columns carried by the source dataset.
    #[serde(default)]
    pub extra: BTreeMap<String, f64>,
}

impl UserProfile {
    /// Construct a profile with every attribute missing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the monthly budget while returning `self` for chaining.
    #[must_use]
    pub const fn with_budget(mut self, budget: f64) -> Self {
        self.budget_estimated_usd = Some(budget);
        self
    }

    /// Set a region preference flag while returning `self` for chaining.
    #[must_use]
    pub fn with_preference(mut self, region: Region, preferred: bool) -> Self {
        self.region_preferences.insert(region, preferred);
        self
    }

    /// Report whether the user explicitly flagged `region` as preferred.
    #[must_use]
    pub fn prefers(&self, region: Region) -> bool {
        self.region_preferences.get(&region).copied().unwrap_or(false)
    }

    /// Look up a numeric feature by dataset column name.
    ///
    /// Flags are reported as `0.0` or `1.0`. Unknown columns fall back to
    /// [`UserProfile::extra`].
    #[must_use]
    pub fn feature(&self, column: &str) -> Option<f64> {
        match column {
            "age_group_ord" => self.age_group_ord,
            "dependents_estimated" => self.dependents_estimated,
            "experience_years_est" => self.experience_years_est,
            "budget_estimated_usd" => self.budget_estimated_usd,
            "remote_capable" => self.remote_capable.map(flag_value),
            "actively_seeking" => self.actively_seeking.map(flag_value),
            LANG_ENGLISH_COLUMN => self.lang_english.map(flag_value),
            other => Region::from_preference_column(other).map_or_else(
                || self.extra.get(other).copied(),
                |region| self.region_preferences.get(&region).copied().map(flag_value),
            ),
        }
    }

    /// Store a numeric feature by dataset column name.
    ///
    /// Flag columns treat any non-zero value as set. Non-finite values are
    /// recorded as missing.
    pub fn set_feature(&mut self, column: &str, value: f64) {
        if !value.is_finite() {
            self.clear_feature(column);
            return;
        }
        match column {
            "age_group_ord" => self.age_group_ord = Some(value),
            "dependents_estimated" => self.dependents_estimated = Some(value),
            "experience_years_est" => self.experience_years_est = Some(value),
            "budget_estimated_usd" => self.budget_estimated_usd = Some(value),
            "remote_capable" => self.remote_capable = Some(is_set(value)),
            "actively_seeking" => self.actively_seeking = Some(is_set(value)),
            LANG_ENGLISH_COLUMN => self.lang_english = Some(is_set(value)),
            other => {
                if let Some(region) = Region::from_preference_column(other) {
                    self.region_preferences.insert(region, is_set(value));
                } else {
                    self.extra.insert(other.to_owned(), value);
                }
            }
        }
    }

    fn clear_feature(&mut self, column: &str) {
        match column {
            "age_group_ord" => self.age_group_ord = None,
            "dependents_estimated" => self.dependents_estimated = None,
            "experience_years_est" => self.experience_years_est = None,
            "budget_estimated_usd" => self.budget_estimated_usd = None,
            "remote_capable" => self.remote_capable = None,
            "actively_seeking" => self.actively_seeking = None,
            LANG_ENGLISH_COLUMN => self.lang_english = None,
            other => {
                if let Some(region) = Region::from_preference_column(other) {
                    self.region_preferences.remove(&region);
                } else {
                    self.extra.remove(other);
                }
            }
        }
    }
}

fn flag_value(flag: bool) -> f64 {
    f64::from(u8::from(flag))
}

fn is_set(value: f64) -> bool {
    value.abs() > f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("remote_capable", 1.0, Some(1.0))]
    #[case("actively_seeking", 0.0, Some(0.0))]
    #[case("pref_asia", 1.0, Some(1.0))]
    #[case("lang_english", 1.0, Some(1.0))]
    #[case("cluster", 3.0, Some(3.0))]
    #[case("budget_estimated_usd", f64::NAN, None)]
    fn set_feature_round_trips(
        #[case] column: &str,
        #[case] value: f64,
        #[case] expected: Option<f64>,
    ) {
        let mut user = UserProfile::new();
        user.set_feature(column, value);
        assert_eq!(user.feature(column), expected);
    }

    #[test]
    fn non_finite_values_clear_existing_features() {
        let mut user = UserProfile::new().with_budget(400.0);
        user.set_feature("budget_estimated_usd", f64::INFINITY);
        assert!(user.budget_estimated_usd.is_none());
    }

    #[test]
    fn missing_preferences_are_not_preferred() {
        let user = UserProfile::new().with_preference(Region::Europe, false);
        assert!(!user.prefers(Region::Europe));
        assert!(!user.prefers(Region::Gulf));
        assert_eq!(user.feature("pref_europe"), Some(0.0));
        assert_eq!(user.feature("pref_gulf"), None);
    }
}
