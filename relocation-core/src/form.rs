//! Human-oriented profile descriptions and their encoding into
//! [`UserProfile`] values.
//!
//! Interactive front ends collect labels ("25-34", "I can work remotely")
//! rather than model features. [`ProfileForm`] captures those answers and
//! encodes them the same way the training dataset was encoded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Region, UserProfile};

/// Age brackets offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeGroup {
    /// 18 to 24 years old.
    #[serde(rename = "18-24")]
    From18To24,
    /// 25 to 34 years old.
    #[default]
    #[serde(rename = "25-34")]
    From25To34,
    /// 35 to 44 years old.
    #[serde(rename = "35-44")]
    From35To44,
    /// 45 to 54 years old.
    #[serde(rename = "45-54")]
    From45To54,
    /// 55 years or older.
    #[serde(rename = "55+")]
    Over55,
}

impl AgeGroup {
    /// Return the ordinal code used by the model.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::From18To24 => 0,
            Self::From25To34 => 1,
            Self::From35To44 => 2,
            Self::From45To54 => 3,
            Self::Over55 => 4,
        }
    }
}

/// Answers collected from a user before ranking.
///
/// # Examples
/// ```
/// use relocation_core::{AgeGroup, ProfileForm, Region};
///
/// let form = ProfileForm {
///     age_group: AgeGroup::From25To34,
///     monthly_budget: 800.0,
///     work_type: "I can work remotely / freelance".to_owned(),
///     preferred_regions: vec![Region::Gulf],
///     actively_seeking: true,
///     speaks_english: true,
///     cultural_preference: "Prefer Arabic-speaking countries".to_owned(),
/// };
/// let user = form.into_profile();
/// assert_eq!(user.feature("age_group_ord"), Some(1.0));
/// assert_eq!(user.feature("remote_capable"), Some(1.0));
/// assert_eq!(user.feature("pref_gulf"), Some(1.0));
/// assert_eq!(user.feature("pref_usa"), Some(0.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    /// Selected age bracket.
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Estimated monthly budget for living expenses in USD.
    pub monthly_budget: f64,
    /// Free-text work type; mentioning "remote" marks the user remote capable.
    #[serde(default)]
    pub work_type: String,
    /// Regions the user would consider.
    #[serde(default)]
    pub preferred_regions: Vec<Region>,
    /// Whether the user is actively seeking to relocate.
    #[serde(default)]
    pub actively_seeking: bool,
    /// Whether the user can communicate in English.
    #[serde(default)]
    pub speaks_english: bool,
    /// Free-text cultural preference.
    #[serde(default)]
    pub cultural_preference: String,
}

impl ProfileForm {
    /// Encode the answers as a [`UserProfile`].
    ///
    /// Every region flag is set explicitly. Dependents and experience are not
    /// asked for and default to zero.
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        let region_preferences: BTreeMap<Region, bool> = Region::ALL
            .into_iter()
            .map(|region| (region, self.preferred_regions.contains(&region)))
            .collect();
        UserProfile {
            age_group_ord: Some(f64::from(self.age_group.ordinal())),
            dependents_estimated: Some(0.0),
            experience_years_est: Some(0.0),
            budget_estimated_usd: Some(self.monthly_budget),
            remote_capable: Some(self.work_type.to_lowercase().contains("remote")),
            actively_seeking: Some(self.actively_seeking),
            region_preferences,
            cultural_preference: Some(self.cultural_preference),
            lang_english: Some(self.speaks_english),
            extra: BTreeMap::new(),
        }
    }
}

impl From<ProfileForm> for UserProfile {
    fn from(form: ProfileForm) -> Self {
        form.into_profile()
    }
}
