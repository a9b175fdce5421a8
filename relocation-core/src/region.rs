//! Region buckets used to group destinations and express user preferences.
//!
//! Country records carry a `region_group` label and user profiles carry one
//! `pref_*` flag per region. The enum keeps both spellings in one place.
//!
//! # Examples
//! ```
//! use relocation_core::Region;
//!
//! assert_eq!(Region::EastAfrica.as_str(), "east_africa");
//! assert_eq!(Region::EastAfrica.preference_column(), "pref_east_africa");
//! ```

use serde::{Deserialize, Serialize};

/// Broad destination grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Gulf Cooperation Council states.
    Gulf,
    /// Kenya, Ethiopia, Uganda and neighbours.
    EastAfrica,
    /// Egypt, Libya, Tunisia and neighbours.
    NorthAfrica,
    /// Continental Europe.
    Europe,
    /// United Kingdom and Ireland.
    UkIreland,
    /// Canada.
    Canada,
    /// United States.
    Usa,
    /// Malaysia, China and the wider region.
    Asia,
    /// No particular region.
    Anywhere,
}

impl Region {
    /// Every region in preference-column order.
    pub const ALL: [Self; 9] = [
        Self::Gulf,
        Self::EastAfrica,
        Self::NorthAfrica,
        Self::Europe,
        Self::UkIreland,
        Self::Canada,
        Self::Usa,
        Self::Asia,
        Self::Anywhere,
    ];

    /// Return the `region_group` label used by country tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gulf => "gulf",
            Self::EastAfrica => "east_africa",
            Self::NorthAfrica => "north_africa",
            Self::Europe => "europe",
            Self::UkIreland => "uk_ireland",
            Self::Canada => "canada",
            Self::Usa => "usa",
            Self::Asia => "asia",
            Self::Anywhere => "anywhere",
        }
    }

    /// Return the user dataset column holding the preference flag.
    #[must_use]
    pub const fn preference_column(self) -> &'static str {
        match self {
            Self::Gulf => "pref_gulf",
            Self::EastAfrica => "pref_east_africa",
            Self::NorthAfrica => "pref_north_africa",
            Self::Europe => "pref_europe",
            Self::UkIreland => "pref_uk_ireland",
            Self::Canada => "pref_canada",
            Self::Usa => "pref_usa",
            Self::Asia => "pref_asia",
            Self::Anywhere => "pref_anywhere",
        }
    }

    /// Find the region whose preference column is `column`.
    #[must_use]
    pub fn from_preference_column(column: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.preference_column() == column)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == label)
            .ok_or_else(|| format!("unknown region '{s}'"))
    }
}
