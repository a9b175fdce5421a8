//! Destination countries and the read-only catalogue that holds them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Region;

/// Column uniquely identifying a country.
pub const COUNTRY_ID_COLUMN: &str = "country_code";

/// Column holding the display name.
pub const COUNTRY_NAME_COLUMN: &str = "country_name";

/// Column holding the region bucket label.
pub const REGION_GROUP_COLUMN: &str = "region_group";

/// Candidate country columns consumed by the regression model, id first.
pub const COUNTRY_FEATURE_COLUMNS: [&str; 7] = [
    COUNTRY_ID_COLUMN,
    "safety_index",
    "cost_of_living_index",
    "diaspora_presence_score",
    "visa_policy_sudanese_score",
    "cultural_compatibility_score",
    "min_budget_required",
];

/// Static attributes of one destination.
///
/// Scored attributes are optional; absent values contribute nothing to the
/// baseline score and never fire explanation rules.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Stable short code, unique within a catalogue.
    pub country_code: String,
    /// Display name.
    pub country_name: Option<String>,
    /// Region bucket matched against user preferences.
    pub region_group: Option<Region>,
    /// Relative safety and stability.
    pub safety_index: Option<f64>,
    /// Relative cost of living; higher is more expensive.
    pub cost_of_living_index: Option<f64>,
    /// Size of the established diaspora community.
    pub diaspora_presence_score: Option<f64>,
    /// Friendliness of the visa regime towards Sudanese nationals.
    pub visa_policy_sudanese_score: Option<f64>,
    /// Cultural and linguistic closeness.
    pub cultural_compatibility_score: Option<f64>,
    /// Minimum monthly budget in USD; `None` means unconstrained.
    pub min_budget_required: Option<f64>,
}

impl CountryRecord {
    /// Construct a record with only its code set.
    #[must_use]
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            ..Self::default()
        }
    }

    /// Return the display name, falling back to the code.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.country_name.as_deref().unwrap_or(&self.country_code)
    }

    /// Look up a numeric attribute by column name.
    ///
    /// # Examples
    /// ```
    /// use relocation_core::CountryRecord;
    ///
    /// let mut record = CountryRecord::new("AE");
    /// record.safety_index = Some(0.8);
    /// assert_eq!(record.attribute("safety_index"), Some(0.8));
    /// assert_eq!(record.attribute("country_code"), None);
    /// ```
    #[must_use]
    pub fn attribute(&self, column: &str) -> Option<f64> {
        match column {
            "safety_index" => self.safety_index,
            "cost_of_living_index" => self.cost_of_living_index,
            "diaspora_presence_score" => self.diaspora_presence_score,
            "visa_policy_sudanese_score" => self.visa_policy_sudanese_score,
            "cultural_compatibility_score" => self.cultural_compatibility_score,
            "min_budget_required" => self.min_budget_required,
            _ => None,
        }
    }

    /// Store a numeric attribute by column name.
    ///
    /// Returns `false` when the column is not a known numeric attribute.
    /// Non-finite values are stored as missing.
    pub fn set_attribute(&mut self, column: &str, value: Option<f64>) -> bool {
        let cleaned = value.filter(|v| v.is_finite());
        let slot = match column {
            "safety_index" => &mut self.safety_index,
            "cost_of_living_index" => &mut self.cost_of_living_index,
            "diaspora_presence_score" => &mut self.diaspora_presence_score,
            "visa_policy_sudanese_score" => &mut self.visa_policy_sudanese_score,
            "cultural_compatibility_score" => &mut self.cultural_compatibility_score,
            "min_budget_required" => &mut self.min_budget_required,
            _ => return false,
        };
        *slot = cleaned;
        true
    }
}

/// Errors returned by [`CountryCatalog::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two records share a country code.
    #[error("country code {code} appears more than once")]
    DuplicateCode {
        /// Repeated code.
        code: String,
    },
}

/// Immutable, ordered collection of destinations.
///
/// Iteration order is the order records were supplied in and is used to break
/// ranking ties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryCatalog {
    countries: Vec<CountryRecord>,
    columns: Vec<String>,
}

impl CountryCatalog {
    /// Validate and construct a catalogue.
    ///
    /// `columns` lists the columns the source table actually carried; it is
    /// used to resolve feature schemas.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateCode`] when two records share a code.
    pub fn new(countries: Vec<CountryRecord>, columns: Vec<String>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(countries.len());
        for country in &countries {
            if !seen.insert(country.country_code.as_str()) {
                return Err(CatalogError::DuplicateCode {
                    code: country.country_code.clone(),
                });
            }
        }
        Ok(Self { countries, columns })
    }

    /// Construct a catalogue whose source carried every known column.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateCode`] when two records share a code.
    pub fn from_records(countries: Vec<CountryRecord>) -> Result<Self, CatalogError> {
        let columns = COUNTRY_FEATURE_COLUMNS
            .iter()
            .chain(&[COUNTRY_NAME_COLUMN, REGION_GROUP_COLUMN])
            .map(|column| (*column).to_owned())
            .collect();
        Self::new(countries, columns)
    }

    /// Records in catalogue order.
    #[must_use]
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    /// Columns present in the source table.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Find a record by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.country_code == code)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Report whether the catalogue holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
