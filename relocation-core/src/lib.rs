//! Core domain types for the relocation engine.
//!
//! The crate describes users, destinations, feature schemas and ranked
//! results, plus the [`Scorer`] and [`Blend`] seams that scoring
//! implementations plug into. It performs no I/O.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod country;
pub mod features;
pub mod form;
pub mod profile;
pub mod recommendation;
pub mod region;
pub mod scorer;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use country::{
    COUNTRY_FEATURE_COLUMNS, COUNTRY_ID_COLUMN, COUNTRY_NAME_COLUMN, CatalogError, CountryCatalog,
    CountryRecord, REGION_GROUP_COLUMN,
};
pub use features::{FeatureSchema, FeatureTable, FeatureTableError};
pub use form::{AgeGroup, ProfileForm};
pub use profile::{
    CULTURAL_PREFERENCE_COLUMN, LANG_ENGLISH_COLUMN, USER_FEATURE_COLUMNS, UserProfile,
};
pub use recommendation::{IdColumn, RecommendationResult};
pub use region::Region;
pub use scorer::{Blend, LinearBlend, ScoreError, Scorer};
