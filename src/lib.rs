//! Facade crate for the relocation recommendation engine.
//!
//! This crate re-exports the core domain types and exposes the scoring
//! pipeline and CSV loaders behind feature flags.

#![forbid(unsafe_code)]

pub use relocation_core::{
    AgeGroup, Blend, CountryCatalog, CountryRecord, FeatureSchema, FeatureTable, IdColumn,
    LinearBlend, ProfileForm, RecommendationResult, Region, ScoreError, Scorer, UserProfile,
};

#[cfg(feature = "scorer")]
pub use relocation_scorer::{
    ArtefactError, Explainer, HeuristicScorer, ModelArtefacts, ModelScorer, RankOptions, Ranker,
    align_features, explain,
};

#[cfg(feature = "data")]
pub use relocation_data::{DatasetError, UserDataset, load_country_catalog, load_user_dataset};
