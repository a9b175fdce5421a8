//! Scoring, explanation and ranking for relocation recommendations.
//!
//! The crate provides the two scorers the ranker blends:
//! - **Heuristic scoring** applies a fixed, transparent weighted formula to a
//!   destination's attributes plus a budget bonus or penalty.
//! - **Model scoring** builds a feature table from the user and each
//!   destination, imputes gaps, aligns the table to a fitted
//!   [`StandardScaler`] and predicts with a fitted [`MlpRegressor`]. Both
//!   artefacts are loaded from JSON via [`ModelArtefacts`].
//!
//! [`Ranker`] composes the scorers through a
//! [`Blend`](relocation_core::Blend), orders the results and attaches an
//! explanation from [`Explainer`].
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use relocation_core::{CountryCatalog, FeatureSchema, UserProfile};
//! use relocation_scorer::{HeuristicScorer, ModelArtefacts, ModelScorer, RankOptions, Ranker};
//!
//! let artefacts = ModelArtefacts::load_dir(Utf8Path::new("artefacts")).expect("load artefacts");
//! let model = ModelScorer::from_artefacts(
//!     artefacts,
//!     FeatureSchema::user_features(),
//!     &FeatureSchema::country_features(),
//! );
//! let ranker = Ranker::new(HeuristicScorer::default(), model);
//! let catalog = CountryCatalog::default();
//! let results = ranker
//!     .rank(&UserProfile::new(), &catalog, &RankOptions::default())
//!     .expect("rank destinations");
//! assert!(results.is_empty());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod align;
mod artefacts;
mod baseline;
mod error;
mod explain;
mod impute;
mod mlp;
mod model;
mod ranker;
mod scaler;

pub use align::align_features;
pub use artefacts::{MODEL_FILE, ModelArtefacts, SCALER_FILE};
pub use baseline::{BaselineWeights, HeuristicScorer};
pub use error::ArtefactError;
pub use explain::{Explainer, ExplanationRule, FALLBACK_EXPLANATION, RuleFn, explain};
pub use impute::Imputation;
pub use mlp::{Activation, DenseLayer, MlpRegressor};
pub use model::{ModelScorer, Normaliser, Regressor, resolve_feature_schemas};
pub use ranker::{RankOptions, Ranker};
pub use scaler::StandardScaler;

#[cfg(test)]
mod tests;
