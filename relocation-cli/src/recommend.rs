//! Recommend command implementation for the relocation CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use relocation_core::{
    CountryCatalog, FeatureSchema, LinearBlend, ProfileForm, RecommendationResult,
    USER_FEATURE_COLUMNS, UserProfile,
};
use relocation_data::{
    COUNTRY_FEATURES_FILE, UserDataset, load_country_catalog, load_user_dataset,
    user_dataset_path,
};
use relocation_fs::{RequireFileError, open_utf8_file, require_file};
use relocation_scorer::{
    HeuristicScorer, MODEL_FILE, ModelArtefacts, ModelScorer, RankOptions, Ranker, SCALER_FILE,
    resolve_feature_schemas,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ALPHA, ARG_ARTEFACTS_DIR, ARG_COUNTRIES, ARG_FORMAT, ARG_IMPUTATION, ARG_MODEL,
    ARG_PROFILE, ARG_SCALER, ARG_TOP_K, ARG_USER_INDEX, ARG_USERS, CliError,
};

/// How ranked destinations are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON array of recommendations.
    #[default]
    Json,
    /// One numbered line per destination followed by its explanation.
    Text,
}

/// Where missing model inputs take their fill values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ImputationMode {
    /// Medians of the destinations being scored.
    #[default]
    Batch,
    /// Medians recorded alongside the fitted scaler.
    Training,
}

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank destinations for one user by blending a transparent \
                 heuristic with a fitted regression model. Inputs are read \
                 from an artefacts directory (country_features.csv, the user \
                 dataset, scaler.json and model.json); each file can be \
                 overridden individually.",
    about = "Recommend relocation destinations"
)]
#[ortho_config(prefix = "RELOCATE")]
pub(crate) struct RecommendArgs {
    /// Directory containing the default input filenames.
    #[arg(long = ARG_ARTEFACTS_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) artefacts_dir: Option<Utf8PathBuf>,
    /// Override the path to the country catalogue (`country_features.csv`).
    #[arg(long = ARG_COUNTRIES, value_name = "path")]
    #[serde(default)]
    pub(crate) countries: Option<Utf8PathBuf>,
    /// Override the path to the user dataset.
    #[arg(long = ARG_USERS, value_name = "path")]
    #[serde(default)]
    pub(crate) users: Option<Utf8PathBuf>,
    /// Override the path to the fitted scaler (`scaler.json`).
    #[arg(long = ARG_SCALER, value_name = "path")]
    #[serde(default)]
    pub(crate) scaler: Option<Utf8PathBuf>,
    /// Override the path to the fitted model (`model.json`).
    #[arg(long = ARG_MODEL, value_name = "path")]
    #[serde(default)]
    pub(crate) model: Option<Utf8PathBuf>,
    /// Row of the user dataset to rank for (defaults to 0).
    #[arg(long = ARG_USER_INDEX, value_name = "n")]
    #[serde(default)]
    pub(crate) user_index: Option<usize>,
    /// JSON profile form to rank for instead of a dataset row.
    #[arg(long = ARG_PROFILE, value_name = "path")]
    #[serde(default)]
    pub(crate) profile: Option<Utf8PathBuf>,
    /// Maximum number of destinations to return (defaults to 5).
    #[arg(long = ARG_TOP_K, value_name = "n")]
    #[serde(default)]
    pub(crate) top_k: Option<usize>,
    /// Weight of the heuristic score in the blend, within 0..=1 (defaults to 0.5).
    #[arg(long = ARG_ALPHA, value_name = "weight")]
    #[serde(default)]
    pub(crate) alpha: Option<f64>,
    /// Source of fill values for missing model inputs.
    #[arg(long = ARG_IMPUTATION, value_enum)]
    #[serde(default)]
    pub(crate) imputation: Option<ImputationMode>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Which user the ranking is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UserSelection {
    /// A row of the user dataset.
    Index(usize),
    /// A profile form stored as JSON.
    Profile(Utf8PathBuf),
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecommendConfig {
    /// Path to the country catalogue.
    pub(crate) countries: Utf8PathBuf,
    /// Path to the user dataset, when one is used.
    pub(crate) users: Option<Utf8PathBuf>,
    /// Path to `scaler.json`.
    pub(crate) scaler: Utf8PathBuf,
    /// Path to `model.json`.
    pub(crate) model: Utf8PathBuf,
    /// User to rank for.
    pub(crate) user: UserSelection,
    /// Maximum number of results.
    pub(crate) top_k: usize,
    /// Weight of the heuristic score.
    pub(crate) alpha: f64,
    /// Fill strategy for missing model inputs.
    pub(crate) imputation: ImputationMode,
    /// Output format.
    pub(crate) format: OutputFormat,
}

impl RecommendConfig {
    /// Check every input path before anything is loaded.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.countries, ARG_COUNTRIES)?;
        if let Some(users) = &self.users {
            Self::require_existing(users, ARG_USERS)?;
        }
        Self::require_existing(&self.scaler, ARG_SCALER)?;
        Self::require_existing(&self.model, ARG_MODEL)?;
        if let UserSelection::Profile(profile) = &self.user {
            Self::require_existing(profile, ARG_PROFILE)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        require_file(path).map_err(|err| match err {
            RequireFileError::Missing { path } => CliError::MissingSourceFile { field, path },
            RequireFileError::NotAFile { path } => CliError::SourcePathNotFile { field, path },
            RequireFileError::Inspect { path, source } => CliError::InspectSourcePath {
                field,
                path,
                source,
            },
        })
    }

    fn rank_options(&self) -> RankOptions {
        RankOptions {
            top_k: self.top_k,
            alpha: self.alpha,
            ..RankOptions::default()
        }
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let artefacts_dir = args.artefacts_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let countries = args
            .countries
            .unwrap_or_else(|| artefacts_dir.join(COUNTRY_FEATURES_FILE));
        let scaler = args
            .scaler
            .unwrap_or_else(|| artefacts_dir.join(SCALER_FILE));
        let model = args.model.unwrap_or_else(|| artefacts_dir.join(MODEL_FILE));

        let (user, users) = match (args.profile, args.user_index) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_PROFILE,
                    second: ARG_USER_INDEX,
                });
            }
            (Some(profile), None) => {
                // A profile only needs the dataset to resolve the user schema.
                let users = args.users.or_else(|| {
                    let default = user_dataset_path(&artefacts_dir);
                    relocation_fs::file_is_file(&default)
                        .unwrap_or(false)
                        .then_some(default)
                });
                (UserSelection::Profile(profile), users)
            }
            (None, index) => {
                let users = args
                    .users
                    .unwrap_or_else(|| user_dataset_path(&artefacts_dir));
                (UserSelection::Index(index.unwrap_or(0)), Some(users))
            }
        };

        let top_k = args.top_k.unwrap_or(RankOptions::DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_TOP_K,
                reason: "must be at least 1".to_owned(),
            });
        }
        let alpha = args.alpha.unwrap_or(LinearBlend::DEFAULT_ALPHA);
        if !(0.0..=1.0).contains(&alpha) {
            return Err(CliError::InvalidArgument {
                field: ARG_ALPHA,
                reason: format!("{alpha} is not within 0..=1"),
            });
        }

        Ok(Self {
            countries,
            users,
            scaler,
            model,
            user,
            top_k,
            alpha,
            imputation: args.imputation.unwrap_or_default(),
            format: args.format.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &mut stdout)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_recommend_config(args)?;
    let recommendations = execute_recommend(&config)?;
    match config.format {
        OutputFormat::Json => write_json(writer, &recommendations.results),
        OutputFormat::Text => write_text(writer, &recommendations),
    }
}

/// Ranked results together with the feature schemas the model read.
#[derive(Debug)]
struct Recommendations {
    user_schema: FeatureSchema,
    country_schema: FeatureSchema,
    results: Vec<RecommendationResult>,
}

fn resolve_recommend_config(args: RecommendArgs) -> Result<RecommendConfig, CliError> {
    let config = args.into_config()?;
    log::debug!("resolved recommend configuration {config:?}");
    config.validate_sources()?;
    Ok(config)
}

fn execute_recommend(config: &RecommendConfig) -> Result<Recommendations, CliError> {
    let catalog = load_country_catalog(&config.countries)?;
    let dataset = config
        .users
        .as_deref()
        .map(load_user_dataset)
        .transpose()?;
    let user = select_user(config, dataset.as_ref())?;

    let user_columns = dataset.as_ref().map_or_else(
        || USER_FEATURE_COLUMNS.map(str::to_owned).to_vec(),
        |dataset| dataset.columns().to_vec(),
    );
    let model = build_model_scorer(config, &user_columns, &catalog)?;
    let user_schema = model.user_schema().clone();
    let country_schema = model.country_schema().clone();
    let ranker = Ranker::new(HeuristicScorer::default(), model);
    log::info!("ranking {} destinations", catalog.len());
    let results = ranker
        .rank(&user, &catalog, &config.rank_options())
        .map_err(CliError::Rank)?;
    Ok(Recommendations {
        user_schema,
        country_schema,
        results,
    })
}

fn build_model_scorer(
    config: &RecommendConfig,
    user_columns: &[String],
    catalog: &CountryCatalog,
) -> Result<ModelScorer, CliError> {
    let (user_schema, country_schema) = resolve_feature_schemas(user_columns, catalog.columns());
    let artefacts = ModelArtefacts::load(&config.scaler, &config.model)?;
    let scorer = ModelScorer::from_artefacts(artefacts, user_schema, &country_schema);
    Ok(match config.imputation {
        ImputationMode::Batch => scorer,
        ImputationMode::Training => scorer.with_training_medians(),
    })
}

fn select_user(
    config: &RecommendConfig,
    dataset: Option<&UserDataset>,
) -> Result<UserProfile, CliError> {
    match &config.user {
        UserSelection::Profile(path) => Ok(load_profile(path)?.into_profile()),
        UserSelection::Index(index) => {
            let len = dataset.map_or(0, UserDataset::len);
            dataset
                .and_then(|dataset| dataset.get(*index))
                .cloned()
                .ok_or(CliError::UserIndexOutOfRange { index: *index, len })
        }
    }
}

/// Loads a JSON-encoded [`ProfileForm`] from disk.
pub(crate) fn load_profile(path: &Utf8Path) -> Result<ProfileForm, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenProfile {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseProfile {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(
    writer: &mut dyn Write,
    recommendations: &[RecommendationResult],
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(recommendations)
        .map_err(CliError::SerialiseRecommendations)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

fn write_text(writer: &mut dyn Write, recommendations: &Recommendations) -> Result<(), CliError> {
    writeln!(writer, "Using user features: {}", recommendations.user_schema)
        .map_err(CliError::WriteOutput)?;
    writeln!(writer, "Using country features: {}", recommendations.country_schema)
        .map_err(CliError::WriteOutput)?;
    for (rank, result) in (1_usize..).zip(&recommendations.results) {
        writeln!(
            writer,
            "{rank}. {} ({}) final {:.3} baseline {:.3} model {:.3}",
            result.country_name,
            result.country_code,
            result.final_score,
            result.baseline_score,
            result.model_score,
        )
        .map_err(CliError::WriteOutput)?;
        writeln!(writer, "   {}", result.explanation).map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
