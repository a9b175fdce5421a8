//! Load the fitted scaler and regressor from JSON artefacts on disk.

use std::io::BufReader;

use camino::Utf8Path;
use relocation_fs::{open_utf8_file, require_file};
use serde::de::DeserializeOwned;

use crate::{ArtefactError, MlpRegressor, Normaliser, Regressor, StandardScaler};
use crate::mlp::MlpDocument;
use crate::scaler::ScalerDocument;

/// Conventional file name of the fitted scaler.
pub const SCALER_FILE: &str = "scaler.json";

/// Conventional file name of the fitted regressor.
pub const MODEL_FILE: &str = "model.json";

/// A fitted scaler and regressor known to agree on feature width.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtefacts {
    scaler: StandardScaler,
    model: MlpRegressor,
}

impl ModelArtefacts {
    /// Pair a scaler with a regressor.
    ///
    /// # Errors
    /// Returns [`ArtefactError::WidthMismatch`] when the scaler's width differs
    /// from the regressor's input width.
    pub fn new(scaler: StandardScaler, model: MlpRegressor) -> Result<Self, ArtefactError> {
        if scaler.width() != model.input_width() {
            return Err(ArtefactError::WidthMismatch {
                scaler: scaler.width(),
                model: model.input_width(),
            });
        }
        Ok(Self { scaler, model })
    }

    /// Load `scaler.json` and `model.json` from explicit paths.
    ///
    /// Both paths are checked before either file is decoded.
    ///
    /// # Errors
    /// Returns [`ArtefactError`] when a file is missing, unreadable, not valid
    /// JSON, internally inconsistent, or when the two artefacts disagree on
    /// width.
    pub fn load(scaler_path: &Utf8Path, model_path: &Utf8Path) -> Result<Self, ArtefactError> {
        require_file(scaler_path).map_err(|source| ArtefactError::Locate {
            kind: "scaler",
            source,
        })?;
        require_file(model_path).map_err(|source| ArtefactError::Locate {
            kind: "model",
            source,
        })?;
        let scaler = StandardScaler::from_document(read_json::<ScalerDocument>("scaler", scaler_path)?)?;
        let model = MlpRegressor::from_document(read_json::<MlpDocument>("model", model_path)?)?;
        log::debug!(
            "loaded scaler of width {} and model with {} layers",
            scaler.width(),
            model.depth()
        );
        Self::new(scaler, model)
    }

    /// Load [`SCALER_FILE`] and [`MODEL_FILE`] from `dir`.
    ///
    /// # Errors
    /// See [`ModelArtefacts::load`].
    pub fn load_dir(dir: &Utf8Path) -> Result<Self, ArtefactError> {
        Self::load(&dir.join(SCALER_FILE), &dir.join(MODEL_FILE))
    }

    /// Fitted scaler.
    #[must_use]
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Fitted regressor.
    #[must_use]
    pub const fn model(&self) -> &MlpRegressor {
        &self.model
    }

    /// Split into the scaler and regressor.
    #[must_use]
    pub fn into_parts(self) -> (StandardScaler, MlpRegressor) {
        (self.scaler, self.model)
    }
}

fn read_json<T: DeserializeOwned>(kind: &'static str, path: &Utf8Path) -> Result<T, ArtefactError> {
    let file = open_utf8_file(path).map_err(|source| ArtefactError::Open {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtefactError::Decode {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
