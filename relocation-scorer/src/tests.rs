//! Unit coverage for artefact loading.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use relocation_fs::RequireFileError;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::{ArtefactError, MODEL_FILE, ModelArtefacts, Normaliser, Regressor, SCALER_FILE};

const SCALER_JSON: &str = r#"{
    "feature_names_in": ["budget_estimated_usd", "safety_index"],
    "mean": [500.0, 0.5],
    "scale": [100.0, 0.25],
    "medians": {"budget_estimated_usd": 450.0}
}"#;

const MODEL_JSON: &str = r#"{
    "activation": "tanh",
    "layers": [
        {"weights": [[0.5, -0.5], [1.0, 0.0]], "biases": [0.0, 0.1]},
        {"weights": [[1.0], [2.0]], "biases": [-0.2]}
    ]
}"#;

struct ArtefactDir {
    _temp: TempDir,
    path: Utf8PathBuf,
}

impl ArtefactDir {
    fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).expect("write artefact");
        path
    }
}

#[fixture]
fn artefact_dir() -> ArtefactDir {
    let temp = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    ArtefactDir { _temp: temp, path }
}

#[rstest]
fn loads_consistent_artefacts_from_a_directory(artefact_dir: ArtefactDir) {
    artefact_dir.write(SCALER_FILE, SCALER_JSON);
    artefact_dir.write(MODEL_FILE, MODEL_JSON);

    let artefacts = ModelArtefacts::load_dir(&artefact_dir.path).expect("load artefacts");

    assert_eq!(artefacts.scaler().width(), 2);
    assert_eq!(artefacts.model().input_width(), 2);
    assert_eq!(
        artefacts.scaler().medians().get("budget_estimated_usd"),
        Some(&450.0)
    );
}

#[rstest]
fn missing_model_is_reported_before_decoding(artefact_dir: ArtefactDir) {
    artefact_dir.write(SCALER_FILE, "not json");

    let err = ModelArtefacts::load_dir(&artefact_dir.path).expect_err("model is missing");

    match err {
        ArtefactError::Locate {
            kind: "model",
            source: RequireFileError::Missing { path },
        } => assert_eq!(path, artefact_dir.path.join(MODEL_FILE)),
        other => panic!("expected missing model, found {other:?}"),
    }
}

#[rstest]
fn malformed_json_is_a_decode_error(artefact_dir: ArtefactDir) {
    let scaler = artefact_dir.write(SCALER_FILE, "{\"mean\": [0.0]}");
    let model = artefact_dir.write(MODEL_FILE, MODEL_JSON);

    let err = ModelArtefacts::load(&scaler, &model).expect_err("scale is missing");

    assert!(matches!(err, ArtefactError::Decode { kind: "scaler", .. }));
}

#[rstest]
fn unknown_activation_is_a_decode_error(artefact_dir: ArtefactDir) {
    let scaler = artefact_dir.write(SCALER_FILE, SCALER_JSON);
    let model = artefact_dir.write(
        MODEL_FILE,
        r#"{"activation": "softplus", "layers": [{"weights": [[1.0]], "biases": [0.0]}]}"#,
    );

    let err = ModelArtefacts::load(&scaler, &model).expect_err("unknown activation");

    assert!(matches!(err, ArtefactError::Decode { kind: "model", .. }));
}

#[rstest]
fn mismatched_widths_are_rejected(artefact_dir: ArtefactDir) {
    let scaler = artefact_dir.write(SCALER_FILE, SCALER_JSON);
    let model = artefact_dir.write(
        MODEL_FILE,
        r#"{"layers": [{"weights": [[1.0], [1.0], [1.0]], "biases": [0.0]}]}"#,
    );

    let err = ModelArtefacts::load(&scaler, &model).expect_err("width mismatch");

    assert!(matches!(
        err,
        ArtefactError::WidthMismatch { scaler: 2, model: 3 }
    ));
}

#[rstest]
fn directories_are_not_artefacts(artefact_dir: ArtefactDir) {
    std::fs::create_dir(artefact_dir.path.join(SCALER_FILE)).expect("create directory");
    artefact_dir.write(MODEL_FILE, MODEL_JSON);

    let err = ModelArtefacts::load_dir(&artefact_dir.path).expect_err("scaler is a directory");

    assert!(matches!(
        err,
        ArtefactError::Locate {
            kind: "scaler",
            source: RequireFileError::NotAFile { .. }
        }
    ));
}

#[rstest]
fn relative_paths_resolve_from_the_working_directory() {
    let err = ModelArtefacts::load_dir(Utf8Path::new("definitely-not-a-directory"))
        .expect_err("missing directory");
    assert!(matches!(err, ArtefactError::Locate { kind: "scaler", .. }));
}
