//! Test helpers writing recommend inputs into temporary directories.

use camino::{Utf8Path, Utf8PathBuf};
use relocation_data::{CLUSTERED_USERS_FILE, COUNTRY_FEATURES_FILE};
use relocation_scorer::{MODEL_FILE, SCALER_FILE};
use tempfile::TempDir;

pub(super) const COUNTRIES_CSV: &str = "\
country_code,country_name,region_group,safety_index,cost_of_living_index,diaspora_presence_score,visa_policy_sudanese_score,cultural_compatibility_score,min_budget_required
AE,UAE,gulf,0.8,0.6,0.9,0.5,0.8,600
EG,Egypt,north_africa,0.6,0.2,1.0,0.9,0.9,300
DE,Germany,europe,0.9,0.8,,0.3,0.3,1500
";

pub(super) const USERS_CSV: &str = "\
respondent,age_group_ord,budget_estimated_usd,remote_capable,pref_gulf,pref_europe,lang_english,cultural_preference,cluster
r1,1,800,True,1,0,1,Arabic-speaking,2
r2,2,1600,False,0,1,1,English-speaking,0
";

/// Standardises budget around 500 USD and passes safety through.
pub(super) const SCALER_JSON: &str = r#"{
    "feature_names_in": ["budget_estimated_usd", "safety_index"],
    "mean": [500.0, 0.0],
    "scale": [100.0, 1.0],
    "medians": {"safety_index": 0.8}
}"#;

/// Sums its two inputs.
pub(super) const MODEL_JSON: &str = r#"{
    "activation": "identity",
    "layers": [{"weights": [[1.0], [1.0]], "biases": [0.0]}]
}"#;

pub(super) const PROFILE_JSON: &str = r#"{
    "age_group": "35-44",
    "monthly_budget": 500.0,
    "work_type": "I can work remotely / freelance",
    "preferred_regions": ["gulf"],
    "speaks_english": true
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A temporary artefacts directory populated with the default filenames.
#[derive(Debug)]
pub(super) struct ArtefactsDir {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl ArtefactsDir {
    pub(super) fn empty() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn populated() -> Self {
        let dir = Self::empty();
        dir.populate();
        dir
    }

    pub(super) fn populate(&self) {
        self.write(COUNTRY_FEATURES_FILE, COUNTRIES_CSV);
        self.write(CLUSTERED_USERS_FILE, USERS_CSV);
        self.write(SCALER_FILE, SCALER_JSON);
        self.write(MODEL_FILE, MODEL_JSON);
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn remove(&self, name: &str) {
        std::fs::remove_file(self.path(name)).expect("remove fixture file");
    }
}
