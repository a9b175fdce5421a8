//! User dataset loading.

use std::io::Read;

use csv::StringRecord;
use relocation_core::{
    CULTURAL_PREFERENCE_COLUMN, LANG_ENGLISH_COLUMN, USER_FEATURE_COLUMNS, UserProfile,
};

use crate::DatasetError;
use crate::cells::{Cell, parse_number, parse_text};

/// Cleaned user rows plus the columns the source carried.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserDataset {
    columns: Vec<String>,
    users: Vec<UserProfile>,
}

impl UserDataset {
    /// Columns present in the source, in header order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Users in source order.
    #[must_use]
    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    /// The user at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&UserProfile> {
        self.users.get(index)
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Report whether the dataset holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Read the user dataset from CSV.
///
/// Model feature columns and `lang_english` must hold numbers, booleans or
/// missing markers. Other columns are kept when numeric and skipped
/// otherwise, so free-text survey answers do not block loading.
///
/// # Errors
/// Returns [`DatasetError`] for malformed CSV or an unparsable cell in a
/// feature column.
///
/// # Examples
/// ```
/// use relocation_data::read_user_dataset;
///
/// let csv = "budget_estimated_usd,pref_gulf,cultural_preference\n800,1,Arabic\n";
/// let dataset = read_user_dataset(csv.as_bytes()).unwrap();
/// let user = dataset.get(0).unwrap();
/// assert_eq!(user.budget_estimated_usd, Some(800.0));
/// assert_eq!(user.cultural_preference.as_deref(), Some("Arabic"));
/// ```
pub fn read_user_dataset<R: Read>(reader: R) -> Result<UserDataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_owned).collect();

    let mut users = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        users.push(parse_user(&columns, &record)?);
    }
    log::debug!(
        "read {} users with columns [{}]",
        users.len(),
        columns.join(", ")
    );
    Ok(UserDataset { columns, users })
}

fn parse_user(columns: &[String], record: &StringRecord) -> Result<UserProfile, DatasetError> {
    let line = record.position().map_or(0, csv::Position::line);
    let mut user = UserProfile::new();
    for (column, raw) in columns.iter().zip(record.iter()) {
        if column == CULTURAL_PREFERENCE_COLUMN {
            user.cultural_preference = parse_text(raw);
            continue;
        }
        match parse_number(raw) {
            Cell::Number(value) => user.set_feature(column, value),
            Cell::Missing => {}
            Cell::Invalid if is_feature_column(column) => {
                return Err(DatasetError::InvalidNumber {
                    line,
                    column: column.clone(),
                    value: raw.to_owned(),
                });
            }
            Cell::Invalid => {}
        }
    }
    Ok(user)
}

fn is_feature_column(column: &str) -> bool {
    column == LANG_ENGLISH_COLUMN || USER_FEATURE_COLUMNS.contains(&column)
}
