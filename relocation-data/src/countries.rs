//! Country catalogue loading.

use std::io::Read;

use csv::StringRecord;
use relocation_core::{
    COUNTRY_FEATURE_COLUMNS, COUNTRY_ID_COLUMN, COUNTRY_NAME_COLUMN, CountryCatalog, CountryRecord, REGION_GROUP_COLUMN,
    Region,
};

use crate::DatasetError;
use crate::cells::{Cell, parse_number, parse_text};

/// Read a country catalogue from CSV.
///
/// The header must include `country_code`. `country_name` and `region_group`
/// are optional; numeric attribute columns are read when present and other
/// columns are ignored. Unknown region labels are logged and treated as no
/// region.
///
/// # Errors
/// Returns [`DatasetError`] for malformed CSV, a missing id column, an empty
/// code, an unparsable numeric cell or duplicate codes.
///
/// # Examples
/// ```
/// use relocation_data::read_country_catalog;
///
/// let csv = "country_code,country_name,region_group,safety_index\nAE,UAE,gulf,0.8\n";
/// let catalog = read_country_catalog(csv.as_bytes()).unwrap();
/// assert_eq!(catalog.get("AE").and_then(|c| c.safety_index), Some(0.8));
/// ```
pub fn read_country_catalog<R: Read>(reader: R) -> Result<CountryCatalog, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_owned).collect();
    let id_index = columns
        .iter()
        .position(|column| column == COUNTRY_ID_COLUMN)
        .ok_or(DatasetError::MissingColumn {
            column: COUNTRY_ID_COLUMN,
        })?;

    let mut countries = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        countries.push(parse_country(&columns, id_index, &record)?);
    }
    log::debug!(
        "read {} countries with columns [{}]",
        countries.len(),
        columns.join(", ")
    );
    Ok(CountryCatalog::new(countries, columns)?)
}

fn parse_country(
    columns: &[String],
    id_index: usize,
    record: &StringRecord,
) -> Result<CountryRecord, DatasetError> {
    let line = record.position().map_or(0, csv::Position::line);
    let code = record
        .get(id_index)
        .and_then(parse_text)
        .ok_or(DatasetError::EmptyCode { line })?;
    let mut country = CountryRecord::new(code);

    for (column, raw) in columns.iter().zip(record.iter()) {
        match column.as_str() {
            COUNTRY_ID_COLUMN => {}
            COUNTRY_NAME_COLUMN => country.country_name = parse_text(raw),
            REGION_GROUP_COLUMN => country.region_group = parse_region(&country.country_code, raw),
            other => {
                if !COUNTRY_FEATURE_COLUMNS.contains(&other) {
                    continue;
                }
                let value = match parse_number(raw) {
                    Cell::Number(value) => Some(value),
                    Cell::Missing => None,
                    Cell::Invalid => {
                        return Err(DatasetError::InvalidNumber {
                            line,
                            column: other.to_owned(),
                            value: raw.to_owned(),
                        });
                    }
                };
                country.set_attribute(other, value);
            }
        }
    }
    Ok(country)
}

fn parse_region(code: &str, raw: &str) -> Option<Region> {
    let label = parse_text(raw)?;
    match label.parse::<Region>() {
        Ok(region) => Some(region),
        Err(err) => {
            log::warn!("{code}: {err}; treating as no region");
            None
        }
    }
}
