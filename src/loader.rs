use crate::error::ImportError;
use crate::table::{HighSchoolRateTable, RateTable, RateTables};
use crate::types::{HighSchoolEntry, LeafKey, RateEntry, RateRow, RegionKey};
use crate::util::{is_blank, parse_f64_safe, round2};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// A tabular column: its canonical header, the header older sheets use, and
/// whether the import fails without it.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub legacy: &'static str,
    pub required: bool,
}

pub const COLUMNS: [Column; 9] = [
    Column { name: "city", legacy: "시", required: true },
    Column { name: "region", legacy: "지역", required: true },
    Column { name: "housing_type", legacy: "주택유형", required: true },
    Column { name: "supply_type", legacy: "공급유형", required: true },
    Column { name: "scale", legacy: "주택규모", required: true },
    Column { name: "elementary_rate", legacy: "초등", required: true },
    Column { name: "middle_rate", legacy: "중등", required: true },
    Column { name: "high_per_unit_headcount", legacy: "고등-세대당 인구수", required: false },
    Column { name: "high_occupancy_rate", legacy: "고등-학생 점유율", required: false },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub rows: usize,
    pub rate_leaves: usize,
    pub high_school_leaves: usize,
}

/// Required columns absent from `headers`, in canonical order.
pub fn missing_columns(headers: &StringRecord) -> Vec<String> {
    COLUMNS
        .iter()
        .filter(|c| c.required)
        .filter(|c| !headers.iter().any(|h| h == c.name || h == c.legacy))
        .map(|c| c.name.to_string())
        .collect()
}

/// Columns whose canonical or legacy header appears more than once.
pub fn duplicate_columns(headers: &StringRecord) -> Vec<String> {
    COLUMNS
        .iter()
        .filter(|c| headers.iter().filter(|h| *h == c.name || *h == c.legacy).count() > 1)
        .map(|c| c.name.to_string())
        .collect()
}

/// Read every row of a CSV source after checking its header.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RateRow>, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?;
    let missing = missing_columns(headers);
    if !missing.is_empty() {
        log::error!("import rejected, missing columns: {}", missing.join(", "));
        return Err(ImportError::MissingColumns(missing));
    }
    let duplicated = duplicate_columns(headers);
    if !duplicated.is_empty() {
        log::error!("import rejected, duplicate columns: {}", duplicated.join(", "));
        return Err(ImportError::DuplicateColumns(duplicated));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RateRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<RateRow>, ImportError> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}

fn required_text(value: &Option<String>, row: usize, column: &'static str) -> Result<String, ImportError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ImportError::MissingValue { row, column }),
    }
}

fn required_number(value: &Option<String>, row: usize, column: &'static str) -> Result<f64, ImportError> {
    if is_blank(value.as_deref()) {
        return Err(ImportError::MissingValue { row, column });
    }
    parse_f64_safe(value.as_deref()).ok_or_else(|| ImportError::InvalidNumber {
        row,
        column,
        value: value.clone().unwrap_or_default(),
    })
}

fn optional_number(value: &Option<String>, row: usize, column: &'static str) -> Result<Option<f64>, ImportError> {
    if is_blank(value.as_deref()) {
        return Ok(None);
    }
    required_number(value, row, column).map(Some)
}

/// Build fresh tables from tabular rows.
///
/// Rates are rounded to two decimals. A row without both high-school figures
/// only populates the yield table. Later rows overwrite earlier rows that
/// share the same leaf. Row numbers in errors are 1-based data rows.
pub fn build_tables(rows: &[RateRow]) -> Result<(RateTables, ImportReport), ImportError> {
    let mut rates = RateTable::new();
    let mut high_school = HighSchoolRateTable::new();

    for (idx, row) in rows.iter().enumerate() {
        let n = idx + 1;
        let city = required_text(&row.city, n, "city")?;
        let district = required_text(&row.region, n, "region")?;
        let housing_type = required_text(&row.housing_type, n, "housing_type")?;
        let supply_type = required_text(&row.supply_type, n, "supply_type")?;
        let scale = required_text(&row.scale, n, "scale")?;
        let elementary = required_number(&row.elementary_rate, n, "elementary_rate")?;
        let middle = required_number(&row.middle_rate, n, "middle_rate")?;
        let headcount = optional_number(&row.high_per_unit_headcount, n, "high_per_unit_headcount")?;
        let occupancy = optional_number(&row.high_occupancy_rate, n, "high_occupancy_rate")?;

        let key = LeafKey::new(
            RegionKey::new(city, district).compose(),
            housing_type,
            supply_type,
            scale,
        );
        log::debug!("row {}: {}", n, key);

        if let (Some(headcount), Some(occupancy)) = (headcount, occupancy) {
            high_school.upsert(
                key.clone(),
                HighSchoolEntry {
                    per_unit_headcount: round2(headcount),
                    occupancy_rate: round2(occupancy),
                },
            );
        } else {
            log::warn!("row {}: no high-school figures for {}", n, key);
        }

        rates.upsert(
            key,
            RateEntry {
                elementary_rate: round2(elementary),
                middle_rate: round2(middle),
            },
        );
    }

    let report = ImportReport {
        rows: rows.len(),
        rate_leaves: rates.leaf_count(),
        high_school_leaves: high_school.leaf_count(),
    };
    Ok((RateTables::new(rates, high_school), report))
}

pub fn load_csv<R: Read>(reader: R) -> Result<(RateTables, ImportReport), ImportError> {
    let rows = read_rows(reader)?;
    build_tables(&rows)
}

pub fn load_csv_path(path: impl AsRef<Path>) -> Result<(RateTables, ImportReport), ImportError> {
    let rows = read_rows_from_path(path)?;
    build_tables(&rows)
}
