use crate::error::ExportError;
use crate::ledger::ResultLedger;
use crate::table::RateTables;
use crate::types::{ExportRow, RegionKey};
use crate::util::format_percentage;
use serde::Serialize;
use std::io;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Flatten the tables into one row per leaf of the yield table.
///
/// Leaves without high-school data export zeros for those two columns.
pub fn export_rows(tables: &RateTables) -> Vec<ExportRow> {
    tables
        .rates
        .leaves()
        .map(|(key, rate)| {
            let region = RegionKey::split(&key.region);
            let (headcount, occupancy) = tables
                .high_school
                .get(&key)
                .map_or((0.0, 0.0), |h| (h.per_unit_headcount, h.occupancy_rate));
            ExportRow {
                city: region.city,
                region: region.district,
                elementary_rate: format_percentage(rate.elementary_rate),
                middle_rate: format_percentage(rate.middle_rate),
                high_per_unit_headcount: format_percentage(headcount),
                high_occupancy_rate: format_percentage(occupancy),
                housing_type: key.housing_type,
                supply_type: key.supply_type,
                scale: key.scale,
            }
        })
        .collect()
}

pub fn write_csv_to<W: io::Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rate_export(path: &Path, tables: &RateTables) -> Result<usize, ExportError> {
    let rows = export_rows(tables);
    write_csv(path, &rows)?;
    log::info!("exported {} rate rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

pub fn write_results(path: &Path, ledger: &ResultLedger) -> Result<usize, ExportError> {
    write_csv(path, ledger.list())?;
    log::info!("wrote {} results to {}", ledger.len(), path.display());
    Ok(ledger.len())
}

pub fn render_table<T: Tabled + Clone>(rows: &[T], max_rows: usize) -> String {
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows not shown)", rows.len() - max_rows);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{build_tables, load_csv};
    use crate::types::{EstimationResult, HighSchoolEntry, LeafKey, RateEntry, RateRow};

    fn tables() -> RateTables {
        let mut tables = RateTables::default();
        let a = LeafKey::new("서울 강남구", "아파트", "분양", "84㎡");
        let b = LeafKey::new("서울 강남구", "아파트", "분양", "59㎡");
        tables.rates.upsert(a.clone(), RateEntry { elementary_rate: 12.5, middle_rate: 6.0 });
        tables.rates.upsert(b, RateEntry { elementary_rate: 10.0, middle_rate: 4.25 });
        tables.high_school.upsert(a, HighSchoolEntry { per_unit_headcount: 0.8, occupancy_rate: 15.0 });
        tables
    }

    #[test]
    fn one_row_per_rate_leaf_with_zero_fill() {
        let rows = export_rows(&tables());
        assert_eq!(rows.len(), 2);

        let small = &rows[0];
        assert_eq!(small.scale, "59㎡");
        assert_eq!(small.city, "서울");
        assert_eq!(small.region, "강남구");
        assert_eq!(small.middle_rate, "4.25");
        assert_eq!(small.high_per_unit_headcount, "0.00");
        assert_eq!(small.high_occupancy_rate, "0.00");

        let large = &rows[1];
        assert_eq!(large.elementary_rate, "12.50");
        assert_eq!(large.high_per_unit_headcount, "0.80");
        assert_eq!(large.high_occupancy_rate, "15.00");
    }

    #[test]
    fn export_csv_reimports_to_same_leaves() {
        let original = tables();
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &export_rows(&original)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(
            "city,region,housing_type,supply_type,scale,elementary_rate,middle_rate,high_per_unit_headcount,high_occupancy_rate"
        ));

        let (reloaded, report) = load_csv(text.as_bytes()).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(reloaded.rates, original.rates);
        // Zero-filled high-school cells come back as real zero entries.
        assert_eq!(report.high_school_leaves, 2);
    }

    #[test]
    fn rows_convert_back_into_import_rows() {
        let rows: Vec<RateRow> = export_rows(&tables()).into_iter().map(RateRow::from).collect();
        let (rebuilt, _) = build_tables(&rows).unwrap();
        assert_eq!(rebuilt.rates, tables().rates);
    }

    #[test]
    fn results_csv_has_a_line_per_entry() {
        let mut ledger = ResultLedger::new();
        ledger.append(EstimationResult {
            city: "서울".into(),
            region: "서울 강남구".into(),
            housing_type: "아파트".into(),
            supply_type: "분양".into(),
            scale: "84㎡".into(),
            units: 100,
            kindergarten: 6,
            elementary: 12,
            middle: 6,
            high: 12,
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        assert_eq!(write_results(&path, &ledger).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().ends_with("100,6,12,6,12"));
    }

    #[test]
    fn render_table_handles_empty_input() {
        let rows: Vec<ExportRow> = Vec::new();
        assert_eq!(render_table(&rows, 5), "(no rows)");
        let rendered = render_table(&export_rows(&tables()), 1);
        assert!(rendered.contains("HousingType"));
        assert!(rendered.contains("59㎡"));
        assert!(!rendered.contains("84㎡"));
    }
}
