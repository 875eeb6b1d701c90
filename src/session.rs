//! Per-session state: the two rate tables and the result ledger.
//!
//! Every operation goes through a `Session` value; independent sessions
//! never share tables or results.

use crate::config::Config;
use crate::error::{ExportError, ImportError, Rejection, StoreError};
use crate::estimator::{self, Estimate};
use crate::ledger::ResultLedger;
use crate::loader::{self, ImportReport};
use crate::lookup::LookupIndex;
use crate::output;
use crate::store;
use crate::table::RateTables;
use crate::types::{ExportRow, RateRow, Selection};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Session {
    tables: RateTables,
    ledger: ResultLedger,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: RateTables) -> Self {
        Self { tables, ledger: ResultLedger::new() }
    }

    /// Start a session from the persisted tables named by `config`.
    ///
    /// Load problems never abort startup: the affected table starts empty
    /// and the errors are returned for the caller to show.
    pub fn open(config: &Config) -> (Self, Vec<StoreError>) {
        let (tables, errors) = store::load_tables(config);
        (Self::with_tables(tables), errors)
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    pub fn lookup(&self) -> LookupIndex<'_> {
        LookupIndex::new(&self.tables.rates)
    }

    /// Replace both tables with ones built from `rows`.
    ///
    /// Nothing changes unless the whole set builds.
    pub fn import_rows(&mut self, rows: &[RateRow]) -> Result<ImportReport, ImportError> {
        let (tables, report) = loader::build_tables(rows)?;
        self.replace_tables(tables, &report);
        Ok(report)
    }

    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportReport, ImportError> {
        let (tables, report) = loader::load_csv(reader)?;
        self.replace_tables(tables, &report);
        Ok(report)
    }

    pub fn import_csv_path(&mut self, path: &Path) -> Result<ImportReport, ImportError> {
        let (tables, report) = loader::load_csv_path(path).inspect_err(|e| {
            log::error!("import of {} failed: {}", path.display(), e);
        })?;
        self.replace_tables(tables, &report);
        Ok(report)
    }

    fn replace_tables(&mut self, tables: RateTables, report: &ImportReport) {
        log::info!(
            "imported {} rows ({} rate leaves, {} high-school leaves)",
            report.rows,
            report.rate_leaves,
            report.high_school_leaves
        );
        self.tables = tables;
    }

    /// Estimate and, on success, append the result to the ledger.
    pub fn estimate(&mut self, selection: &Selection, units: i64) -> Result<Estimate, Rejection> {
        match estimator::estimate(&self.tables, selection, units) {
            Ok(estimate) => {
                log::info!(
                    "estimated {} units at {}/{}/{}/{}",
                    estimate.result.units,
                    estimate.result.region,
                    estimate.result.housing_type,
                    estimate.result.supply_type,
                    estimate.result.scale
                );
                self.ledger.append(estimate.result.clone());
                Ok(estimate)
            }
            Err(rejection) => {
                log::warn!("estimate rejected: {}", rejection);
                Err(rejection)
            }
        }
    }

    pub fn remove_results<I>(&mut self, indices: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let removed = self.ledger.remove_at(indices);
        log::info!("removed {} results, {} remain", removed, self.ledger.len());
        removed
    }

    /// Write the ledger to `path` as CSV. Returns the number of results written.
    pub fn export_results(&self, path: &Path) -> Result<usize, ExportError> {
        output::write_results(path, &self.ledger)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        output::export_rows(&self.tables)
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        store::save_tables(config, &self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET_A: &str = "\
city,region,housing_type,supply_type,scale,elementary_rate,middle_rate,high_per_unit_headcount,high_occupancy_rate
서울,강남구,아파트,분양,84㎡,12.5,6,0.8,15
";

    const SHEET_B: &str = "\
city,region,housing_type,supply_type,scale,elementary_rate,middle_rate,high_per_unit_headcount,high_occupancy_rate
부산,해운대구,아파트,임대,59㎡,8,4,0.75,12
";

    fn gangnam() -> Selection {
        Selection {
            city: "서울".into(),
            region: "서울 강남구".into(),
            housing_type: "아파트".into(),
            supply_type: "분양".into(),
            scale: "84㎡".into(),
        }
    }

    #[test]
    fn successful_estimate_lands_in_ledger() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        let estimate = session.estimate(&gangnam(), 100).unwrap();
        assert_eq!(session.ledger().list(), &[estimate.result]);
    }

    #[test]
    fn rejected_estimate_leaves_ledger_alone() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        let mut other = gangnam();
        other.scale = "59㎡".into();
        assert!(matches!(session.estimate(&other, 10), Err(Rejection::NoYieldRate(_))));
        assert!(matches!(
            session.estimate(&gangnam(), 0),
            Err(Rejection::InvalidUnitCount(0))
        ));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn import_replaces_instead_of_merging() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        session.import_csv(SHEET_B.as_bytes()).unwrap();

        assert_eq!(session.lookup().cities(), vec!["부산"]);
        assert!(session.tables().rates.get(&gangnam().leaf_key()).is_none());
        assert!(session.tables().high_school.get(&gangnam().leaf_key()).is_none());
    }

    #[test]
    fn failed_import_keeps_previous_tables() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        let before = session.tables().clone();

        let broken = "city,region,housing_type,supply_type,scale,elementary_rate\n부산,해운대구,아파트,임대,59㎡,8\n";
        let err = session.import_csv(broken.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns(ref c) if c == &["middle_rate"]));
        assert_eq!(session.tables(), &before);
    }

    #[test]
    fn imported_rows_replace_existing_tables() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();

        let rows = vec![RateRow {
            city: Some("대전".into()),
            region: Some("유성구".into()),
            housing_type: Some("아파트".into()),
            supply_type: Some("분양".into()),
            scale: Some("74㎡".into()),
            elementary_rate: Some("11.111".into()),
            middle_rate: Some("5".into()),
            high_per_unit_headcount: Some("0.9".into()),
            high_occupancy_rate: Some("14".into()),
        }];
        let report = session.import_rows(&rows).unwrap();
        assert_eq!(report.rows, 1);

        assert_eq!(session.lookup().cities(), vec!["대전"]);
        assert!(session.tables().rates.get(&gangnam().leaf_key()).is_none());
        let rate = session
            .tables()
            .rates
            .get_path("대전 유성구", "아파트", "분양", "74㎡")
            .unwrap();
        assert_eq!(rate.elementary_rate, 11.11);
    }

    #[test]
    fn bad_rows_leave_tables_alone() {
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        let before = session.tables().clone();

        let rows = vec![RateRow { city: Some("대전".into()), ..RateRow::default() }];
        assert!(matches!(
            session.import_rows(&rows),
            Err(ImportError::MissingValue { row: 1, column: "region" })
        ));
        assert_eq!(session.tables(), &before);
    }

    #[test]
    fn results_are_written_only_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut session = Session::new();
        session.import_csv(SHEET_A.as_bytes()).unwrap();
        session.estimate(&gangnam(), 100).unwrap();

        let _ = session.ledger().display_rows();
        assert!(!path.exists());

        assert_eq!(session.export_results(&path).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn sessions_are_independent() {
        let mut first = Session::new();
        let second = Session::new();
        first.import_csv(SHEET_A.as_bytes()).unwrap();
        first.estimate(&gangnam(), 10).unwrap();
        assert!(second.tables().rates.is_empty());
        assert!(second.ledger().is_empty());
    }
}
