//! JSON persistence for the hierarchical tables.
//!
//! Files are pretty-printed UTF-8 nested objects. A save is only reported
//! as successful once the file has been synced, read back and compared with
//! the table that was written.

use crate::config::Config;
use crate::error::StoreError;
use crate::table::{HighSchoolRateTable, RateTable, RateTables};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a table, falling back to an empty one on any failure.
///
/// The failure is logged and handed back next to the empty table.
pub fn load_table_or_empty<T>(path: &Path) -> (T, Option<StoreError>)
where
    T: DeserializeOwned + Default,
{
    match load_table(path) {
        Ok(table) => {
            log::info!("loaded {}", path.display());
            (table, None)
        }
        Err(err @ StoreError::NotFound(_)) => {
            log::warn!("{}; starting with an empty table", err);
            (T::default(), Some(err))
        }
        Err(err) => {
            log::error!("{}; starting with an empty table", err);
            (T::default(), Some(err))
        }
    }
}

pub fn save_table<T>(path: &Path, table: &T) -> Result<(), StoreError>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = serde_json::to_string_pretty(table).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    let saved: T = load_table(path)?;
    if &saved != table {
        log::error!("save verification failed for {}", path.display());
        return Err(StoreError::VerifyMismatch(path.to_path_buf()));
    }
    log::info!("saved {}", path.display());
    Ok(())
}

/// Load both tables named by `config`. Each failure is returned; the
/// affected table starts empty.
pub fn load_tables(config: &Config) -> (RateTables, Vec<StoreError>) {
    let (rates, rate_err) = load_table_or_empty::<RateTable>(&config.rate_file);
    let (high_school, high_err) =
        load_table_or_empty::<HighSchoolRateTable>(&config.high_school_rate_file);
    let errors = rate_err.into_iter().chain(high_err).collect();
    (RateTables::new(rates, high_school), errors)
}

pub fn save_tables(config: &Config, tables: &RateTables) -> Result<(), StoreError> {
    save_table(&config.rate_file, &tables.rates)?;
    save_table(&config.high_school_rate_file, &tables.high_school)
}
