use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_RATE_FILE: &str = "student_yield_rate.json";
pub const DEFAULT_HIGH_SCHOOL_RATE_FILE: &str = "high_school_yield_rate.json";
pub const DEFAULT_EXPORT_FILE: &str = "student_yield_rates.csv";
pub const DEFAULT_RESULTS_FILE: &str = "estimation_results.csv";

/// Where the session reads and writes its files.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "student_yield",
    version,
    about = "Estimate students generated by a housing development"
)]
pub struct Config {
    /// Persisted yield-rate table (JSON)
    #[arg(long, env = "STUDENT_YIELD_RATE_FILE", default_value = DEFAULT_RATE_FILE)]
    pub rate_file: PathBuf,

    /// Persisted high-school table (JSON)
    #[arg(
        long,
        env = "STUDENT_YIELD_HIGH_SCHOOL_RATE_FILE",
        default_value = DEFAULT_HIGH_SCHOOL_RATE_FILE
    )]
    pub high_school_rate_file: PathBuf,

    /// Destination for the flat rate-table export (CSV)
    #[arg(long, env = "STUDENT_YIELD_EXPORT_FILE", default_value = DEFAULT_EXPORT_FILE)]
    pub export_file: PathBuf,

    /// Destination for accumulated estimation results (CSV)
    #[arg(long, env = "STUDENT_YIELD_RESULTS_FILE", default_value = DEFAULT_RESULTS_FILE)]
    pub results_file: PathBuf,

    /// Tabular rate sheet (CSV) to import at startup
    #[arg(long)]
    pub import: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_file: PathBuf::from(DEFAULT_RATE_FILE),
            high_school_rate_file: PathBuf::from(DEFAULT_HIGH_SCHOOL_RATE_FILE),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            results_file: PathBuf::from(DEFAULT_RESULTS_FILE),
            import: None,
        }
    }
}
