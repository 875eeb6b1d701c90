//! Student-count estimation for a single selection.
//!
//! Each figure is rounded on its own. Kindergarten is the exception: it is
//! half of the already rounded elementary count, so it can differ by one
//! from half of the raw elementary figure.

use crate::error::Rejection;
use crate::table::RateTables;
use crate::types::{EstimationResult, HighSchoolEntry, RateEntry, Selection};
use crate::util::{format_percentage, round_count};
use std::fmt;

pub const KINDERGARTEN_SHARE: f64 = 0.5;

/// The rates and formulas behind an estimate, for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationBasis {
    pub kindergarten: String,
    pub elementary: String,
    pub middle: String,
    pub high: String,
}

impl CalculationBasis {
    fn new(region: &str, rate: &RateEntry, high: &HighSchoolEntry) -> Self {
        Self {
            kindergarten: format!(
                "expected elementary students x {}%",
                KINDERGARTEN_SHARE * 100.0
            ),
            elementary: format!(
                "units x elementary rate {}% ({} rate applied)",
                format_percentage(rate.elementary_rate),
                region
            ),
            middle: format!(
                "units x middle rate {}% ({} rate applied)",
                format_percentage(rate.middle_rate),
                region
            ),
            high: format!(
                "units x {} persons x {}%",
                format_percentage(high.per_unit_headcount),
                format_percentage(high.occupancy_rate)
            ),
        }
    }

    pub fn lines(&self) -> [(&'static str, &str); 4] {
        [
            ("Kindergarten", self.kindergarten.as_str()),
            ("Elementary", self.elementary.as_str()),
            ("Middle", self.middle.as_str()),
            ("High", self.high.as_str()),
        ]
    }
}

impl fmt::Display for CalculationBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, line) in self.lines() {
            writeln!(f, "- {}: {}", label, line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub result: EstimationResult,
    pub basis: CalculationBasis,
}

/// Student counts before they are tied to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub kindergarten: u64,
    pub elementary: u64,
    pub middle: u64,
    pub high: u64,
}

pub fn compute_counts(units: u64, rate: &RateEntry, high: &HighSchoolEntry) -> Counts {
    let units = units as f64;
    let elementary = round_count(units * rate.elementary_rate / 100.0);
    let kindergarten = round_count(elementary as f64 * KINDERGARTEN_SHARE);
    let middle = round_count(units * rate.middle_rate / 100.0);
    let high = round_count(units * high.per_unit_headcount * high.occupancy_rate / 100.0);
    Counts { kindergarten, elementary, middle, high }
}

/// Estimate the students generated by `units` housing units at `selection`.
///
/// Checks run in a fixed order and the first failure is returned: selection
/// completeness, unit count, yield rate, then high-school data.
pub fn estimate(tables: &RateTables, selection: &Selection, units: i64) -> Result<Estimate, Rejection> {
    if !selection.is_complete() {
        return Err(Rejection::IncompleteSelection);
    }
    let units = match u64::try_from(units) {
        Ok(u) if u > 0 => u,
        _ => return Err(Rejection::InvalidUnitCount(units)),
    };

    let key = selection.leaf_key();
    let rate = tables
        .rates
        .get(&key)
        .ok_or_else(|| Rejection::NoYieldRate(key.clone()))?;
    let high = tables
        .high_school
        .get(&key)
        .ok_or_else(|| Rejection::NoHighSchoolRate(key.clone()))?;

    let counts = compute_counts(units, rate, high);
    let result = EstimationResult {
        city: key.city().to_string(),
        region: key.region,
        housing_type: key.housing_type,
        supply_type: key.supply_type,
        scale: key.scale,
        units,
        kindergarten: counts.kindergarten,
        elementary: counts.elementary,
        middle: counts.middle,
        high: counts.high,
    };
    let basis = CalculationBasis::new(&result.region, rate, high);
    Ok(Estimate { result, basis })
}
