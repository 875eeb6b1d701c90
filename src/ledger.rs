use crate::types::{EstimationResult, ResultRow};
use crate::util::format_int;
use std::collections::BTreeSet;

/// Estimates accumulated over a session, in the order they were made.
///
/// Entries are never edited. Removal goes by position in the ledger as it
/// stands at the time of the call.
#[derive(Debug, Clone, Default)]
pub struct ResultLedger {
    entries: Vec<EstimationResult>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: EstimationResult) {
        self.entries.push(result);
    }

    pub fn list(&self) -> &[EstimationResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the entries at the given 0-based positions, keeping the order
    /// of the rest. Out-of-range positions are ignored. Returns how many
    /// entries were removed.
    pub fn remove_at<I>(&mut self, indices: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let doomed: BTreeSet<usize> = indices.into_iter().collect();
        let before = self.entries.len();
        let mut position = 0usize;
        self.entries.retain(|_| {
            let keep = !doomed.contains(&position);
            position += 1;
            keep
        });
        before - self.entries.len()
    }

    /// Display rows numbered from 1, counts with thousands separators.
    pub fn display_rows(&self) -> Vec<ResultRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, r)| ResultRow {
                line: idx + 1,
                city: r.city.clone(),
                region: r.region.clone(),
                housing_type: r.housing_type.clone(),
                supply_type: r.supply_type.clone(),
                scale: r.scale.clone(),
                units: format_int(r.units),
                kindergarten: format_int(r.kindergarten),
                elementary: format_int(r.elementary),
                middle: format_int(r.middle),
                high: format_int(r.high),
            })
            .collect()
    }
}

/// Parse a list of 1-based line numbers such as `"1, 3 4"` into 0-based
/// ledger positions. Returns `None` if any token is not a positive integer.
pub fn parse_line_numbers(input: &str) -> Option<BTreeSet<usize>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| match t.parse::<usize>() {
            Ok(n) if n > 0 => Some(n - 1),
            _ => None,
        })
        .collect()
}
