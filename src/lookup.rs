//! Cascading selection over the rate table.
//!
//! Only the school-yield table drives the cascade; the high-school table is
//! consulted at estimate time.

use crate::table::RateTable;
use crate::types::city_of;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct LookupIndex<'a> {
    table: &'a RateTable,
}

impl<'a> LookupIndex<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    pub fn cities(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.table.region_keys().map(city_of).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Region keys that start with `city`.
    ///
    /// This is a plain prefix test, so a city whose name prefixes another
    /// city's name also picks up that city's regions.
    pub fn regions(&self, city: &str) -> Vec<String> {
        if city.is_empty() {
            return Vec::new();
        }
        self.table
            .region_keys()
            .filter(|region| region.starts_with(city))
            .map(str::to_string)
            .collect()
    }

    pub fn housing_types(&self, region: &str) -> Vec<String> {
        self.table.housing_types(region)
    }

    pub fn supply_types(&self, region: &str, housing_type: &str) -> Vec<String> {
        self.table.supply_types(region, housing_type)
    }

    pub fn scales(&self, region: &str, housing_type: &str, supply_type: &str) -> Vec<String> {
        self.table.scales(region, housing_type, supply_type)
    }
}
