//! Hierarchical rate tables.
//!
//! Both the school-yield table and the high-school table share the same
//! `region -> housing type -> supply type -> scale` shape, so one generic
//! container backs them. Levels are `BTreeMap`s: key listings come out
//! sorted and the serialized form is stable.

use crate::types::{HighSchoolEntry, LeafKey, RateEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type ScaleLevel<T> = BTreeMap<String, T>;
type SupplyLevel<T> = BTreeMap<String, ScaleLevel<T>>;
type HousingLevel<T> = BTreeMap<String, SupplyLevel<T>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeveledTable<T> {
    regions: BTreeMap<String, HousingLevel<T>>,
}

pub type RateTable = LeveledTable<RateEntry>;
pub type HighSchoolRateTable = LeveledTable<HighSchoolEntry>;

impl<T> Default for LeveledTable<T> {
    fn default() -> Self {
        Self { regions: BTreeMap::new() }
    }
}

impl<T> LeveledTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, key: &LeafKey) -> Option<&T> {
        self.get_path(&key.region, &key.housing_type, &key.supply_type, &key.scale)
    }

    pub fn get_path(
        &self,
        region: &str,
        housing_type: &str,
        supply_type: &str,
        scale: &str,
    ) -> Option<&T> {
        self.regions
            .get(region)?
            .get(housing_type)?
            .get(supply_type)?
            .get(scale)
    }

    /// Insert or replace the leaf at `key`, creating missing levels.
    pub fn upsert(&mut self, key: LeafKey, value: T) -> Option<T> {
        self.regions
            .entry(key.region)
            .or_default()
            .entry(key.housing_type)
            .or_default()
            .entry(key.supply_type)
            .or_default()
            .insert(key.scale, value)
    }

    pub fn leaves(&self) -> impl Iterator<Item = (LeafKey, &T)> + '_ {
        self.regions.iter().flat_map(|(region, housing)| {
            housing.iter().flat_map(move |(housing_type, supply)| {
                supply.iter().flat_map(move |(supply_type, scales)| {
                    scales.iter().map(move |(scale, value)| {
                        (LeafKey::new(region, housing_type, supply_type, scale), value)
                    })
                })
            })
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.regions
            .values()
            .flat_map(|housing| housing.values())
            .flat_map(|supply| supply.values())
            .map(|scales| scales.len())
            .sum()
    }

    pub fn region_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.keys().map(String::as_str)
    }

    pub fn housing_types(&self, region: &str) -> Vec<String> {
        self.regions
            .get(region)
            .map(|housing| housing.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn supply_types(&self, region: &str, housing_type: &str) -> Vec<String> {
        self.regions
            .get(region)
            .and_then(|housing| housing.get(housing_type))
            .map(|supply| supply.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn scales(&self, region: &str, housing_type: &str, supply_type: &str) -> Vec<String> {
        self.regions
            .get(region)
            .and_then(|housing| housing.get(housing_type))
            .and_then(|supply| supply.get(supply_type))
            .map(|scales| scales.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// The two tables a session estimates against. They are replaced together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTables {
    pub rates: RateTable,
    pub high_school: HighSchoolRateTable,
}

impl RateTables {
    pub fn new(rates: RateTable, high_school: HighSchoolRateTable) -> Self {
        Self { rates, high_school }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(e: f64, m: f64) -> RateEntry {
        RateEntry { elementary_rate: e, middle_rate: m }
    }

    #[test]
    fn upsert_creates_levels_and_replaces_leaf() {
        let mut table = RateTable::new();
        let key = LeafKey::new("서울 강남구", "아파트", "분양", "84㎡");
        assert!(table.upsert(key.clone(), entry(12.5, 6.0)).is_none());
        let previous = table.upsert(key.clone(), entry(10.0, 5.0));
        assert_eq!(previous, Some(entry(12.5, 6.0)));
        assert_eq!(table.get(&key), Some(&entry(10.0, 5.0)));
        assert_eq!(table.leaf_count(), 1);
    }

    #[test]
    fn partial_paths_are_absent() {
        let mut table = RateTable::new();
        table.upsert(LeafKey::new("서울 강남구", "아파트", "분양", "84㎡"), entry(1.0, 1.0));
        assert!(table.get_path("서울 강남구", "아파트", "분양", "59㎡").is_none());
        assert!(table.get_path("서울 강남구", "연립", "분양", "84㎡").is_none());
        assert!(table.get_path("부산 해운대구", "아파트", "분양", "84㎡").is_none());
    }

    #[test]
    fn leaves_walk_every_level_in_key_order() {
        let mut table = RateTable::new();
        table.upsert(LeafKey::new("서울 종로구", "아파트", "임대", "59㎡"), entry(1.0, 1.0));
        table.upsert(LeafKey::new("서울 강남구", "아파트", "분양", "84㎡"), entry(2.0, 2.0));
        table.upsert(LeafKey::new("서울 강남구", "아파트", "분양", "59㎡"), entry(3.0, 3.0));

        let keys: Vec<LeafKey> = table.leaves().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                LeafKey::new("서울 강남구", "아파트", "분양", "59㎡"),
                LeafKey::new("서울 강남구", "아파트", "분양", "84㎡"),
                LeafKey::new("서울 종로구", "아파트", "임대", "59㎡"),
            ]
        );
        assert_eq!(table.leaf_count(), 3);
        assert_eq!(table.scales("서울 강남구", "아파트", "분양"), vec!["59㎡", "84㎡"]);
    }

    #[test]
    fn serializes_as_nested_objects() {
        let mut table = RateTable::new();
        table.upsert(LeafKey::new("서울 강남구", "아파트", "분양", "84㎡"), entry(12.5, 6.0));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["서울 강남구"]["아파트"]["분양"]["84㎡"]["초등"], 12.5);
        assert_eq!(json["서울 강남구"]["아파트"]["분양"]["84㎡"]["중등"], 6.0);
    }
}
