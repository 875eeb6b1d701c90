use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// A geographic unit split into its city and district parts.
///
/// Tables are keyed by the combined `"{city} {district}"` string; this type
/// only exists to build that key and to take it apart again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionKey {
    pub city: String,
    pub district: String,
}

impl RegionKey {
    pub fn new(city: impl Into<String>, district: impl Into<String>) -> Self {
        Self { city: city.into(), district: district.into() }
    }

    pub fn compose(&self) -> String {
        format!("{} {}", self.city, self.district)
    }

    /// Split a combined region key on its first space.
    ///
    /// A key without a space is used as both the city and the district.
    pub fn split(region: &str) -> Self {
        match region.split_once(' ') {
            Some((city, district)) => Self::new(city, district),
            None => Self::new(region, region),
        }
    }
}

/// City part of a combined region key.
pub fn city_of(region: &str) -> &str {
    region.split_once(' ').map_or(region, |(city, _)| city)
}

/// Full four-level path to a leaf of a rate table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafKey {
    pub region: String,
    pub housing_type: String,
    pub supply_type: String,
    pub scale: String,
}

impl LeafKey {
    pub fn new(
        region: impl Into<String>,
        housing_type: impl Into<String>,
        supply_type: impl Into<String>,
        scale: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            housing_type: housing_type.into(),
            supply_type: supply_type.into(),
            scale: scale.into(),
        }
    }

    pub fn city(&self) -> &str {
        city_of(&self.region)
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.region, self.housing_type, self.supply_type, self.scale
        )
    }
}

// Persisted leaf objects keep the keys used by existing rate files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    #[serde(rename = "초등", alias = "elementary_rate")]
    pub elementary_rate: f64,
    #[serde(rename = "중등", alias = "middle_rate")]
    pub middle_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighSchoolEntry {
    #[serde(rename = "인원", alias = "per_unit_headcount")]
    pub per_unit_headcount: f64,
    #[serde(rename = "발생률", alias = "occupancy_rate")]
    pub occupancy_rate: f64,
}

/// What the user picked in the selection cascade.
///
/// `region` is the combined region key. `city` only narrows the cascade;
/// results take their city from `region`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub city: String,
    pub region: String,
    pub housing_type: String,
    pub supply_type: String,
    pub scale: String,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        [
            &self.city,
            &self.region,
            &self.housing_type,
            &self.supply_type,
            &self.scale,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    pub fn leaf_key(&self) -> LeafKey {
        LeafKey::new(
            self.region.clone(),
            self.housing_type.clone(),
            self.supply_type.clone(),
            self.scale.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimationResult {
    pub city: String,
    pub region: String,
    pub housing_type: String,
    pub supply_type: String,
    pub scale: String,
    pub units: u64,
    pub kindergarten: u64,
    pub elementary: u64,
    pub middle: u64,
    pub high: u64,
}

/// One row of a tabular rate source.
///
/// Every field is optional at the serde level so that a missing cell can be
/// reported with its row and column instead of a generic parse failure.
/// Korean aliases accept sheets exported by the earlier tooling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RateRow {
    #[serde(default, alias = "시")]
    pub city: Option<String>,
    #[serde(default, alias = "지역")]
    pub region: Option<String>,
    #[serde(default, alias = "주택유형")]
    pub housing_type: Option<String>,
    #[serde(default, alias = "공급유형")]
    pub supply_type: Option<String>,
    #[serde(default, alias = "주택규모")]
    pub scale: Option<String>,
    #[serde(default, alias = "초등")]
    pub elementary_rate: Option<String>,
    #[serde(default, alias = "중등")]
    pub middle_rate: Option<String>,
    #[serde(default, alias = "고등-세대당 인구수")]
    pub high_per_unit_headcount: Option<String>,
    #[serde(default, alias = "고등-학생 점유율")]
    pub high_occupancy_rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ExportRow {
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "HousingType")]
    pub housing_type: String,
    #[tabled(rename = "SupplyType")]
    pub supply_type: String,
    #[tabled(rename = "Scale")]
    pub scale: String,
    #[tabled(rename = "Elementary%")]
    pub elementary_rate: String,
    #[tabled(rename = "Middle%")]
    pub middle_rate: String,
    #[tabled(rename = "HighPerUnit")]
    pub high_per_unit_headcount: String,
    #[tabled(rename = "HighOccupancy%")]
    pub high_occupancy_rate: String,
}

impl From<ExportRow> for RateRow {
    fn from(row: ExportRow) -> Self {
        Self {
            city: Some(row.city),
            region: Some(row.region),
            housing_type: Some(row.housing_type),
            supply_type: Some(row.supply_type),
            scale: Some(row.scale),
            elementary_rate: Some(row.elementary_rate),
            middle_rate: Some(row.middle_rate),
            high_per_unit_headcount: Some(row.high_per_unit_headcount),
            high_occupancy_rate: Some(row.high_occupancy_rate),
        }
    }
}

/// Ledger entry rendered for display, counts with thousands separators.
#[derive(Debug, Tabled, Clone)]
pub struct ResultRow {
    #[tabled(rename = "No")]
    pub line: usize,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "HousingType")]
    pub housing_type: String,
    #[tabled(rename = "SupplyType")]
    pub supply_type: String,
    #[tabled(rename = "Scale")]
    pub scale: String,
    #[tabled(rename = "Units")]
    pub units: String,
    #[tabled(rename = "Kindergarten")]
    pub kindergarten: String,
    #[tabled(rename = "Elementary")]
    pub elementary: String,
    #[tabled(rename = "Middle")]
    pub middle: String,
    #[tabled(rename = "High")]
    pub high: String,
}
