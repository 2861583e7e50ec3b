//! Regional grid supply and price snapshot

use crate::core::{require_range, Error, GridStability, RegionRecord, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Read-only set of region records
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    records: Vec<RegionRecord>,
}

impl RegionCatalog {
    /// Build a catalog from validated records
    pub fn from_records(records: Vec<RegionRecord>) -> Result<Self> {
        validate_records(&records, usize::MAX)?;
        Ok(Self { records })
    }

    /// Parse a JSON array of records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<RegionRecord> = serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("Failed to parse region data: {}", e)))?;
        Self::from_records(records)
    }

    /// Load a JSON region file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        log::info!("Loaded {} regions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Built-in 17-region reference snapshot (annual MWh, KRW/kWh)
    pub fn builtin() -> Self {
        use GridStability::*;

        let records = vec![
            region("gyeonggi", "Gyeonggi", 82_160_000.0, 91_290_000.0, 152.4, 0.04, Low, 1),
            region("seoul", "Seoul", 48_360_000.0, 50_375_000.0, 168.2, 0.02, Low, 2),
            region("chungnam", "Chungcheongnam", 45_240_000.0, 87_000_000.0, 139.8, 0.08, High, 3),
            region("jeonnam", "Jeollanam", 42_640_000.0, 78_960_000.0, 137.5, 0.18, High, 4),
            region("gyeongbuk", "Gyeongsangbuk", 39_000_000.0, 97_500_000.0, 136.1, 0.10, High, 5),
            region("gyeongnam", "Gyeongsangnam", 36_920_000.0, 52_740_000.0, 141.3, 0.06, Moderate, 6),
            region("ulsan", "Ulsan", 33_800_000.0, 43_330_000.0, 134.9, 0.04, Moderate, 7),
            region("busan", "Busan", 27_040_000.0, 49_160_000.0, 155.6, 0.05, High, 8),
            region("incheon", "Incheon", 24_960_000.0, 38_400_000.0, 150.2, 0.03, Moderate, 9),
            region("gangwon", "Gangwon", 23_400_000.0, 39_000_000.0, 149.7, 0.12, High, 10),
            region("chungbuk", "Chungcheongbuk", 21_840_000.0, 24_820_000.0, 146.8, 0.07, Moderate, 11),
            region("jeonbuk", "Jeollabuk", 20_280_000.0, 27_040_000.0, 145.3, 0.15, Moderate, 12),
            region("daegu", "Daegu", 18_720_000.0, 20_350_000.0, 158.4, 0.03, Low, 13),
            region("daejeon", "Daejeon", 14_560_000.0, 15_660_000.0, 160.1, 0.02, Low, 14),
            region("gwangju", "Gwangju", 13_000_000.0, 14_600_000.0, 157.2, 0.05, Moderate, 15),
            region("jeju", "Jeju", 6_240_000.0, 7_340_000.0, 172.5, 0.22, Moderate, 16),
            region("sejong", "Sejong", 4_160_000.0, 4_290_000.0, 161.7, 0.03, Low, 17),
        ];

        Self { records }
    }

    pub fn get(&self, id: &str) -> Option<&RegionRecord> {
        self.records.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }

    /// Borrow the full snapshot
    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn region(
    id: &str,
    name: &str,
    consumption_mwh: f64,
    capacity_mwh: f64,
    price: f64,
    renewable_share: f64,
    stability: GridStability,
    usage_rank: u32,
) -> RegionRecord {
    RegionRecord {
        id: id.to_string(),
        name: name.to_string(),
        current_consumption_mwh: consumption_mwh,
        supply_capacity_mwh: capacity_mwh,
        average_price_per_kwh: price,
        renewable_share,
        stability,
        usage_rank,
    }
}

/// Validate a region set: bounded size, unique ids, physically meaningful figures
pub fn validate_records(records: &[RegionRecord], max_regions: usize) -> Result<()> {
    if records.len() > max_regions {
        return Err(Error::invalid(
            "regions",
            records.len(),
            format!("at most {} regions may be supplied", max_regions),
        ));
    }

    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if r.id.trim().is_empty() {
            return Err(Error::invalid("region.id", "\"\"", "must not be empty"));
        }
        // Lookups ignore ASCII case, so ids must be unique without it
        if !seen.insert(r.id.to_ascii_lowercase()) {
            return Err(Error::invalid("region.id", &r.id, "duplicate region id"));
        }
        if !(r.supply_capacity_mwh.is_finite() && r.supply_capacity_mwh > 0.0) {
            return Err(Error::invalid(
                format!("region[{}].supply_capacity_mwh", r.id),
                r.supply_capacity_mwh,
                "must be greater than zero",
            ));
        }
        if !(r.current_consumption_mwh.is_finite() && r.current_consumption_mwh >= 0.0) {
            return Err(Error::invalid(
                format!("region[{}].current_consumption_mwh", r.id),
                r.current_consumption_mwh,
                "must be zero or greater",
            ));
        }
        if !(r.average_price_per_kwh.is_finite() && r.average_price_per_kwh > 0.0) {
            return Err(Error::invalid(
                format!("region[{}].average_price_per_kwh", r.id),
                r.average_price_per_kwh,
                "must be greater than zero",
            ));
        }
        require_range(&format!("region[{}].renewable_share", r.id), r.renewable_share, 0.0, 1.0)?;
    }

    Ok(())
}
