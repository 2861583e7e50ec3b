//! GPU reference specifications and workload presets

use crate::core::{Error, GpuSpec, GpuWorkloadEntry, Result, SimulationRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Immutable lookup of GPU models by id
#[derive(Debug, Clone)]
pub struct GpuSpecCatalog {
    specs: Vec<GpuSpec>,
    /// Uppercased id -> index into `specs`
    index: HashMap<String, usize>,
}

impl GpuSpecCatalog {
    /// Build a catalog, rejecting duplicate ids and non-positive TDPs
    pub fn from_specs(specs: Vec<GpuSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(specs.len());

        for (i, spec) in specs.iter().enumerate() {
            if spec.id.trim().is_empty() {
                return Err(Error::invalid("gpu.id", "\"\"", "must not be empty"));
            }
            if !(spec.tdp_watts.is_finite() && spec.tdp_watts > 0.0) {
                return Err(Error::invalid(
                    format!("gpu[{}].tdp_watts", spec.id),
                    spec.tdp_watts,
                    "must be greater than zero",
                ));
            }
            if index.insert(spec.id.to_uppercase(), i).is_some() {
                return Err(Error::invalid("gpu.id", &spec.id, "duplicate model id"));
            }
        }

        Ok(Self { specs, index })
    }

    /// Parse a JSON array of specs
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<GpuSpec> = serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("Failed to parse GPU catalog: {}", e)))?;
        Self::from_specs(specs)
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        log::info!("Loaded {} GPU specs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Built-in reference catalog (vendor data sheet TDPs)
    pub fn builtin() -> Self {
        let specs = vec![
            spec("H200", "NVIDIA H200", "Hopper", 700.0, 141.0, 1600.0, 2024),
            spec("H100", "NVIDIA H100", "Hopper", 700.0, 80.0, 1000.0, 2022),
            spec("A100", "NVIDIA A100", "Ampere", 400.0, 80.0, 624.0, 2020),
            spec("L40S", "NVIDIA L40S", "Ada Lovelace", 350.0, 48.0, 733.0, 2023),
            spec("L40", "NVIDIA L40", "Ada Lovelace", 300.0, 48.0, 362.0, 2023),
            spec("L4", "NVIDIA L4", "Ada Lovelace", 72.0, 24.0, 242.0, 2023),
            spec("V100", "NVIDIA V100", "Volta", 300.0, 32.0, 125.0, 2017),
            spec("T4", "NVIDIA T4", "Turing", 70.0, 16.0, 130.0, 2018),
            spec("A30", "NVIDIA A30", "Ampere", 165.0, 24.0, 330.0, 2021),
            spec("RTX_4090", "NVIDIA RTX 4090", "Ada Lovelace", 450.0, 24.0, 165.0, 2022),
        ];

        let index = specs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.to_uppercase(), i))
            .collect();

        Self { specs, index }
    }

    /// Case-insensitive lookup
    pub fn get(&self, id: &str) -> Option<&GpuSpec> {
        self.index.get(&id.to_uppercase()).map(|&i| &self.specs[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Specs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &GpuSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for GpuSpecCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn spec(id: &str, label: &str, arch: &str, tdp: f64, memory_gb: f64, tops: f64, year: u16) -> GpuSpec {
    GpuSpec {
        id: id.to_string(),
        label: label.to_string(),
        architecture: arch.to_string(),
        tdp_watts: tdp,
        memory_gb,
        ai_performance_tops: tops,
        release_year: year,
    }
}

/// Reference workload derived from public benchmark runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadPreset {
    pub id: String,
    pub name: String,
    pub gpu_model: String,
    /// Typical average fraction of TDP drawn
    pub utilization: f64,
    pub typical_duration_hours: f64,
}

impl WorkloadPreset {
    /// A simulation request running this preset on `quantity` GPUs
    pub fn request(&self, quantity: u32) -> SimulationRequest {
        SimulationRequest::single(
            GpuWorkloadEntry::new(&self.gpu_model, quantity, self.utilization),
            self.typical_duration_hours,
        )
    }
}

/// Built-in benchmark workloads
pub fn workload_presets() -> Vec<WorkloadPreset> {
    vec![
        preset("gpt3_175b_training", "GPT-3 175B Training", 0.95, 168.0),
        preset("resnet50_training", "ResNet-50 Training", 0.85, 8.0),
        preset("bert_inference", "BERT Inference", 0.60, 24.0),
        preset("stable_diffusion", "Stable Diffusion", 0.75, 12.0),
    ]
}

/// Find a built-in preset by id
pub fn find_preset(id: &str) -> Option<WorkloadPreset> {
    workload_presets().into_iter().find(|p| p.id == id)
}

fn preset(id: &str, name: &str, utilization: f64, hours: f64) -> WorkloadPreset {
    WorkloadPreset {
        id: id.to_string(),
        name: name.to_string(),
        gpu_model: "H100".to_string(),
        utilization,
        typical_duration_hours: hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = GpuSpecCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get("H100").unwrap().tdp_watts, 700.0);
        assert_eq!(catalog.get("rtx_4090").unwrap().label, "NVIDIA RTX 4090");
        assert!(catalog.get("UNKNOWN").is_none());
    }

    #[test]
    fn test_perf_per_watt() {
        let catalog = GpuSpecCatalog::builtin();
        let l4 = catalog.get("L4").unwrap();
        let v100 = catalog.get("V100").unwrap();
        assert!(l4.perf_per_watt() > v100.perf_per_watt());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let specs = vec![
            spec("X1", "X1", "", 100.0, 0.0, 0.0, 2024),
            spec("x1", "X1 again", "", 120.0, 0.0, 0.0, 2024),
        ];
        assert!(matches!(
            GpuSpecCatalog::from_specs(specs),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tdp() {
        let specs = vec![spec("X1", "X1", "", 0.0, 0.0, 0.0, 2024)];
        assert!(GpuSpecCatalog::from_specs(specs).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{"id": "MI300X", "label": "AMD MI300X", "tdp_watts": 750.0}]"#;
        let catalog = GpuSpecCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("mi300x").unwrap().tdp_watts, 750.0);
        assert_eq!(catalog.get("MI300X").unwrap().architecture, "");
    }

    #[test]
    fn test_preset_request() {
        let preset = find_preset("bert_inference").unwrap();
        let request = preset.request(8);
        assert_eq!(request.entries.len(), 1);
        assert_eq!(request.entries[0].quantity, 8);
        assert_eq!(request.entries[0].utilization, 0.60);
        assert_eq!(request.duration_hours, 24.0);
    }
}
