//! Gridsite - command line entry point
//!
//! Runs one engine operation per invocation and prints a JSON report.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use gridsite_lib::catalog::{find_preset, workload_presets, GpuSpecCatalog, RegionCatalog};
use gridsite_lib::core::{Config, FacilityProfile, GpuWorkloadEntry, RankRequest, SimulationRequest};
use gridsite_lib::Engine;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// GPU catalog JSON replacing the built-in reference table
    #[arg(long, global = true)]
    gpu_catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List known GPU models and workload presets
    Gpus,

    /// Estimate power, energy, cost and carbon for a GPU workload
    Simulate {
        #[arg(short, long, default_value = "H100")]
        gpu: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(short, long, default_value_t = 0.8)]
        utilization: f64,
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
        /// Override the catalog TDP (watts)
        #[arg(long)]
        tdp: Option<f64>,
        /// Use a workload preset's GPU, utilization and duration
        #[arg(long, conflicts_with_all = ["gpu", "utilization", "hours"])]
        preset: Option<String>,
        /// Price at this region's average rate
        #[arg(long)]
        region: Option<String>,
        /// Roll up facility overhead with this PUE
        #[arg(long)]
        pue: Option<f64>,
        #[arg(long, default_value_t = 0.0, requires = "pue")]
        renewable_share: f64,
        /// Region data file used to resolve `--region`
        #[arg(long, requires = "region")]
        regions: Option<PathBuf>,
    },

    /// Score every region
    Regions {
        #[arg(long)]
        regions: Option<PathBuf>,
    },

    /// Rank regions as datacenter sites for a target power demand
    Rank {
        #[arg(short, long)]
        target_mw: f64,
        /// Reference GPU used to estimate how many units the target supports
        #[arg(long)]
        gpu: Option<String>,
        #[arg(long, default_value_t = 0.8)]
        utilization: f64,
        #[arg(long)]
        regions: Option<PathBuf>,
    },

    /// Rank regions and summarize policy insights
    Policy {
        #[arg(short, long)]
        target_mw: f64,
        #[arg(long)]
        regions: Option<PathBuf>,
    },

    /// Assess the grid impact of a datacenter in one region
    Impact {
        #[arg(short, long)]
        region: String,
        #[arg(short, long)]
        target_mw: f64,
        #[arg(long)]
        regions: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Report<T: Serialize> {
    command: &'static str,
    generated_at: DateTime<Utc>,
    data: T,
}

fn print_report<T: Serialize>(command: &'static str, data: T) -> anyhow::Result<()> {
    let report = Report {
        command,
        generated_at: Utc::now(),
        data,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        })),
    }
}

fn load_regions(path: Option<&Path>) -> anyhow::Result<RegionCatalog> {
    match path {
        Some(path) => RegionCatalog::load(path).with_context(|| format!("loading regions {}", path.display())),
        None => Ok(RegionCatalog::builtin()),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("Starting Gridsite v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    let gpus = match cli.gpu_catalog.as_deref() {
        Some(path) => GpuSpecCatalog::load(path).with_context(|| format!("loading GPU catalog {}", path.display()))?,
        None => GpuSpecCatalog::builtin(),
    };
    let engine = Engine::new(config, gpus)?;

    match cli.command {
        Command::Gpus => {
            #[derive(Serialize)]
            struct Listing<'a> {
                gpus: Vec<&'a gridsite_lib::core::GpuSpec>,
                presets: Vec<gridsite_lib::catalog::WorkloadPreset>,
            }
            print_report(
                "gpus",
                Listing {
                    gpus: engine.gpus().iter().collect(),
                    presets: workload_presets(),
                },
            )
        }

        Command::Simulate {
            gpu,
            quantity,
            utilization,
            hours,
            tdp,
            preset,
            region,
            pue,
            renewable_share,
            regions,
        } => {
            let mut request = match preset {
                Some(id) => match find_preset(&id) {
                    Some(preset) => preset.request(quantity),
                    None => bail!("unknown workload preset '{}'", id),
                },
                None => SimulationRequest::single(GpuWorkloadEntry::new(&gpu, quantity, utilization), hours),
            };
            if let Some(tdp) = tdp {
                for entry in &mut request.entries {
                    entry.custom_tdp_watts = Some(tdp);
                }
            }

            let record = match region {
                Some(id) => {
                    let catalog = load_regions(regions.as_deref())?;
                    let Some(record) = catalog.get(&id) else {
                        bail!("unknown region '{}'", id);
                    };
                    Some(record.clone())
                }
                None => None,
            };

            match (pue, record.as_ref()) {
                (Some(pue), Some(record)) => {
                    let profile = FacilityProfile { pue, renewable_share };
                    print_report("simulate", engine.simulate_facility_in_region(&request, profile, record)?)
                }
                (Some(pue), None) => {
                    let profile = FacilityProfile { pue, renewable_share };
                    print_report("simulate", engine.simulate_facility(&request, profile)?)
                }
                (None, Some(record)) => print_report("simulate", engine.simulate_in_region(&request, record)?),
                (None, None) => print_report("simulate", engine.simulate(&request)?),
            }
        }

        Command::Regions { regions } => {
            let catalog = load_regions(regions.as_deref())?;
            print_report("regions", engine.score_regions(catalog.records())?)
        }

        Command::Rank {
            target_mw,
            gpu,
            utilization,
            regions,
        } => {
            let catalog = load_regions(regions.as_deref())?;
            let mut request = RankRequest::new(target_mw);
            if let Some(gpu) = gpu {
                request = request.with_reference_workload(GpuWorkloadEntry::new(&gpu, 1, utilization));
            }
            print_report("rank", engine.rank_locations(&request, catalog.records())?)
        }

        Command::Policy { target_mw, regions } => {
            let catalog = load_regions(regions.as_deref())?;
            let ranked = engine.rank_locations(&RankRequest::new(target_mw), catalog.records())?;
            print_report("policy", engine.summarize_policy(&ranked))
        }

        Command::Impact {
            region,
            target_mw,
            regions,
        } => {
            let catalog = load_regions(regions.as_deref())?;
            let Some(record) = catalog.get(&region) else {
                bail!("unknown region '{}'", region);
            };
            print_report("impact", engine.assess_grid_impact(record, target_mw)?)
        }
    }
}
