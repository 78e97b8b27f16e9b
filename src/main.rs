use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;

use robot_sim_rs::config::SimConfig;
use robot_sim_rs::scenario::{self, RunSummary, Scenario};

#[derive(Parser, Debug)]
#[command(name = "robot_sim")]
#[command(about = "Run scripted robot simulation scenarios and write a JSON report", long_about = None)]
struct Args {
    /// Scenario files (*.json or *.json.gz)
    #[arg(value_name = "SCENARIO")]
    scenarios: Vec<PathBuf>,

    /// Directory of scenarios to batch run (processes *.json[.gz])
    #[arg(long)]
    scenario_dir: Option<PathBuf>,

    /// Simulator config (JSON); defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the run report
    #[arg(long, default_value = "robot_sim_reports")]
    output_dir: String,

    /// Only print failures
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    let mut paths = args.scenarios.clone();
    if let Some(dir) = &args.scenario_dir {
        paths.extend(scenario_files(dir)?);
    }
    if paths.is_empty() {
        bail!("no scenarios given (pass files or --scenario-dir)");
    }

    if !args.quiet {
        println!("[{}] Robot Sim Starting", ts_now());
        println!("  Scenarios: {}", paths.len());
        println!("  Safety floor: {}", config.safety_floor);
        println!("  Default speed: {}", config.default_speed);
        println!("  Output Dir: {}", args.output_dir);
    }

    let mut reports = Vec::with_capacity(paths.len());
    for path in &paths {
        let scenario = Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?;
        let report = scenario::run(&scenario, &config);

        if report.passed {
            if !args.quiet {
                println!(
                    "[{}] PASS {} ({} commands, {} rejections)",
                    ts_now(),
                    report.name,
                    report.commands.len(),
                    report.rejection_count()
                );
            }
        } else {
            println!("[{}] FAIL {}", ts_now(), report.name);
            for failure in report.failures() {
                println!("    {}", failure);
            }
        }
        reports.push(report);
    }

    let summary = RunSummary::new(reports);

    std::fs::create_dir_all(&args.output_dir)?;
    let filename = format!("{}/report_{}.json", args.output_dir, ts_now_clean());
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&filename, json)?;

    println!("\n=== Summary ===");
    println!("Passed: {}/{}", summary.passed, summary.total);
    println!("Report: {}", filename);

    if !summary.all_passed() {
        bail!("{} scenario(s) failed", summary.failed);
    }
    Ok(())
}

fn scenario_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".json") || name.ends_with(".json.gz") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn ts_now_clean() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}
