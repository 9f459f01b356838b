// scripts/benchmark.rs
use asian_cv::math_utils::Timer;
use asian_cv::mc::brownian::BrownianMotion;
use asian_cv::mc::mc_engine::McConfig;
use asian_cv::mc::simulation::MonteCarloAssetSimulation;
use asian_cv::mc::valuation::AsianOptionWithControlVariate;
use asian_cv::models::black_scholes::BlackScholesModel;
use asian_cv::schedule::{AveragingSchedule, OptionSpec, TimeGrid};
use asian_cv::CvResult;
use std::env;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rayon_threads: usize,
    rustc_flags: String,
    timestamp: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    paths: usize,
    simulation_ms: f64,
    plain_ms: f64,
    controlled_ms: f64,
    plain_price: f64,
    controlled_price: f64,
    ratio: f64,
}

fn run_benchmark(cfg: &McConfig, paths: usize) -> CvResult<BenchmarkResult> {
    let spec = OptionSpec::new(cfg.maturity, cfg.strike, 0)?;
    let schedule = AveragingSchedule::new(cfg.averaging_times.clone(), cfg.maturity)?;
    let option = AsianOptionWithControlVariate::new(spec, schedule)?;

    let mut timer = Timer::new();
    let grid = TimeGrid::uniform(0.0, cfg.number_of_steps(), cfg.time_step)?;
    let driver = BrownianMotion::new(grid, paths, cfg.seed)?;
    let model = BlackScholesModel::new(cfg.s0, cfg.r, cfg.sigma)?;
    let simulation = MonteCarloAssetSimulation::new(model, driver)?;
    let simulation_ms = timer.lap_ms();

    let plain = option.plain().value(0.0, &simulation)?;
    let plain_ms = timer.lap_ms();

    let controlled = option.value(0.0, &simulation)?;
    let controlled_ms = timer.lap_ms();

    Ok(BenchmarkResult {
        paths,
        simulation_ms,
        plain_ms,
        controlled_ms,
        plain_price: plain.mean(),
        controlled_price: controlled.price(),
        ratio: plain.standard_deviation() / controlled.sample.standard_deviation(),
    })
}

fn main() -> CvResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let info = SystemInfo::gather();
    println!("asian-cv benchmark");
    println!("==================");
    println!("Date:          {}", info.timestamp);
    println!("OS:            {}", info.os);
    println!("CPU cores:     {}", info.cpu_cores);
    println!("Rayon threads: {}", info.rayon_threads);
    println!("RUSTFLAGS:     {}", info.rustc_flags);
    println!();

    let cfg = McConfig::default();
    let path_counts = [10_000, 100_000, 1_000_000];

    println!(
        "{:>10} {:>12} {:>10} {:>14} {:>12} {:>14} {:>8}",
        "paths", "simulate ms", "plain ms", "controlled ms", "plain", "controlled", "ratio"
    );
    for &paths in &path_counts {
        let result = run_benchmark(&cfg, paths)?;
        println!(
            "{:>10} {:>12.1} {:>10.2} {:>14.2} {:>12.6} {:>14.6} {:>8.3}",
            result.paths,
            result.simulation_ms,
            result.plain_ms,
            result.controlled_ms,
            result.plain_price,
            result.controlled_price,
            result.ratio
        );
    }

    Ok(())
}
