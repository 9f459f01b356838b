// tests/integration_test.rs
use asian_cv::mc::brownian::BrownianMotion;
use asian_cv::mc::mc_engine::{price_asian_option, McConfig, ModelKind};
use asian_cv::mc::simulation::MonteCarloAssetSimulation;
use asian_cv::mc::valuation::{AsianOptionWithControlVariate, IncapabilityReason, Notice};
use asian_cv::models::bachelier::BachelierModel;
use asian_cv::models::black_scholes::BlackScholesModel;
use asian_cv::schedule::{AveragingSchedule, OptionSpec, TimeGrid};

fn asian_option() -> AsianOptionWithControlVariate {
    let spec = OptionSpec::new(2.0, 1.0, 0).expect("valid option");
    let schedule = AveragingSchedule::uniform(2.0, 10).expect("valid schedule");
    AsianOptionWithControlVariate::new(spec, schedule).expect("matching maturity")
}

fn black_scholes_simulation(
    paths: usize,
    seed: u64,
) -> MonteCarloAssetSimulation<BlackScholesModel> {
    let grid = TimeGrid::uniform(0.0, 20, 0.1).expect("valid grid");
    let driver = BrownianMotion::new(grid, paths, seed).expect("valid driver");
    let model = BlackScholesModel::new(1.0, 0.05, 0.30).expect("valid model");
    MonteCarloAssetSimulation::new(model, driver).expect("simulation")
}

#[test]
fn test_asian_option_cv_reference_scenario() {
    // S0 1.0, r 5%, σ 30%, K 1.0, T 2.0, ten averaging dates, 200k paths
    let cfg = McConfig::default();
    let report = price_asian_option(&cfg).expect("Valid configuration");

    let plain = report.plain.expect("plain estimator");
    let controlled = report.controlled.expect("controlled estimator");
    let ratio = report
        .variance_reduction_ratio()
        .expect("both estimators ran");

    println!("\nAsian price (plain): {} ± {}", plain.price, plain.standard_error);
    println!(
        "Asian price (control variate): {} ± {}",
        controlled.price, controlled.standard_error
    );
    println!("Standard deviation (plain): {}", plain.standard_deviation);
    println!("Standard deviation (control variate): {}", controlled.standard_deviation);
    println!("Ratio: {}", ratio);

    assert_eq!(report.notice, Some(Notice::VarianceReduced));
    assert!(report.optimal_coefficient.expect("coefficient") > 0.0);

    let diff = (controlled.price - plain.price).abs();
    assert!(
        diff < 4.0 * plain.standard_error,
        "Estimators disagree: {} vs {} (se {})",
        controlled.price,
        plain.price,
        plain.standard_error
    );
    assert!(
        diff / plain.price < 0.005,
        "Relative difference exceeds 0.5%: {}",
        diff / plain.price
    );
    assert!(ratio > 1.0, "Standard deviation ratio ({}) is not > 1", ratio);
}

#[test]
fn test_analytic_expectation_matches_simulated_control() {
    let option = asian_option();

    for paths in [2_000, 200_000] {
        let sim = black_scholes_simulation(paths, 42);
        let valuation = option.value(0.0, &sim).expect("valuation");
        let control = valuation.control.expect("control variate applied");

        let error = (control.analytic_expectation - control.simulated_sample.mean()).abs();
        let se = control.simulated_sample.standard_error();
        println!("paths {}: |E[Y] - mean(Y)| = {} (se {})", paths, error, se);

        assert!(
            error < 4.0 * se,
            "Control expectation off by {} with {} paths (se {})",
            error,
            paths,
            se
        );
    }
}

#[test]
fn test_controlled_and_plain_means_agree_across_seeds() {
    let option = asian_option();
    let runs = 20;

    let differences: Vec<f64> = (0..runs)
        .map(|seed| {
            let sim = black_scholes_simulation(10_000, 1_000 + seed);
            let plain = option.plain().value(0.0, &sim).expect("plain valuation");
            let controlled = option.value(0.0, &sim).expect("controlled valuation");
            controlled.price() - plain.mean()
        })
        .collect();

    let mean = differences.iter().sum::<f64>() / runs as f64;
    let sd = (differences.iter().map(|d| (d - mean).powi(2)).sum::<f64>()
        / (runs as f64 - 1.0))
        .sqrt();

    println!("\nMean difference {} (sd {})", mean, sd);

    // Differences scatter around zero instead of sitting at a fixed offset
    assert!(
        mean.abs() < 4.0 * sd / (runs as f64).sqrt(),
        "Systematic offset between estimators: {} (sd {})",
        mean,
        sd
    );
    assert!(differences.iter().any(|d| *d > 0.0));
    assert!(differences.iter().any(|d| *d < 0.0));
}

#[test]
fn test_control_variate_reduces_standard_deviation() {
    let option = asian_option();
    let sim = black_scholes_simulation(50_000, 7);

    let plain = option.plain().value(0.0, &sim).expect("plain valuation");
    let controlled = option.value(0.0, &sim).expect("controlled valuation");

    let ratio = plain.standard_deviation() / controlled.sample.standard_deviation();
    println!("\nVariance reduction ratio: {}", ratio);
    assert!(ratio > 1.2, "Ratio {} shows no meaningful reduction", ratio);
}

#[test]
fn test_bachelier_model_falls_back_to_plain_sample() {
    let grid = TimeGrid::uniform(0.0, 20, 0.1).expect("valid grid");
    let driver = BrownianMotion::new(grid, 20_000, 1897).expect("valid driver");
    let model = BachelierModel::new(1.0, 0.05, 0.30).expect("valid model");
    let sim = MonteCarloAssetSimulation::new(model, driver).expect("simulation");

    let option = asian_option();
    let plain = option.plain().value(0.0, &sim).expect("plain valuation");
    let valuation = option.value(0.0, &sim).expect("fallback valuation");

    assert_eq!(valuation.sample, plain);
    assert!(valuation.control.is_none());
    assert_eq!(
        valuation.notice,
        Notice::NoVarianceReduction {
            reason: IncapabilityReason::NotBlackScholes {
                model: "Bachelier".to_string()
            }
        }
    );
}

#[test]
fn test_bachelier_engine_reports_no_reduction() {
    let cfg = McConfig {
        paths: 5_000,
        model: ModelKind::Bachelier,
        ..Default::default()
    };
    let report = price_asian_option(&cfg).expect("Valid configuration");

    let plain = report.plain.expect("plain estimator");
    let controlled = report.controlled.expect("controlled estimator");
    assert_eq!(plain.price, controlled.price);
    assert_eq!(plain.standard_deviation, controlled.standard_deviation);
    assert!(report.optimal_coefficient.is_none());
    assert!(matches!(
        report.notice,
        Some(Notice::NoVarianceReduction { .. })
    ));
}
