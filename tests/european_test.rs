// tests/european_test.rs
use asian_cv::analytics::bs_analytic;
use asian_cv::mc::brownian::BrownianMotion;
use asian_cv::mc::payoffs::EuropeanOption;
use asian_cv::mc::simulation::MonteCarloAssetSimulation;
use asian_cv::models::bachelier::BachelierModel;
use asian_cv::models::black_scholes::BlackScholesModel;
use asian_cv::schedule::{OptionSpec, TimeGrid};

#[test]
fn test_european_mc_vs_black_scholes() {
    let (s0, k, r, sigma, t) = (1.0, 1.0, 0.05, 0.30, 2.0);

    let grid = TimeGrid::uniform(0.0, 20, 0.1).expect("valid grid");
    let driver = BrownianMotion::new(grid, 200_000, 42).expect("valid driver");
    let model = BlackScholesModel::new(s0, r, sigma).expect("valid model");
    let sim = MonteCarloAssetSimulation::new(model, driver).expect("simulation");

    let option = EuropeanOption::new(OptionSpec::new(t, k, 0).expect("valid option"));
    let payoff = option.value(0.0, &sim).expect("valuation");

    let analytic_price = bs_analytic::bs_call_price(s0, k, r, sigma, t);
    let abs_error = (payoff.mean() - analytic_price).abs();

    println!("\nMC Price: {}", payoff.mean());
    println!("Analytic Price: {}", analytic_price);
    println!("Standard error: {}", payoff.standard_error());

    assert!(
        abs_error < 4.0 * payoff.standard_error(),
        "MC price {} too far from analytic {}",
        payoff.mean(),
        analytic_price
    );
}

#[test]
fn test_european_mc_vs_bachelier() {
    // Zero rate: the simulated asset is the forward
    let (s0, k, sigma, t) = (2.0, 2.0, 0.2, 1.0);

    let grid = TimeGrid::uniform(0.0, 10, 0.1).expect("valid grid");
    let driver = BrownianMotion::new(grid, 100_000, 1897).expect("valid driver");
    let model = BachelierModel::new(s0, 0.0, sigma).expect("valid model");
    let sim = MonteCarloAssetSimulation::new(model, driver).expect("simulation");

    let option = EuropeanOption::new(OptionSpec::new(t, k, 0).expect("valid option"));
    let payoff = option.value(0.0, &sim).expect("valuation");

    let analytic_price = bs_analytic::bachelier_call_price(s0, sigma, t, k, 1.0);

    println!("\nMC Price (Bachelier): {}", payoff.mean());
    println!("Analytic Price (Bachelier): {}", analytic_price);

    assert!(
        (payoff.mean() - analytic_price).abs() < 4.0 * payoff.standard_error(),
        "MC price {} too far from analytic {}",
        payoff.mean(),
        analytic_price
    );
}
