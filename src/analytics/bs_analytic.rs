// src/analytics/bs_analytic.rs
//! Closed-form vanilla option prices
//!
//! # Black–Scholes
//!
//! Under `dS_t = r S_t dt + σ S_t dW_t` the call price is
//! ```text
//! C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//!
//! # Bachelier
//!
//! For a normally distributed forward `F` with normal volatility `σ`:
//! ```text
//! C = payoff_unit * [(F - K)Φ(d) + σ√T φ(d)],   d = (F - K) / (σ√T)
//! ```

use crate::math_utils::{norm_cdf, norm_pdf};

/// Closed-form vanilla call prices used as the expectation of a control variate
pub trait AnalyticPricer {
    fn vanilla_call_price(
        &self,
        initial_value: f64,
        risk_free_rate: f64,
        volatility: f64,
        time_to_maturity: f64,
        strike: f64,
    ) -> f64;
}

/// Black–Scholes formula set
#[derive(Clone, Copy, Debug, Default)]
pub struct BlackScholesFormulas;

impl AnalyticPricer for BlackScholesFormulas {
    fn vanilla_call_price(
        &self,
        initial_value: f64,
        risk_free_rate: f64,
        volatility: f64,
        time_to_maturity: f64,
        strike: f64,
    ) -> f64 {
        bs_call_price(
            initial_value,
            strike,
            risk_free_rate,
            volatility,
            time_to_maturity,
        )
    }
}

/// Black-Scholes European call option price
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
/// - `t`: Time to expiration
///
/// A non-positive `t` (or zero volatility) collapses to the discounted
/// intrinsic value of the forward.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return (s - k).max(0.0);
    }
    let sqrt_t = t.sqrt();
    if sigma * sqrt_t <= f64::EPSILON {
        return (s - k * (-r * t).exp()).max(0.0);
    }
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Bachelier (normal model) call price
///
/// # Parameters
/// - `forward`: Forward of the underlying at maturity
/// - `volatility`: Normal volatility of the forward
/// - `t`: Option maturity
/// - `k`: Strike price
/// - `payoff_unit`: Discount factor applied to the forward payoff
pub fn bachelier_call_price(
    forward: f64,
    volatility: f64,
    t: f64,
    k: f64,
    payoff_unit: f64,
) -> f64 {
    if t <= 0.0 || volatility <= 0.0 {
        return (forward - k).max(0.0) * payoff_unit;
    }
    let std_dev = volatility * t.sqrt();
    let d = (forward - k) / std_dev;
    ((forward - k) * norm_cdf(d) + std_dev * norm_pdf(d)) * payoff_unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bs_call_reference_value() {
        // Hull, Options Futures and Other Derivatives, example 15.6
        let price = bs_call_price(42.0, 40.0, 0.1, 0.2, 0.5);
        assert_relative_eq!(price, 4.7594, epsilon = 1e-3);
    }

    #[test]
    fn test_bs_call_at_expiry_is_intrinsic() {
        assert_eq!(bs_call_price(1.2, 1.0, 0.05, 0.3, 0.0), 0.2);
        assert_eq!(bs_call_price(0.8, 1.0, 0.05, 0.3, 0.0), 0.0);
    }

    #[test]
    fn test_bs_call_increases_with_maturity() {
        let short = bs_call_price(1.0, 1.0, 0.05, 0.3, 0.2);
        let long = bs_call_price(1.0, 1.0, 0.05, 0.3, 2.0);
        assert!(long > short);
    }

    #[test]
    fn test_pricer_delegates_to_formula() {
        let pricer = BlackScholesFormulas;
        assert_eq!(
            pricer.vanilla_call_price(1.0, 0.05, 0.3, 2.0, 1.0),
            bs_call_price(1.0, 1.0, 0.05, 0.3, 2.0)
        );
    }

    #[test]
    fn test_bachelier_at_the_money() {
        // ATM: σ√T φ(0)
        let price = bachelier_call_price(2.0, 0.2, 1.0, 2.0, 1.0);
        assert_relative_eq!(price, 0.2 * norm_pdf(0.0), epsilon = 1e-15);
    }
}
