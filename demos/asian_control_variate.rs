// demos/asian_control_variate.rs
use asian_cv::mc::mc_engine::{price_asian_option, McConfig, ModelKind};
use asian_cv::CvError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CvError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Asian option with Black-Scholes control variate");
    println!("===============================================\n");

    for model in [ModelKind::BlackScholes, ModelKind::Bachelier] {
        let cfg = McConfig {
            model,
            ..Default::default()
        };
        let report = price_asian_option(&cfg)?;

        println!("Model: {:?}", model);
        if let Some(plain) = report.plain {
            println!("  Expected value (plain):            {:.6}", plain.price);
            println!("  Standard deviation (plain):        {:.6}", plain.standard_deviation);
        }
        if let Some(controlled) = report.controlled {
            println!("  Expected value (control variate):  {:.6}", controlled.price);
            println!(
                "  Standard deviation (control var.): {:.6}",
                controlled.standard_deviation
            );
        }
        if let Some(beta) = report.optimal_coefficient {
            println!("  Optimal coefficient:               {:.6}", beta);
        }
        if let Some(ratio) = report.variance_reduction_ratio() {
            println!("  Ratio:                             {:.4}", ratio);
        }
        if let Some(notice) = &report.notice {
            println!("  Notice: {:?}", notice);
        }
        println!();
    }

    Ok(())
}
