pub mod bachelier;
pub mod black_scholes;
pub mod model;
