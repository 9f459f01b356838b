pub mod brownian;
pub mod control_variate;
pub mod mc_engine;
pub mod payoffs;
pub mod sample;
pub mod simulation;
pub mod valuation;
