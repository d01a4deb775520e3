//! Ozone Guard emissions estimator.
//!
//! Turns a self-reported [`LifestyleInput`](ozone_core::types::LifestyleInput)
//! into a five-category emissions breakdown with recommendations:
//! - Fixed per-category coefficients, rounded to two decimals
//! - Threshold-triggered recommendations in a fixed order
//! - Plain-text report export and per-capita benchmark comparison

pub mod estimator;
pub mod recommendations;
pub mod report;

pub use estimator::{estimate, round2, Estimator};
pub use recommendations::derive_recommendations;
pub use report::{compare, render_text_report, BenchmarkComparison, Comparison};
