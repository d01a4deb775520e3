//! Plain-text report export and per-capita benchmark comparison.

use serde::{Deserialize, Serialize};

use ozone_core::types::EmissionsResult;

use crate::estimator::round2;

/// Estimates are entered as monthly figures.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Average per-capita emissions in tonnes CO2e per year.
pub const BENCHMARKS: [(&str, f64); 3] = [("US", 16.5), ("EU", 6.4), ("Global", 4.8)];

/// How an annualized result compares to one regional average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub region: String,
    /// Regional average in kg CO2e per year.
    pub average_kg_per_year: f64,
    /// The result's annualized total divided by the regional average.
    pub ratio: f64,
}

/// Annualized total and its comparison against each benchmark region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub annual_kg: f64,
    pub benchmarks: Vec<BenchmarkComparison>,
}

/// Compare a monthly result against per-capita averages.
pub fn compare(result: &EmissionsResult) -> Comparison {
    let annual_kg = round2(result.total * MONTHS_PER_YEAR);
    let benchmarks = BENCHMARKS
        .iter()
        .map(|(region, tonnes)| {
            let average_kg_per_year = tonnes * 1000.0;
            BenchmarkComparison {
                region: region.to_string(),
                average_kg_per_year,
                ratio: round2(annual_kg / average_kg_per_year),
            }
        })
        .collect();

    Comparison {
        annual_kg,
        benchmarks,
    }
}

/// Render a result as the downloadable plain-text report.
pub fn render_text_report(result: &EmissionsResult) -> String {
    let mut out = String::from("Carbon Footprint Report\n\n");
    out.push_str(&format!("Date: {}\n", result.timestamp.format("%Y-%m-%d %H:%M UTC")));
    out.push_str(&format!("Total Emissions: {} kg CO2\n\n", result.total));
    out.push_str("Breakdown:\n");
    for (label, value) in result.breakdown.labelled() {
        out.push_str(&format!("{}: {}\n", label, value));
    }

    if !result.recommendations.is_empty() {
        out.push_str("\nRecommendations:\n");
        for rec in &result.recommendations {
            out.push_str(&format!("- [{} / {}] {}\n", rec.category, rec.impact, rec.text));
        }
    }

    out
}
