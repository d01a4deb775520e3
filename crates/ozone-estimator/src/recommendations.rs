//! Recommendation derivation from an emissions breakdown.

use ozone_core::config::{RecommendationConfig, RecommendationTemplate};
use ozone_core::types::{EmissionsBreakdown, Impact, Recommendation, RecommendationCategory};

/// A sub-score threshold that triggers a recommendation when exceeded.
struct Rule {
    category: RecommendationCategory,
    impact: Impact,
    /// Exclusive lower bound.
    threshold: f64,
    score: fn(&EmissionsBreakdown) -> f64,
}

/// Evaluated in this order; every rule whose threshold is crossed contributes.
const RULES: [Rule; 5] = [
    Rule {
        category: RecommendationCategory::Transportation,
        impact: Impact::High,
        threshold: 5.0,
        score: |b| b.transport,
    },
    Rule {
        category: RecommendationCategory::Energy,
        impact: Impact::Medium,
        threshold: 3.0,
        score: |b| b.electricity,
    },
    Rule {
        category: RecommendationCategory::Food,
        impact: Impact::High,
        threshold: 3.0,
        score: |b| b.food,
    },
    Rule {
        category: RecommendationCategory::Waste,
        impact: Impact::Medium,
        threshold: 0.6,
        score: |b| b.waste,
    },
    Rule {
        category: RecommendationCategory::Shopping,
        impact: Impact::Medium,
        threshold: 2.0,
        score: |b| b.shopping,
    },
];

/// Build the ordered recommendation list for a breakdown.
///
/// When no threshold is crossed the list holds exactly one `General`/`Low`
/// recommendation.
pub fn derive_recommendations(
    breakdown: &EmissionsBreakdown,
    catalog: &RecommendationConfig,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = RULES
        .iter()
        .filter(|rule| (rule.score)(breakdown) > rule.threshold)
        .map(|rule| build(rule.category, rule.impact, template_for(catalog, rule.category)))
        .collect();

    if recommendations.is_empty() {
        recommendations.push(build(
            RecommendationCategory::General,
            Impact::Low,
            &catalog.general,
        ));
    }

    recommendations
}

fn template_for(
    catalog: &RecommendationConfig,
    category: RecommendationCategory,
) -> &RecommendationTemplate {
    match category {
        RecommendationCategory::Transportation => &catalog.transportation,
        RecommendationCategory::Energy => &catalog.energy,
        RecommendationCategory::Food => &catalog.food,
        RecommendationCategory::Waste => &catalog.waste,
        RecommendationCategory::Shopping => &catalog.shopping,
        RecommendationCategory::General => &catalog.general,
    }
}

fn build(
    category: RecommendationCategory,
    impact: Impact,
    template: &RecommendationTemplate,
) -> Recommendation {
    Recommendation {
        text: template.text.clone(),
        category,
        impact,
        resources: template.resources.clone(),
    }
}
