//! Emission sub-score rules.
//!
//! Maps each categorical lifestyle choice to a fixed kg CO2e coefficient.
//! The estimator never fails: unknown choices take the rule's fallback
//! branch and unusable numbers count as zero.

use chrono::{DateTime, Utc};

use ozone_core::config::RecommendationConfig;
use ozone_core::types::{
    sanitize_amount, ConsumptionLevel, EmissionsBreakdown, EmissionsResult, FuelType,
    LifestyleInput, RecyclingLevel, ShoppingHabits, TransportationType,
};

use crate::recommendations::derive_recommendations;

/// kg CO2e per km for a gasoline car.
const CAR_GASOLINE_PER_KM: f64 = 0.12;
/// kg CO2e per km for any other car fuel, and for unknown transport modes.
const CAR_OTHER_PER_KM: f64 = 0.10;
const BUS_PER_KM: f64 = 0.05;
const TRAIN_PER_KM: f64 = 0.03;
/// kg CO2e per hour in the air.
const FLIGHT_PER_HOUR: f64 = 90.0;
/// kg CO2e per kWh of electricity.
const ELECTRICITY_PER_KWH: f64 = 0.5;

/// Estimator configured with the recommendation content to attach.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    catalog: RecommendationConfig,
}

impl Estimator {
    /// Create an estimator that attaches recommendations from `catalog`.
    pub fn new(catalog: RecommendationConfig) -> Self {
        Self { catalog }
    }

    /// Estimate emissions, stamping the result with the current time.
    pub fn estimate(&self, input: &LifestyleInput) -> EmissionsResult {
        self.estimate_at(input, Utc::now())
    }

    /// Estimate emissions with an explicit creation timestamp.
    pub fn estimate_at(&self, input: &LifestyleInput, timestamp: DateTime<Utc>) -> EmissionsResult {
        let raw = EmissionsBreakdown {
            transport: transport_emissions(input),
            electricity: electricity_emissions(input),
            food: food_emissions(input.meat_consumption, input.dairy_consumption),
            waste: waste_emissions(input.waste_recycled),
            shopping: shopping_emissions(input.shopping_habits),
        };
        // Thresholds see the unrounded scores; 5.0004 kg still counts as over 5.
        let recommendations = derive_recommendations(&raw, &self.catalog);

        let breakdown = EmissionsBreakdown {
            transport: round2(raw.transport),
            electricity: round2(raw.electricity),
            food: round2(raw.food),
            waste: round2(raw.waste),
            shopping: round2(raw.shopping),
        };
        let total = round2(breakdown.sum());

        tracing::debug!(
            total,
            recommendations = recommendations.len(),
            "Emissions estimated"
        );

        EmissionsResult {
            breakdown,
            total,
            recommendations,
            timestamp,
        }
    }
}

/// Estimate emissions with the default recommendation catalog.
pub fn estimate(input: &LifestyleInput) -> EmissionsResult {
    Estimator::default().estimate(input)
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn transport_emissions(input: &LifestyleInput) -> f64 {
    let distance = sanitize_amount(input.distance_km);
    match input.transportation_type {
        TransportationType::Car => {
            let per_km = if input.fuel_type == FuelType::Gasoline {
                CAR_GASOLINE_PER_KM
            } else {
                CAR_OTHER_PER_KM
            };
            distance * per_km
        }
        TransportationType::Bus => distance * BUS_PER_KM,
        TransportationType::Train => distance * TRAIN_PER_KM,
        TransportationType::Flight => sanitize_amount(input.flight_hours) * FLIGHT_PER_HOUR,
        TransportationType::Bike | TransportationType::Walk => 0.0,
        TransportationType::Unknown => distance * CAR_OTHER_PER_KM,
    }
}

fn electricity_emissions(input: &LifestyleInput) -> f64 {
    sanitize_amount(input.electricity_usage_kwh) * ELECTRICITY_PER_KWH
}

fn food_emissions(meat: ConsumptionLevel, dairy: ConsumptionLevel) -> f64 {
    let meat = match meat {
        ConsumptionLevel::High => 4.0,
        ConsumptionLevel::Medium => 2.5,
        ConsumptionLevel::Low => 1.0,
        ConsumptionLevel::Unknown => 0.0,
    };
    let dairy = match dairy {
        ConsumptionLevel::High => 1.5,
        ConsumptionLevel::Medium => 1.0,
        ConsumptionLevel::Low => 0.5,
        ConsumptionLevel::Unknown => 0.0,
    };
    meat + dairy
}

fn waste_emissions(recycled: RecyclingLevel) -> f64 {
    match recycled {
        RecyclingLevel::Most => 0.4,
        RecyclingLevel::Some => 0.8,
        RecyclingLevel::Little | RecyclingLevel::Unknown => 1.2,
    }
}

fn shopping_emissions(habits: ShoppingHabits) -> f64 {
    match habits {
        ShoppingHabits::High => 3.5,
        ShoppingHabits::Moderate => 2.0,
        ShoppingHabits::Low | ShoppingHabits::Unknown => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ozone_core::types::{Impact, RecommendationCategory};

    fn low_footprint(transportation_type: TransportationType) -> LifestyleInput {
        LifestyleInput {
            transportation_type,
            distance_km: 0.0,
            fuel_type: FuelType::Gasoline,
            flight_hours: 0.0,
            electricity_usage_kwh: 0.0,
            meat_consumption: ConsumptionLevel::Low,
            dairy_consumption: ConsumptionLevel::Low,
            waste_recycled: RecyclingLevel::Most,
            shopping_habits: ShoppingHabits::Low,
        }
    }

    #[test]
    fn test_gasoline_car_reference_case() {
        let input = LifestyleInput {
            distance_km: 100.0,
            ..low_footprint(TransportationType::Car)
        };
        let result = estimate(&input);
        assert_eq!(result.breakdown.transport, 12.0);
        assert_eq!(result.breakdown.electricity, 0.0);
        assert_eq!(result.breakdown.food, 1.5);
        assert_eq!(result.breakdown.waste, 0.4);
        assert_eq!(result.breakdown.shopping, 1.0);
        assert_eq!(result.total, 14.9);
    }

    #[test]
    fn test_non_gasoline_cars_use_lower_coefficient() {
        for fuel in [FuelType::Diesel, FuelType::Hybrid, FuelType::Electric, FuelType::Unknown] {
            let input = LifestyleInput {
                distance_km: 100.0,
                fuel_type: fuel,
                ..low_footprint(TransportationType::Car)
            };
            assert_eq!(estimate(&input).breakdown.transport, 10.0, "fuel {:?}", fuel);
        }
    }

    #[test]
    fn test_bus_and_train_coefficients() {
        let bus = LifestyleInput {
            distance_km: 100.0,
            ..low_footprint(TransportationType::Bus)
        };
        let train = LifestyleInput {
            distance_km: 100.0,
            ..low_footprint(TransportationType::Train)
        };
        assert_eq!(estimate(&bus).breakdown.transport, 5.0);
        assert_eq!(estimate(&train).breakdown.transport, 3.0);
    }

    #[test]
    fn test_flight_uses_hours_only() {
        let input = LifestyleInput {
            flight_hours: 3.0,
            distance_km: 5000.0,
            ..low_footprint(TransportationType::Flight)
        };
        assert_eq!(estimate(&input).breakdown.transport, 270.0);
    }

    #[test]
    fn test_bike_and_walk_are_zero_regardless_of_distance() {
        for mode in [TransportationType::Bike, TransportationType::Walk] {
            let input = LifestyleInput {
                distance_km: 999.0,
                flight_hours: 12.0,
                fuel_type: FuelType::Gasoline,
                ..low_footprint(mode)
            };
            assert_eq!(estimate(&input).breakdown.transport, 0.0);
        }
    }

    #[test]
    fn test_unknown_transport_uses_default_coefficient() {
        let input = LifestyleInput {
            distance_km: 40.0,
            ..low_footprint(TransportationType::Unknown)
        };
        assert_eq!(estimate(&input).breakdown.transport, 4.0);
    }

    #[test]
    fn test_car_ignores_flight_hours() {
        let input = LifestyleInput {
            distance_km: 10.0,
            flight_hours: 50.0,
            ..low_footprint(TransportationType::Car)
        };
        assert_eq!(estimate(&input).breakdown.transport, 1.2);
    }

    #[test]
    fn test_electricity_coefficient() {
        let input = LifestyleInput {
            electricity_usage_kwh: 250.0,
            ..low_footprint(TransportationType::Walk)
        };
        assert_eq!(estimate(&input).breakdown.electricity, 125.0);
    }

    #[test]
    fn test_food_contributions() {
        assert_eq!(food_emissions(ConsumptionLevel::High, ConsumptionLevel::High), 5.5);
        assert_eq!(food_emissions(ConsumptionLevel::Medium, ConsumptionLevel::Medium), 3.5);
        assert_eq!(food_emissions(ConsumptionLevel::Low, ConsumptionLevel::Low), 1.5);
        assert_eq!(food_emissions(ConsumptionLevel::Unknown, ConsumptionLevel::Unknown), 0.0);
        assert_eq!(food_emissions(ConsumptionLevel::High, ConsumptionLevel::Unknown), 4.0);
    }

    #[test]
    fn test_waste_and_shopping_fallbacks() {
        assert_eq!(waste_emissions(RecyclingLevel::Most), 0.4);
        assert_eq!(waste_emissions(RecyclingLevel::Some), 0.8);
        assert_eq!(waste_emissions(RecyclingLevel::Little), 1.2);
        assert_eq!(waste_emissions(RecyclingLevel::Unknown), 1.2);
        assert_eq!(shopping_emissions(ShoppingHabits::High), 3.5);
        assert_eq!(shopping_emissions(ShoppingHabits::Moderate), 2.0);
        assert_eq!(shopping_emissions(ShoppingHabits::Low), 1.0);
        assert_eq!(shopping_emissions(ShoppingHabits::Unknown), 1.0);
    }

    #[test]
    fn test_negative_and_nan_inputs_count_as_zero() {
        let input = LifestyleInput {
            distance_km: -50.0,
            electricity_usage_kwh: f64::NAN,
            ..low_footprint(TransportationType::Car)
        };
        let result = estimate(&input);
        assert_eq!(result.breakdown.transport, 0.0);
        assert_eq!(result.breakdown.electricity, 0.0);
    }

    #[test]
    fn test_thresholds_use_unrounded_scores() {
        // 41.67 km * 0.12 = 5.0004, reported as 5 but still over the limit.
        let input = LifestyleInput {
            distance_km: 41.67,
            ..low_footprint(TransportationType::Car)
        };
        let result = estimate(&input);
        assert_eq!(result.breakdown.transport, 5.0);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(
            result.recommendations[0].category,
            RecommendationCategory::Transportation
        );
        assert_eq!(result.recommendations[0].impact, Impact::High);
    }

    #[test]
    fn test_exact_threshold_does_not_trigger() {
        let electricity = LifestyleInput {
            electricity_usage_kwh: 6.0,
            ..low_footprint(TransportationType::Walk)
        };
        let result = estimate(&electricity);
        assert_eq!(result.breakdown.electricity, 3.0);
        assert_eq!(
            result.recommendations[0].category,
            RecommendationCategory::General
        );
    }

    #[test]
    fn test_huge_amounts_stay_finite() {
        for mode in [TransportationType::Car, TransportationType::Flight] {
            let input = LifestyleInput {
                distance_km: 1e308,
                flight_hours: f64::MAX,
                electricity_usage_kwh: 1e308,
                ..low_footprint(mode)
            };
            let result = estimate(&input);
            let b = result.breakdown;
            for score in [b.transport, b.electricity, b.food, b.waste, b.shopping, result.total] {
                assert!(score.is_finite() && score >= 0.0, "{:?}: {}", mode, score);
            }
            assert_eq!(b.electricity, 5.0e8);
        }
    }

    #[test]
    fn test_total_matches_sum_of_rounded_sub_scores() {
        let distances = [0.0, 1.0, 3.333, 17.77, 123.456, 999.999];
        let kwh = [0.0, 0.01, 7.125, 333.333];
        for &d in &distances {
            for &k in &kwh {
                for mode in [
                    TransportationType::Car,
                    TransportationType::Bus,
                    TransportationType::Train,
                    TransportationType::Unknown,
                ] {
                    let input = LifestyleInput {
                        distance_km: d,
                        electricity_usage_kwh: k,
                        meat_consumption: ConsumptionLevel::Medium,
                        dairy_consumption: ConsumptionLevel::High,
                        waste_recycled: RecyclingLevel::Some,
                        shopping_habits: ShoppingHabits::Moderate,
                        ..low_footprint(mode)
                    };
                    let result = estimate(&input);
                    let b = result.breakdown;
                    assert!(b.transport >= 0.0 && b.electricity >= 0.0);
                    assert!((result.total - round2(b.sum())).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_sub_scores_rounded_to_two_decimals() {
        let input = LifestyleInput {
            distance_km: 3.333,
            electricity_usage_kwh: 0.015,
            ..low_footprint(TransportationType::Train)
        };
        let result = estimate(&input);
        // 3.333 * 0.03 = 0.09999
        assert_eq!(result.breakdown.transport, 0.1);
        // 0.015 * 0.5 = 0.0075
        assert_eq!(result.breakdown.electricity, 0.01);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(14.904), 14.9);
    }

    #[test]
    fn test_estimate_at_uses_given_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = Estimator::default().estimate_at(&LifestyleInput::default(), ts);
        assert_eq!(result.timestamp, ts);
    }

    #[test]
    fn test_custom_catalog_text_is_used() {
        let mut catalog = RecommendationConfig::default();
        catalog.general.text = "Nice work.".to_string();
        let estimator = Estimator::new(catalog);
        let result = estimator.estimate(&low_footprint(TransportationType::Walk));
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].text, "Nice work.");
        assert_eq!(result.recommendations[0].category, RecommendationCategory::General);
        assert_eq!(result.recommendations[0].impact, Impact::Low);
    }

    #[test]
    fn test_default_input_is_total() {
        // Every field unknown or zero still yields a full result.
        let result = estimate(&LifestyleInput::default());
        assert_eq!(result.breakdown.transport, 0.0);
        assert_eq!(result.breakdown.food, 0.0);
        assert_eq!(result.breakdown.waste, 1.2);
        assert_eq!(result.breakdown.shopping, 1.0);
        assert_eq!(result.total, 2.2);
    }
}
