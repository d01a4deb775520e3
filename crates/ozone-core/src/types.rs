use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Lifestyle input enums
// =============================================================================

/// Primary mode of transportation.
///
/// Unrecognised values deserialize into `Unknown` so that a form can never
/// block an estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportationType {
    Car,
    Bus,
    Train,
    Flight,
    Bike,
    Walk,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Fuel used by a car. Only meaningful when transportation is `Car`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Three-step consumption level used for meat and dairy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionLevel {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

/// How much household waste is recycled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclingLevel {
    Most,
    Some,
    Little,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Shopping intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingHabits {
    Low,
    Moderate,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

// =============================================================================
// LifestyleInput
// =============================================================================

/// Self-reported lifestyle choices submitted from the calculator form.
///
/// Only one transportation-specific number is read per `transportation_type`:
/// `distance_km` for car/bus/train (and unknown modes), `flight_hours` for
/// flights. Numeric fields tolerate strings, blanks and nulls; anything that is
/// not a finite non-negative number reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifestyleInput {
    pub transportation_type: TransportationType,
    #[serde(alias = "distance", deserialize_with = "lenient_amount")]
    pub distance_km: f64,
    pub fuel_type: FuelType,
    #[serde(deserialize_with = "lenient_amount")]
    pub flight_hours: f64,
    /// Monthly electricity usage.
    #[serde(alias = "electricityUsage", deserialize_with = "lenient_amount")]
    pub electricity_usage_kwh: f64,
    pub meat_consumption: ConsumptionLevel,
    pub dairy_consumption: ConsumptionLevel,
    pub waste_recycled: RecyclingLevel,
    pub shopping_habits: ShoppingHabits,
}

/// Largest distance, hour count or kWh figure the estimator accepts.
///
/// Every coefficient product and sum stays finite below this bound, so a
/// stored result always serializes back to numbers.
pub const MAX_AMOUNT: f64 = 1.0e9;

/// Clamp a raw amount to a usable non-negative value no larger than
/// [`MAX_AMOUNT`].
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(MAX_AMOUNT)
    } else {
        0.0
    }
}

/// Deserialize a number that may arrive as a JSON number, a numeric string,
/// an empty string or null.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string, or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(sanitize_amount(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(sanitize_amount(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(sanitize_amount(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim().parse::<f64>().map(sanitize_amount).unwrap_or(0.0))
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<f64, D2::Error> {
            d.deserialize_any(AmountVisitor)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(0.0)
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
            while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
            Ok(0.0)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

// =============================================================================
// EmissionsResult
// =============================================================================

/// Estimated impact of acting on a recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impact::Low => f.write_str("Low"),
            Impact::Medium => f.write_str("Medium"),
            Impact::High => f.write_str("High"),
        }
    }
}

/// Category a recommendation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationCategory {
    Transportation,
    Energy,
    Food,
    Waste,
    Shopping,
    General,
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationCategory::Transportation => "Transportation",
            RecommendationCategory::Energy => "Energy",
            RecommendationCategory::Food => "Food",
            RecommendationCategory::Waste => "Waste",
            RecommendationCategory::Shopping => "Shopping",
            RecommendationCategory::General => "General",
        };
        f.write_str(name)
    }
}

/// A link to further reading attached to a recommendation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

impl Resource {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A single actionable suggestion derived from the emissions breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub category: RecommendationCategory,
    pub impact: Impact,
    pub resources: Vec<Resource>,
}

/// The five category sub-scores in kg CO2-equivalent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsBreakdown {
    pub transport: f64,
    pub electricity: f64,
    pub food: f64,
    pub waste: f64,
    pub shopping: f64,
}

impl EmissionsBreakdown {
    /// Sub-scores paired with their display labels, in chart order.
    pub fn labelled(&self) -> [(&'static str, f64); 5] {
        [
            ("Transport", self.transport),
            ("Electricity", self.electricity),
            ("Food", self.food),
            ("Waste", self.waste),
            ("Shopping", self.shopping),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.transport + self.electricity + self.food + self.waste + self.shopping
    }
}

/// Immutable output of one estimator run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionsResult {
    #[serde(flatten)]
    pub breakdown: EmissionsBreakdown,
    pub total: f64,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}

/// A persisted emissions result with the identifier used to delete it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: EmissionsResult,
}

// =============================================================================
// Conversation
// =============================================================================

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in an assistant conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
}

impl ConversationMessage {
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

// =============================================================================
// Seasonal tips
// =============================================================================

/// Priority attached to a seasonal tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipPriority {
    High,
    Medium,
}

/// A seasonal sustainability tip that can be saved to a personal plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Stable identifier, unique across all seasons.
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: TipPriority,
}
