//! Fixed seasonal tip catalog.

use ozone_core::types::{Tip, TipPriority};

use crate::error::SeasonalError;
use crate::season::Season;

struct TipSpec {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    priority: TipPriority,
}

const SPRING: [TipSpec; 3] = [
    TipSpec {
        id: "spring-gardening",
        title: "Spring Gardening",
        description: "Plant native species to support local ecosystems and reduce water usage.",
        category: "Gardening",
        priority: TipPriority::High,
    },
    TipSpec {
        id: "spring-energy-savings",
        title: "Energy Savings",
        description: "Open windows for natural ventilation instead of using AC as temperatures rise.",
        category: "Energy",
        priority: TipPriority::Medium,
    },
    TipSpec {
        id: "spring-cleaning",
        title: "Spring Cleaning",
        description: "Use eco-friendly cleaning products to protect waterways and indoor air quality.",
        category: "Home",
        priority: TipPriority::Medium,
    },
];

const SUMMER: [TipSpec; 3] = [
    TipSpec {
        id: "summer-water-conservation",
        title: "Water Conservation",
        description: "Water your garden early morning or late evening to reduce evaporation.",
        category: "Water",
        priority: TipPriority::High,
    },
    TipSpec {
        id: "summer-cooling-efficiency",
        title: "Cooling Efficiency",
        description: "Set your thermostat to 78°F (26°C) when home and higher when away.",
        category: "Energy",
        priority: TipPriority::High,
    },
    TipSpec {
        id: "summer-garden-care",
        title: "Summer Garden Care",
        description: "Use mulch around plants to retain moisture and reduce water needs.",
        category: "Gardening",
        priority: TipPriority::Medium,
    },
];

const AUTUMN: [TipSpec; 3] = [
    TipSpec {
        id: "autumn-leaf-management",
        title: "Leaf Management",
        description: "Compost fallen leaves instead of burning or bagging them.",
        category: "Waste",
        priority: TipPriority::Medium,
    },
    TipSpec {
        id: "autumn-home-insulation",
        title: "Home Insulation",
        description: "Check your home's insulation before winter to reduce heating needs.",
        category: "Energy",
        priority: TipPriority::High,
    },
    TipSpec {
        id: "autumn-garden-prep",
        title: "Fall Garden Prep",
        description: "Plant cover crops to improve soil health and prevent erosion.",
        category: "Gardening",
        priority: TipPriority::Medium,
    },
];

const WINTER: [TipSpec; 3] = [
    TipSpec {
        id: "winter-efficient-heating",
        title: "Efficient Heating",
        description: "Lower your thermostat by a few degrees and wear warmer clothes indoors.",
        category: "Energy",
        priority: TipPriority::High,
    },
    TipSpec {
        id: "winter-holiday-sustainability",
        title: "Holiday Sustainability",
        description: "Use LED lights for decorations and consider eco-friendly gifts.",
        category: "Shopping",
        priority: TipPriority::Medium,
    },
    TipSpec {
        id: "winter-water-savings",
        title: "Winter Water Savings",
        description: "Insulate water pipes to prevent heat loss and reduce energy use.",
        category: "Water",
        priority: TipPriority::Medium,
    },
];

fn specs_for(season: Season) -> &'static [TipSpec] {
    match season {
        Season::Spring => &SPRING,
        Season::Summer => &SUMMER,
        Season::Autumn => &AUTUMN,
        Season::Winter => &WINTER,
    }
}

fn to_tip(spec: &TipSpec) -> Tip {
    Tip {
        id: spec.id.to_string(),
        title: spec.title.to_string(),
        description: spec.description.to_string(),
        category: spec.category.to_string(),
        priority: spec.priority,
    }
}

pub fn tips_for_season(season: Season) -> Vec<Tip> {
    specs_for(season).iter().map(to_tip).collect()
}

/// The three tips for a month (1-12).
pub fn tips_for_month(month: u32) -> Result<Vec<Tip>, SeasonalError> {
    Ok(tips_for_season(Season::from_month(month)?))
}

/// Look a tip up by id across every season.
pub fn find_tip(id: &str) -> Option<Tip> {
    Season::ALL
        .iter()
        .flat_map(|s| specs_for(*s).iter())
        .find(|spec| spec.id == id)
        .map(to_tip)
}
