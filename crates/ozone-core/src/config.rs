use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OzoneError, Result};
use crate::types::Resource;

/// Top-level configuration for Ozone Guard.
///
/// Loaded from `~/.ozone/config.toml` by default. Reply texts, model lists and
/// recommendation resources are configuration data rather than logic, so all
/// of them live here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OzoneConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl OzoneConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OzoneConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| OzoneError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the SQLite history database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Local API server port.
    pub port: u16,
    /// Device key used when a request does not name one.
    pub device_id: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.ozone/data".to_string(),
            log_level: "info".to_string(),
            port: 3030,
            device_id: "local".to_string(),
        }
    }
}

/// Remote completion gateway settings for the chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Chat-completion endpoint URL.
    pub endpoint: String,
    /// Bearer credential. When unset, read from `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Model identifiers, attempted in this order.
    pub models: Vec<String>,
    /// Overall deadline for the whole attempt sequence.
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Sent as the `HTTP-Referer` header.
    pub referrer: String,
    /// Sent as the `X-Title` header.
    pub app_title: String,
    pub system_prompt: String,
    /// Opening bot message of every conversation.
    pub greeting: String,
}

impl AssistantConfig {
    /// Resolve the bearer credential from config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            models: vec![
                "anthropic/claude-3-haiku".to_string(),
                "mistralai/mistral-7b-instruct".to_string(),
                "meta-llama/llama-3-8b-instruct".to_string(),
            ],
            timeout_secs: 10,
            max_tokens: 1000,
            temperature: 0.7,
            referrer: "http://localhost:3030".to_string(),
            app_title: "Carbon Footprint Assistant".to_string(),
            system_prompt: "You are a helpful AI assistant specialized in environmental \
                sustainability and carbon footprint reduction. Provide concise, accurate \
                information about climate change, sustainability practices, and ways to \
                reduce carbon emissions. Your responses should be informative, practical, \
                and optimistic about climate action."
                .to_string(),
            greeting: "Hi there! I'm your carbon footprint assistant. Ask me anything about \
                reducing your carbon emissions, sustainability, or climate change!"
                .to_string(),
        }
    }
}

/// A keyword group and the canned reply it selects in offline mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    /// Whole words matched case-insensitively. A plain suffix of `s`, `es`,
    /// `d` or `ed` also matches, so "bus" covers "buses".
    pub keywords: Vec<String>,
    pub reply: String,
}

impl KeywordGroup {
    fn new(name: &str, keywords: &[&str], reply: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reply: reply.to_string(),
        }
    }
}

/// Local replies used when no remote model answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Checked in order; the first group with a matching keyword wins.
    pub groups: Vec<KeywordGroup>,
    /// Used when no group matches.
    pub default_reply: String,
    /// Appended to every fallback reply.
    pub offline_notice: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                KeywordGroup::new(
                    "transport",
                    &[
                        "car", "drive", "driving", "drove", "commute", "commuting", "transport",
                        "transportation", "bus", "train", "transit", "flight", "fly", "flying",
                        "flies", "flew", "bike", "bicycle", "cycling", "travel", "traveling",
                        "vehicle", "ev",
                    ],
                    "Transportation is one of the biggest parts of a personal footprint. \
                     Walking, cycling, public transit or carpooling for even a few trips a \
                     week makes a noticeable difference, and skipping one long flight saves \
                     more than most other single changes.",
                ),
                KeywordGroup::new(
                    "food",
                    &[
                        "food", "meat", "beef", "diet", "vegan", "vegetarian", "dairy", "milk",
                        "cheese", "meal", "eat", "eating", "ate", "plant",
                    ],
                    "Eating more plant-based meals and cutting back on red meat and dairy is \
                     one of the most effective ways to lower food-related emissions. Buying \
                     seasonal, local produce and avoiding food waste helps too.",
                ),
                KeywordGroup::new(
                    "waste",
                    &[
                        "waste", "recycle", "recycling", "compost", "plastic", "trash",
                        "garbage", "landfill", "packaging", "bottle",
                    ],
                    "Recycling, composting food scraps and avoiding single-use plastics keep \
                     waste out of landfills, where it breaks down into methane.",
                ),
                KeywordGroup::new(
                    "energy",
                    &[
                        "energy", "electricity", "electric", "power", "solar", "heating",
                        "cooling", "appliance", "light", "lighting", "kwh", "thermostat",
                    ],
                    "Switching to LED lighting, unplugging idle electronics and choosing a \
                     renewable electricity plan can significantly reduce your home energy \
                     emissions.",
                ),
            ],
            default_reply: "Small, consistent changes add up. Track your footprint regularly, \
                 start with your highest-emission category, and build one new habit at a \
                 time."
                .to_string(),
            offline_notice: "(I'm currently in offline mode, so this is a general tip rather \
                 than a personalized answer.)"
                .to_string(),
        }
    }
}

/// Text and further-reading links for one recommendation category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTemplate {
    pub text: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl RecommendationTemplate {
    fn new(text: &str, resources: &[(&str, &str)]) -> Self {
        Self {
            text: text.to_string(),
            resources: resources
                .iter()
                .map(|(title, url)| Resource::new(*title, *url))
                .collect(),
        }
    }
}

/// Recommendation content keyed by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub transportation: RecommendationTemplate,
    pub energy: RecommendationTemplate,
    pub food: RecommendationTemplate,
    pub waste: RecommendationTemplate,
    pub shopping: RecommendationTemplate,
    pub general: RecommendationTemplate,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            transportation: RecommendationTemplate::new(
                "Consider carpooling, using public transport, or switching to an electric vehicle.",
                &[("Public Transport Options", "#"), ("EV Buying Guide", "#")],
            ),
            energy: RecommendationTemplate::new(
                "Your electricity usage is high. Try energy-efficient appliances and turning off electronics.",
                &[("Energy Saving Tips", "#"), ("Solar Panel Information", "#")],
            ),
            food: RecommendationTemplate::new(
                "Consider reducing meat consumption and incorporating more plant-based meals.",
                &[("Plant-Based Recipes", "#"), ("Sustainable Farming", "#")],
            ),
            waste: RecommendationTemplate::new(
                "Increase recycling and consider composting to reduce landfill waste.",
                &[("Composting Guide", "#"), ("Recycling Tips", "#")],
            ),
            shopping: RecommendationTemplate::new(
                "Consider buying second-hand or from sustainable brands to reduce your shopping footprint.",
                &[("Sustainable Brands", "#"), ("Thrift Shopping Guide", "#")],
            ),
            general: RecommendationTemplate::new(
                "You're doing great! Keep up the eco-friendly lifestyle.",
                &[],
            ),
        }
    }
}
