use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::resolver::ResolverConfig;
use crate::domain::service::ServiceConfig;
use crate::domain::tiers::TierLimits;

/// Configuration for the daily_outfit module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyOutfitConfig {
    /// Upper bound on one `get_daily_outfit` call.
    #[serde(default = "default_resolution_timeout", with = "humantime_serde")]
    pub resolution_timeout: Duration,
    #[serde(default = "default_exact_tolerance")]
    pub exact_tolerance_celsius: f64,
    #[serde(default = "default_relaxed_tolerance")]
    pub relaxed_tolerance_celsius: f64,
    #[serde(default = "default_min_wardrobe_items")]
    pub min_wardrobe_items: usize,
    #[serde(default = "default_generator_sample_size")]
    pub generator_sample_size: usize,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: u64,
    #[serde(default = "default_max_history_limit")]
    pub max_history_limit: u64,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub images: ImageStorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Without a key the weather step is skipped.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_upstream_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_generator_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_generator_model")]
    pub model: String,
    #[serde(default = "default_generator_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageStorageConfig {
    /// Object-storage API root, e.g. `https://<project>.supabase.co/storage/v1`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default)]
    pub service_key: Option<String>,
    #[serde(default = "default_signed_url_ttl", with = "humantime_serde")]
    pub signed_url_ttl: Duration,
    #[serde(default = "default_upstream_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for DailyOutfitConfig {
    fn default() -> Self {
        Self {
            resolution_timeout: default_resolution_timeout(),
            exact_tolerance_celsius: default_exact_tolerance(),
            relaxed_tolerance_celsius: default_relaxed_tolerance(),
            min_wardrobe_items: default_min_wardrobe_items(),
            generator_sample_size: default_generator_sample_size(),
            max_recommendations: default_max_recommendations(),
            max_history_limit: default_max_history_limit(),
            weather: WeatherConfig::default(),
            generator: GeneratorConfig::default(),
            images: ImageStorageConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            request_timeout: default_upstream_timeout(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_generator_base_url(),
            api_key: None,
            model: default_generator_model(),
            request_timeout: default_generator_timeout(),
        }
    }
}

impl Default for ImageStorageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            bucket: default_bucket(),
            service_key: None,
            signed_url_ttl: default_signed_url_ttl(),
            request_timeout: default_upstream_timeout(),
        }
    }
}

impl DailyOutfitConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            resolution_timeout: self.resolution_timeout,
            resolver: ResolverConfig {
                limits: TierLimits {
                    exact_tolerance_celsius: self.exact_tolerance_celsius,
                    relaxed_tolerance_celsius: self.relaxed_tolerance_celsius,
                    max_recommendations: self.max_recommendations,
                },
                min_wardrobe_items: self.min_wardrobe_items,
                generator_sample_size: self.generator_sample_size,
            },
            max_history_limit: self.max_history_limit,
        }
    }
}

fn default_resolution_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_exact_tolerance() -> f64 {
    5.0
}

fn default_relaxed_tolerance() -> f64 {
    10.0
}

fn default_min_wardrobe_items() -> usize {
    2
}

fn default_generator_sample_size() -> usize {
    20
}

fn default_max_recommendations() -> u64 {
    2
}

fn default_max_history_limit() -> u64 {
    50
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_upstream_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_generator_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generator_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generator_timeout() -> Duration {
    Duration::from_secs(12)
}

fn default_bucket() -> String {
    "clothing-images".to_string()
}

fn default_signed_url_ttl() -> Duration {
    Duration::from_secs(3600)
}
