use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    DailyOutfit, HydratedRecommendation, WardrobeItemView, WeatherSnapshot,
};

/// Current weather at the user's location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherDto {
    /// One of: sunny, cloudy, rainy, snowy, windy, hot, cold, mild, humid, dry, stormy, foggy.
    pub condition: String,
    pub temperature: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItemDto {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub times_worn: u32,
    pub last_worn_on: Option<NaiveDate>,
    pub weather_tags: Vec<String>,
    pub season_tags: Vec<String>,
    /// Short-lived signed URL of the item photo.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub items: Vec<ClothingItemDto>,
    pub weather_condition: String,
    pub temperature: f64,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub season: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub ai_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyOutfitDto {
    pub weather: Option<WeatherDto>,
    pub recommendations: Vec<RecommendationDto>,
    pub has_weather_match: bool,
    pub is_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationListDto {
    pub recommendations: Vec<RecommendationDto>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Maximum number of recommendations, newest first (default 10).
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WearReq {
    /// Defaults to today (UTC).
    pub worn_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WearResultDto {
    pub recommendation_id: Uuid,
    pub worn_on: NaiveDate,
    pub updated_items: u64,
}

impl From<WeatherSnapshot> for WeatherDto {
    fn from(w: WeatherSnapshot) -> Self {
        Self {
            condition: w.condition.as_str().to_string(),
            temperature: w.temperature_celsius,
            description: w.description,
        }
    }
}

impl From<WardrobeItemView> for ClothingItemDto {
    fn from(v: WardrobeItemView) -> Self {
        let item = v.item;
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            primary_color: item.primary_color,
            secondary_color: item.secondary_color,
            times_worn: item.times_worn,
            last_worn_on: item.last_worn_on,
            weather_tags: item.weather_tags,
            season_tags: item.season_tags,
            image_url: v.image_url,
        }
    }
}

impl From<HydratedRecommendation> for RecommendationDto {
    fn from(r: HydratedRecommendation) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            items: r.items.into_iter().map(Into::into).collect(),
            weather_condition: r.weather_condition.as_str().to_string(),
            temperature: r.temperature_celsius,
            occasion: r.occasion,
            mood: r.mood,
            season: r.season,
            generated_at: r.generated_at,
            ai_score: r.ai_score,
        }
    }
}

impl From<DailyOutfit> for DailyOutfitDto {
    fn from(o: DailyOutfit) -> Self {
        Self {
            weather: o.weather.map(Into::into),
            recommendations: o.recommendations.into_iter().map(Into::into).collect(),
            has_weather_match: o.has_weather_match,
            is_generated: o.is_generated,
            error: o.error,
        }
    }
}
