use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use uuid::Uuid;

/// Closed weather vocabulary shared by stored recommendations and live snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
    Hot,
    Cold,
    Mild,
    Humid,
    Dry,
    Stormy,
    Foggy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 12] = [
        Self::Sunny,
        Self::Cloudy,
        Self::Rainy,
        Self::Snowy,
        Self::Windy,
        Self::Hot,
        Self::Cold,
        Self::Mild,
        Self::Humid,
        Self::Dry,
        Self::Stormy,
        Self::Foggy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Windy => "windy",
            Self::Hot => "hot",
            Self::Cold => "cold",
            Self::Mild => "mild",
            Self::Humid => "humid",
            Self::Dry => "dry",
            Self::Stormy => "stormy",
            Self::Foggy => "foggy",
        }
    }

    /// Map an upstream weather-service label onto the closed vocabulary.
    /// Unknown labels map to `Mild`.
    pub fn from_upstream(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "clear" | "sunny" => Self::Sunny,
            "clouds" | "cloudy" | "overcast" => Self::Cloudy,
            "rain" | "drizzle" | "rainy" => Self::Rainy,
            "snow" | "sleet" | "snowy" => Self::Snowy,
            "thunderstorm" | "stormy" => Self::Stormy,
            "mist" | "fog" | "haze" | "smoke" | "foggy" => Self::Foggy,
            "squall" | "tornado" | "windy" => Self::Windy,
            "dust" | "sand" | "ash" | "dry" => Self::Dry,
            "humid" => Self::Humid,
            "hot" => Self::Hot,
            "cold" => Self::Cold,
            _ => Self::Mild,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCondition(pub String);

impl fmt::Display for UnknownCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weather condition '{}'", self.0)
    }
}

impl std::error::Error for UnknownCondition {}

impl FromStr for WeatherCondition {
    type Err = UnknownCondition;

    /// Strict parse of the stored label (unlike `from_upstream`, no defaulting).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Meteorological seasons, northern hemisphere.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

/// Current weather for the user's location. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    pub temperature_celsius: f64,
    pub description: String,
}

/// Read-only generation input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub city: Option<String>,
    pub country: Option<String>,
    pub style_preferences: Vec<String>,
    pub color_preferences: Vec<String>,
    pub body_type: Option<String>,
}

impl UserProfile {
    /// `(city, country)` when a city is set; country may be empty.
    pub fn location(&self) -> Option<(&str, &str)> {
        let city = self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        let country = self.country.as_deref().map(str::trim).unwrap_or("");
        Some((city, country))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClothingItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub times_worn: u32,
    pub last_worn_on: Option<NaiveDate>,
    pub is_archived: bool,
    /// Soft delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
    pub weather_tags: Vec<String>,
    pub season_tags: Vec<String>,
    /// Object-storage path of the item photo.
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    /// Neither archived nor deleted: eligible for new outfits.
    pub fn is_active(&self) -> bool {
        !self.is_archived && self.deleted_at.is_none()
    }
}

/// Point-in-time outfit snapshot; never edited, only superseded.
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitRecommendation {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Ordered weak references into the owner's wardrobe.
    pub item_ids: Vec<Uuid>,
    pub weather_condition: WeatherCondition,
    pub temperature_celsius: f64,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub season: Option<String>,
    pub reason: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub ai_score: Option<f64>,
    pub based_on_past_preferences: bool,
}

/// Wardrobe item as shown to the user, with a signed photo URL when available.
#[derive(Debug, Clone, PartialEq)]
pub struct WardrobeItemView {
    pub item: ClothingItem,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HydratedRecommendation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub items: Vec<WardrobeItemView>,
    pub weather_condition: WeatherCondition,
    pub temperature_celsius: f64,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub season: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub ai_score: Option<f64>,
}

/// Result of `get_daily_outfit`. Always produced, even on failure or timeout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyOutfit {
    pub weather: Option<WeatherSnapshot>,
    pub recommendations: Vec<HydratedRecommendation>,
    pub has_weather_match: bool,
    pub is_generated: bool,
    pub error: Option<String>,
}

impl DailyOutfit {
    /// The safe default: nothing to show, no weather.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
