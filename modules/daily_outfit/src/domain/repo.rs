use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::contract::model::{ClothingItem, OutfitRecommendation, UserProfile, WeatherCondition};

/// Slack added to both ends of a band so a reading exactly `tolerance` away
/// still matches after f64 rounding (e.g. `12.3 - 5.0 > 7.3`).
pub const TEMPERATURE_EPSILON: f64 = 1e-9;

/// Inclusive temperature band in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn around(center: f64, tolerance: f64) -> Self {
        Self {
            min: center - tolerance - TEMPERATURE_EPSILON,
            max: center + tolerance + TEMPERATURE_EPSILON,
        }
    }

    pub fn contains(&self, celsius: f64) -> bool {
        celsius >= self.min && celsius <= self.max
    }
}

/// Half-open `[from, until)` window over `generated_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at < self.until
    }
}

/// Recommendation filter. The owner is passed separately and is always applied.
/// Results are ordered by `generated_at` descending and truncated to `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub condition: Option<WeatherCondition>,
    pub temperature: Option<TemperatureRange>,
    pub generated: Option<TimeWindow>,
    pub limit: u64,
}

impl RecommendationQuery {
    pub fn latest(limit: u64) -> Self {
        Self {
            condition: None,
            temperature: None,
            generated: None,
            limit,
        }
    }

    pub fn with_condition(mut self, condition: WeatherCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_temperature(mut self, range: TemperatureRange) -> Self {
        self.temperature = Some(range);
        self
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.generated = Some(window);
        self
    }

    /// Filter predicate, excluding owner and limit.
    pub fn matches(&self, rec: &OutfitRecommendation) -> bool {
        self.condition.map_or(true, |c| rec.weather_condition == c)
            && self
                .temperature
                .map_or(true, |r| r.contains(rec.temperature_celsius))
            && self.generated.map_or(true, |w| w.contains(rec.generated_at))
    }
}

/// Port for the domain layer: wardrobe persistence, scoped by owner on every call.
#[async_trait]
pub trait WardrobeRepository: Send + Sync {
    /// Items that are neither archived nor deleted.
    async fn list_active_items(&self, owner: Uuid) -> anyhow::Result<Vec<ClothingItem>>;

    /// Items by id, skipping unknown and deleted ones. Order is unspecified.
    async fn find_items(&self, owner: Uuid, ids: &[Uuid]) -> anyhow::Result<Vec<ClothingItem>>;

    async fn list_recommendations(
        &self,
        owner: Uuid,
        query: &RecommendationQuery,
    ) -> anyhow::Result<Vec<OutfitRecommendation>>;

    async fn find_recommendation(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<OutfitRecommendation>>;

    /// Persist a fully-formed recommendation (id and `generated_at` set by the caller).
    async fn insert_recommendation(&self, rec: OutfitRecommendation) -> anyhow::Result<Uuid>;

    /// Bump `times_worn` and set `last_worn_on` for the given non-deleted items.
    /// Returns the number of items updated.
    async fn record_wear(
        &self,
        owner: Uuid,
        item_ids: &[Uuid],
        worn_on: NaiveDate,
    ) -> anyhow::Result<u64>;

    async fn find_profile(&self, owner: Uuid) -> anyhow::Result<Option<UserProfile>>;
}
