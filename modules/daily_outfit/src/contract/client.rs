use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::{
    error::DailyOutfitError,
    model::{DailyOutfit, HydratedRecommendation, UserProfile},
};

/// Public API trait for the daily_outfit module that other modules can use
#[async_trait]
pub trait DailyOutfitApi: Send + Sync {
    /// Today's outfit(s). Total: degraded paths are reported inside the value.
    async fn get_daily_outfit(&self, user_id: Uuid, profile: Option<UserProfile>) -> DailyOutfit;

    /// Most recent recommendations, newest first.
    async fn recent_recommendations(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HydratedRecommendation>, DailyOutfitError>;

    /// Mark every item of a recommendation as worn on `worn_on`; returns the number of items updated.
    async fn record_outfit_worn(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
        worn_on: NaiveDate,
    ) -> Result<u64, DailyOutfitError>;
}
