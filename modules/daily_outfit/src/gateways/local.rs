use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::DailyOutfitApi,
    error::DailyOutfitError,
    model::{DailyOutfit, HydratedRecommendation, UserProfile},
};
use crate::domain::service::Service;

/// Local implementation of the DailyOutfitApi trait that delegates to the domain service
pub struct DailyOutfitLocalClient {
    service: Arc<Service>,
}

impl DailyOutfitLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DailyOutfitApi for DailyOutfitLocalClient {
    async fn get_daily_outfit(&self, user_id: Uuid, profile: Option<UserProfile>) -> DailyOutfit {
        self.service.get_daily_outfit(user_id, profile).await
    }

    async fn recent_recommendations(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HydratedRecommendation>, DailyOutfitError> {
        self.service
            .recent_recommendations(user_id, limit)
            .await
            .map_err(Into::into)
    }

    async fn record_outfit_worn(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
        worn_on: NaiveDate,
    ) -> Result<u64, DailyOutfitError> {
        self.service
            .record_outfit_worn(user_id, recommendation_id, worn_on)
            .await
            .map_err(Into::into)
    }
}
