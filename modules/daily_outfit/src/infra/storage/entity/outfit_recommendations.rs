use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "outfit_recommendations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub owner_id: Uuid,
    /// Ordered JSON array of clothing item ids.
    pub item_ids: Json,
    pub weather_condition: String,
    #[sea_orm(column_type = "Double")]
    pub temperature_celsius: f64,
    pub occasion: Option<String>,
    pub mood: Option<String>,
    pub season: Option<String>,
    pub recommendation_reason: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[sea_orm(column_type = "Double", nullable)]
    pub ai_score: Option<f64>,
    pub based_on_past_preferences: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
