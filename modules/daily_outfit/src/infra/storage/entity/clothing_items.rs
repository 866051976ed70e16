use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clothing_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub times_worn: i32,
    pub last_worn_on: Option<NaiveDate>,
    pub is_archived: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    /// JSON array of strings.
    pub weather_tags: Json,
    /// JSON array of strings.
    pub season_tags: Json,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
