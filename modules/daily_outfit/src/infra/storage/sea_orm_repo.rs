//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction. Every query is scoped by owner.

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::warn;
use uuid::Uuid;

use crate::contract::model::{ClothingItem, OutfitRecommendation, UserProfile};
use crate::domain::repo::{RecommendationQuery, WardrobeRepository};
use crate::infra::storage::entity::{clothing_items, outfit_recommendations, user_profiles};
use crate::infra::storage::mapper;

pub struct SeaOrmWardrobeRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmWardrobeRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Wardrobe writes live outside this module; used for seeding and tests.
    pub async fn insert_item(&self, item: ClothingItem) -> anyhow::Result<()> {
        let _ = mapper::item_to_active(item)
            .insert(&self.conn)
            .await
            .context("insert_item failed")?;
        Ok(())
    }

    pub async fn save_profile(&self, profile: UserProfile) -> anyhow::Result<()> {
        let exists = user_profiles::Entity::find_by_id(profile.user_id)
            .one(&self.conn)
            .await
            .context("save_profile lookup failed")?
            .is_some();
        let am = mapper::profile_to_active(profile);
        if exists {
            am.update(&self.conn).await.context("save_profile update failed")?;
        } else {
            am.insert(&self.conn).await.context("save_profile insert failed")?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<C> WardrobeRepository for SeaOrmWardrobeRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list_active_items(&self, owner: Uuid) -> anyhow::Result<Vec<ClothingItem>> {
        let rows = clothing_items::Entity::find()
            .filter(clothing_items::Column::OwnerId.eq(owner))
            .filter(clothing_items::Column::IsArchived.eq(false))
            .filter(clothing_items::Column::DeletedAt.is_null())
            .order_by_asc(clothing_items::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_active_items failed")?;
        Ok(rows.into_iter().map(mapper::item_from_model).collect())
    }

    async fn find_items(&self, owner: Uuid, ids: &[Uuid]) -> anyhow::Result<Vec<ClothingItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = clothing_items::Entity::find()
            .filter(clothing_items::Column::OwnerId.eq(owner))
            .filter(clothing_items::Column::Id.is_in(ids.iter().copied()))
            .filter(clothing_items::Column::DeletedAt.is_null())
            .all(&self.conn)
            .await
            .context("find_items failed")?;
        Ok(rows.into_iter().map(mapper::item_from_model).collect())
    }

    async fn list_recommendations(
        &self,
        owner: Uuid,
        query: &RecommendationQuery,
    ) -> anyhow::Result<Vec<OutfitRecommendation>> {
        use outfit_recommendations::Column;

        let mut select =
            outfit_recommendations::Entity::find().filter(Column::OwnerId.eq(owner));
        if let Some(condition) = query.condition {
            select = select.filter(Column::WeatherCondition.eq(condition.as_str()));
        }
        if let Some(range) = query.temperature {
            select = select.filter(Column::TemperatureCelsius.between(range.min, range.max));
        }
        if let Some(window) = query.generated {
            select = select
                .filter(Column::GeneratedAt.gte(window.from))
                .filter(Column::GeneratedAt.lt(window.until));
        }

        let select = select
            .order_by_desc(Column::GeneratedAt)
            .order_by_desc(Column::Id);

        // Unreadable rows are skipped, so keep paging until `limit` readable
        // rows are collected or the table runs out.
        let page_size = query.limit.max(1);
        let mut offset = 0;
        let mut recs = Vec::new();
        while (recs.len() as u64) < query.limit {
            let rows = select
                .clone()
                .offset(offset)
                .limit(page_size)
                .all(&self.conn)
                .await
                .context("list_recommendations failed")?;
            let fetched = rows.len() as u64;

            for row in rows {
                match mapper::recommendation_from_model(row) {
                    Ok(rec) => recs.push(rec),
                    Err(e) => warn!(error = %e, "Skipping unreadable recommendation row"),
                }
            }
            if fetched < page_size {
                break;
            }
            offset += fetched;
        }
        recs.truncate(query.limit as usize);
        Ok(recs)
    }

    async fn find_recommendation(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<OutfitRecommendation>> {
        let row = outfit_recommendations::Entity::find_by_id(id)
            .filter(outfit_recommendations::Column::OwnerId.eq(owner))
            .one(&self.conn)
            .await
            .context("find_recommendation failed")?;
        row.map(mapper::recommendation_from_model).transpose()
    }

    async fn insert_recommendation(&self, rec: OutfitRecommendation) -> anyhow::Result<Uuid> {
        let id = rec.id;
        let _ = mapper::recommendation_to_active(rec)
            .insert(&self.conn)
            .await
            .context("insert_recommendation failed")?;
        Ok(id)
    }

    async fn record_wear(
        &self,
        owner: Uuid,
        item_ids: &[Uuid],
        worn_on: NaiveDate,
    ) -> anyhow::Result<u64> {
        use clothing_items::Column;

        if item_ids.is_empty() {
            return Ok(0);
        }
        let res = clothing_items::Entity::update_many()
            .col_expr(Column::TimesWorn, Expr::col(Column::TimesWorn).add(1))
            .col_expr(Column::LastWornOn, Expr::value(worn_on))
            .filter(Column::OwnerId.eq(owner))
            .filter(Column::Id.is_in(item_ids.iter().copied()))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("record_wear failed")?;
        Ok(res.rows_affected)
    }

    async fn find_profile(&self, owner: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let row = user_profiles::Entity::find_by_id(owner)
            .one(&self.conn)
            .await
            .context("find_profile failed")?;
        Ok(row.map(mapper::profile_from_model))
    }
}
