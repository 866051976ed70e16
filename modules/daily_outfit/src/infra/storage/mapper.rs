use anyhow::Context;
use sea_orm::Set;
use serde_json::Value;
use uuid::Uuid;

use crate::contract::model::{ClothingItem, OutfitRecommendation, UserProfile, WeatherCondition};
use crate::infra::storage::entity::{clothing_items, outfit_recommendations, user_profiles};

/// Tag arrays tolerate junk: non-string entries are skipped, non-arrays read as empty.
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn item_from_model(m: clothing_items::Model) -> ClothingItem {
    ClothingItem {
        id: m.id,
        owner_id: m.owner_id,
        name: m.name,
        category: m.category,
        primary_color: m.primary_color,
        secondary_color: m.secondary_color,
        times_worn: u32::try_from(m.times_worn).unwrap_or(0),
        last_worn_on: m.last_worn_on,
        is_archived: m.is_archived,
        deleted_at: m.deleted_at,
        weather_tags: string_list(&m.weather_tags),
        season_tags: string_list(&m.season_tags),
        image_path: m.image_path,
        created_at: m.created_at,
    }
}

pub fn item_to_active(item: ClothingItem) -> clothing_items::ActiveModel {
    clothing_items::ActiveModel {
        id: Set(item.id),
        owner_id: Set(item.owner_id),
        name: Set(item.name),
        category: Set(item.category),
        primary_color: Set(item.primary_color),
        secondary_color: Set(item.secondary_color),
        times_worn: Set(i32::try_from(item.times_worn).unwrap_or(i32::MAX)),
        last_worn_on: Set(item.last_worn_on),
        is_archived: Set(item.is_archived),
        deleted_at: Set(item.deleted_at),
        weather_tags: Set(Value::from(item.weather_tags)),
        season_tags: Set(Value::from(item.season_tags)),
        image_path: Set(item.image_path),
        created_at: Set(item.created_at),
    }
}

/// Fails on rows whose condition label or item list cannot be read.
pub fn recommendation_from_model(
    m: outfit_recommendations::Model,
) -> anyhow::Result<OutfitRecommendation> {
    let weather_condition: WeatherCondition = m
        .weather_condition
        .parse()
        .with_context(|| format!("recommendation {}", m.id))?;
    let item_ids: Vec<Uuid> = serde_json::from_value(m.item_ids)
        .with_context(|| format!("recommendation {}: item_ids", m.id))?;

    Ok(OutfitRecommendation {
        id: m.id,
        owner_id: m.owner_id,
        item_ids,
        weather_condition,
        temperature_celsius: m.temperature_celsius,
        occasion: m.occasion,
        mood: m.mood,
        season: m.season,
        reason: m.recommendation_reason,
        generated_at: m.generated_at,
        ai_score: m.ai_score,
        based_on_past_preferences: m.based_on_past_preferences,
    })
}

pub fn recommendation_to_active(rec: OutfitRecommendation) -> outfit_recommendations::ActiveModel {
    outfit_recommendations::ActiveModel {
        id: Set(rec.id),
        owner_id: Set(rec.owner_id),
        item_ids: Set(Value::from(
            rec.item_ids.iter().map(Uuid::to_string).collect::<Vec<_>>(),
        )),
        weather_condition: Set(rec.weather_condition.as_str().to_string()),
        temperature_celsius: Set(rec.temperature_celsius),
        occasion: Set(rec.occasion),
        mood: Set(rec.mood),
        season: Set(rec.season),
        recommendation_reason: Set(rec.reason),
        generated_at: Set(rec.generated_at),
        ai_score: Set(rec.ai_score),
        based_on_past_preferences: Set(rec.based_on_past_preferences),
    }
}

pub fn profile_from_model(m: user_profiles::Model) -> UserProfile {
    UserProfile {
        user_id: m.user_id,
        city: m.city,
        country: m.country,
        style_preferences: string_list(&m.style_preferences),
        color_preferences: string_list(&m.color_preferences),
        body_type: m.body_type,
    }
}

pub fn profile_to_active(p: UserProfile) -> user_profiles::ActiveModel {
    user_profiles::ActiveModel {
        user_id: Set(p.user_id),
        city: Set(p.city),
        country: Set(p.country),
        style_preferences: Set(Value::from(p.style_preferences)),
        color_preferences: Set(Value::from(p.color_preferences)),
        body_type: Set(p.body_type),
    }
}
