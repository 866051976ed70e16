//! SeaORM repository against in-memory SQLite.

mod common;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use common::*;
use daily_outfit::contract::model::WeatherCondition;
use daily_outfit::domain::repo::{RecommendationQuery, TemperatureRange, WardrobeRepository};
use daily_outfit::domain::service::{Service, ServiceConfig, ServicePorts};
use daily_outfit::domain::tiers;
use daily_outfit::infra::storage::migrations::Migrator;
use daily_outfit::infra::storage::SeaOrmWardrobeRepository;

async fn db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

async fn repo() -> Arc<SeaOrmWardrobeRepository<DatabaseConnection>> {
    Arc::new(SeaOrmWardrobeRepository::new(db().await))
}

#[tokio::test]
async fn active_items_exclude_archived_deleted_and_foreign() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let active = item(owner, "shirt");
    let mut archived = item(owner, "old coat");
    archived.is_archived = true;
    let mut deleted = item(owner, "torn jeans");
    deleted.deleted_at = Some(now());
    let foreign = item(Uuid::new_v4(), "not mine");
    for i in [&active, &archived, &deleted, &foreign] {
        repo.insert_item(i.clone()).await.unwrap();
    }

    let items = repo.list_active_items(owner).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0], active);
}

#[tokio::test]
async fn find_items_keeps_archived_but_drops_deleted() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let mut archived = item(owner, "archived");
    archived.is_archived = true;
    let mut deleted = item(owner, "deleted");
    deleted.deleted_at = Some(now());
    repo.insert_item(archived.clone()).await.unwrap();
    repo.insert_item(deleted.clone()).await.unwrap();

    let found = repo
        .find_items(owner, &[archived.id, deleted.id, Uuid::new_v4()])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, archived.id);
}

#[tokio::test]
async fn recommendation_filters_and_ordering() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let items = vec![Uuid::new_v4(), Uuid::new_v4()];

    let today_rainy = rec(owner, WeatherCondition::Rainy, 10.0, now() - Duration::hours(3), items.clone());
    let yesterday_rainy = rec(owner, WeatherCondition::Rainy, 19.0, now() - Duration::days(1), items.clone());
    let today_sunny = rec(owner, WeatherCondition::Sunny, 12.0, now() - Duration::hours(1), items.clone());
    let foreign = rec(Uuid::new_v4(), WeatherCondition::Rainy, 12.0, now(), items.clone());
    for r in [&today_rainy, &yesterday_rainy, &today_sunny, &foreign] {
        repo.insert_recommendation(r.clone()).await.unwrap();
    }

    let latest = repo
        .list_recommendations(owner, &RecommendationQuery::latest(10))
        .await
        .unwrap();
    let order: Vec<Uuid> = latest.iter().map(|r| r.id).collect();
    assert_eq!(order, vec![today_sunny.id, today_rainy.id, yesterday_rainy.id]);
    assert_eq!(latest[1], today_rainy);

    let exact_today = RecommendationQuery::latest(1)
        .with_condition(WeatherCondition::Rainy)
        .with_temperature(TemperatureRange::around(12.0, 5.0))
        .within(tiers::today(now()));
    let found = repo.list_recommendations(owner, &exact_today).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, today_rainy.id);

    let relaxed_yesterday = RecommendationQuery::latest(1)
        .with_condition(WeatherCondition::Rainy)
        .with_temperature(TemperatureRange::around(12.0, 10.0))
        .within(tiers::yesterday(now()));
    let found = repo
        .list_recommendations(owner, &relaxed_yesterday)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, yesterday_rainy.id);

    let limited = repo
        .list_recommendations(owner, &RecommendationQuery::latest(2))
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn temperature_band_bounds_are_inclusive() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let low = rec(owner, WeatherCondition::Mild, 10.0, now(), vec![]);
    let high = rec(owner, WeatherCondition::Mild, 20.0, now() - Duration::minutes(1), vec![]);
    let out = rec(owner, WeatherCondition::Mild, 20.5, now() - Duration::minutes(2), vec![]);
    for r in [&low, &high, &out] {
        repo.insert_recommendation(r.clone()).await.unwrap();
    }

    let q = RecommendationQuery::latest(10).with_temperature(TemperatureRange::around(15.0, 5.0));
    let found = repo.list_recommendations(owner, &q).await.unwrap();

    let ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![low.id, high.id]);
}

#[tokio::test]
async fn decimal_band_edges_match_in_sql() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let low = rec(owner, WeatherCondition::Rainy, 7.3, now(), vec![]);
    let high = rec(owner, WeatherCondition::Rainy, 17.3, now() - Duration::minutes(1), vec![]);
    let below = rec(owner, WeatherCondition::Rainy, 7.2, now() - Duration::minutes(2), vec![]);
    let cold = rec(owner, WeatherCondition::Snowy, -7.7, now() - Duration::minutes(3), vec![]);
    for r in [&low, &high, &below, &cold] {
        repo.insert_recommendation(r.clone()).await.unwrap();
    }

    let q = RecommendationQuery::latest(10).with_temperature(TemperatureRange::around(12.3, 5.0));
    let found: Vec<Uuid> = repo
        .list_recommendations(owner, &q)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(found, vec![low.id, high.id]);

    let q = RecommendationQuery::latest(10)
        .with_condition(WeatherCondition::Snowy)
        .with_temperature(TemperatureRange::around(-2.7, 5.0));
    let found = repo.list_recommendations(owner, &q).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, cold.id);
}

#[tokio::test]
async fn find_recommendation_is_owner_scoped() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let r = rec(owner, WeatherCondition::Cloudy, 15.0, now(), vec![Uuid::new_v4()]);
    repo.insert_recommendation(r.clone()).await.unwrap();

    assert_eq!(repo.find_recommendation(owner, r.id).await.unwrap(), Some(r.clone()));
    assert_eq!(
        repo.find_recommendation(Uuid::new_v4(), r.id).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn duplicate_recommendation_id_is_rejected() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let r = rec(owner, WeatherCondition::Cloudy, 15.0, now(), vec![]);
    repo.insert_recommendation(r.clone()).await.unwrap();

    assert!(repo.insert_recommendation(r).await.is_err());
}

#[tokio::test]
async fn record_wear_updates_counters_and_date() {
    let repo = repo().await;
    let owner = Uuid::new_v4();
    let a = item(owner, "a");
    let mut b = item(owner, "b");
    b.times_worn = 3;
    let foreign = item(Uuid::new_v4(), "c");
    for i in [&a, &b, &foreign] {
        repo.insert_item(i.clone()).await.unwrap();
    }
    let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();

    let updated = repo
        .record_wear(owner, &[a.id, b.id, foreign.id], date)
        .await
        .unwrap();

    assert_eq!(updated, 2);
    let items = repo.list_active_items(owner).await.unwrap();
    let a_now = items.iter().find(|i| i.id == a.id).unwrap();
    let b_now = items.iter().find(|i| i.id == b.id).unwrap();
    assert_eq!((a_now.times_worn, a_now.last_worn_on), (1, Some(date)));
    assert_eq!((b_now.times_worn, b_now.last_worn_on), (4, Some(date)));
    assert!(repo.record_wear(owner, &[], date).await.unwrap() == 0);
}

#[tokio::test]
async fn profiles_round_trip_and_update() {
    let repo = repo().await;
    let user = Uuid::new_v4();
    assert!(repo.find_profile(user).await.unwrap().is_none());

    let mut p = profile(user);
    repo.save_profile(p.clone()).await.unwrap();
    assert_eq!(repo.find_profile(user).await.unwrap(), Some(p.clone()));

    p.city = Some("Porto".into());
    p.style_preferences = vec![];
    repo.save_profile(p.clone()).await.unwrap();
    assert_eq!(repo.find_profile(user).await.unwrap(), Some(p));
}

#[tokio::test]
async fn service_generates_then_reuses_and_records_wear() {
    let repo = repo().await;
    let user = Uuid::new_v4();
    let top = item(user, "linen shirt");
    let bottom = item(user, "shorts");
    let shoes = item(user, "sandals");
    for i in [&top, &bottom, &shoes] {
        repo.insert_item(i.clone()).await.unwrap();
    }
    repo.save_profile(profile(user)).await.unwrap();

    let generator = FakeGenerator::proposing(vec![
        vec![top.id, bottom.id, shoes.id],
        vec![top.id, bottom.id],
        vec![bottom.id, shoes.id],
    ]);
    let ports = ServicePorts::new(
        repo.clone(),
        FakeWeather::returning(WeatherCondition::Sunny, 22.0),
        generator.clone(),
    )
    .with_clock(Arc::new(FixedClock(now())));
    let service = Service::new(ports, ServiceConfig::default());

    let first = service.get_daily_outfit_for_user(user).await;
    assert!(first.is_generated);
    assert_eq!(first.recommendations.len(), 2);
    let stored = repo
        .list_recommendations(user, &RecommendationQuery::latest(10))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);

    let second = service.get_daily_outfit_for_user(user).await;
    assert!(!second.is_generated);
    assert!(second.has_weather_match);
    assert_eq!(second.recommendations.len(), 1);
    assert_eq!(generator.call_count(), 1);

    let history = service.recent_recommendations(user, 10).await.unwrap();
    assert_eq!(history.len(), 2);

    let worn = second.recommendations[0].id;
    let updated = service
        .record_outfit_worn(user, worn, now().date_naive())
        .await
        .unwrap();
    assert!(updated >= 2);
    let items = repo.list_active_items(user).await.unwrap();
    assert!(items.iter().any(|i| i.times_worn == 1));
}

#[tokio::test]
async fn unreadable_rows_do_not_shrink_the_result() {
    use daily_outfit::infra::storage::entity::outfit_recommendations;
    use sea_orm::{ActiveModelTrait, Set};

    let db = db().await;
    let repo = SeaOrmWardrobeRepository::new(db.clone());
    let owner = Uuid::new_v4();

    let older = rec(owner, WeatherCondition::Mild, 18.0, now() - Duration::days(2), vec![]);
    let oldest = rec(owner, WeatherCondition::Sunny, 25.0, now() - Duration::days(3), vec![]);
    for r in [&older, &oldest] {
        repo.insert_recommendation(r.clone()).await.unwrap();
    }
    for hours in [1, 2] {
        outfit_recommendations::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner),
            item_ids: Set(serde_json::json!([])),
            weather_condition: Set("tornado".into()),
            temperature_celsius: Set(18.0),
            occasion: Set(None),
            mood: Set(None),
            season: Set(None),
            recommendation_reason: Set(None),
            generated_at: Set(now() - Duration::hours(hours)),
            ai_score: Set(None),
            based_on_past_preferences: Set(false),
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let found = repo
        .list_recommendations(owner, &RecommendationQuery::latest(2))
        .await
        .unwrap();

    let ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![older.id, oldest.id]);
}
