//! Shared fakes for the daily_outfit integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use daily_outfit::contract::model::{
    ClothingItem, OutfitRecommendation, UserProfile, WeatherCondition, WeatherSnapshot,
};
use daily_outfit::domain::error::DomainError;
use daily_outfit::domain::ports::{
    CandidateScores, Clock, GenerationRequest, ImageSigner, OutfitCandidate, OutfitGenerator,
    WeatherProvider,
};
use daily_outfit::domain::repo::{RecommendationQuery, WardrobeRepository};
use daily_outfit::domain::service::{Service, ServiceConfig, ServicePorts};

/// 2024-05-15 14:30 UTC, a Wednesday.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 14, 30, 0).unwrap()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------- repository ----------

#[derive(Default)]
pub struct InMemoryRepo {
    pub items: Mutex<Vec<ClothingItem>>,
    pub recs: Mutex<Vec<OutfitRecommendation>>,
    pub profiles: Mutex<Vec<UserProfile>>,
    /// Insert attempts, successful or not.
    pub inserts: AtomicUsize,
    /// Fail the n-th insert (0-based).
    pub fail_insert_at: Mutex<Option<usize>>,
    pub fail_all_inserts: Mutex<bool>,
    pub fail_reads: Mutex<bool>,
}

impl InMemoryRepo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_item(&self, item: ClothingItem) {
        self.items.lock().unwrap().push(item);
    }

    pub fn add_rec(&self, rec: OutfitRecommendation) {
        self.recs.lock().unwrap().push(rec);
    }

    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().push(profile);
    }

    pub fn rec_count(&self) -> usize {
        self.recs.lock().unwrap().len()
    }

    fn check_reads(&self) -> anyhow::Result<()> {
        if *self.fail_reads.lock().unwrap() {
            anyhow::bail!("storage offline");
        }
        Ok(())
    }
}

#[async_trait]
impl WardrobeRepository for InMemoryRepo {
    async fn list_active_items(&self, owner: Uuid) -> anyhow::Result<Vec<ClothingItem>> {
        self.check_reads()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.owner_id == owner && i.is_active())
            .cloned()
            .collect())
    }

    async fn find_items(&self, owner: Uuid, ids: &[Uuid]) -> anyhow::Result<Vec<ClothingItem>> {
        self.check_reads()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.owner_id == owner && i.deleted_at.is_none() && ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list_recommendations(
        &self,
        owner: Uuid,
        query: &RecommendationQuery,
    ) -> anyhow::Result<Vec<OutfitRecommendation>> {
        self.check_reads()?;
        let mut found: Vec<_> = self
            .recs
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner && query.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        found.truncate(query.limit as usize);
        Ok(found)
    }

    async fn find_recommendation(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<OutfitRecommendation>> {
        self.check_reads()?;
        Ok(self
            .recs
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.owner_id == owner && r.id == id)
            .cloned())
    }

    async fn insert_recommendation(&self, rec: OutfitRecommendation) -> anyhow::Result<Uuid> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst);
        if *self.fail_all_inserts.lock().unwrap() || *self.fail_insert_at.lock().unwrap() == Some(n) {
            anyhow::bail!("unique violation");
        }
        let id = rec.id;
        self.recs.lock().unwrap().push(rec);
        Ok(id)
    }

    async fn record_wear(
        &self,
        owner: Uuid,
        item_ids: &[Uuid],
        worn_on: NaiveDate,
    ) -> anyhow::Result<u64> {
        let mut updated = 0;
        for item in self.items.lock().unwrap().iter_mut() {
            if item.owner_id == owner && item.deleted_at.is_none() && item_ids.contains(&item.id) {
                item.times_worn += 1;
                item.last_worn_on = Some(worn_on);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn find_profile(&self, owner: Uuid) -> anyhow::Result<Option<UserProfile>> {
        self.check_reads()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == owner)
            .cloned())
    }
}

// ---------- weather ----------

pub enum WeatherBehavior {
    Returns(WeatherSnapshot),
    Fails,
    NotConfigured,
    Hangs,
}

pub struct FakeWeather {
    behavior: WeatherBehavior,
    pub calls: AtomicUsize,
}

impl FakeWeather {
    pub fn new(behavior: WeatherBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn returning(condition: WeatherCondition, temp: f64) -> Arc<Self> {
        Self::new(WeatherBehavior::Returns(snapshot(condition, temp)))
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, _city: &str, _country: &str) -> Result<WeatherSnapshot, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            WeatherBehavior::Returns(w) => Ok(w.clone()),
            WeatherBehavior::Fails => Err(DomainError::upstream("weather", "HTTP 503")),
            WeatherBehavior::NotConfigured => Err(DomainError::not_configured("weather")),
            WeatherBehavior::Hangs => std::future::pending().await,
        }
    }
}

// ---------- generator ----------

pub enum GeneratorBehavior {
    /// Item-id lists to propose, in order.
    Proposes(Vec<Vec<Uuid>>),
    Fails,
    NotConfigured,
    Hangs,
}

pub struct FakeGenerator {
    behavior: GeneratorBehavior,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<GenerationRequest>>,
}

impl FakeGenerator {
    pub fn new(behavior: GeneratorBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn proposing(outfits: Vec<Vec<Uuid>>) -> Arc<Self> {
        Self::new(GeneratorBehavior::Proposes(outfits))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutfitGenerator for FakeGenerator {
    async fn propose(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<OutfitCandidate>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.behavior {
            GeneratorBehavior::Proposes(outfits) => Ok(outfits
                .iter()
                .enumerate()
                .map(|(i, ids)| OutfitCandidate {
                    name: format!("Look {}", i + 1),
                    item_ids: ids.clone(),
                    rationale: format!("Rationale {}", i + 1),
                    scores: CandidateScores {
                        overall: 0.8,
                        coherence: 0.7,
                        occasion_match: 0.9,
                        weather_fit: 0.85,
                    },
                })
                .collect()),
            GeneratorBehavior::Fails => Err(DomainError::upstream("outfit generator", "HTTP 500")),
            GeneratorBehavior::NotConfigured => {
                Err(DomainError::not_configured("outfit generator"))
            }
            GeneratorBehavior::Hangs => std::future::pending().await,
        }
    }
}

// ---------- images ----------

#[derive(Default)]
pub struct CountingSigner {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ImageSigner for CountingSigner {
    async fn sign(&self, path: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(format!("https://signed.local/{path}?token=t"))
    }
}

// ---------- builders ----------

pub fn snapshot(condition: WeatherCondition, temp: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        condition,
        temperature_celsius: temp,
        description: format!("{condition} skies"),
    }
}

pub fn profile(user_id: Uuid) -> UserProfile {
    UserProfile {
        user_id,
        city: Some("Lisbon".into()),
        country: Some("PT".into()),
        style_preferences: vec!["minimal".into()],
        color_preferences: vec!["navy".into()],
        body_type: None,
    }
}

pub fn item(owner: Uuid, name: &str) -> ClothingItem {
    ClothingItem {
        id: Uuid::new_v4(),
        owner_id: owner,
        name: name.into(),
        category: "tops".into(),
        primary_color: Some("white".into()),
        secondary_color: None,
        times_worn: 0,
        last_worn_on: None,
        is_archived: false,
        deleted_at: None,
        weather_tags: vec![],
        season_tags: vec![],
        image_path: None,
        created_at: now() - chrono::Duration::days(30),
    }
}

pub fn rec(
    owner: Uuid,
    condition: WeatherCondition,
    temp: f64,
    generated_at: DateTime<Utc>,
    item_ids: Vec<Uuid>,
) -> OutfitRecommendation {
    OutfitRecommendation {
        id: Uuid::new_v4(),
        owner_id: owner,
        item_ids,
        weather_condition: condition,
        temperature_celsius: temp,
        occasion: Some("everyday".into()),
        mood: None,
        season: Some("spring".into()),
        reason: Some("Stored reason".into()),
        generated_at,
        ai_score: Some(0.75),
        based_on_past_preferences: false,
    }
}

pub struct Harness {
    pub repo: Arc<InMemoryRepo>,
    pub weather: Arc<FakeWeather>,
    pub generator: Arc<FakeGenerator>,
    pub service: Service,
}

pub fn harness_with(
    repo: Arc<InMemoryRepo>,
    weather: Arc<FakeWeather>,
    generator: Arc<FakeGenerator>,
    config: ServiceConfig,
) -> Harness {
    let ports = ServicePorts::new(repo.clone(), weather.clone(), generator.clone())
        .with_clock(Arc::new(FixedClock(now())));
    Harness {
        service: Service::new(ports, config),
        repo,
        weather,
        generator,
    }
}

pub fn harness(weather: Arc<FakeWeather>, generator: Arc<FakeGenerator>) -> Harness {
    harness_with(InMemoryRepo::new(), weather, generator, ServiceConfig::default())
}
