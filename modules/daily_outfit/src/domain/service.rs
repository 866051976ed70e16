use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn, Instrument, Span};
use uuid::Uuid;

use crate::contract::model::{DailyOutfit, HydratedRecommendation, UserProfile, WeatherSnapshot};
use crate::domain::cache::SignedUrlCache;
use crate::domain::error::DomainError;
use crate::domain::guard::{GuardOutcome, TimeoutGuard};
use crate::domain::hydrator::ItemHydrator;
use crate::domain::ports::{Clock, ImageSigner, OutfitGenerator, SystemClock, WeatherProvider};
use crate::domain::repo::{RecommendationQuery, WardrobeRepository};
use crate::domain::resolver::{RecommendationResolver, ResolverConfig};

pub const HISTORY_LABEL: &str = "Past Outfit";
const TIMEOUT_MESSAGE: &str = "Timed out while preparing today's outfit";
const FAILURE_MESSAGE: &str = "Could not prepare today's outfit";

/// Everything the service talks to. Only the repository, weather provider and
/// generator are mandatory; image signing is skipped when `images` is `None`.
#[derive(Clone)]
pub struct ServicePorts {
    pub repo: Arc<dyn WardrobeRepository>,
    pub weather: Arc<dyn WeatherProvider>,
    pub generator: Arc<dyn OutfitGenerator>,
    pub images: Option<Arc<dyn ImageSigner>>,
    pub url_cache: Arc<SignedUrlCache>,
    pub clock: Arc<dyn Clock>,
}

impl ServicePorts {
    pub fn new(
        repo: Arc<dyn WardrobeRepository>,
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn OutfitGenerator>,
    ) -> Self {
        Self {
            repo,
            weather,
            generator,
            images: None,
            url_cache: Arc::new(SignedUrlCache::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_images(mut self, signer: Arc<dyn ImageSigner>) -> Self {
        self.images = Some(signer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub resolution_timeout: Duration,
    pub resolver: ResolverConfig,
    pub max_history_limit: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            resolution_timeout: Duration::from_secs(15),
            resolver: ResolverConfig::default(),
            max_history_limit: 50,
        }
    }
}

/// Daily outfit pipeline: weather lookup, tier cascade and hydration under a
/// single deadline, plus history and wear tracking.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn WardrobeRepository>,
    weather: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    hydrator: Arc<ItemHydrator>,
    resolver: Arc<RecommendationResolver>,
    guard: TimeoutGuard,
    config: ServiceConfig,
}

impl Service {
    pub fn new(ports: ServicePorts, config: ServiceConfig) -> Self {
        let hydrator = Arc::new(ItemHydrator::new(
            ports.repo.clone(),
            ports.images,
            ports.url_cache,
        ));
        let resolver = Arc::new(RecommendationResolver::new(
            ports.repo.clone(),
            ports.generator,
            hydrator.clone(),
            config.resolver.clone(),
        ));
        Self {
            repo: ports.repo,
            weather: ports.weather,
            clock: ports.clock,
            hydrator,
            resolver,
            guard: TimeoutGuard::new(config.resolution_timeout),
            config,
        }
    }

    /// Today's outfit for a caller-supplied profile. Never fails: timeouts and
    /// internal failures come back as an empty result with `error` set.
    #[instrument(name = "daily_outfit.service.get_daily_outfit", skip(self, profile), fields(user_id = %user_id))]
    pub async fn get_daily_outfit(&self, user_id: Uuid, profile: Option<UserProfile>) -> DailyOutfit {
        let this = self.clone();
        self.guarded(move |cancel| async move {
            this.resolve_today(user_id, profile.as_ref(), &cancel).await
        })
        .await
    }

    /// Same as [`Service::get_daily_outfit`] but loads the stored profile first,
    /// inside the same deadline. A failed profile read is treated as no profile.
    #[instrument(name = "daily_outfit.service.get_daily_outfit_for_user", skip(self), fields(user_id = %user_id))]
    pub async fn get_daily_outfit_for_user(&self, user_id: Uuid) -> DailyOutfit {
        let this = self.clone();
        self.guarded(move |cancel| async move {
            let profile = match this.repo.find_profile(user_id).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "Profile lookup failed (continuing without profile)");
                    None
                }
            };
            this.resolve_today(user_id, profile.as_ref(), &cancel).await
        })
        .await
    }

    async fn guarded<F, Fut>(&self, task: F) -> DailyOutfit
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = DailyOutfit> + Send + 'static,
    {
        let span = Span::current();
        match self.guard.run(move |cancel| task(cancel).instrument(span)).await {
            GuardOutcome::Completed(outfit) => outfit,
            GuardOutcome::TimedOut => {
                warn!(
                    deadline_ms = self.guard.deadline().as_millis() as u64,
                    "Daily outfit resolution timed out; returning empty result"
                );
                DailyOutfit::degraded(TIMEOUT_MESSAGE)
            }
            GuardOutcome::Failed(reason) => {
                error!(%reason, "Daily outfit resolution failed; returning empty result");
                DailyOutfit::degraded(FAILURE_MESSAGE)
            }
        }
    }

    async fn resolve_today(
        &self,
        user_id: Uuid,
        profile: Option<&UserProfile>,
        cancel: &CancellationToken,
    ) -> DailyOutfit {
        let weather = self.current_weather(profile).await;
        let now = self.clock.now();
        let resolution = self
            .resolver
            .resolve(user_id, profile, weather.as_ref(), now, cancel)
            .await;

        debug!(
            tier = resolution.tier.map(|t| t.as_str()).unwrap_or("none"),
            count = resolution.recommendations.len(),
            "Daily outfit ready"
        );
        DailyOutfit {
            weather,
            recommendations: resolution.recommendations,
            has_weather_match: resolution.has_weather_match,
            is_generated: resolution.is_generated,
            error: None,
        }
    }

    async fn current_weather(&self, profile: Option<&UserProfile>) -> Option<WeatherSnapshot> {
        let Some((city, country)) = profile.and_then(UserProfile::location) else {
            debug!("No location on profile (continuing without weather)");
            return None;
        };
        match self.weather.current(city, country).await {
            Ok(snapshot) => Some(snapshot),
            Err(DomainError::NotConfigured { service }) => {
                debug!(%service, "Weather provider not configured (continuing without weather)");
                None
            }
            Err(e) => {
                warn!(error = %e, "Weather lookup failed (continuing without weather)");
                None
            }
        }
    }

    #[instrument(name = "daily_outfit.service.recent_recommendations", skip(self), fields(user_id = %user_id))]
    pub async fn recent_recommendations(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HydratedRecommendation>, DomainError> {
        if limit == 0 || limit > self.config.max_history_limit {
            return Err(DomainError::validation(
                "limit",
                format!("must be between 1 and {}", self.config.max_history_limit),
            ));
        }

        let recs = self
            .repo
            .list_recommendations(user_id, &RecommendationQuery::latest(limit))
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        debug!("Loaded {} past recommendations", recs.len());
        Ok(self.hydrator.hydrate_all(recs, HISTORY_LABEL).await)
    }

    #[instrument(
        name = "daily_outfit.service.record_outfit_worn",
        skip(self),
        fields(user_id = %user_id, recommendation_id = %recommendation_id)
    )]
    pub async fn record_outfit_worn(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
        worn_on: NaiveDate,
    ) -> Result<u64, DomainError> {
        let rec = self
            .repo
            .find_recommendation(user_id, recommendation_id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::recommendation_not_found(recommendation_id))?;

        let updated = self
            .repo
            .record_wear(user_id, &rec.item_ids, worn_on)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!(updated, %worn_on, "Recorded outfit as worn");
        Ok(updated)
    }

    #[instrument(name = "daily_outfit.service.find_profile", skip(self), fields(user_id = %user_id))]
    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DomainError> {
        self.repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))
    }

    /// Today's date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }
}
