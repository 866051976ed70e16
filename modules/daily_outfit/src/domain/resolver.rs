use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    ClothingItem, HydratedRecommendation, OutfitRecommendation, UserProfile, WeatherSnapshot,
};
use crate::domain::error::DomainError;
use crate::domain::hydrator::ItemHydrator;
use crate::domain::ports::{GenerationContext, GenerationRequest, OutfitCandidate, OutfitGenerator};
use crate::domain::repo::{RecommendationQuery, WardrobeRepository};
use crate::domain::tiers::{Tier, TierLimits};

pub const MIN_ITEMS_PER_OUTFIT: usize = 2;
pub const MAX_ITEMS_PER_OUTFIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub limits: TierLimits,
    /// Minimum active wardrobe size before generation is attempted.
    pub min_wardrobe_items: usize,
    /// How many least-recently-worn items the generator gets to see.
    pub generator_sample_size: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            limits: TierLimits::default(),
            min_wardrobe_items: 2,
            generator_sample_size: 20,
        }
    }
}

/// What the cascade produced. `tier` is `None` when every tier came up empty
/// or the run was cancelled.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub tier: Option<Tier>,
    pub recommendations: Vec<HydratedRecommendation>,
    pub has_weather_match: bool,
    pub is_generated: bool,
}

/// Evaluates the tier cascade for one user and returns the first non-empty tier.
pub struct RecommendationResolver {
    repo: Arc<dyn WardrobeRepository>,
    generator: Arc<dyn OutfitGenerator>,
    hydrator: Arc<ItemHydrator>,
    config: ResolverConfig,
}

impl RecommendationResolver {
    pub fn new(
        repo: Arc<dyn WardrobeRepository>,
        generator: Arc<dyn OutfitGenerator>,
        hydrator: Arc<ItemHydrator>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            repo,
            generator,
            hydrator,
            config,
        }
    }

    #[instrument(
        name = "daily_outfit.resolver.resolve",
        skip(self, profile, weather, cancel),
        fields(user_id = %user_id, weather_known = weather.is_some())
    )]
    pub async fn resolve(
        &self,
        user_id: Uuid,
        profile: Option<&UserProfile>,
        weather: Option<&WeatherSnapshot>,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Resolution {
        for &tier in Tier::cascade(weather.is_some()) {
            if cancel.is_cancelled() {
                debug!(tier = tier.as_str(), "Resolution cancelled before tier");
                return Resolution::default();
            }

            let found = self.evaluate(tier, user_id, profile, weather, now).await;
            if found.is_empty() {
                debug!(tier = tier.as_str(), "Tier produced nothing");
                continue;
            }

            info!(tier = tier.as_str(), count = found.len(), "Resolved recommendations");
            let recommendations = self.hydrator.hydrate_all(found, tier.label()).await;
            return Resolution {
                tier: Some(tier),
                recommendations,
                has_weather_match: tier.has_weather_match(),
                is_generated: tier.is_generated(),
            };
        }

        debug!("No tier produced recommendations");
        Resolution::default()
    }

    /// Raw recommendations for one tier, unhydrated.
    pub async fn evaluate(
        &self,
        tier: Tier,
        user_id: Uuid,
        profile: Option<&UserProfile>,
        weather: Option<&WeatherSnapshot>,
        now: DateTime<Utc>,
    ) -> Vec<OutfitRecommendation> {
        match (tier.query(weather, now, &self.config.limits), weather) {
            (Some(query), _) => self.lookup(user_id, &query).await,
            (None, Some(w)) if tier.is_generated() => {
                self.generate(user_id, profile, w, now).await
            }
            (None, _) => Vec::new(),
        }
    }

    async fn lookup(&self, user_id: Uuid, query: &RecommendationQuery) -> Vec<OutfitRecommendation> {
        match self.repo.list_recommendations(user_id, query).await {
            Ok(mut recs) => {
                recs.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
                recs.truncate(query.limit as usize);
                recs
            }
            Err(e) => {
                warn!(error = %e, "Recommendation lookup failed (treating tier as empty)");
                Vec::new()
            }
        }
    }

    #[instrument(name = "daily_outfit.resolver.generate", skip_all, fields(user_id = %user_id))]
    async fn generate(
        &self,
        user_id: Uuid,
        profile: Option<&UserProfile>,
        weather: &WeatherSnapshot,
        now: DateTime<Utc>,
    ) -> Vec<OutfitRecommendation> {
        let wardrobe = match self.repo.list_active_items(user_id).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Wardrobe lookup failed (skipping generation)");
                return Vec::new();
            }
        };
        if wardrobe.len() < self.config.min_wardrobe_items.max(MIN_ITEMS_PER_OUTFIT) {
            debug!(active_items = wardrobe.len(), "Wardrobe too small for generation");
            return Vec::new();
        }

        let request = GenerationRequest {
            items: least_recently_worn(&wardrobe, self.config.generator_sample_size),
            profile: profile.cloned(),
            weather: weather.clone(),
            context: GenerationContext::for_date(now.date_naive()),
        };

        let candidates = match self.generator.propose(&request).await {
            Ok(c) => c,
            Err(DomainError::NotConfigured { service }) => {
                debug!(%service, "Generator not configured (skipping generation)");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Generator call failed (continuing)");
                return Vec::new();
            }
        };

        let known: HashSet<Uuid> = wardrobe.iter().map(|i| i.id).collect();
        let proposed = candidates.len();
        let accepted = validate_candidates(
            candidates,
            &known,
            self.config.limits.max_recommendations as usize,
        );
        if accepted.is_empty() {
            warn!(proposed, "All generated candidates were rejected");
            return Vec::new();
        }
        debug!(proposed, accepted = accepted.len(), "Validated generated candidates");

        let recs: Vec<OutfitRecommendation> = accepted
            .into_iter()
            .map(|c| to_recommendation(user_id, c, weather, &request.context, now))
            .collect();

        let outcomes = join_all(
            recs.iter()
                .cloned()
                .map(|rec| self.repo.insert_recommendation(rec)),
        )
        .await;

        // Only stored rows are surfaced; if none were stored the tier is empty.
        let persisted: Vec<OutfitRecommendation> = recs
            .into_iter()
            .zip(outcomes)
            .filter_map(|(rec, outcome)| match outcome {
                Ok(_) => Some(rec),
                Err(e) => {
                    warn!(recommendation_id = %rec.id, error = %e, "Failed to persist generated recommendation (continuing)");
                    None
                }
            })
            .collect();
        if persisted.is_empty() {
            warn!("No generated recommendation could be persisted");
        }
        persisted
    }
}

/// Keep candidates whose deduplicated item list has 2..=5 ids, all of which
/// reference active wardrobe items. Order is preserved, at most `max` are kept.
pub fn validate_candidates(
    candidates: Vec<OutfitCandidate>,
    known: &HashSet<Uuid>,
    max: usize,
) -> Vec<OutfitCandidate> {
    candidates
        .into_iter()
        .filter_map(|mut candidate| {
            let mut seen = HashSet::new();
            candidate.item_ids.retain(|id| seen.insert(*id));

            let size_ok =
                (MIN_ITEMS_PER_OUTFIT..=MAX_ITEMS_PER_OUTFIT).contains(&candidate.item_ids.len());
            let refs_ok = candidate.item_ids.iter().all(|id| known.contains(id));
            if size_ok && refs_ok {
                Some(candidate)
            } else {
                debug!(
                    name = %candidate.name,
                    items = candidate.item_ids.len(),
                    size_ok,
                    refs_ok,
                    "Rejected generated candidate"
                );
                None
            }
        })
        .take(max)
        .collect()
}

/// Never-worn items first, then oldest `last_worn_on`, then fewest wears.
pub fn least_recently_worn(items: &[ClothingItem], n: usize) -> Vec<ClothingItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        a.last_worn_on
            .is_some()
            .cmp(&b.last_worn_on.is_some())
            .then(a.last_worn_on.cmp(&b.last_worn_on))
            .then(a.times_worn.cmp(&b.times_worn))
    });
    sorted.truncate(n);
    sorted
}

fn to_recommendation(
    owner_id: Uuid,
    candidate: OutfitCandidate,
    weather: &WeatherSnapshot,
    context: &GenerationContext,
    now: DateTime<Utc>,
) -> OutfitRecommendation {
    let rationale = candidate.rationale.trim();
    OutfitRecommendation {
        id: Uuid::new_v4(),
        owner_id,
        item_ids: candidate.item_ids,
        weather_condition: weather.condition,
        temperature_celsius: weather.temperature_celsius,
        occasion: Some(context.occasion().to_string()),
        mood: None,
        season: Some(context.season.as_str().to_string()),
        reason: (!rationale.is_empty()).then(|| rationale.to_string()),
        generated_at: now,
        ai_score: Some(candidate.scores.clamped().overall),
        based_on_past_preferences: false,
    }
}
