use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{join_all, FutureExt};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    ClothingItem, HydratedRecommendation, OutfitRecommendation, WardrobeItemView,
};
use crate::domain::cache::SignedUrlCache;
use crate::domain::ports::ImageSigner;
use crate::domain::repo::WardrobeRepository;

pub const GENERIC_DESCRIPTION: &str = "A curated outfit from your wardrobe.";

/// Turns stored recommendations into display-ready ones.
///
/// Item ids keep their stored order; ids that no longer resolve (deleted or
/// foreign items) are dropped. Hydration never fails: a storage error yields
/// an empty item list and a signing error yields no image URL.
pub struct ItemHydrator {
    repo: Arc<dyn WardrobeRepository>,
    images: Option<Arc<dyn ImageSigner>>,
    url_cache: Arc<SignedUrlCache>,
}

impl ItemHydrator {
    pub fn new(
        repo: Arc<dyn WardrobeRepository>,
        images: Option<Arc<dyn ImageSigner>>,
        url_cache: Arc<SignedUrlCache>,
    ) -> Self {
        Self {
            repo,
            images,
            url_cache,
        }
    }

    #[instrument(name = "daily_outfit.hydrator.hydrate_all", skip_all, fields(count = recs.len()))]
    pub async fn hydrate_all(
        &self,
        recs: Vec<OutfitRecommendation>,
        label: &str,
    ) -> Vec<HydratedRecommendation> {
        join_all(recs.into_iter().map(|rec| self.hydrate(rec, label))).await
    }

    pub async fn hydrate(&self, rec: OutfitRecommendation, label: &str) -> HydratedRecommendation {
        let found = match self.repo.find_items(rec.owner_id, &rec.item_ids).await {
            Ok(items) => items,
            Err(e) => {
                warn!(recommendation_id = %rec.id, error = %e, "Item lookup failed (continuing without items)");
                Vec::new()
            }
        };

        let ordered = in_stored_order(&rec.item_ids, found);
        if ordered.len() < rec.item_ids.len() {
            debug!(
                recommendation_id = %rec.id,
                missing = rec.item_ids.len() - ordered.len(),
                "Dropped unresolvable item references"
            );
        }
        let items = join_all(ordered.into_iter().map(|item| self.view(item))).await;

        HydratedRecommendation {
            id: rec.id,
            name: label.to_string(),
            description: rec
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| GENERIC_DESCRIPTION.to_string()),
            items,
            weather_condition: rec.weather_condition,
            temperature_celsius: rec.temperature_celsius,
            occasion: rec.occasion,
            mood: rec.mood,
            season: rec.season,
            generated_at: rec.generated_at,
            ai_score: rec.ai_score,
        }
    }

    async fn view(&self, item: ClothingItem) -> WardrobeItemView {
        let image_url = match (&self.images, item.image_path.as_deref()) {
            (Some(signer), Some(path)) if !path.is_empty() => {
                let signer = signer.clone();
                let owned = path.to_string();
                self.url_cache
                    .get_or_compute(path, move || {
                        async move {
                            match signer.sign(&owned).await {
                                Ok(url) => Some(url),
                                Err(e) => {
                                    debug!(path = %owned, error = %e, "Image signing failed (continuing)");
                                    None
                                }
                            }
                        }
                        .boxed()
                    })
                    .await
            }
            _ => None,
        };
        WardrobeItemView { item, image_url }
    }
}

fn in_stored_order(ids: &[Uuid], found: Vec<ClothingItem>) -> Vec<ClothingItem> {
    let mut by_id: HashMap<Uuid, ClothingItem> = found.into_iter().map(|i| (i.id, i)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
