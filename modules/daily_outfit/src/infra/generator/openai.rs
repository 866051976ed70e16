use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{CandidateScores, GenerationRequest, OutfitCandidate, OutfitGenerator};
use crate::infra::http::TracedClient;

const SERVICE: &str = "outfit generator";

const SYSTEM_PROMPT: &str = "You are a personal stylist. Build complete outfits using only \
the wardrobe items provided, referencing them by their exact id. Each outfit must use between \
2 and 5 distinct items. Answer with a JSON object of the form \
{\"outfits\":[{\"name\":string,\"item_ids\":[string],\"rationale\":string,\
\"scores\":{\"overall\":number,\"coherence\":number,\"occasion_match\":number,\"weather_fit\":number}}]} \
with scores between 0 and 1, best outfit first.";

/// Outfit generation via an OpenAI-compatible chat completions endpoint in JSON mode.
pub struct OpenAiOutfitGenerator {
    client: TracedClient,
    base: Url,
    api_key: Option<String>,
    model: String,
}

impl OpenAiOutfitGenerator {
    pub fn new(
        client: TracedClient,
        base: Url,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::validation("generator.base_url", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(&["chat", "completions"]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProposedOutfits {
    #[serde(default)]
    outfits: Vec<ProposedOutfit>,
}

#[derive(Debug, Deserialize)]
struct ProposedOutfit {
    #[serde(default)]
    name: String,
    #[serde(default)]
    item_ids: Vec<String>,
    #[serde(default, alias = "reasoning")]
    rationale: String,
    #[serde(default)]
    scores: ProposedScores,
}

#[derive(Debug, Default, Deserialize)]
struct ProposedScores {
    #[serde(default)]
    overall: f64,
    #[serde(default, alias = "style_coherence")]
    coherence: f64,
    #[serde(default)]
    occasion_match: f64,
    #[serde(default, alias = "weather_appropriateness")]
    weather_fit: f64,
}

/// Wardrobe, profile and context rendered as the user message.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut out = String::new();
    let ctx = &request.context;
    let w = &request.weather;

    let _ = writeln!(
        out,
        "Date: {} ({:?}, {}), season: {}, occasion: {}.",
        ctx.date,
        ctx.weekday,
        if ctx.is_weekend { "weekend" } else { "weekday" },
        ctx.season.as_str(),
        ctx.occasion()
    );
    let _ = writeln!(
        out,
        "Weather: {} at {:.1}°C ({}).",
        w.condition, w.temperature_celsius, w.description
    );

    if let Some(profile) = &request.profile {
        if !profile.style_preferences.is_empty() {
            let _ = writeln!(out, "Preferred styles: {}.", profile.style_preferences.join(", "));
        }
        if !profile.color_preferences.is_empty() {
            let _ = writeln!(out, "Preferred colors: {}.", profile.color_preferences.join(", "));
        }
        if let Some(body_type) = &profile.body_type {
            let _ = writeln!(out, "Body type: {body_type}.");
        }
    }

    let _ = writeln!(out, "Wardrobe:");
    for item in &request.items {
        let colors = match (&item.primary_color, &item.secondary_color) {
            (Some(p), Some(s)) => format!("{p}/{s}"),
            (Some(p), None) => p.clone(),
            (None, Some(s)) => s.clone(),
            (None, None) => "unknown".to_string(),
        };
        let last_worn = item
            .last_worn_on
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(
            out,
            "- id={} | {} | {} | colors: {} | weather: {} | seasons: {} | worn {}x, last {}",
            item.id,
            item.name,
            item.category,
            colors,
            item.weather_tags.join(","),
            item.season_tags.join(","),
            item.times_worn,
            last_worn
        );
    }
    out
}

/// Parse the model's JSON answer. Outfits with unparseable ids are dropped;
/// the remaining ids are checked against the wardrobe by the caller.
pub fn parse_candidates(content: &str) -> Result<Vec<OutfitCandidate>, DomainError> {
    let proposed: ProposedOutfits = serde_json::from_str(content)
        .map_err(|e| DomainError::malformed(SERVICE, format!("invalid outfit JSON: {e}")))?;

    let candidates = proposed
        .outfits
        .into_iter()
        .filter_map(|o| {
            let ids: Result<Vec<Uuid>, _> =
                o.item_ids.iter().map(|s| Uuid::parse_str(s.trim())).collect();
            match ids {
                Ok(item_ids) => Some(OutfitCandidate {
                    name: o.name,
                    item_ids,
                    rationale: o.rationale,
                    scores: CandidateScores {
                        overall: o.scores.overall,
                        coherence: o.scores.coherence,
                        occasion_match: o.scores.occasion_match,
                        weather_fit: o.scores.weather_fit,
                    }
                    .clamped(),
                }),
                Err(e) => {
                    debug!(name = %o.name, error = %e, "Dropping outfit with malformed item id");
                    None
                }
            }
        })
        .collect();
    Ok(candidates)
}

#[async_trait]
impl OutfitGenerator for OpenAiOutfitGenerator {
    #[instrument(
        name = "daily_outfit.http.generator.propose",
        skip_all,
        fields(model = %self.model, items = request.items.len())
    )]
    async fn propose(&self, request: &GenerationRequest) -> Result<Vec<OutfitCandidate>, DomainError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::not_configured(SERVICE))?;
        let url = self.endpoint()?;

        let payload = json!({
            "model": self.model,
            "temperature": 0.7,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(request) },
            ],
        });

        let response = self
            .client
            .send(
                self.client
                    .request(reqwest::Method::POST, url)
                    .bearer_auth(key)
                    .json(&payload),
            )
            .await
            .map_err(|e| DomainError::upstream(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::upstream(
                SERVICE,
                format!("HTTP {}", response.status()),
            ));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(SERVICE, e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::malformed(SERVICE, "empty completion"))?;

        let candidates = parse_candidates(&content)?;
        debug!(count = candidates.len(), "Generator proposed outfits");
        Ok(candidates)
    }
}
