use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::contract::model::{ClothingItem, Season, UserProfile, WeatherSnapshot};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationContext {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub season: Season,
}

impl GenerationContext {
    pub fn for_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            weekday,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            season: Season::from_date(date),
        }
    }

    pub fn occasion(&self) -> &'static str {
        if self.is_weekend {
            "weekend"
        } else {
            "everyday"
        }
    }
}

/// Input to a generator call. `items` is already the bounded sample.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub items: Vec<ClothingItem>,
    pub profile: Option<UserProfile>,
    pub weather: WeatherSnapshot,
    pub context: GenerationContext,
}

/// Scores in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CandidateScores {
    pub overall: f64,
    pub coherence: f64,
    pub occasion_match: f64,
    pub weather_fit: f64,
}

impl CandidateScores {
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            overall: clamp(self.overall),
            coherence: clamp(self.coherence),
            occasion_match: clamp(self.occasion_match),
            weather_fit: clamp(self.weather_fit),
        }
    }
}

/// Unvalidated proposal; item ids may reference anything.
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitCandidate {
    pub name: String,
    pub item_ids: Vec<Uuid>,
    pub rationale: String,
    pub scores: CandidateScores,
}

/// AI-backed outfit proposal service.
///
/// Failures (no credentials, non-2xx, unparseable body) are errors; the resolver
/// treats every error the same as an empty proposal list.
#[async_trait]
pub trait OutfitGenerator: Send + Sync {
    async fn propose(&self, request: &GenerationRequest)
        -> Result<Vec<OutfitCandidate>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekend_context() {
        // 2024-06-01 is a Saturday
        let ctx = GenerationContext::for_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(ctx.is_weekend);
        assert_eq!(ctx.season, Season::Summer);
        assert_eq!(ctx.occasion(), "weekend");

        let ctx = GenerationContext::for_date(NaiveDate::from_ymd_opt(2024, 12, 4).unwrap());
        assert!(!ctx.is_weekend);
        assert_eq!(ctx.season, Season::Winter);
        assert_eq!(ctx.occasion(), "everyday");
    }

    #[test]
    fn scores_are_clamped() {
        let scores = CandidateScores {
            overall: 1.4,
            coherence: -0.2,
            occasion_match: f64::NAN,
            weather_fit: 0.5,
        }
        .clamped();
        assert_eq!(scores.overall, 1.0);
        assert_eq!(scores.coherence, 0.0);
        assert_eq!(scores.occasion_match, 0.0);
        assert_eq!(scores.weather_fit, 0.5);
    }
}
