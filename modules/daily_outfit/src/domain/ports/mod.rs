pub mod generator;
pub mod images;
pub mod weather;

pub use generator::{
    CandidateScores, GenerationContext, GenerationRequest, OutfitCandidate, OutfitGenerator,
};
pub use images::ImageSigner;
pub use weather::WeatherProvider;

use chrono::{DateTime, Utc};

/// Source of "now" for day-boundary computations.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
