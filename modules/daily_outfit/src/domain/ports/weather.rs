use async_trait::async_trait;

use crate::contract::model::WeatherSnapshot;
use crate::domain::error::DomainError;

/// Current conditions for a location. Any error means "weather unavailable".
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str, country: &str) -> Result<WeatherSnapshot, DomainError>;
}
