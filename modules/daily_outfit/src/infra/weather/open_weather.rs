use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::contract::model::{WeatherCondition, WeatherSnapshot};
use crate::domain::error::DomainError;
use crate::domain::ports::WeatherProvider;
use crate::infra::http::TracedClient;

const SERVICE: &str = "weather";

/// Current-conditions lookup against the OpenWeather `data/2.5/weather` API.
pub struct OpenWeatherClient {
    client: TracedClient,
    base: Url,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(client: TracedClient, base: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            base,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    fn endpoint(&self, city: &str, country: &str, key: &str) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::validation("weather.base_url", "cannot be a base URL"))?
            .pop_if_empty()
            .extend(&["data", "2.5", "weather"]);

        let location = if country.is_empty() {
            city.to_string()
        } else {
            format!("{city},{country}")
        };
        url.query_pairs_mut()
            .append_pair("q", &location)
            .append_pair("appid", key)
            .append_pair("units", "metric");
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(
        name = "daily_outfit.http.weather.current",
        skip_all,
        fields(city = %city, country = %country)
    )]
    async fn current(&self, city: &str, country: &str) -> Result<WeatherSnapshot, DomainError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::not_configured(SERVICE))?;
        let url = self.endpoint(city, country, key)?;

        let response = self
            .client
            .send(self.client.request(reqwest::Method::GET, url))
            .await
            .map_err(|e| DomainError::upstream(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::upstream(
                SERVICE,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: CurrentWeather = response
            .json()
            .await
            .map_err(|e| DomainError::malformed(SERVICE, e.to_string()))?;
        let entry = body
            .weather
            .first()
            .ok_or_else(|| DomainError::malformed(SERVICE, "no weather entries"))?;

        Ok(WeatherSnapshot {
            condition: WeatherCondition::from_upstream(&entry.main),
            temperature_celsius: body.main.temp,
            description: entry.description.clone(),
        })
    }
}
