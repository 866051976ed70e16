use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::rest::routes;
use crate::config::DailyOutfitConfig;
use crate::contract::client::DailyOutfitApi;
use crate::domain::service::{Service, ServicePorts};
use crate::gateways::local::DailyOutfitLocalClient;
use crate::infra::generator::OpenAiOutfitGenerator;
use crate::infra::http::TracedClient;
use crate::infra::images::StorageImageSigner;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmWardrobeRepository;
use crate::infra::weather::OpenWeatherClient;

pub const MODULE_NAME: &str = "daily_outfit";

/// Wires infra adapters into the domain service and exposes it over REST
/// and as an in-process client.
#[derive(Clone)]
pub struct DailyOutfitModule {
    service: Arc<Service>,
}

impl DailyOutfitModule {
    pub fn init(cfg: &DailyOutfitConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Initializing {} module", MODULE_NAME);
        debug!(
            "Loaded daily_outfit config: resolution_timeout={:?}, max_recommendations={}",
            cfg.resolution_timeout, cfg.max_recommendations
        );

        let repo = Arc::new(SeaOrmWardrobeRepository::new(db));

        let weather = OpenWeatherClient::new(
            TracedClient::with_timeout(cfg.weather.request_timeout)
                .context("weather HTTP client")?,
            Url::parse(&cfg.weather.base_url).context("invalid weather.base_url")?,
            cfg.weather.api_key.clone(),
        );
        if cfg.weather.api_key.is_none() {
            warn!("weather.api_key is not set; outfits will be resolved without weather");
        }

        let generator = OpenAiOutfitGenerator::new(
            TracedClient::with_timeout(cfg.generator.request_timeout)
                .context("generator HTTP client")?,
            Url::parse(&cfg.generator.base_url).context("invalid generator.base_url")?,
            cfg.generator.api_key.clone(),
            cfg.generator.model.clone(),
        );

        let mut ports = ServicePorts::new(repo, Arc::new(weather), Arc::new(generator));
        if let Some(base) = &cfg.images.base_url {
            let signer = StorageImageSigner::new(
                TracedClient::with_timeout(cfg.images.request_timeout)
                    .context("image storage HTTP client")?,
                Url::parse(base).context("invalid images.base_url")?,
                cfg.images.bucket.clone(),
                cfg.images.service_key.clone(),
                cfg.images.signed_url_ttl,
            );
            ports = ports.with_images(Arc::new(signer));
        }

        let service = Service::new(ports, cfg.service_config());
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running {} database migrations", MODULE_NAME);
        Migrator::up(db, None).await?;
        info!("Daily outfit migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn DailyOutfitApi> {
        Arc::new(DailyOutfitLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering {} REST routes", MODULE_NAME);
        routes::register_routes(router, self.service.clone())
    }
}
