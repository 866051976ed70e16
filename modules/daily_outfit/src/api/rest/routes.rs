use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Daily Outfit API", description = "Weather-aware outfit recommendations"),
    paths(
        handlers::get_daily_outfit,
        handlers::recent_recommendations,
        handlers::record_outfit_worn
    ),
    components(schemas(
        dto::DailyOutfitDto,
        dto::WeatherDto,
        dto::RecommendationDto,
        dto::ClothingItemDto,
        dto::RecommendationListDto,
        dto::WearReq,
        dto::WearResultDto,
        problem::Problem
    )),
    tags((name = "daily_outfit", description = "Daily outfit resolution and wear history"))
)]
pub struct ApiDoc;

/// REST routes plus `/openapi.json`, with the service injected as an extension.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/daily-outfit/{user_id}", get(handlers::get_daily_outfit))
        .route(
            "/users/{user_id}/recommendations",
            get(handlers::recent_recommendations),
        )
        .route(
            "/users/{user_id}/recommendations/{recommendation_id}/wear",
            post(handlers::record_outfit_worn),
        )
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(service))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
