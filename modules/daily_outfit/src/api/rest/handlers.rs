use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    DailyOutfitDto, RecentQuery, RecommendationListDto, WearReq, WearResultDto,
};
use crate::api::rest::error::{from_parts, map_domain_error};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::service::Service;

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;

/// Resolve today's outfit. Always 200; degraded results carry `error`.
#[utoipa::path(
    get,
    path = "/daily-outfit/{user_id}",
    tag = "daily_outfit",
    params(("user_id" = Uuid, Path, description = "Wardrobe owner")),
    responses((status = 200, description = "Today's outfit recommendations", body = DailyOutfitDto))
)]
pub async fn get_daily_outfit(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
) -> Json<DailyOutfitDto> {
    info!("Resolving daily outfit for user {}", user_id);
    Json(svc.get_daily_outfit_for_user(user_id).await.into())
}

/// Most recent recommendations, newest first
#[utoipa::path(
    get,
    path = "/users/{user_id}/recommendations",
    tag = "daily_outfit",
    params(("user_id" = Uuid, Path, description = "Wardrobe owner"), RecentQuery),
    responses(
        (status = 200, description = "Recent recommendations", body = RecommendationListDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    )
)]
pub async fn recent_recommendations(
    Extension(svc): Extension<Arc<Service>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecentQuery>,
    uri: Uri,
) -> Result<Json<RecommendationListDto>, ProblemResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match svc.recent_recommendations(user_id, limit).await {
        Ok(recs) => Ok(Json(RecommendationListDto {
            recommendations: recs.into_iter().map(Into::into).collect(),
        })),
        Err(e) => {
            error!("Failed to list recommendations for {}: {}", user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Mark every item of a recommendation as worn
#[utoipa::path(
    post,
    path = "/users/{user_id}/recommendations/{recommendation_id}/wear",
    tag = "daily_outfit",
    params(
        ("user_id" = Uuid, Path, description = "Wardrobe owner"),
        ("recommendation_id" = Uuid, Path, description = "Recommendation that was worn")
    ),
    request_body(content = WearReq, description = "Optional wear date", content_type = "application/json"),
    responses(
        (status = 200, description = "Wear recorded", body = WearResultDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    )
)]
pub async fn record_outfit_worn(
    Extension(svc): Extension<Arc<Service>>,
    Path((user_id, recommendation_id)): Path<(Uuid, Uuid)>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<WearResultDto>, ProblemResponse> {
    let req: WearReq = if body.iter().all(u8::is_ascii_whitespace) {
        WearReq::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            from_parts(
                StatusCode::BAD_REQUEST,
                "OUTFIT_VALIDATION",
                "Validation error",
                format!("invalid request body: {e}"),
                uri.path(),
            )
        })?
    };
    let worn_on = req.worn_on.unwrap_or_else(|| svc.today());
    info!("Recording recommendation {} as worn on {}", recommendation_id, worn_on);

    match svc
        .record_outfit_worn(user_id, recommendation_id, worn_on)
        .await
    {
        Ok(updated_items) => Ok(Json(WearResultDto {
            recommendation_id,
            worn_on,
            updated_items,
        })),
        Err(e) => {
            error!("Failed to record wear for {}: {}", recommendation_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
