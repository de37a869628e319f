//! Site management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use pulse_core::error::AppError;
use pulse_entity::NewSite;

use crate::dto::request::{ChecksQuery, CreateSiteRequest};
use crate::dto::response::{ApiResponse, CheckResponse, MessageResponse, SiteResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

const DEFAULT_CHECK_LIMIT: i64 = 50;
const MAX_CHECK_LIMIT: i64 = 1000;

/// GET /api/sites
pub async fn list_sites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SiteResponse>>>, ApiError> {
    let sites = state.site_repo.find_by_user(auth.user_id).await?;
    let body = sites.iter().map(SiteResponse::from).collect();
    Ok(Json(ApiResponse::ok(body)))
}

/// POST /api/sites
pub async fn create_site(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SiteResponse>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let site = state
        .site_repo
        .create(&NewSite {
            user_id: auth.user_id,
            url: req.url,
        })
        .await?;

    info!(user_id = %auth.user_id, site_id = %site.id, url = %site.url, "Site registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SiteResponse::from(&site))),
    ))
}

/// DELETE /api/sites/{id}
pub async fn delete_site(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(site_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    // Owner-scoped delete: someone else's site looks like a missing one.
    let deleted = state.site_repo.delete(site_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::not_found("Site not found").into());
    }

    info!(user_id = %auth.user_id, site_id = %site_id, "Site deleted");

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Site deleted".to_string(),
    })))
}

/// GET /api/sites/{id}/checks
pub async fn list_checks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(site_id): Path<Uuid>,
    Query(query): Query<ChecksQuery>,
) -> Result<Json<ApiResponse<Vec<CheckResponse>>>, ApiError> {
    let site = state
        .site_repo
        .find_by_id(site_id)
        .await?
        .filter(|site| site.user_id == auth.user_id)
        .ok_or_else(|| AppError::not_found("Site not found"))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_CHECK_LIMIT)
        .clamp(1, MAX_CHECK_LIMIT);
    let checks = state.check_repo.find_recent_by_site(site.id, limit).await?;
    let body = checks.iter().map(CheckResponse::from).collect();

    Ok(Json(ApiResponse::ok(body)))
}
