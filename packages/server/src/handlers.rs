//! HTTP handler functions for the civic risk API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use civic_risk_analytics::aggregator;
use civic_risk_server_models::{
    ApiData, ApiEndpoints, ApiFailure, ApiHealth, ApiList, ApiServiceInfo, OutbreakRiskParams,
};
use civic_risk_store::{ComplaintFilter, IncidentFilter, ReadingFilter, StoreError};
use serde::Serialize;

use crate::{AppState, outbreak};

/// Client-facing message for every outbreak failure past validation.
const OUTBREAK_FAILURE: &str = "Server Error: Could not calculate outbreak risk";

/// `GET /`
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(ApiServiceInfo {
        message: "Civic Risk API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ApiEndpoints {
            health: "/api/health".to_string(),
            health_incidents: "/api/health-incidents".to_string(),
            sanitation_complaints: "/api/sanitation-complaints".to_string(),
            environmental_data: "/api/environmental-data".to_string(),
            area_summary: "/api/area-summary".to_string(),
            outbreak_risk: "/api/outbreak-risk?area=<name>".to_string(),
        },
    })
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        status: "Server running".to_string(),
        timestamp: Utc::now(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route not found" }))
}

fn list_response<T: Serialize>(
    state: &AppState,
    kind: &str,
    result: Result<Vec<T>, StoreError>,
) -> HttpResponse {
    match result {
        Ok(items) => HttpResponse::Ok().json(ApiList::new(items)),
        Err(e) => {
            log::error!("Failed to fetch {kind}: {e}");
            HttpResponse::InternalServerError().json(ApiFailure::with_message(
                format!("Failed to fetch {kind}"),
                state.error_detail(&e),
            ))
        }
    }
}

/// `GET /api/health-incidents`
///
/// Returns every health incident, most recent first.
pub async fn health_incidents(state: web::Data<AppState>) -> HttpResponse {
    let result = state.store.find_incidents(&IncidentFilter::default()).await;
    list_response(&state, "health incidents", result)
}

/// `GET /api/sanitation-complaints`
///
/// Returns every sanitation complaint, most recent first.
pub async fn sanitation_complaints(state: web::Data<AppState>) -> HttpResponse {
    let result = state
        .store
        .find_complaints(&ComplaintFilter::default())
        .await;
    list_response(&state, "sanitation complaints", result)
}

/// `GET /api/environmental-data`
///
/// Returns every environmental reading, air and water, most recent first.
pub async fn environmental_data(state: web::Data<AppState>) -> HttpResponse {
    let result = state.store.find_readings(&ReadingFilter::default()).await;
    list_response(&state, "environmental data", result)
}

/// `GET /api/area-summary`
///
/// Returns one risk summary per known area, highest risk first.
pub async fn area_summary(state: web::Data<AppState>) -> HttpResponse {
    match aggregator::fetch_area_summary(state.store.as_ref()).await {
        Ok(summaries) => HttpResponse::Ok().json(ApiList::new(summaries)),
        Err(e) => {
            log::error!("Failed to generate area summary: {e}");
            HttpResponse::InternalServerError().json(ApiFailure::with_message(
                "Failed to generate area summary",
                state.error_detail(&e),
            ))
        }
    }
}

/// `GET /api/outbreak-risk?area=<name>`
///
/// Predicts the probability of an outbreak in `area` over the next seven
/// days.
pub async fn outbreak_risk(
    state: web::Data<AppState>,
    params: web::Query<OutbreakRiskParams>,
) -> HttpResponse {
    let area = match outbreak::validate_area(params.area.as_deref()) {
        Ok(area) => area,
        Err(e) => return HttpResponse::BadRequest().json(ApiFailure::error(e.to_string())),
    };

    match outbreak::assess(
        state.store.as_ref(),
        state.predictor.as_ref(),
        area,
        Utc::now(),
    )
    .await
    {
        Ok(risk) => HttpResponse::Ok().json(ApiData::new(risk)),
        Err(e) => {
            log::error!("Outbreak prediction failed for area={area}: {e}");
            HttpResponse::InternalServerError().json(ApiFailure::error(OUTBREAK_FAILURE))
        }
    }
}
