//! HTTP request handlers for the reservation endpoints.

use crate::booking::SlotAvailability;
use crate::error::BookingError;
use crate::server::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /api/subscribe`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Caller bearer token
    pub token: String,
    /// Day index, 0-based
    pub day: i64,
    /// Requested `[start, end)` hour pair
    pub hours: Vec<i64>,
    /// Course to reserve
    pub course_id: String,
}

/// Response of a successful subscribe: the caller's updated timetable.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    /// Per-day open-hour masks after the reservation
    pub rules: Vec<u32>,
}

/// Body of `POST /api/unsubscribe`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    /// Caller bearer token; must belong to an admin
    pub token: String,
    /// Reservation to release
    pub subscription_id: String,
}

/// Response of a successful unsubscribe.
#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeResponse {
    /// Always true on the success path
    pub success: bool,
}

/// Query of `GET /api/courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesQuery {
    /// Location to list courses for
    pub location: String,
}

/// One course as listed to a dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// Course id
    pub id: String,
    /// Display name
    pub name: String,
    /// Room label, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Seats per slot
    pub limit: u32,
    /// Longest contiguous booking, if configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<u32>,
    /// Whether any hour anywhere is still open
    pub available: bool,
}

/// Query of `GET /api/courses/{course}/slots`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsQuery {
    /// Day index, 0-based
    pub day: i64,
}

/// Handle `POST /api/subscribe`.
///
/// # Errors
///
/// Returns a [`BookingError`] envelope with a stable code on any gate
/// failure.
pub async fn handle_subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, BookingError> {
    tracing::debug!(
        "Handling subscribe for course {} day {}",
        request.course_id,
        request.day
    );

    let rules = state
        .booking()
        .subscribe(
            &request.token,
            request.day,
            &request.hours,
            &request.course_id,
        )
        .await?;

    Ok(Json(SubscribeResponse {
        rules: rules.into_days(),
    }))
}

/// Handle `POST /api/unsubscribe`. Admin-only.
///
/// # Errors
///
/// Returns a [`BookingError`] envelope with a stable code on any gate
/// failure.
pub async fn handle_unsubscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<Json<UnsubscribeResponse>, BookingError> {
    tracing::debug!("Handling unsubscribe for {}", request.subscription_id);

    state
        .booking()
        .unsubscribe(&request.token, &request.subscription_id)
        .await?;

    Ok(Json(UnsubscribeResponse { success: true }))
}

/// Handle `GET /api/courses?location=<id>`.
///
/// # Errors
///
/// Returns a [`BookingError`] envelope on store failure.
pub async fn handle_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoursesQuery>,
) -> Result<Json<Vec<CourseSummary>>, BookingError> {
    let courses = state.booking().courses(&query.location).await?;

    let summaries = courses
        .into_iter()
        .map(|course| CourseSummary {
            available: course.rules.is_available(),
            id: course.id,
            name: course.name,
            room: course.room,
            limit: course.limit,
            unit: course.unit,
        })
        .collect();

    Ok(Json(summaries))
}

/// Handle `GET /api/courses/{course}/slots?day=<d>`.
///
/// # Errors
///
/// Returns a [`BookingError`] envelope on an unknown or misconfigured
/// course.
pub async fn handle_course_slots(
    State(state): State<Arc<AppState>>,
    Path(course): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<SlotAvailability>>, BookingError> {
    let slots = state.booking().course_slots(&course, query.day).await?;
    Ok(Json(slots))
}
