//! Course content endpoints
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/courses/:course_id` - Full hierarchy of a course
//! - `PUT /api/courses/:course_id/modules/:module_id/content-order` -
//!   Persist a module's flattened content order
//! - `PUT /api/courses/:course_id/modules/:module_id/sections/:section_id/lesson-order` -
//!   Persist a section's lesson order
//!
//! Both `PUT` endpoints answer with the updated course, which clients use as
//! the authoritative copy.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;

use coursedesk_core::store::{ReorderContentRequest, ReorderLessonsRequest};
use coursedesk_core::{ContentStore, Course};

use crate::{AppState, HttpError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, HttpError> {
    let course = state.store.fetch_course(&course_id).await?;
    Ok(Json(course))
}

/// Persist a module's content order
///
/// ```bash
/// curl -X PUT http://localhost:3001/api/courses/c1/modules/m1/content-order \
///   -H 'Content-Type: application/json' \
///   -d '{"orderedItems": [{"kind": "lesson", "id": "l2", "title": "", "order": 1}, ...]}'
/// ```
async fn put_content_order(
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(String, String)>,
    Json(request): Json<ReorderContentRequest>,
) -> Result<Json<Course>, HttpError> {
    let course = state
        .store
        .persist_module_order(&course_id, &module_id, &request)
        .await?;
    Ok(Json(course))
}

async fn put_lesson_order(
    State(state): State<AppState>,
    Path((course_id, module_id, section_id)): Path<(String, String, String)>,
    Json(request): Json<ReorderLessonsRequest>,
) -> Result<Json<Course>, HttpError> {
    let course = state
        .store
        .persist_section_lessons(&course_id, &module_id, &section_id, &request)
        .await?;
    Ok(Json(course))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/courses/:course_id", get(get_course))
        .route(
            "/api/courses/:course_id/modules/:module_id/content-order",
            put(put_content_order),
        )
        .route(
            "/api/courses/:course_id/modules/:module_id/sections/:section_id/lesson-order",
            put(put_lesson_order),
        )
        .with_state(state)
}
