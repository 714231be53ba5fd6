use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::AppState;
use models::category;
use service::services::category_service;

#[derive(Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
    pub color: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    let categories = category_service::list_categories(&state.db).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<category::Model>, JsonApiError> {
    let created = category_service::create_category(
        &state.db,
        &input.name,
        &input.icon,
        input.color.as_deref(),
    )
    .await?;
    Ok(Json(created))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<category::Model>, JsonApiError> {
    let updated = category_service::update_category(
        &state.db,
        id,
        &input.name,
        &input.icon,
        input.color.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    category_service::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
