use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::AppState;
use models::user;
use service::services::user_service;

#[derive(Deserialize)]
pub struct ContributionUpdate {
    pub amount_cents: i64,
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    let users = user_service::list_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn update_contribution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ContributionUpdate>,
) -> Result<Json<user::Model>, JsonApiError> {
    let updated = user_service::update_contribution(&state.db, id, input.amount_cents).await?;
    Ok(Json(updated))
}
