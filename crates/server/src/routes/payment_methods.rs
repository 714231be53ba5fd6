use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::AppState;
use models::payment_method;
use service::services::payment_method_service;

#[derive(Deserialize)]
pub struct PaymentMethodInput {
    pub name: String,
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<payment_method::Model>>, JsonApiError> {
    let methods = payment_method_service::list_payment_methods(&state.db).await?;
    Ok(Json(methods))
}

pub async fn create_payment_method(
    State(state): State<AppState>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<Json<payment_method::Model>, JsonApiError> {
    let created = payment_method_service::create_payment_method(&state.db, &input.name).await?;
    Ok(Json(created))
}

pub async fn update_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<Json<payment_method::Model>, JsonApiError> {
    let updated =
        payment_method_service::update_payment_method(&state.db, id, &input.name).await?;
    Ok(Json(updated))
}

pub async fn delete_payment_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    payment_method_service::delete_payment_method(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
