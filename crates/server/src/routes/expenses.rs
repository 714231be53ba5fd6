use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::AppState;
use common::money::format_ars;
use models::{category, expense, payment_method, user};
use service::month::Month;
use service::services::{
    category_service, expense_service, payment_method_service, user_service,
};

/// `?year=&month=` pair; both absent means the current month.
#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    pub fn resolve(self) -> Result<Month, JsonApiError> {
        match (self.year, self.month) {
            (Some(y), Some(m)) => Ok(Month::new(y, m)?),
            (None, None) => Ok(Month::current()),
            _ => Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation Error",
                Some("year and month must be provided together".into()),
            )),
        }
    }
}

#[derive(Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl From<&category::Model> for CategoryRef {
    fn from(c: &category::Model) -> Self {
        Self { id: c.id, name: c.name.clone(), icon: c.icon.clone(), color: c.color.clone() }
    }
}

#[derive(Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl From<&user::Model> for UserRef {
    fn from(u: &user::Model) -> Self {
        Self { id: u.id, name: u.name.clone(), color: u.color.clone() }
    }
}

#[derive(Serialize)]
pub struct PaymentMethodRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&payment_method::Model> for PaymentMethodRef {
    fn from(pm: &payment_method::Model) -> Self {
        Self { id: pm.id, name: pm.name.clone() }
    }
}

/// Listing row with its references resolved, the shape the dashboard renders.
#[derive(Serialize)]
pub struct ExpenseDto {
    pub id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub amount_display: String,
    pub date: DateTime<Utc>,
    pub expense_type: String,
    pub category: CategoryRef,
    pub paid_by: UserRef,
    pub payment_method: Option<PaymentMethodRef>,
}

/// Resolve category/payer/payment-method references for a page of expenses.
async fn expense_dtos(
    db: &DatabaseConnection,
    expenses: Vec<expense::Model>,
) -> Result<Vec<ExpenseDto>, JsonApiError> {
    let categories = category_service::list_categories(db).await?;
    let users = user_service::list_users(db).await?;
    let methods = payment_method_service::list_payment_methods(db).await?;

    let by_category: HashMap<Uuid, &category::Model> =
        categories.iter().map(|c| (c.id, c)).collect();
    let by_user: HashMap<Uuid, &user::Model> = users.iter().map(|u| (u.id, u)).collect();
    let by_method: HashMap<Uuid, &payment_method::Model> =
        methods.iter().map(|m| (m.id, m)).collect();

    expenses
        .into_iter()
        .map(|e| {
            let cat = by_category
                .get(&e.category_id)
                .ok_or_else(|| JsonApiError::internal("expense references missing category"))?;
            let payer = by_user
                .get(&e.paid_by_id)
                .ok_or_else(|| JsonApiError::internal("expense references missing user"))?;
            let method = match e.payment_method_id {
                Some(id) => Some(
                    by_method
                        .get(&id)
                        .map(|m| PaymentMethodRef::from(*m))
                        .ok_or_else(|| {
                            JsonApiError::internal("expense references missing payment method")
                        })?,
                ),
                None => None,
            };
            Ok(ExpenseDto {
                id: e.id,
                description: e.description,
                amount_cents: e.amount_cents,
                amount_display: format_ars(e.amount_cents),
                date: e.date.with_timezone(&Utc),
                expense_type: e.expense_type,
                category: CategoryRef::from(*cat),
                paid_by: UserRef::from(*payer),
                payment_method: method,
            })
        })
        .collect()
}

pub async fn list_fixed(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExpenseDto>>, JsonApiError> {
    let expenses = expense_service::list_fixed(&state.db).await?;
    Ok(Json(expense_dtos(&state.db, expenses).await?))
}

pub async fn list_monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<ExpenseDto>>, JsonApiError> {
    let month = query.resolve()?;
    let expenses = expense_service::list_month(&state.db, month).await?;
    Ok(Json(expense_dtos(&state.db, expenses).await?))
}

#[derive(Deserialize)]
pub struct FixedExpenseInput {
    pub description: String,
    pub amount_cents: i64,
    pub category_id: Uuid,
    pub paid_by_id: Uuid,
}

pub async fn create_fixed(
    State(state): State<AppState>,
    Json(input): Json<FixedExpenseInput>,
) -> Result<Json<expense::Model>, JsonApiError> {
    let created = expense_service::create_fixed(
        &state.db,
        expense_service::NewFixedExpense {
            description: input.description,
            amount_cents: input.amount_cents,
            category_id: input.category_id,
            paid_by_id: input.paid_by_id,
        },
    )
    .await?;
    Ok(Json(created))
}

#[derive(Deserialize)]
pub struct FixedExpenseUpdate {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub category_id: Option<Uuid>,
}

pub async fn update_fixed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FixedExpenseUpdate>,
) -> Result<Json<expense::Model>, JsonApiError> {
    let updated = expense_service::update_fixed(
        &state.db,
        id,
        input.description.as_deref(),
        input.amount_cents,
        input.category_id,
    )
    .await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct VariableExpenseInput {
    pub description: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub paid_by_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    /// Record as extra income instead of an expense.
    #[serde(default)]
    pub income: bool,
}

pub async fn create_variable(
    State(state): State<AppState>,
    Json(input): Json<VariableExpenseInput>,
) -> Result<Json<expense::Model>, JsonApiError> {
    let created = expense_service::create_variable(
        &state.db,
        expense_service::NewVariableExpense {
            description: input.description,
            amount_cents: input.amount_cents,
            date: input.date,
            category_id: input.category_id,
            paid_by_id: input.paid_by_id,
            payment_method_id: input.payment_method_id,
            income: input.income,
        },
    )
    .await?;
    Ok(Json(created))
}

#[derive(Deserialize)]
pub struct VariableExpenseUpdate {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub paid_by_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    /// Detach the payment method; wins over `payment_method_id`.
    #[serde(default)]
    pub clear_payment_method: bool,
}

pub async fn update_variable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<VariableExpenseUpdate>,
) -> Result<Json<expense::Model>, JsonApiError> {
    let payment_method_id = if input.clear_payment_method {
        Some(None)
    } else {
        input.payment_method_id.map(Some)
    };
    let updated = expense_service::update_variable(
        &state.db,
        id,
        expense_service::VariableExpensePatch {
            description: input.description,
            amount_cents: input.amount_cents,
            date: input.date,
            category_id: input.category_id,
            paid_by_id: input.paid_by_id,
            payment_method_id,
        },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    expense_service::delete_expense(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RolloverRequest {
    pub amount_cents: i64,
    pub year: i32,
    pub month: u32,
}

#[derive(Serialize)]
pub struct RolloverResponse {
    pub rollover_out: expense::Model,
    pub rollover_in: expense::Model,
}

pub async fn rollover(
    State(state): State<AppState>,
    Json(input): Json<RolloverRequest>,
) -> Result<Json<RolloverResponse>, JsonApiError> {
    let from = Month::new(input.year, input.month)?;
    let (rollover_out, rollover_in) =
        expense_service::rollover(&state.db, input.amount_cents, from).await?;
    Ok(Json(RolloverResponse { rollover_out, rollover_in }))
}
