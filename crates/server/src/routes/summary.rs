use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::errors::JsonApiError;
use crate::routes::expenses::{CategoryRef, MonthQuery, UserRef};
use crate::routes::AppState;
use common::money::format_ars;
use service::balance;
use service::month::Month;
use service::services::{category_service, expense_service, user_service};

/// Cents plus the es-AR display string the dashboard shows.
#[derive(Serialize)]
pub struct MoneyField {
    pub cents: i64,
    pub display: String,
}

impl From<i64> for MoneyField {
    fn from(cents: i64) -> Self {
        Self { cents, display: format_ars(cents) }
    }
}

#[derive(Serialize)]
pub struct TotalsDto {
    pub contributions: MoneyField,
    pub extra_income: MoneyField,
    pub total_income: MoneyField,
    pub total_fixed: MoneyField,
    pub total_variable: MoneyField,
    pub rollover_out: MoneyField,
    pub remaining: MoneyField,
    pub disposable: MoneyField,
    pub spent_pct: f64,
}

#[derive(Serialize)]
pub struct CategorySummaryDto {
    pub category: CategoryRef,
    pub total: MoneyField,
    pub share_pct: f64,
}

#[derive(Serialize)]
pub struct UserSummaryDto {
    pub user: UserRef,
    pub contribution: MoneyField,
    pub spent: MoneyField,
    pub remaining: MoneyField,
    pub spent_pct: f64,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub month: Month,
    pub totals: TotalsDto,
    pub categories: Vec<CategorySummaryDto>,
    pub users: Vec<UserSummaryDto>,
}

/// The whole dashboard header in one request: balance totals plus the
/// per-category and per-user breakdowns for the month.
pub async fn month_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<SummaryResponse>, JsonApiError> {
    let month = query.resolve()?;

    let users = user_service::list_users(&state.db).await?;
    let categories = category_service::list_categories(&state.db).await?;
    let fixed = expense_service::list_fixed(&state.db).await?;
    let monthly = expense_service::list_month(&state.db, month).await?;

    let totals = balance::month_totals(&users, &fixed, &monthly);
    let totals_dto = TotalsDto {
        contributions: totals.contributions_cents.into(),
        extra_income: totals.extra_income_cents.into(),
        total_income: totals.total_income_cents.into(),
        total_fixed: totals.total_fixed_cents.into(),
        total_variable: totals.total_variable_cents.into(),
        rollover_out: totals.rollover_out_cents.into(),
        remaining: totals.remaining_cents.into(),
        disposable: totals.disposable_cents.into(),
        spent_pct: totals.spent_pct(),
    };

    let category_rows = balance::category_breakdown(&fixed, &monthly)
        .into_iter()
        .map(|row| {
            let cat = categories
                .iter()
                .find(|c| c.id == row.category_id)
                .ok_or_else(|| JsonApiError::internal("expense references missing category"))?;
            Ok(CategorySummaryDto {
                category: CategoryRef::from(cat),
                total: row.total_cents.into(),
                share_pct: row.share_pct,
            })
        })
        .collect::<Result<Vec<_>, JsonApiError>>()?;

    // user_breakdown preserves the order of `users`
    let user_rows = balance::user_breakdown(&users, &monthly)
        .into_iter()
        .zip(users.iter())
        .map(|(row, u)| UserSummaryDto {
            user: UserRef::from(u),
            contribution: row.contribution_cents.into(),
            spent: row.spent_cents.into(),
            remaining: row.remaining_cents.into(),
            spent_pct: row.spent_pct,
        })
        .collect();

    Ok(Json(SummaryResponse {
        month,
        totals: totals_dto,
        categories: category_rows,
        users: user_rows,
    }))
}
