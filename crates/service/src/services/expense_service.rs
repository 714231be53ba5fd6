use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::month::Month;
use models::expense::{self, ExpenseType};
use models::{category, payment_method, user};

pub const ROLLOVER_OUT_DESCRIPTION: &str = "Rollover a mes siguiente";
pub const ROLLOVER_IN_DESCRIPTION: &str = "Saldo anterior";
/// Rollover-out entries are dated near the end of the source month.
const ROLLOVER_OUT_DAY: u32 = 28;

#[derive(Debug, Clone)]
pub struct NewFixedExpense {
    pub description: String,
    pub amount_cents: i64,
    pub category_id: Uuid,
    pub paid_by_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewVariableExpense {
    pub description: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub paid_by_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    /// Record as extra INCOME instead of a VARIABLE expense.
    pub income: bool,
}

#[derive(Debug, Default, Clone)]
pub struct VariableExpensePatch {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub paid_by_id: Option<Uuid>,
    /// `Some(None)` clears the payment method.
    pub payment_method_id: Option<Option<Uuid>>,
}

fn validate_description(description: &str) -> Result<(), ServiceError> {
    if description.trim().is_empty() {
        return Err(ServiceError::Validation("description required".into()));
    }
    Ok(())
}

fn validate_amount(amount_cents: i64) -> Result<(), ServiceError> {
    if amount_cents <= 0 {
        return Err(ServiceError::Validation("amount must be > 0".into()));
    }
    Ok(())
}

async fn ensure_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("category"))
}

async fn ensure_user(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("user"))
}

async fn ensure_payment_method(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    payment_method::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("payment method"))
}

/// All recurring FIXED expenses, newest first.
pub async fn list_fixed(db: &DatabaseConnection) -> Result<Vec<expense::Model>, ServiceError> {
    expense::Entity::find()
        .filter(expense::Column::ExpenseType.eq(ExpenseType::Fixed.as_str()))
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// The month's VARIABLE / INCOME / ROLLOVER rows, newest first.
/// The window is half-open: `[first of month, first of next month)`.
pub async fn list_month(
    db: &DatabaseConnection,
    month: Month,
) -> Result<Vec<expense::Model>, ServiceError> {
    let start: sea_orm::prelude::DateTimeWithTimeZone = month.start()?.into();
    let end: sea_orm::prelude::DateTimeWithTimeZone = month.end_exclusive()?.into();
    expense::Entity::find()
        .filter(expense::Column::ExpenseType.is_in([
            ExpenseType::Variable.as_str(),
            ExpenseType::Income.as_str(),
            ExpenseType::Rollover.as_str(),
        ]))
        .filter(expense::Column::Date.gte(start))
        .filter(expense::Column::Date.lt(end))
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Record a recurring expense; its date is the creation instant.
pub async fn create_fixed(
    db: &DatabaseConnection,
    input: NewFixedExpense,
) -> Result<expense::Model, ServiceError> {
    validate_description(&input.description)?;
    validate_amount(input.amount_cents)?;
    ensure_category(db, input.category_id).await?;
    ensure_user(db, input.paid_by_id).await?;

    let now = Utc::now();
    let am = expense::ActiveModel {
        id: Set(Uuid::new_v4()),
        description: Set(input.description),
        amount_cents: Set(input.amount_cents),
        date: Set(now.into()),
        expense_type: Set(ExpenseType::Fixed.as_str().into()),
        category_id: Set(input.category_id),
        paid_by_id: Set(input.paid_by_id),
        payment_method_id: Set(None),
        created_at: Set(now.into()),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_fixed(
    db: &DatabaseConnection,
    id: Uuid,
    description: Option<&str>,
    amount_cents: Option<i64>,
    category_id: Option<Uuid>,
) -> Result<expense::Model, ServiceError> {
    let found = expense::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("expense"))?;
    if !found.is_type(ExpenseType::Fixed) {
        return Err(ServiceError::Validation("expense is not FIXED".into()));
    }
    let mut am: expense::ActiveModel = found.into();
    if let Some(d) = description {
        validate_description(d)?;
        am.description = Set(d.to_string());
    }
    if let Some(a) = amount_cents {
        validate_amount(a)?;
        am.amount_cents = Set(a);
    }
    if let Some(c) = category_id {
        ensure_category(db, c).await?;
        am.category_id = Set(c);
    }
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Record an ad-hoc transaction: a VARIABLE expense, or extra INCOME when the
/// input is flagged as such.
pub async fn create_variable(
    db: &DatabaseConnection,
    input: NewVariableExpense,
) -> Result<expense::Model, ServiceError> {
    validate_description(&input.description)?;
    validate_amount(input.amount_cents)?;
    ensure_category(db, input.category_id).await?;
    ensure_user(db, input.paid_by_id).await?;
    if let Some(pm) = input.payment_method_id {
        ensure_payment_method(db, pm).await?;
    }

    let ty = if input.income { ExpenseType::Income } else { ExpenseType::Variable };
    let am = expense::ActiveModel {
        id: Set(Uuid::new_v4()),
        description: Set(input.description),
        amount_cents: Set(input.amount_cents),
        date: Set(input.date.into()),
        expense_type: Set(ty.as_str().into()),
        category_id: Set(input.category_id),
        paid_by_id: Set(input.paid_by_id),
        payment_method_id: Set(input.payment_method_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_variable(
    db: &DatabaseConnection,
    id: Uuid,
    patch: VariableExpensePatch,
) -> Result<expense::Model, ServiceError> {
    let found = expense::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("expense"))?;
    if found.is_type(ExpenseType::Fixed) {
        return Err(ServiceError::Validation("expense is FIXED; use the fixed update".into()));
    }
    let mut am: expense::ActiveModel = found.into();
    if let Some(d) = patch.description {
        validate_description(&d)?;
        am.description = Set(d);
    }
    if let Some(a) = patch.amount_cents {
        validate_amount(a)?;
        am.amount_cents = Set(a);
    }
    if let Some(date) = patch.date {
        am.date = Set(date.into());
    }
    if let Some(c) = patch.category_id {
        ensure_category(db, c).await?;
        am.category_id = Set(c);
    }
    if let Some(u) = patch.paid_by_id {
        ensure_user(db, u).await?;
        am.paid_by_id = Set(u);
    }
    if let Some(pm) = patch.payment_method_id {
        if let Some(pm_id) = pm {
            ensure_payment_method(db, pm_id).await?;
        }
        am.payment_method_id = Set(pm);
    }
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete any expense by id.
pub async fn delete_expense(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = expense::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("expense"));
    }
    Ok(())
}

/// Move a positive leftover balance into the next month: exactly two inserts,
/// a ROLLOVER out-entry dated day 28 of the source month and an INCOME
/// in-entry dated day 1 of the following month. Both are attributed to the
/// first category and first participant on record.
pub async fn rollover(
    db: &DatabaseConnection,
    amount_cents: i64,
    from: Month,
) -> Result<(expense::Model, expense::Model), ServiceError> {
    validate_amount(amount_cents)?;

    let cat = category::Entity::find()
        .order_by_asc(category::Column::CreatedAt)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::Validation("no category available for rollover".into()))?;
    let payer = user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::Validation("no user available for rollover".into()))?;

    let now = Utc::now();
    let out = expense::ActiveModel {
        id: Set(Uuid::new_v4()),
        description: Set(ROLLOVER_OUT_DESCRIPTION.into()),
        amount_cents: Set(amount_cents),
        date: Set(from.day(ROLLOVER_OUT_DAY)?.into()),
        expense_type: Set(ExpenseType::Rollover.as_str().into()),
        category_id: Set(cat.id),
        paid_by_id: Set(payer.id),
        payment_method_id: Set(None),
        created_at: Set(now.into()),
    }
    .insert(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let to = from.next();
    let income = expense::ActiveModel {
        id: Set(Uuid::new_v4()),
        description: Set(ROLLOVER_IN_DESCRIPTION.into()),
        amount_cents: Set(amount_cents),
        date: Set(to.start()?.into()),
        expense_type: Set(ExpenseType::Income.as_str().into()),
        category_id: Set(cat.id),
        paid_by_id: Set(payer.id),
        payment_method_id: Set(None),
        created_at: Set(now.into()),
    }
    .insert(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    info!(%from, %to, amount_cents, "balance rolled over");
    Ok((out, income))
}
