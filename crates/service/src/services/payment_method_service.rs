use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{expense, payment_method};

pub async fn list_payment_methods(
    db: &DatabaseConnection,
) -> Result<Vec<payment_method::Model>, ServiceError> {
    payment_method::Entity::find()
        .order_by_asc(payment_method::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_payment_method(
    db: &DatabaseConnection,
    name: &str,
) -> Result<payment_method::Model, ServiceError> {
    Ok(payment_method::create(db, name).await?)
}

pub async fn update_payment_method(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
) -> Result<payment_method::Model, ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name required".into()));
    }
    let mut am: payment_method::ActiveModel = payment_method::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("payment method"))?
        .into();
    am.name = Set(name.to_string());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a payment method, refused while expenses still reference it.
pub async fn delete_payment_method(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let referencing = expense::Entity::find()
        .filter(expense::Column::PaymentMethodId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if referencing > 0 {
        return Err(ServiceError::in_use("payment method", referencing));
    }
    let res = payment_method::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("payment method"));
    }
    Ok(())
}
