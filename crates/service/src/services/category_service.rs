use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{category, expense};

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    icon: &str,
    color: Option<&str>,
) -> Result<category::Model, ServiceError> {
    Ok(category::create(db, name, icon, color).await?)
}

/// Update name/icon; the color is only touched when one is provided.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    icon: &str,
    color: Option<&str>,
) -> Result<category::Model, ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name required".into()));
    }
    if icon.trim().is_empty() {
        return Err(ServiceError::Validation("icon required".into()));
    }
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?
        .into();
    am.name = Set(name.to_string());
    am.icon = Set(icon.to_string());
    if let Some(c) = color {
        am.color = Set(c.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a category, refused while expenses still reference it.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let referencing = expense::Entity::find()
        .filter(expense::Column::CategoryId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if referencing > 0 {
        return Err(ServiceError::in_use("category", referencing));
    }
    let res = category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category"));
    }
    Ok(())
}
