use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::user;

/// All participants, ordered by name.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    user::Entity::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Set a participant's monthly contribution.
pub async fn update_contribution(
    db: &DatabaseConnection,
    user_id: Uuid,
    amount_cents: i64,
) -> Result<user::Model, ServiceError> {
    if amount_cents < 0 {
        return Err(ServiceError::Validation("contribution must be >= 0".into()));
    }
    let mut am: user::ActiveModel = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?
        .into();
    am.amount_cents = Set(amount_cents);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn contribution_update_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(_) => return Ok(()),
        };

        let u = user::create(&db, &format!("svc_user_{}", Uuid::new_v4()), 0, None).await?;
        let updated = update_contribution(&db, u.id, 250_000_00).await?;
        assert_eq!(updated.amount_cents, 250_000_00);

        assert!(update_contribution(&db, u.id, -1).await.is_err());
        assert!(update_contribution(&db, Uuid::new_v4(), 100).await.is_err());

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
