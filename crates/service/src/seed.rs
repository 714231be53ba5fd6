//! First-run defaults. Each table is seeded only while empty, so existing
//! data is never touched.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::info;

use crate::errors::ServiceError;
use models::{category, payment_method, user};

const DEFAULT_USERS: [&str; 2] = ["Persona 1", "Persona 2"];

const DEFAULT_CATEGORIES: [(&str, &str); 6] = [
    ("Comida", "utensils"),
    ("Transporte", "car"),
    ("Servicios", "zap"),
    ("Entretenimiento", "tv"),
    ("Salud", "activity"),
    ("Otros", "circle-ellipsis"),
];

const DEFAULT_PAYMENT_METHODS: [&str; 4] =
    ["Efectivo", "Transferencia", "Tarjeta Crédito", "Tarjeta Débito"];

pub async fn ensure_defaults(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let users = user::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if users == 0 {
        for name in DEFAULT_USERS {
            user::create(db, name, 0, None).await?;
        }
        info!(count = DEFAULT_USERS.len(), "seeded default users");
    }

    let categories = category::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if categories == 0 {
        for (name, icon) in DEFAULT_CATEGORIES {
            category::create(db, name, icon, None).await?;
        }
        info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    }

    let methods = payment_method::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if methods == 0 {
        for name in DEFAULT_PAYMENT_METHODS {
            payment_method::create(db, name).await?;
        }
        info!(count = DEFAULT_PAYMENT_METHODS.len(), "seeded default payment methods");
    }

    Ok(())
}
