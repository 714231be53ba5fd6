use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{category, payment_method, user};

/// Closed set of expense kinds. Stored as an upper-case string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Fixed,
    Variable,
    Income,
    Rollover,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Fixed => "FIXED",
            ExpenseType::Variable => "VARIABLE",
            ExpenseType::Income => "INCOME",
            ExpenseType::Rollover => "ROLLOVER",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIXED" => Ok(ExpenseType::Fixed),
            "VARIABLE" => Ok(ExpenseType::Variable),
            "INCOME" => Ok(ExpenseType::Income),
            "ROLLOVER" => Ok(ExpenseType::Rollover),
            other => Err(ModelError::Validation(format!("unknown expense type: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub amount_cents: i64,
    pub date: DateTimeWithTimeZone,
    pub expense_type: String,
    pub category_id: Uuid,
    pub paid_by_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_type(&self, ty: ExpenseType) -> bool {
        self.expense_type == ty.as_str()
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
    PaidBy,
    PaymentMethod,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
            Relation::PaidBy => Entity::belongs_to(user::Entity)
                .from(Column::PaidById)
                .to(user::Column::Id)
                .into(),
            Relation::PaymentMethod => Entity::belongs_to(payment_method::Entity)
                .from(Column::PaymentMethodId)
                .to(payment_method::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaidBy.def()
    }
}

impl Related<payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ExpenseType;
    use std::str::FromStr;

    #[test]
    fn type_round_trips_through_str() {
        for ty in [
            ExpenseType::Fixed,
            ExpenseType::Variable,
            ExpenseType::Income,
            ExpenseType::Rollover,
        ] {
            assert_eq!(ExpenseType::from_str(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(ExpenseType::from_str("fixed").is_err());
        assert!(ExpenseType::from_str("TRANSFER").is_err());
    }
}
