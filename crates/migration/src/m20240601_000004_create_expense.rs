//! Create `expense` table with FKs to `category`, `user`, `payment_method`.
//!
//! Category and payer references are RESTRICT so referenced rows cannot be
//! deleted from under an expense; the service layer reports the conflict
//! with a count before the constraint ever fires.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expense::Table)
                    .if_not_exists()
                    .col(uuid(Expense::Id).primary_key())
                    .col(string_len(Expense::Description, 256).not_null())
                    .col(big_integer(Expense::AmountCents).not_null())
                    .col(timestamp_with_time_zone(Expense::Date).not_null())
                    .col(string_len(Expense::ExpenseType, 16).not_null())
                    .col(uuid(Expense::CategoryId).not_null())
                    .col(uuid(Expense::PaidById).not_null())
                    .col(
                        ColumnDef::new(Expense::PaymentMethodId)
                            .uuid()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Expense::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_category")
                            .from(Expense::Table, Expense::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_paid_by")
                            .from(Expense::Table, Expense::PaidById)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_payment_method")
                            .from(Expense::Table, Expense::PaymentMethodId)
                            .to(PaymentMethod::Table, PaymentMethod::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Expense::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Expense {
    Table,
    Id,
    Description,
    AmountCents,
    Date,
    ExpenseType,
    CategoryId,
    PaidById,
    PaymentMethodId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum PaymentMethod { Table, Id }
