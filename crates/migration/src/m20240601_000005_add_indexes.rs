//! Secondary indexes for the hot dashboard queries: monthly date-range
//! listing, type filters, and the per-category / per-payer breakdowns.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expense_date")
                    .table(Expense::Table)
                    .col(Expense::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expense_type")
                    .table(Expense::Table)
                    .col(Expense::ExpenseType)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expense_category")
                    .table(Expense::Table)
                    .col(Expense::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expense_paid_by")
                    .table(Expense::Table)
                    .col(Expense::PaidById)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_expense_paid_by").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_category").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_type").table(Expense::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_expense_date").table(Expense::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Expense { Table, Date, ExpenseType, CategoryId, PaidById }
