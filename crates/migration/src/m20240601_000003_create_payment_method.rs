use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethod::Table)
                    .if_not_exists()
                    .col(uuid(PaymentMethod::Id).primary_key())
                    .col(string_len(PaymentMethod::Name, 128).unique_key().not_null())
                    .col(timestamp_with_time_zone(PaymentMethod::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PaymentMethod::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PaymentMethod { Table, Id, Name, CreatedAt }
