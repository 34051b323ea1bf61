use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only security audit trail
        manager
            .create_table(
                Table::create()
                    .table(SecurityEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SecurityEvents::Date).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::Action).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::Subject).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::Object).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::Path).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityEvents::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SecurityEvents {
    Table,
    Id,
    Date,
    Action,
    Subject,
    Object,
    Path,
}
