use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Penalties {
    Table,
    Archived,
    Subject,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only supports adding one column per ALTER TABLE
        manager
            .alter_table(
                Table::alter()
                    .table(Penalties::Table)
                    .add_column(
                        ColumnDef::new(Penalties::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Penalties::Table)
                    .add_column(ColumnDef::new(Penalties::Subject).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Penalties::Table)
                    .drop_column(Penalties::Subject)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Penalties::Table)
                    .drop_column(Penalties::Archived)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
