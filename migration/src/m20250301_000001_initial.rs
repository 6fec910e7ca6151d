use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Teams {
    Table,
    TeamId,
    Name,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FullName,
    TeamId,
}

#[derive(DeriveIden)]
enum Penalties {
    Table,
    Id,
    UserId,
    TeamId,
    CreatedDate,
    Reason,
    Amount,
    Currency,
    PaidDate,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Amount,
    Description,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::TeamId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teams::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FullName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::TeamId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_team_id")
                            .from(Users::Table, Users::TeamId)
                            .to(Teams::Table, Teams::TeamId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Penalties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Penalties::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Penalties::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Penalties::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(Penalties::CreatedDate).date().not_null())
                    .col(ColumnDef::new(Penalties::Reason).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Penalties::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Penalties::Currency)
                            .string_len(3)
                            .not_null()
                            .default("EUR"),
                    )
                    .col(ColumnDef::new(Penalties::PaidDate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_penalties_user_id")
                            .from(Penalties::Table, Penalties::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_penalties_team_id")
                            .from(Penalties::Table, Penalties::TeamId)
                            .to(Teams::Table, Teams::TeamId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Penalties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        Ok(())
    }
}
