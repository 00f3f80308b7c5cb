use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cards::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cards::SeasonId).string().not_null())
                    .col(ColumnDef::new(Cards::CardId).string().not_null())
                    .col(ColumnDef::new(Cards::CardIndex).integer().not_null())
                    .col(ColumnDef::new(Cards::Name).string().not_null())
                    .col(ColumnDef::new(Cards::Rarity).string().not_null())
                    .col(ColumnDef::new(Cards::ImagePath).string().not_null())
                    .col(ColumnDef::new(Cards::Description).string().not_null())
                    .col(ColumnDef::new(Cards::MaxSupply).integer().not_null())
                    .col(ColumnDef::new(Cards::EvolutionLine).integer().null())
                    .col(ColumnDef::new(Cards::EvolutionStage).integer().null())
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Cards::GeneratedAt).string().not_null())
                    .index(
                        Index::create()
                            .name("idx_cards_season_card")
                            .table(Cards::Table)
                            .col(Cards::SeasonId)
                            .col(Cards::CardId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    SeasonId,
    CardId,
    CardIndex,
    Name,
    Rarity,
    ImagePath,
    Description,
    MaxSupply,
    EvolutionLine,
    EvolutionStage,
    CreatedAt,
    GeneratedAt,
}
