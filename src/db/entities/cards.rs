//! DB storage for generated cards, one row per `seasons/{season}/cards/card_{index}` document
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, QueryOrder, TransactionTrait, entity::prelude::*};
use tracing::info;

use crate::concepts::CardConcept;
use crate::constants::MAX_SUPPLY;
use crate::error::CardgenError;
use crate::season::SeasonId;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
/// A card that made it through generation
pub struct Model {
    #[sea_orm(primary_key)]
    /// db id
    pub id: i32,
    /// season the card belongs to
    pub season_id: String,
    /// `card_{index}`
    pub card_id: String,
    /// position within the season
    pub card_index: i32,
    /// card name
    pub name: String,
    /// rarity key, eg `superRare`
    pub rarity: String,
    /// stored image URL
    pub image_path: String,
    /// flavour text
    pub description: String,
    /// how many copies may exist
    pub max_supply: i32,
    /// creature line for evolution cards
    pub evolution_line: Option<i32>,
    /// stage within the line for evolution cards
    pub evolution_stage: Option<i32>,
    /// set by the database on write
    pub created_at: DateTime,
    /// when the generator produced the card, RFC 3339
    pub generated_at: String,
}

/// cards don't relate to anything
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn active_model(
    season: &SeasonId,
    card: &CardConcept,
    generated_at: &str,
) -> Result<ActiveModel, CardgenError> {
    let image_path = card
        .image_path
        .clone()
        .ok_or_else(|| CardgenError::MissingImage(card.card_id()))?;
    Ok(ActiveModel {
        season_id: Set(season.to_string()),
        card_id: Set(card.card_id()),
        card_index: Set(card.index as i32),
        name: Set(card.name.clone()),
        rarity: Set(card.rarity.as_key().to_string()),
        image_path: Set(image_path),
        description: Set(card.description.clone()),
        max_supply: Set(MAX_SUPPLY),
        evolution_line: Set(card.evolution_line.map(|line| line as i32)),
        evolution_stage: Set(card.evolution_stage.map(|stage| stage as i32)),
        generated_at: Set(generated_at.to_string()),
        ..Default::default()
    })
}

/// Writes every card in one transaction, replacing rows already stored under
/// the same season and card id. Cards without an image are rejected before
/// anything is written.
pub async fn persist_all(
    db: &DatabaseConnection,
    season: &SeasonId,
    cards: &[CardConcept],
    generated_at: chrono::DateTime<Utc>,
) -> Result<usize, CardgenError> {
    let generated_at = generated_at.to_rfc3339();
    let models = cards
        .iter()
        .map(|card| active_model(season, card, &generated_at))
        .collect::<Result<Vec<_>, _>>()?;
    if models.is_empty() {
        info!("No cards to save for season {season}");
        return Ok(0);
    }
    let count = models.len();

    let db_txn = db.begin().await?;
    Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([Column::SeasonId, Column::CardId])
                .update_columns([
                    Column::CardIndex,
                    Column::Name,
                    Column::Rarity,
                    Column::ImagePath,
                    Column::Description,
                    Column::MaxSupply,
                    Column::EvolutionLine,
                    Column::EvolutionStage,
                    Column::CreatedAt,
                    Column::GeneratedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&db_txn)
        .await?;
    db_txn.commit().await?;

    info!("Saved {count} cards to {}", season.collection_path());
    Ok(count)
}

/// All stored cards of a season, in index order.
pub async fn for_season(db: &DatabaseConnection, season: &SeasonId) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::SeasonId.eq(season.as_str()))
        .order_by_asc(Column::CardIndex)
        .all(db)
        .await
}
