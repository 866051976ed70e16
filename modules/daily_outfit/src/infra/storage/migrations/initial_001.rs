use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClothingItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClothingItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ClothingItems::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(ClothingItems::Name).string().not_null())
                    .col(ColumnDef::new(ClothingItems::Category).string().not_null())
                    .col(ColumnDef::new(ClothingItems::PrimaryColor).string().null())
                    .col(ColumnDef::new(ClothingItems::SecondaryColor).string().null())
                    .col(
                        ColumnDef::new(ClothingItems::TimesWorn)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ClothingItems::LastWornOn).date().null())
                    .col(
                        ColumnDef::new(ClothingItems::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ClothingItems::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(ClothingItems::WeatherTags).json().not_null())
                    .col(ColumnDef::new(ClothingItems::SeasonTags).json().not_null())
                    .col(ColumnDef::new(ClothingItems::ImagePath).string().null())
                    .col(
                        ColumnDef::new(ClothingItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clothing_items_owner")
                    .table(ClothingItems::Table)
                    .col(ClothingItems::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OutfitRecommendations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OutfitRecommendations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OutfitRecommendations::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(OutfitRecommendations::ItemIds).json().not_null())
                    .col(
                        ColumnDef::new(OutfitRecommendations::WeatherCondition)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OutfitRecommendations::TemperatureCelsius)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutfitRecommendations::Occasion).string().null())
                    .col(ColumnDef::new(OutfitRecommendations::Mood).string().null())
                    .col(ColumnDef::new(OutfitRecommendations::Season).string().null())
                    .col(
                        ColumnDef::new(OutfitRecommendations::RecommendationReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(OutfitRecommendations::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutfitRecommendations::AiScore).double().null())
                    .col(
                        ColumnDef::new(OutfitRecommendations::BasedOnPastPreferences)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Every tier lookup filters by owner and sorts by recency.
        manager
            .create_index(
                Index::create()
                    .name("idx_outfit_recommendations_owner_generated")
                    .table(OutfitRecommendations::Table)
                    .col(OutfitRecommendations::OwnerId)
                    .col(OutfitRecommendations::GeneratedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::City).string().null())
                    .col(ColumnDef::new(UserProfiles::Country).string().null())
                    .col(ColumnDef::new(UserProfiles::StylePreferences).json().not_null())
                    .col(ColumnDef::new(UserProfiles::ColorPreferences).json().not_null())
                    .col(ColumnDef::new(UserProfiles::BodyType).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OutfitRecommendations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClothingItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClothingItems {
    Table,
    Id,
    OwnerId,
    Name,
    Category,
    PrimaryColor,
    SecondaryColor,
    TimesWorn,
    LastWornOn,
    IsArchived,
    DeletedAt,
    WeatherTags,
    SeasonTags,
    ImagePath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OutfitRecommendations {
    Table,
    Id,
    OwnerId,
    ItemIds,
    WeatherCondition,
    TemperatureCelsius,
    Occasion,
    Mood,
    Season,
    RecommendationReason,
    GeneratedAt,
    AiScore,
    BasedOnPastPreferences,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    City,
    Country,
    StylePreferences,
    ColorPreferences,
    BodyType,
}
