// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IngestionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IngestionRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IngestionRecords::S3Url).string().not_null())
                    .col(ColumnDef::new(IngestionRecords::Uuid).string().not_null())
                    .col(
                        ColumnDef::new(IngestionRecords::IngestedDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngestionRecords::FileSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IngestionRecords::Checksum).string().not_null())
                    .col(
                        ColumnDef::new(IngestionRecords::JobStartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngestionRecords::JobEndTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IngestionRecords::RecordsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IngestionRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IngestionRecords {
    Table,
    Id,
    S3Url,
    Uuid,
    IngestedDate,
    FileSize,
    Checksum,
    JobStartTime,
    JobEndTime,
    RecordsCount,
}
