use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::ProfileImage).string())
                    .col(ColumnDef::new(Users::Provider).string())
                    .col(ColumnDef::new(Users::ProviderAccountId).string())
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Datasets table
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::UserId).integer())
                    .col(ColumnDef::new(Datasets::Filename).string().not_null())
                    .col(ColumnDef::new(Datasets::Columns).json().not_null())
                    .col(ColumnDef::new(Datasets::ColumnTypes).json())
                    .col(ColumnDef::new(Datasets::Data).json().not_null())
                    .col(
                        ColumnDef::new(Datasets::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Datasets::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_user_id")
                            .from(Datasets::Table, Datasets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dataset_user_id")
                    .table(Datasets::Table)
                    .col(Datasets::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_dataset_uploaded_at")
                    .table(Datasets::Table)
                    .col(Datasets::UploadedAt)
                    .to_owned(),
            )
            .await?;

        // Dashboards table
        manager
            .create_table(
                Table::create()
                    .table(Dashboards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dashboards::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dashboards::UserId).integer().not_null())
                    .col(ColumnDef::new(Dashboards::DatasetId).integer().not_null())
                    .col(ColumnDef::new(Dashboards::Title).string().not_null())
                    .col(ColumnDef::new(Dashboards::Description).string())
                    .col(
                        ColumnDef::new(Dashboards::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Dashboards::PreviewImage).string())
                    .col(
                        ColumnDef::new(Dashboards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dashboards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dashboards::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dashboard_user_id")
                            .from(Dashboards::Table, Dashboards::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dashboard_dataset_id")
                            .from(Dashboards::Table, Dashboards::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dashboard_user_id")
                    .table(Dashboards::Table)
                    .col(Dashboards::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_dashboard_dataset_id")
                    .table(Dashboards::Table)
                    .col(Dashboards::DatasetId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_dashboard_created_at")
                    .table(Dashboards::Table)
                    .col(Dashboards::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Charts table
        manager
            .create_table(
                Table::create()
                    .table(Charts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Charts::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Charts::DashboardId).integer().not_null())
                    .col(ColumnDef::new(Charts::Title).string().not_null())
                    .col(ColumnDef::new(Charts::Description).string())
                    .col(ColumnDef::new(Charts::ChartType).string().not_null())
                    .col(ColumnDef::new(Charts::Data).json().not_null())
                    .col(ColumnDef::new(Charts::Config).json().not_null())
                    .col(ColumnDef::new(Charts::DisplayOrder).integer().not_null())
                    .col(
                        ColumnDef::new(Charts::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chart_dashboard_id")
                            .from(Charts::Table, Charts::DashboardId)
                            .to(Dashboards::Table, Dashboards::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chart_dashboard_id")
                    .table(Charts::Table)
                    .col(Charts::DashboardId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_chart_display_order")
                    .table(Charts::Table)
                    .col(Charts::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        // Likes table
        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Likes::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Likes::UserId).integer().not_null())
                    .col(ColumnDef::new(Likes::DashboardId).integer().not_null())
                    .col(
                        ColumnDef::new(Likes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Likes::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_user_id")
                            .from(Likes::Table, Likes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_dashboard_id")
                            .from(Likes::Table, Likes::DashboardId)
                            .to(Dashboards::Table, Dashboards::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_like_user_dashboard")
                    .table(Likes::Table)
                    .col(Likes::UserId)
                    .col(Likes::DashboardId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_like_dashboard_id")
                    .table(Likes::Table)
                    .col(Likes::DashboardId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_like_created_at")
                    .table(Likes::Table)
                    .col(Likes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Comments table
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .integer()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::UserId).integer().not_null())
                    .col(ColumnDef::new(Comments::DashboardId).integer().not_null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comments::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_user_id")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_dashboard_id")
                            .from(Comments::Table, Comments::DashboardId)
                            .to(Dashboards::Table, Dashboards::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_user_id")
                    .table(Comments::Table)
                    .col(Comments::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_dashboard_id")
                    .table(Comments::Table)
                    .col(Comments::DashboardId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_created_at")
                    .table(Comments::Table)
                    .col(Comments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Likes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Charts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dashboards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    ProfileImage,
    Provider,
    ProviderAccountId,
    IsStaff,
    IsSuperuser,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    Id,
    UserId,
    Filename,
    Columns,
    ColumnTypes,
    Data,
    UploadedAt,
    IsArchived,
}

#[derive(DeriveIden)]
enum Dashboards {
    Table,
    Id,
    UserId,
    DatasetId,
    Title,
    Description,
    IsPublic,
    PreviewImage,
    CreatedAt,
    UpdatedAt,
    IsArchived,
}

#[derive(DeriveIden)]
enum Charts {
    Table,
    Id,
    DashboardId,
    Title,
    Description,
    ChartType,
    Data,
    Config,
    DisplayOrder,
    IsArchived,
}

#[derive(DeriveIden)]
enum Likes {
    Table,
    Id,
    UserId,
    DashboardId,
    CreatedAt,
    IsArchived,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    UserId,
    DashboardId,
    Content,
    CreatedAt,
    IsArchived,
}
