use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum BusinessUnits {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Domains {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    MiddleName,
    LastName,
    BusinessUnit,
    Role,
    Bid,
    Capitalization,
    Superiors,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    ManagerId,
    Domain,
    JiraLink,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessUnits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessUnits::Name)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Domains::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Domains::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Domains::Name).text().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).text().not_null())
                    .col(ColumnDef::new(Employees::MiddleName).text().not_null())
                    .col(ColumnDef::new(Employees::LastName).text().not_null())
                    .col(ColumnDef::new(Employees::BusinessUnit).text().null())
                    .col(ColumnDef::new(Employees::Role).text().null())
                    .col(ColumnDef::new(Employees::Bid).text().null())
                    .col(ColumnDef::new(Employees::Capitalization).double().null())
                    .col(ColumnDef::new(Employees::Superiors).uuid().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_role")
                    .table(Employees::Table)
                    .col(Employees::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_superiors")
                    .table(Employees::Table)
                    .col(Employees::Superiors)
                    .to_owned(),
            )
            .await?;

        // No foreign key on manager_id: products may name unknown employees.
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).text().not_null())
                    .col(ColumnDef::new(Products::ManagerId).uuid().not_null())
                    .col(ColumnDef::new(Products::Domain).text().not_null())
                    .col(ColumnDef::new(Products::JiraLink).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_manager")
                    .table(Products::Table)
                    .col(Products::ManagerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Domains::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(BusinessUnits::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
