//! Initial schema migration.
//!
//! Creates the complete schema for Farmbook:
//!
//! - `users`: authentication and roles
//! - `expenses`: categorized costs (one `head` per row)
//! - `sales`: egg sales, the only revenue source
//! - `production`: daily egg collection and mortality
//! - `feed`: feed purchases with a sequential stock balance
//! - `salaries`: staff payments
//!
//! Every record table carries `farm` and a derived three-letter `month`
//! token next to its own date column; both are indexed because every list,
//! summary and report query filters on them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden, Clone, Copy)]
enum Users {
    Table,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Expenses {
    Table,
    Id,
    Farm,
    Head,
    Description,
    Cost,
    ExpenseDate,
    Month,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Sales {
    Table,
    Id,
    Farm,
    Customer,
    Crates,
    PricePerCrate,
    Amount,
    AmountPaid,
    SaleDate,
    Month,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Production {
    Table,
    Id,
    Farm,
    ProductionDate,
    Month,
    EggsCollected,
    Cracked,
    Mortality,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Feed {
    Table,
    Id,
    Farm,
    FeedType,
    Supplier,
    Bags,
    UnitPrice,
    TotalCost,
    BagsUsed,
    StockBalance,
    PurchaseDate,
    Month,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Salaries {
    Table,
    Id,
    Farm,
    StaffName,
    Position,
    Amount,
    PaidOn,
    Month,
    CreatedBy,
    CreatedAt,
}

/// `(farm, month)` and `(farm, date)` indexes shared by every record table.
fn record_indexes<T>(name: &str, table: T, farm: T, month: T, date: T) -> [IndexCreateStatement; 2]
where
    T: Iden + Copy + 'static,
{
    [
        Index::create()
            .name(format!("idx-{name}-farm_month"))
            .table(table)
            .col(farm)
            .col(month)
            .to_owned(),
        Index::create()
            .name(format!("idx-{name}-farm_date"))
            .table(table)
            .col(farm)
            .col(date)
            .to_owned(),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("staff"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Farm).string().not_null())
                    .col(ColumnDef::new(Expenses::Head).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::Cost).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::Month).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for index in record_indexes(
            "expenses",
            Expenses::Table,
            Expenses::Farm,
            Expenses::Month,
            Expenses::ExpenseDate,
        ) {
            manager.create_index(index).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-head")
                    .table(Expenses::Table)
                    .col(Expenses::Head)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::Farm).string().not_null())
                    .col(ColumnDef::new(Sales::Customer).string())
                    .col(ColumnDef::new(Sales::Crates).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sales::PricePerCrate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sales::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Sales::AmountPaid).big_integer().not_null())
                    .col(ColumnDef::new(Sales::SaleDate).date().not_null())
                    .col(ColumnDef::new(Sales::Month).string().not_null())
                    .col(ColumnDef::new(Sales::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for index in record_indexes(
            "sales",
            Sales::Table,
            Sales::Farm,
            Sales::Month,
            Sales::SaleDate,
        ) {
            manager.create_index(index).await?;
        }

        // ───────────────────────────────────────────────────────────────────
        // 4. Production
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Production::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Production::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Production::Farm).string().not_null())
                    .col(
                        ColumnDef::new(Production::ProductionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Production::Month).string().not_null())
                    .col(
                        ColumnDef::new(Production::EggsCollected)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Production::Cracked).big_integer().not_null())
                    .col(
                        ColumnDef::new(Production::Mortality)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Production::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Production::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for index in record_indexes(
            "production",
            Production::Table,
            Production::Farm,
            Production::Month,
            Production::ProductionDate,
        ) {
            manager.create_index(index).await?;
        }

        // ───────────────────────────────────────────────────────────────────
        // 5. Feed
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Feed::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feed::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Feed::Farm).string().not_null())
                    .col(ColumnDef::new(Feed::FeedType).string().not_null())
                    .col(ColumnDef::new(Feed::Supplier).string())
                    .col(ColumnDef::new(Feed::Bags).big_integer().not_null())
                    .col(ColumnDef::new(Feed::UnitPrice).big_integer().not_null())
                    .col(ColumnDef::new(Feed::TotalCost).big_integer().not_null())
                    .col(ColumnDef::new(Feed::BagsUsed).big_integer().not_null())
                    .col(ColumnDef::new(Feed::StockBalance).big_integer().not_null())
                    .col(ColumnDef::new(Feed::PurchaseDate).date().not_null())
                    .col(ColumnDef::new(Feed::Month).string().not_null())
                    .col(ColumnDef::new(Feed::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Feed::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for index in record_indexes(
            "feed",
            Feed::Table,
            Feed::Farm,
            Feed::Month,
            Feed::PurchaseDate,
        ) {
            manager.create_index(index).await?;
        }

        // ───────────────────────────────────────────────────────────────────
        // 6. Salaries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Salaries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Salaries::Farm).string().not_null())
                    .col(ColumnDef::new(Salaries::StaffName).string().not_null())
                    .col(ColumnDef::new(Salaries::Position).string())
                    .col(ColumnDef::new(Salaries::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Salaries::PaidOn).date().not_null())
                    .col(ColumnDef::new(Salaries::Month).string().not_null())
                    .col(ColumnDef::new(Salaries::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Salaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for index in record_indexes(
            "salaries",
            Salaries::Table,
            Salaries::Farm,
            Salaries::Month,
            Salaries::PaidOn,
        ) {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Salaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feed::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Production::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
