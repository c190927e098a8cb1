//! Command structs for engine write operations.
//!
//! `New*` types carry the caller-provided fields of a record; derived fields
//! (id, month, totals, balances, audit columns) are filled in by the engine.
//! `*Update` types are partial: `None` leaves a field untouched. For optional
//! text fields, `Some("")` clears the stored value.

use chrono::NaiveDate;

use crate::{ExpenseHead, Role};

#[derive(Clone, Debug)]
pub struct NewExpense {
    pub farm: String,
    pub head: ExpenseHead,
    pub description: Option<String>,
    pub cost: i64,
    pub expense_date: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct ExpenseUpdate {
    pub farm: Option<String>,
    pub head: Option<ExpenseHead>,
    pub description: Option<String>,
    pub cost: Option<i64>,
    pub expense_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewSale {
    pub farm: String,
    pub customer: Option<String>,
    pub crates: i64,
    pub price_per_crate: i64,
    /// Defaults to the full amount when absent.
    pub amount_paid: Option<i64>,
    pub sale_date: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct SaleUpdate {
    pub farm: Option<String>,
    pub customer: Option<String>,
    pub crates: Option<i64>,
    pub price_per_crate: Option<i64>,
    pub amount_paid: Option<i64>,
    pub sale_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewProduction {
    pub farm: String,
    pub production_date: NaiveDate,
    pub eggs_collected: i64,
    pub cracked: i64,
    pub mortality: i64,
}

#[derive(Clone, Debug, Default)]
pub struct ProductionUpdate {
    pub farm: Option<String>,
    pub production_date: Option<NaiveDate>,
    pub eggs_collected: Option<i64>,
    pub cracked: Option<i64>,
    pub mortality: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct NewFeedPurchase {
    pub farm: String,
    pub feed_type: String,
    pub supplier: Option<String>,
    pub bags: i64,
    pub unit_price: i64,
    pub bags_used: i64,
    pub purchase_date: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct FeedUpdate {
    pub supplier: Option<String>,
    pub bags: Option<i64>,
    pub unit_price: Option<i64>,
    pub bags_used: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewSalary {
    pub farm: String,
    pub staff_name: String,
    pub position: Option<String>,
    pub amount: i64,
    pub paid_on: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct SalaryUpdate {
    pub farm: Option<String>,
    pub staff_name: Option<String>,
    pub position: Option<String>,
    pub amount: Option<i64>,
    pub paid_on: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}
