//! Request payloads and query strings of the HTTP API.
//!
//! Field names are camelCase on the wire. Amounts are integers in the
//! smallest currency unit; dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod query {
    use super::*;

    /// Farm and period selection used by reports.
    ///
    /// `month` (e.g. `Dec`) cannot be combined with `startDate`/`endDate`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub head: Option<String>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaleQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub customer: Option<String>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductionQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FeedQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub feed_type: Option<String>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SalaryQuery {
        pub farm: Option<String>,
        pub month: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub staff_name: Option<String>,
        pub limit: Option<u64>,
        pub cursor: Option<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub farm: String,
        /// Snake-case head name, e.g. `feed` or `professional_fees`.
        pub head: String,
        pub description: Option<String>,
        pub cost: i64,
        pub expense_date: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        pub farm: Option<String>,
        pub head: Option<String>,
        /// An empty string clears the description.
        pub description: Option<String>,
        pub cost: Option<i64>,
        pub expense_date: Option<NaiveDate>,
    }
}

pub mod sale {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaleNew {
        pub farm: String,
        pub customer: Option<String>,
        pub crates: i64,
        pub price_per_crate: i64,
        /// Defaults to the full amount.
        pub amount_paid: Option<i64>,
        pub sale_date: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SaleUpdate {
        pub farm: Option<String>,
        pub customer: Option<String>,
        pub crates: Option<i64>,
        pub price_per_crate: Option<i64>,
        pub amount_paid: Option<i64>,
        pub sale_date: Option<NaiveDate>,
    }
}

pub mod production {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductionNew {
        pub farm: String,
        pub production_date: NaiveDate,
        pub eggs_collected: i64,
        #[serde(default)]
        pub cracked: i64,
        #[serde(default)]
        pub mortality: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductionUpdate {
        pub farm: Option<String>,
        pub production_date: Option<NaiveDate>,
        pub eggs_collected: Option<i64>,
        pub cracked: Option<i64>,
        pub mortality: Option<i64>,
    }
}

pub mod feed {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FeedNew {
        pub farm: String,
        pub feed_type: String,
        pub supplier: Option<String>,
        pub bags: i64,
        pub unit_price: i64,
        #[serde(default)]
        pub bags_used: i64,
        pub purchase_date: NaiveDate,
    }

    /// Farm and feed type are fixed once a purchase is recorded.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FeedUpdate {
        pub supplier: Option<String>,
        pub bags: Option<i64>,
        pub unit_price: Option<i64>,
        pub bags_used: Option<i64>,
        pub purchase_date: Option<NaiveDate>,
    }
}

pub mod salary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SalaryNew {
        pub farm: String,
        pub staff_name: String,
        pub position: Option<String>,
        pub amount: i64,
        pub paid_on: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SalaryUpdate {
        pub farm: Option<String>,
        pub staff_name: Option<String>,
        pub position: Option<String>,
        pub amount: Option<i64>,
        pub paid_on: Option<NaiveDate>,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Admin,
        #[default]
        Staff,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserNew {
        pub username: String,
        pub password: String,
        #[serde(default)]
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PasswordChange {
        /// Required when changing your own password.
        pub current_password: Option<String>,
        pub new_password: String,
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
