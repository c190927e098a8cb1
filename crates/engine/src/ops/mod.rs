use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

mod access;
mod expenses;
mod feed;
mod production;
mod reports;
mod salaries;
mod sales;
mod users;

pub use expenses::{ExpenseFilter, ExpenseSummary};
pub use feed::{FeedFilter, FeedSummary};
pub use production::ProductionSummary;
pub use salaries::{SalaryFilter, SalarySummary};
pub use sales::{SaleFilter, SalesSummary};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// One row of a grouped total, e.g. cost per expense head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedTotal {
    pub name: String,
    pub total: i64,
}

fn named_totals(rows: Vec<(String, Option<i64>)>) -> Vec<NamedTotal> {
    rows.into_iter()
        .map(|(name, total)| NamedTotal {
            name,
            total: total.unwrap_or(0),
        })
        .collect()
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The underlying connection, for read-only tooling such as exports.
    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: Option<u32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt work factor for new password hashes. Defaults to
    /// `bcrypt::DEFAULT_COST`.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = Some(cost);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let password_cost = self.password_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&password_cost) {
            return Err(EngineError::Validation(format!(
                "bcrypt cost must be between 4 and 31, got {password_cost}"
            )));
        }
        Ok(Engine {
            database: self.database,
            password_cost,
        })
    }
}
