//! Expense records.
//!
//! Each expense carries exactly one [`ExpenseHead`]; the head decides which
//! income-statement bucket the cost lands in.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ExpenseHead, MonthToken, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub farm: String,
    pub head: ExpenseHead,
    pub description: Option<String>,
    pub cost: i64,
    pub expense_date: NaiveDate,
    pub month: MonthToken,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm: String,
    pub head: String,
    pub description: Option<String>,
    pub cost: i64,
    pub expense_date: Date,
    pub month: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            farm: ActiveValue::Set(expense.farm.clone()),
            head: ActiveValue::Set(expense.head.as_str().to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            cost: ActiveValue::Set(expense.cost),
            expense_date: ActiveValue::Set(expense.expense_date),
            month: ActiveValue::Set(expense.month.as_str().to_string()),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            head: ExpenseHead::try_from(model.head.as_str())?,
            month: model.month.parse()?,
            farm: model.farm,
            description: model.description,
            cost: model.cost,
            expense_date: model.expense_date,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn page_key(model: &Model) -> (NaiveDate, String) {
    (model.expense_date, model.id.clone())
}
