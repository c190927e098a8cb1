//! Staff salary payments.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MonthToken, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: Uuid,
    pub farm: String,
    pub staff_name: String,
    pub position: Option<String>,
    pub amount: i64,
    pub paid_on: NaiveDate,
    pub month: MonthToken,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm: String,
    pub staff_name: String,
    pub position: Option<String>,
    pub amount: i64,
    pub paid_on: Date,
    pub month: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Salary> for ActiveModel {
    fn from(salary: &Salary) -> Self {
        Self {
            id: ActiveValue::Set(salary.id.to_string()),
            farm: ActiveValue::Set(salary.farm.clone()),
            staff_name: ActiveValue::Set(salary.staff_name.clone()),
            position: ActiveValue::Set(salary.position.clone()),
            amount: ActiveValue::Set(salary.amount),
            paid_on: ActiveValue::Set(salary.paid_on),
            month: ActiveValue::Set(salary.month.as_str().to_string()),
            created_by: ActiveValue::Set(salary.created_by.clone()),
            created_at: ActiveValue::Set(salary.created_at),
        }
    }
}

impl TryFrom<Model> for Salary {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "salary")?,
            month: model.month.parse()?,
            farm: model.farm,
            staff_name: model.staff_name,
            position: model.position,
            amount: model.amount,
            paid_on: model.paid_on,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn page_key(model: &Model) -> (NaiveDate, String) {
    (model.paid_on, model.id.clone())
}
