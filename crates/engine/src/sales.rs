//! Egg sales, the revenue side of the income statement.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MonthToken, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub farm: String,
    pub customer: Option<String>,
    pub crates: i64,
    pub price_per_crate: i64,
    /// `crates * price_per_crate`.
    pub amount: i64,
    pub amount_paid: i64,
    /// Outstanding amount, `amount - amount_paid`.
    pub balance: i64,
    pub sale_date: NaiveDate,
    pub month: MonthToken,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm: String,
    pub customer: Option<String>,
    pub crates: i64,
    pub price_per_crate: i64,
    pub amount: i64,
    pub amount_paid: i64,
    pub sale_date: Date,
    pub month: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(sale: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(sale.id.to_string()),
            farm: ActiveValue::Set(sale.farm.clone()),
            customer: ActiveValue::Set(sale.customer.clone()),
            crates: ActiveValue::Set(sale.crates),
            price_per_crate: ActiveValue::Set(sale.price_per_crate),
            amount: ActiveValue::Set(sale.amount),
            amount_paid: ActiveValue::Set(sale.amount_paid),
            sale_date: ActiveValue::Set(sale.sale_date),
            month: ActiveValue::Set(sale.month.as_str().to_string()),
            created_by: ActiveValue::Set(sale.created_by.clone()),
            created_at: ActiveValue::Set(sale.created_at),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "sale")?,
            month: model.month.parse()?,
            balance: model.amount - model.amount_paid,
            farm: model.farm,
            customer: model.customer,
            crates: model.crates,
            price_per_crate: model.price_per_crate,
            amount: model.amount,
            amount_paid: model.amount_paid,
            sale_date: model.sale_date,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn page_key(model: &Model) -> (NaiveDate, String) {
    (model.sale_date, model.id.clone())
}
