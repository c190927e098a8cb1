//! Feed purchases and the per-feed-type stock balance.
//!
//! `stock_balance` is best effort: it is computed from the predecessor row
//! when a purchase is written and is never replayed afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MonthToken, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPurchase {
    pub id: Uuid,
    pub farm: String,
    pub feed_type: String,
    pub supplier: Option<String>,
    pub bags: i64,
    pub unit_price: i64,
    pub total_cost: i64,
    pub bags_used: i64,
    pub stock_balance: i64,
    pub purchase_date: NaiveDate,
    pub month: MonthToken,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feed")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm: String,
    pub feed_type: String,
    pub supplier: Option<String>,
    pub bags: i64,
    pub unit_price: i64,
    pub total_cost: i64,
    pub bags_used: i64,
    pub stock_balance: i64,
    pub purchase_date: Date,
    pub month: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FeedPurchase> for ActiveModel {
    fn from(purchase: &FeedPurchase) -> Self {
        Self {
            id: ActiveValue::Set(purchase.id.to_string()),
            farm: ActiveValue::Set(purchase.farm.clone()),
            feed_type: ActiveValue::Set(purchase.feed_type.clone()),
            supplier: ActiveValue::Set(purchase.supplier.clone()),
            bags: ActiveValue::Set(purchase.bags),
            unit_price: ActiveValue::Set(purchase.unit_price),
            total_cost: ActiveValue::Set(purchase.total_cost),
            bags_used: ActiveValue::Set(purchase.bags_used),
            stock_balance: ActiveValue::Set(purchase.stock_balance),
            purchase_date: ActiveValue::Set(purchase.purchase_date),
            month: ActiveValue::Set(purchase.month.as_str().to_string()),
            created_by: ActiveValue::Set(purchase.created_by.clone()),
            created_at: ActiveValue::Set(purchase.created_at),
        }
    }
}

impl TryFrom<Model> for FeedPurchase {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "feed")?,
            month: model.month.parse()?,
            farm: model.farm,
            feed_type: model.feed_type,
            supplier: model.supplier,
            bags: model.bags,
            unit_price: model.unit_price,
            total_cost: model.total_cost,
            bags_used: model.bags_used,
            stock_balance: model.stock_balance,
            purchase_date: model.purchase_date,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn page_key(model: &Model) -> (NaiveDate, String) {
    (model.purchase_date, model.id.clone())
}
