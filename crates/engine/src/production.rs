//! Daily egg production.
//!
//! Only the raw counts are stored; crates and loose pieces are derived from
//! the good-egg count on read.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MonthToken, util::parse_uuid};

/// Eggs per crate.
pub const EGGS_PER_CRATE: i64 = 30;

/// Splits an egg count into `(crates, pieces)`.
pub fn crates_and_pieces(eggs: i64) -> (i64, i64) {
    (eggs / EGGS_PER_CRATE, eggs % EGGS_PER_CRATE)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: Uuid,
    pub farm: String,
    pub production_date: NaiveDate,
    pub month: MonthToken,
    pub eggs_collected: i64,
    pub cracked: i64,
    pub good_eggs: i64,
    pub crates: i64,
    pub pieces: i64,
    pub mortality: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "production")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub farm: String,
    pub production_date: Date,
    pub month: String,
    pub eggs_collected: i64,
    pub cracked: i64,
    pub mortality: i64,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ProductionRecord> for ActiveModel {
    fn from(record: &ProductionRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            farm: ActiveValue::Set(record.farm.clone()),
            production_date: ActiveValue::Set(record.production_date),
            month: ActiveValue::Set(record.month.as_str().to_string()),
            eggs_collected: ActiveValue::Set(record.eggs_collected),
            cracked: ActiveValue::Set(record.cracked),
            mortality: ActiveValue::Set(record.mortality),
            created_by: ActiveValue::Set(record.created_by.clone()),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for ProductionRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let good_eggs = model.eggs_collected - model.cracked;
        let (crates, pieces) = crates_and_pieces(good_eggs);
        Ok(Self {
            id: parse_uuid(&model.id, "production")?,
            month: model.month.parse()?,
            farm: model.farm,
            production_date: model.production_date,
            eggs_collected: model.eggs_collected,
            cracked: model.cracked,
            good_eggs,
            crates,
            pieces,
            mortality: model.mortality,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

pub(crate) fn page_key(model: &Model) -> (NaiveDate, String) {
    (model.production_date, model.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_crates() {
        assert_eq!(crates_and_pieces(0), (0, 0));
        assert_eq!(crates_and_pieces(29), (0, 29));
        assert_eq!(crates_and_pieces(30), (1, 0));
        assert_eq!(crates_and_pieces(611), (20, 11));
    }
}
