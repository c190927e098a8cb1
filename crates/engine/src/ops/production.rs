use chrono::Utc;
use sea_orm::{QuerySelect, Select, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Actor, EngineError, MonthToken, NewProduction, Page, PageRequest, ProductionRecord,
    ProductionUpdate, RecordFilter, ResultEngine, crates_and_pieces,
    pagination::paginate,
    period::apply_record_filter,
    production,
    util::{require_farm, require_non_negative},
};

use super::{Engine, access::ensure_can_modify, with_tx};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    pub period: String,
    pub eggs_collected: i64,
    pub cracked: i64,
    pub good_eggs: i64,
    /// Derived from `good_eggs`, not summed per record.
    pub crates: i64,
    pub pieces: i64,
    pub mortality: i64,
}

fn production_query(filter: &RecordFilter) -> Select<production::Entity> {
    apply_record_filter(
        production::Entity::find(),
        filter,
        production::Column::Farm,
        production::Column::Month,
        production::Column::ProductionDate,
    )
}

async fn production_model<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> ResultEngine<production::Model> {
    production::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("production record not exists".to_string()))
}

/// Checks the counts and refreshes the derived egg fields.
fn settle_counts(record: &mut ProductionRecord) -> ResultEngine<()> {
    require_non_negative(record.eggs_collected, "eggs collected")?;
    require_non_negative(record.cracked, "cracked eggs")?;
    require_non_negative(record.mortality, "mortality")?;
    if record.cracked > record.eggs_collected {
        return Err(EngineError::Validation(format!(
            "cracked eggs ({}) exceed eggs collected ({})",
            record.cracked, record.eggs_collected
        )));
    }
    record.good_eggs = record.eggs_collected - record.cracked;
    (record.crates, record.pieces) = crates_and_pieces(record.good_eggs);
    Ok(())
}

impl Engine {
    /// Records one day's egg collection.
    pub async fn create_production(
        &self,
        actor: &Actor,
        cmd: NewProduction,
    ) -> ResultEngine<ProductionRecord> {
        let mut record = ProductionRecord {
            id: Uuid::new_v4(),
            farm: require_farm(&cmd.farm)?,
            production_date: cmd.production_date,
            month: MonthToken::from_date(cmd.production_date),
            eggs_collected: cmd.eggs_collected,
            cracked: cmd.cracked,
            good_eggs: 0,
            crates: 0,
            pieces: 0,
            mortality: cmd.mortality,
            created_by: actor.username.clone(),
            created_at: Utc::now(),
        };
        settle_counts(&mut record)?;

        let model: production::ActiveModel = (&record).into();
        model.insert(&self.database).await?;
        tracing::debug!(id = %record.id, good_eggs = record.good_eggs, farm = %record.farm, "production recorded");
        Ok(record)
    }

    pub async fn production(&self, id: Uuid) -> ResultEngine<ProductionRecord> {
        ProductionRecord::try_from(production_model(&self.database, id).await?)
    }

    /// One page of production records, newest first.
    pub async fn list_production(
        &self,
        filter: &RecordFilter,
        page: &PageRequest,
    ) -> ResultEngine<Page<ProductionRecord>> {
        paginate(
            &self.database,
            production_query(filter),
            production::Column::ProductionDate,
            production::Column::Id,
            page,
            production::page_key,
        )
        .await?
        .try_map(ProductionRecord::try_from)
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn update_production(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: ProductionUpdate,
    ) -> ResultEngine<ProductionRecord> {
        with_tx!(self, |db_tx| {
            let model = production_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;

            let mut record = ProductionRecord::try_from(model)?;
            if let Some(farm) = cmd.farm.as_deref() {
                record.farm = require_farm(farm)?;
            }
            if let Some(date) = cmd.production_date {
                record.production_date = date;
                record.month = MonthToken::from_date(date);
            }
            record.eggs_collected = cmd.eggs_collected.unwrap_or(record.eggs_collected);
            record.cracked = cmd.cracked.unwrap_or(record.cracked);
            record.mortality = cmd.mortality.unwrap_or(record.mortality);
            settle_counts(&mut record)?;

            let active: production::ActiveModel = (&record).into();
            active.update(&db_tx).await?;
            Ok(record)
        })
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn delete_production(&self, actor: &Actor, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = production_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;
            model.delete(&db_tx).await?;
            tracing::debug!(%id, by = %actor.username, "production record deleted");
            Ok(())
        })
    }

    pub async fn production_summary(&self, filter: &RecordFilter) -> ResultEngine<ProductionSummary> {
        let totals: Option<(Option<i64>, Option<i64>, Option<i64>)> = production_query(filter)
            .select_only()
            .column_as(production::Column::EggsCollected.sum(), "collected")
            .column_as(production::Column::Cracked.sum(), "cracked")
            .column_as(production::Column::Mortality.sum(), "mortality")
            .into_tuple()
            .one(&self.database)
            .await?;
        let (collected, cracked, mortality) = totals.unwrap_or_default();
        let eggs_collected = collected.unwrap_or(0);
        let cracked = cracked.unwrap_or(0);
        let good_eggs = eggs_collected - cracked;
        let (crates, pieces) = crates_and_pieces(good_eggs);

        Ok(ProductionSummary {
            period: filter.period.label(),
            eggs_collected,
            cracked,
            good_eggs,
            crates,
            pieces,
            mortality: mortality.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(collected: i64, cracked: i64) -> ProductionRecord {
        ProductionRecord {
            id: Uuid::nil(),
            farm: "North".to_string(),
            production_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            month: "Jan".parse().unwrap(),
            eggs_collected: collected,
            cracked,
            good_eggs: 0,
            crates: 0,
            pieces: 0,
            mortality: 0,
            created_by: "ade".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn derived_fields_follow_counts() {
        let mut rec = record(640, 29);
        settle_counts(&mut rec).unwrap();
        assert_eq!(rec.good_eggs, 611);
        assert_eq!((rec.crates, rec.pieces), (20, 11));
    }

    #[test]
    fn cracked_cannot_exceed_collected() {
        assert!(matches!(
            settle_counts(&mut record(10, 11)),
            Err(EngineError::Validation(_))
        ));
    }
}
