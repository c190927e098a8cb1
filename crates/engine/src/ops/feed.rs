use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Actor, EngineError, FeedPurchase, FeedUpdate, MonthToken, NewFeedPurchase, Page, PageRequest,
    RecordFilter, ResultEngine, feed,
    pagination::paginate,
    period::apply_record_filter,
    util::{
        checked_difference, checked_sum, checked_total, optional_text, require_farm,
        require_non_negative, require_positive, require_text,
    },
};

use super::{Engine, access::ensure_can_modify, with_tx};

/// Filter for feed lists and summaries. `feed_type` matches exactly after
/// trimming.
#[derive(Clone, Debug, Default)]
pub struct FeedFilter {
    pub record: RecordFilter,
    pub feed_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSummary {
    pub period: String,
    pub total_bags: i64,
    pub total_bags_used: i64,
    pub total_cost: i64,
}

fn feed_query(filter: &FeedFilter) -> Select<feed::Entity> {
    let mut query = apply_record_filter(
        feed::Entity::find(),
        &filter.record,
        feed::Column::Farm,
        feed::Column::Month,
        feed::Column::PurchaseDate,
    );
    if let Some(feed_type) = optional_text(filter.feed_type.as_deref()) {
        query = query.filter(feed::Column::FeedType.eq(feed_type));
    }
    query
}

async fn feed_model<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<feed::Model> {
    feed::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("feed purchase not exists".to_string()))
}

/// Stock balance of the purchase that precedes `(date, created_at)` for the
/// same farm and feed type, or 0 when there is none.
async fn previous_balance(
    db: &DatabaseTransaction,
    farm: &str,
    feed_type: &str,
    date: NaiveDate,
    created_at: DateTime<Utc>,
    exclude: Option<&str>,
) -> ResultEngine<i64> {
    let mut query = feed::Entity::find()
        .filter(feed::Column::Farm.eq(farm))
        .filter(feed::Column::FeedType.eq(feed_type))
        .filter(
            Condition::any().add(feed::Column::PurchaseDate.lt(date)).add(
                Condition::all()
                    .add(feed::Column::PurchaseDate.eq(date))
                    .add(feed::Column::CreatedAt.lt(created_at)),
            ),
        );
    if let Some(id) = exclude {
        query = query.filter(feed::Column::Id.ne(id));
    }
    let previous = query
        .order_by_desc(feed::Column::PurchaseDate)
        .order_by_desc(feed::Column::CreatedAt)
        .one(db)
        .await?;
    Ok(previous.map_or(0, |model| model.stock_balance))
}

/// Validates quantities and refreshes `total_cost` and `stock_balance`.
fn settle_purchase(purchase: &mut FeedPurchase, previous_balance: i64) -> ResultEngine<()> {
    require_positive(purchase.bags, "bags")?;
    require_positive(purchase.unit_price, "unit price")?;
    require_non_negative(purchase.bags_used, "bags used")?;
    purchase.total_cost = checked_total(purchase.bags, purchase.unit_price, "total cost")?;
    let stocked = checked_sum(previous_balance, purchase.bags, "stock balance")?;
    purchase.stock_balance = checked_difference(stocked, purchase.bags_used, "stock balance")?;
    if purchase.stock_balance < 0 {
        tracing::warn!(
            farm = %purchase.farm,
            feed_type = %purchase.feed_type,
            stock_balance = purchase.stock_balance,
            "feed stock balance went negative"
        );
    }
    Ok(())
}

impl Engine {
    /// Records a feed purchase and its running stock balance.
    pub async fn create_feed_purchase(
        &self,
        actor: &Actor,
        cmd: NewFeedPurchase,
    ) -> ResultEngine<FeedPurchase> {
        let mut purchase = FeedPurchase {
            id: Uuid::new_v4(),
            farm: require_farm(&cmd.farm)?,
            feed_type: require_text(&cmd.feed_type, "feed type")?,
            supplier: optional_text(cmd.supplier.as_deref()),
            bags: cmd.bags,
            unit_price: cmd.unit_price,
            total_cost: 0,
            bags_used: cmd.bags_used,
            stock_balance: 0,
            purchase_date: cmd.purchase_date,
            month: MonthToken::from_date(cmd.purchase_date),
            created_by: actor.username.clone(),
            created_at: Utc::now(),
        };

        with_tx!(self, |db_tx| {
            let previous = previous_balance(
                &db_tx,
                &purchase.farm,
                &purchase.feed_type,
                purchase.purchase_date,
                purchase.created_at,
                None,
            )
            .await?;
            settle_purchase(&mut purchase, previous)?;

            let model: feed::ActiveModel = (&purchase).into();
            model.insert(&db_tx).await?;
            tracing::debug!(
                id = %purchase.id,
                feed_type = %purchase.feed_type,
                stock_balance = purchase.stock_balance,
                "feed purchase created"
            );
            Ok(purchase)
        })
    }

    pub async fn feed_purchase(&self, id: Uuid) -> ResultEngine<FeedPurchase> {
        FeedPurchase::try_from(feed_model(&self.database, id).await?)
    }

    /// One page of feed purchases, newest first.
    pub async fn list_feed_purchases(
        &self,
        filter: &FeedFilter,
        page: &PageRequest,
    ) -> ResultEngine<Page<FeedPurchase>> {
        paginate(
            &self.database,
            feed_query(filter),
            feed::Column::PurchaseDate,
            feed::Column::Id,
            page,
            feed::page_key,
        )
        .await?
        .try_map(FeedPurchase::try_from)
    }

    /// Applies `cmd` and recomputes this row's stock balance against its
    /// predecessor. Later rows are left as they are.
    ///
    /// Authorization: admin, or the user who created the record.
    pub async fn update_feed_purchase(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: FeedUpdate,
    ) -> ResultEngine<FeedPurchase> {
        with_tx!(self, |db_tx| {
            let model = feed_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;

            let mut purchase = FeedPurchase::try_from(model)?;
            if let Some(supplier) = cmd.supplier.as_deref() {
                purchase.supplier = optional_text(Some(supplier));
            }
            if let Some(date) = cmd.purchase_date {
                purchase.purchase_date = date;
                purchase.month = MonthToken::from_date(date);
            }
            purchase.bags = cmd.bags.unwrap_or(purchase.bags);
            purchase.unit_price = cmd.unit_price.unwrap_or(purchase.unit_price);
            purchase.bags_used = cmd.bags_used.unwrap_or(purchase.bags_used);

            let id = purchase.id.to_string();
            let previous = previous_balance(
                &db_tx,
                &purchase.farm,
                &purchase.feed_type,
                purchase.purchase_date,
                purchase.created_at,
                Some(&id),
            )
            .await?;
            settle_purchase(&mut purchase, previous)?;

            let active: feed::ActiveModel = (&purchase).into();
            active.update(&db_tx).await?;
            Ok(purchase)
        })
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn delete_feed_purchase(&self, actor: &Actor, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = feed_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;
            model.delete(&db_tx).await?;
            tracing::debug!(%id, by = %actor.username, "feed purchase deleted");
            Ok(())
        })
    }

    pub async fn feed_summary(&self, filter: &FeedFilter) -> ResultEngine<FeedSummary> {
        let totals: Option<(Option<i64>, Option<i64>, Option<i64>)> = feed_query(filter)
            .select_only()
            .column_as(feed::Column::Bags.sum(), "bags")
            .column_as(feed::Column::BagsUsed.sum(), "bags_used")
            .column_as(feed::Column::TotalCost.sum(), "cost")
            .into_tuple()
            .one(&self.database)
            .await?;
        let (bags, bags_used, cost) = totals.unwrap_or_default();

        Ok(FeedSummary {
            period: filter.record.period.label(),
            total_bags: bags.unwrap_or(0),
            total_bags_used: bags_used.unwrap_or(0),
            total_cost: cost.unwrap_or(0),
        })
    }
}
