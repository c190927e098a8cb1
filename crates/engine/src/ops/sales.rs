use chrono::Utc;
use sea_orm::{QueryFilter, QuerySelect, Select, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Actor, EngineError, MonthToken, NewSale, Page, PageRequest, RecordFilter, ResultEngine, Sale,
    SaleUpdate, sales,
    pagination::paginate,
    period::apply_record_filter,
    util::{checked_total, optional_text, require_farm, require_non_negative, require_positive},
};

use super::{Engine, access::ensure_can_modify, with_tx};

/// Filter for sale lists and summaries. `customer` matches exactly after
/// trimming.
#[derive(Clone, Debug, Default)]
pub struct SaleFilter {
    pub record: RecordFilter,
    pub customer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub period: String,
    pub total_crates: i64,
    pub total_amount: i64,
    pub total_paid: i64,
    pub total_balance: i64,
}

fn sale_query(filter: &SaleFilter) -> Select<sales::Entity> {
    let mut query = apply_record_filter(
        sales::Entity::find(),
        &filter.record,
        sales::Column::Farm,
        sales::Column::Month,
        sales::Column::SaleDate,
    );
    if let Some(customer) = optional_text(filter.customer.as_deref()) {
        query = query.filter(sales::Column::Customer.eq(customer));
    }
    query
}

async fn sale_model<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<sales::Model> {
    sales::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("sale not exists".to_string()))
}

/// Validates quantities and derives `(amount, amount_paid)`.
fn price_sale(crates: i64, price_per_crate: i64, amount_paid: Option<i64>) -> ResultEngine<(i64, i64)> {
    if crates < 1 {
        return Err(EngineError::Validation("crates must be >= 1".to_string()));
    }
    let price_per_crate = require_positive(price_per_crate, "price per crate")?;
    let amount = checked_total(crates, price_per_crate, "amount")?;
    let paid = require_non_negative(amount_paid.unwrap_or(amount), "amount paid")?;
    if paid > amount {
        return Err(EngineError::Validation(format!(
            "amount paid {paid} exceeds amount {amount}"
        )));
    }
    Ok((amount, paid))
}

impl Engine {
    /// Records an egg sale. `amount_paid` defaults to the full amount.
    pub async fn create_sale(&self, actor: &Actor, cmd: NewSale) -> ResultEngine<Sale> {
        let (amount, amount_paid) = price_sale(cmd.crates, cmd.price_per_crate, cmd.amount_paid)?;
        let sale = Sale {
            id: Uuid::new_v4(),
            farm: require_farm(&cmd.farm)?,
            customer: optional_text(cmd.customer.as_deref()),
            crates: cmd.crates,
            price_per_crate: cmd.price_per_crate,
            amount,
            amount_paid,
            balance: amount - amount_paid,
            sale_date: cmd.sale_date,
            month: MonthToken::from_date(cmd.sale_date),
            created_by: actor.username.clone(),
            created_at: Utc::now(),
        };
        let model: sales::ActiveModel = (&sale).into();
        model.insert(&self.database).await?;
        tracing::debug!(id = %sale.id, amount, farm = %sale.farm, "sale created");
        Ok(sale)
    }

    pub async fn sale(&self, id: Uuid) -> ResultEngine<Sale> {
        Sale::try_from(sale_model(&self.database, id).await?)
    }

    /// One page of sales, newest first.
    pub async fn list_sales(&self, filter: &SaleFilter, page: &PageRequest) -> ResultEngine<Page<Sale>> {
        paginate(
            &self.database,
            sale_query(filter),
            sales::Column::SaleDate,
            sales::Column::Id,
            page,
            sales::page_key,
        )
        .await?
        .try_map(Sale::try_from)
    }

    /// Applies `cmd` to an existing sale and recomputes its amount.
    ///
    /// Without a new `amount_paid` the stored one is kept and must still fit
    /// under the recomputed amount.
    ///
    /// Authorization: admin, or the user who created the record.
    pub async fn update_sale(&self, actor: &Actor, id: Uuid, cmd: SaleUpdate) -> ResultEngine<Sale> {
        with_tx!(self, |db_tx| {
            let model = sale_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;

            let mut sale = Sale::try_from(model)?;
            if let Some(farm) = cmd.farm.as_deref() {
                sale.farm = require_farm(farm)?;
            }
            if let Some(customer) = cmd.customer.as_deref() {
                sale.customer = optional_text(Some(customer));
            }
            if let Some(date) = cmd.sale_date {
                sale.sale_date = date;
                sale.month = MonthToken::from_date(date);
            }
            sale.crates = cmd.crates.unwrap_or(sale.crates);
            sale.price_per_crate = cmd.price_per_crate.unwrap_or(sale.price_per_crate);
            let (amount, amount_paid) = price_sale(
                sale.crates,
                sale.price_per_crate,
                Some(cmd.amount_paid.unwrap_or(sale.amount_paid)),
            )?;
            sale.amount = amount;
            sale.amount_paid = amount_paid;
            sale.balance = amount - amount_paid;

            let active: sales::ActiveModel = (&sale).into();
            active.update(&db_tx).await?;
            Ok(sale)
        })
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn delete_sale(&self, actor: &Actor, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = sale_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;
            model.delete(&db_tx).await?;
            tracing::debug!(%id, by = %actor.username, "sale deleted");
            Ok(())
        })
    }

    pub async fn sales_summary(&self, filter: &SaleFilter) -> ResultEngine<SalesSummary> {
        let totals: Option<(Option<i64>, Option<i64>, Option<i64>)> = sale_query(filter)
            .select_only()
            .column_as(sales::Column::Crates.sum(), "crates")
            .column_as(sales::Column::Amount.sum(), "amount")
            .column_as(sales::Column::AmountPaid.sum(), "paid")
            .into_tuple()
            .one(&self.database)
            .await?;
        let (crates, amount, paid) = totals.unwrap_or_default();
        let (crates, amount, paid) = (
            crates.unwrap_or(0),
            amount.unwrap_or(0),
            paid.unwrap_or(0),
        );

        Ok(SalesSummary {
            period: filter.record.period.label(),
            total_crates: crates,
            total_amount: amount,
            total_paid: paid,
            total_balance: amount - paid,
        })
    }
}
