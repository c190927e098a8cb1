use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Actor, EngineError, Expense, ExpenseHead, ExpenseUpdate, MonthToken, NewExpense, Page,
    PageRequest, RecordFilter, ResultEngine, expenses,
    pagination::paginate,
    period::apply_record_filter,
    util::{optional_text, require_farm, require_positive},
};

use super::{Engine, NamedTotal, access::ensure_can_modify, named_totals, with_tx};

/// Filter for expense lists and summaries.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub record: RecordFilter,
    pub head: Option<ExpenseHead>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub period: String,
    pub total_cost: i64,
    /// Ordered by head.
    pub by_head: Vec<NamedTotal>,
}

fn expense_query(filter: &ExpenseFilter) -> Select<expenses::Entity> {
    let mut query = apply_record_filter(
        expenses::Entity::find(),
        &filter.record,
        expenses::Column::Farm,
        expenses::Column::Month,
        expenses::Column::ExpenseDate,
    );
    if let Some(head) = filter.head {
        query = query.filter(expenses::Column::Head.eq(head.as_str()));
    }
    query
}

async fn expense_model<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<expenses::Model> {
    expenses::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
}

impl Engine {
    /// Records an expense on behalf of `actor`.
    pub async fn create_expense(&self, actor: &Actor, cmd: NewExpense) -> ResultEngine<Expense> {
        let expense = Expense {
            id: Uuid::new_v4(),
            farm: require_farm(&cmd.farm)?,
            head: cmd.head,
            description: optional_text(cmd.description.as_deref()),
            cost: require_positive(cmd.cost, "cost")?,
            expense_date: cmd.expense_date,
            month: MonthToken::from_date(cmd.expense_date),
            created_by: actor.username.clone(),
            created_at: Utc::now(),
        };
        let model: expenses::ActiveModel = (&expense).into();
        model.insert(&self.database).await?;
        tracing::debug!(id = %expense.id, head = %expense.head, farm = %expense.farm, "expense created");
        Ok(expense)
    }

    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        Expense::try_from(expense_model(&self.database, id).await?)
    }

    /// One page of expenses, newest first.
    pub async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
        page: &PageRequest,
    ) -> ResultEngine<Page<Expense>> {
        paginate(
            &self.database,
            expense_query(filter),
            expenses::Column::ExpenseDate,
            expenses::Column::Id,
            page,
            expenses::page_key,
        )
        .await?
        .try_map(Expense::try_from)
    }

    /// Applies `cmd` to an existing expense.
    ///
    /// Authorization: admin, or the user who created the record.
    pub async fn update_expense(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: ExpenseUpdate,
    ) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = expense_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;

            let mut expense = Expense::try_from(model)?;
            if let Some(farm) = cmd.farm.as_deref() {
                expense.farm = require_farm(farm)?;
            }
            if let Some(head) = cmd.head {
                expense.head = head;
            }
            if let Some(description) = cmd.description.as_deref() {
                expense.description = optional_text(Some(description));
            }
            if let Some(cost) = cmd.cost {
                expense.cost = require_positive(cost, "cost")?;
            }
            if let Some(date) = cmd.expense_date {
                expense.expense_date = date;
                expense.month = MonthToken::from_date(date);
            }

            let active: expenses::ActiveModel = (&expense).into();
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn delete_expense(&self, actor: &Actor, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = expense_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;
            model.delete(&db_tx).await?;
            tracing::debug!(%id, by = %actor.username, "expense deleted");
            Ok(())
        })
    }

    /// Total cost and per-head totals for `filter`.
    pub async fn expense_summary(&self, filter: &ExpenseFilter) -> ResultEngine<ExpenseSummary> {
        let rows: Vec<(String, Option<i64>)> = expense_query(filter)
            .select_only()
            .column(expenses::Column::Head)
            .column_as(expenses::Column::Cost.sum(), "total")
            .group_by(expenses::Column::Head)
            .order_by_asc(expenses::Column::Head)
            .into_tuple()
            .all(&self.database)
            .await?;
        let by_head = named_totals(rows);

        Ok(ExpenseSummary {
            period: filter.record.period.label(),
            total_cost: by_head.iter().map(|row| row.total).sum(),
            by_head,
        })
    }
}
