use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Actor, EngineError, MonthToken, NewSalary, Page, PageRequest, RecordFilter, ResultEngine,
    Salary, SalaryUpdate,
    pagination::paginate,
    period::apply_record_filter,
    salaries,
    util::{optional_text, require_farm, require_positive, require_text},
};

use super::{Engine, NamedTotal, access::ensure_can_modify, named_totals, with_tx};

/// Filter for salary lists and summaries.
#[derive(Clone, Debug, Default)]
pub struct SalaryFilter {
    pub record: RecordFilter,
    pub staff_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySummary {
    pub period: String,
    pub total_amount: i64,
    /// Ordered by staff name.
    pub by_staff: Vec<NamedTotal>,
}

fn salary_query(filter: &SalaryFilter) -> Select<salaries::Entity> {
    let mut query = apply_record_filter(
        salaries::Entity::find(),
        &filter.record,
        salaries::Column::Farm,
        salaries::Column::Month,
        salaries::Column::PaidOn,
    );
    if let Some(staff_name) = optional_text(filter.staff_name.as_deref()) {
        query = query.filter(salaries::Column::StaffName.eq(staff_name));
    }
    query
}

async fn salary_model<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<salaries::Model> {
    salaries::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("salary not exists".to_string()))
}

impl Engine {
    pub async fn create_salary(&self, actor: &Actor, cmd: NewSalary) -> ResultEngine<Salary> {
        let salary = Salary {
            id: Uuid::new_v4(),
            farm: require_farm(&cmd.farm)?,
            staff_name: require_text(&cmd.staff_name, "staff name")?,
            position: optional_text(cmd.position.as_deref()),
            amount: require_positive(cmd.amount, "amount")?,
            paid_on: cmd.paid_on,
            month: MonthToken::from_date(cmd.paid_on),
            created_by: actor.username.clone(),
            created_at: Utc::now(),
        };
        let model: salaries::ActiveModel = (&salary).into();
        model.insert(&self.database).await?;
        tracing::debug!(id = %salary.id, staff = %salary.staff_name, "salary recorded");
        Ok(salary)
    }

    pub async fn salary(&self, id: Uuid) -> ResultEngine<Salary> {
        Salary::try_from(salary_model(&self.database, id).await?)
    }

    /// One page of salary payments, newest first.
    pub async fn list_salaries(
        &self,
        filter: &SalaryFilter,
        page: &PageRequest,
    ) -> ResultEngine<Page<Salary>> {
        paginate(
            &self.database,
            salary_query(filter),
            salaries::Column::PaidOn,
            salaries::Column::Id,
            page,
            salaries::page_key,
        )
        .await?
        .try_map(Salary::try_from)
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn update_salary(
        &self,
        actor: &Actor,
        id: Uuid,
        cmd: SalaryUpdate,
    ) -> ResultEngine<Salary> {
        with_tx!(self, |db_tx| {
            let model = salary_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;

            let mut salary = Salary::try_from(model)?;
            if let Some(farm) = cmd.farm.as_deref() {
                salary.farm = require_farm(farm)?;
            }
            if let Some(staff_name) = cmd.staff_name.as_deref() {
                salary.staff_name = require_text(staff_name, "staff name")?;
            }
            if let Some(position) = cmd.position.as_deref() {
                salary.position = optional_text(Some(position));
            }
            if let Some(amount) = cmd.amount {
                salary.amount = require_positive(amount, "amount")?;
            }
            if let Some(date) = cmd.paid_on {
                salary.paid_on = date;
                salary.month = MonthToken::from_date(date);
            }

            let active: salaries::ActiveModel = (&salary).into();
            active.update(&db_tx).await?;
            Ok(salary)
        })
    }

    /// Authorization: admin, or the user who created the record.
    pub async fn delete_salary(&self, actor: &Actor, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = salary_model(&db_tx, id).await?;
            ensure_can_modify(actor, &model.created_by)?;
            model.delete(&db_tx).await?;
            tracing::debug!(%id, by = %actor.username, "salary deleted");
            Ok(())
        })
    }

    /// Total paid and per-staff totals for `filter`.
    pub async fn salary_summary(&self, filter: &SalaryFilter) -> ResultEngine<SalarySummary> {
        let rows: Vec<(String, Option<i64>)> = salary_query(filter)
            .select_only()
            .column(salaries::Column::StaffName)
            .column_as(salaries::Column::Amount.sum(), "total")
            .group_by(salaries::Column::StaffName)
            .order_by_asc(salaries::Column::StaffName)
            .into_tuple()
            .all(&self.database)
            .await?;
        let by_staff = named_totals(rows);

        Ok(SalarySummary {
            period: filter.record.period.label(),
            total_amount: by_staff.iter().map(|row| row.total).sum(),
            by_staff,
        })
    }
}
