//! Salary API endpoints

use api_types::{
    query::SalaryQuery,
    salary::{SalaryNew, SalaryUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, Page, Salary, SalaryFilter, SalarySummary};
use uuid::Uuid;

use crate::{
    ServerError,
    query::{page_request, record_filter},
    server::ServerState,
};

fn salary_filter(query: &SalaryQuery) -> Result<SalaryFilter, ServerError> {
    Ok(SalaryFilter {
        record: record_filter(
            query.farm.as_deref(),
            query.month.as_deref(),
            query.start_date,
            query.end_date,
        )?,
        staff_name: query.staff_name.clone(),
    })
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<SalaryNew>,
) -> Result<(StatusCode, Json<Salary>), ServerError> {
    let cmd = engine::NewSalary {
        farm: payload.farm,
        staff_name: payload.staff_name,
        position: payload.position,
        amount: payload.amount,
        paid_on: payload.paid_on,
    };
    let salary = state.engine.create_salary(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(salary)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SalaryQuery>,
) -> Result<Json<Page<Salary>>, ServerError> {
    let filter = salary_filter(&query)?;
    let page = page_request(query.limit, query.cursor);
    Ok(Json(state.engine.list_salaries(&filter, &page).await?))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SalaryQuery>,
) -> Result<Json<SalarySummary>, ServerError> {
    let filter = salary_filter(&query)?;
    Ok(Json(state.engine.salary_summary(&filter).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Salary>, ServerError> {
    Ok(Json(state.engine.salary(id).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalaryUpdate>,
) -> Result<Json<Salary>, ServerError> {
    let cmd = engine::SalaryUpdate {
        farm: payload.farm,
        staff_name: payload.staff_name,
        position: payload.position,
        amount: payload.amount,
        paid_on: payload.paid_on,
    };
    Ok(Json(state.engine.update_salary(&actor, id, cmd).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_salary(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
