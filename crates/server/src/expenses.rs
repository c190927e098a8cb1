//! Expense API endpoints

use api_types::{
    expense::{ExpenseNew, ExpenseUpdate},
    query::ExpenseQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, Expense, ExpenseFilter, ExpenseHead, ExpenseSummary, Page};
use uuid::Uuid;

use crate::{
    ServerError,
    query::{page_request, record_filter},
    server::ServerState,
};

fn parse_head(head: &str) -> Result<ExpenseHead, ServerError> {
    Ok(ExpenseHead::try_from(head.trim())?)
}

fn expense_filter(query: &ExpenseQuery) -> Result<ExpenseFilter, ServerError> {
    Ok(ExpenseFilter {
        record: record_filter(
            query.farm.as_deref(),
            query.month.as_deref(),
            query.start_date,
            query.end_date,
        )?,
        head: query.head.as_deref().map(parse_head).transpose()?,
    })
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<Expense>), ServerError> {
    let cmd = engine::NewExpense {
        farm: payload.farm,
        head: parse_head(&payload.head)?,
        description: payload.description,
        cost: payload.cost,
        expense_date: payload.expense_date,
    };
    let expense = state.engine.create_expense(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<Page<Expense>>, ServerError> {
    let filter = expense_filter(&query)?;
    let page = page_request(query.limit, query.cursor);
    Ok(Json(state.engine.list_expenses(&filter, &page).await?))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseSummary>, ServerError> {
    let filter = expense_filter(&query)?;
    Ok(Json(state.engine.expense_summary(&filter).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Expense>, ServerError> {
    Ok(Json(state.engine.expense(id).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ServerError> {
    let cmd = engine::ExpenseUpdate {
        farm: payload.farm,
        head: payload.head.as_deref().map(parse_head).transpose()?,
        description: payload.description,
        cost: payload.cost,
        expense_date: payload.expense_date,
    };
    Ok(Json(state.engine.update_expense(&actor, id, cmd).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
