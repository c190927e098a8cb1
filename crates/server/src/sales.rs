//! Egg sale API endpoints

use api_types::{
    query::SaleQuery,
    sale::{SaleNew, SaleUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, Page, Sale, SaleFilter, SalesSummary};
use uuid::Uuid;

use crate::{
    ServerError,
    query::{page_request, record_filter},
    server::ServerState,
};

fn sale_filter(query: &SaleQuery) -> Result<SaleFilter, ServerError> {
    Ok(SaleFilter {
        record: record_filter(
            query.farm.as_deref(),
            query.month.as_deref(),
            query.start_date,
            query.end_date,
        )?,
        customer: query.customer.clone(),
    })
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<(StatusCode, Json<Sale>), ServerError> {
    let cmd = engine::NewSale {
        farm: payload.farm,
        customer: payload.customer,
        crates: payload.crates,
        price_per_crate: payload.price_per_crate,
        amount_paid: payload.amount_paid,
        sale_date: payload.sale_date,
    };
    let sale = state.engine.create_sale(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SaleQuery>,
) -> Result<Json<Page<Sale>>, ServerError> {
    let filter = sale_filter(&query)?;
    let page = page_request(query.limit, query.cursor);
    Ok(Json(state.engine.list_sales(&filter, &page).await?))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SaleQuery>,
) -> Result<Json<SalesSummary>, ServerError> {
    let filter = sale_filter(&query)?;
    Ok(Json(state.engine.sales_summary(&filter).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Sale>, ServerError> {
    Ok(Json(state.engine.sale(id).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleUpdate>,
) -> Result<Json<Sale>, ServerError> {
    let cmd = engine::SaleUpdate {
        farm: payload.farm,
        customer: payload.customer,
        crates: payload.crates,
        price_per_crate: payload.price_per_crate,
        amount_paid: payload.amount_paid,
        sale_date: payload.sale_date,
    };
    Ok(Json(state.engine.update_sale(&actor, id, cmd).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_sale(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
