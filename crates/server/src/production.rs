//! Egg production API endpoints

use api_types::{
    production::{ProductionNew, ProductionUpdate},
    query::ProductionQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, Page, ProductionRecord, ProductionSummary, RecordFilter};
use uuid::Uuid;

use crate::{
    ServerError,
    query::{page_request, record_filter},
    server::ServerState,
};

fn production_filter(query: &ProductionQuery) -> Result<RecordFilter, ServerError> {
    record_filter(
        query.farm.as_deref(),
        query.month.as_deref(),
        query.start_date,
        query.end_date,
    )
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<ProductionNew>,
) -> Result<(StatusCode, Json<ProductionRecord>), ServerError> {
    let cmd = engine::NewProduction {
        farm: payload.farm,
        production_date: payload.production_date,
        eggs_collected: payload.eggs_collected,
        cracked: payload.cracked,
        mortality: payload.mortality,
    };
    let record = state.engine.create_production(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductionQuery>,
) -> Result<Json<Page<ProductionRecord>>, ServerError> {
    let filter = production_filter(&query)?;
    let page = page_request(query.limit, query.cursor);
    Ok(Json(state.engine.list_production(&filter, &page).await?))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<ProductionQuery>,
) -> Result<Json<ProductionSummary>, ServerError> {
    let filter = production_filter(&query)?;
    Ok(Json(state.engine.production_summary(&filter).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductionRecord>, ServerError> {
    Ok(Json(state.engine.production(id).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductionUpdate>,
) -> Result<Json<ProductionRecord>, ServerError> {
    let cmd = engine::ProductionUpdate {
        farm: payload.farm,
        production_date: payload.production_date,
        eggs_collected: payload.eggs_collected,
        cracked: payload.cracked,
        mortality: payload.mortality,
    };
    Ok(Json(state.engine.update_production(&actor, id, cmd).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_production(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
