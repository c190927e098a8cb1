//! Feed purchase API endpoints

use api_types::{
    feed::{FeedNew, FeedUpdate},
    query::FeedQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, FeedFilter, FeedPurchase, FeedSummary, Page};
use uuid::Uuid;

use crate::{
    ServerError,
    query::{page_request, record_filter},
    server::ServerState,
};

fn feed_filter(query: &FeedQuery) -> Result<FeedFilter, ServerError> {
    Ok(FeedFilter {
        record: record_filter(
            query.farm.as_deref(),
            query.month.as_deref(),
            query.start_date,
            query.end_date,
        )?,
        feed_type: query.feed_type.clone(),
    })
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<FeedNew>,
) -> Result<(StatusCode, Json<FeedPurchase>), ServerError> {
    let cmd = engine::NewFeedPurchase {
        farm: payload.farm,
        feed_type: payload.feed_type,
        supplier: payload.supplier,
        bags: payload.bags,
        unit_price: payload.unit_price,
        bags_used: payload.bags_used,
        purchase_date: payload.purchase_date,
    };
    let purchase = state.engine.create_feed_purchase(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Page<FeedPurchase>>, ServerError> {
    let filter = feed_filter(&query)?;
    let page = page_request(query.limit, query.cursor);
    Ok(Json(state.engine.list_feed_purchases(&filter, &page).await?))
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedSummary>, ServerError> {
    let filter = feed_filter(&query)?;
    Ok(Json(state.engine.feed_summary(&filter).await?))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedPurchase>, ServerError> {
    Ok(Json(state.engine.feed_purchase(id).await?))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedUpdate>,
) -> Result<Json<FeedPurchase>, ServerError> {
    let cmd = engine::FeedUpdate {
        supplier: payload.supplier,
        bags: payload.bags,
        unit_price: payload.unit_price,
        bags_used: payload.bags_used,
        purchase_date: payload.purchase_date,
    };
    Ok(Json(state.engine.update_feed_purchase(&actor, id, cmd).await?))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_feed_purchase(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
