//! Report API endpoints

use api_types::query::ReportQuery;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{IncomeStatement, PeriodFilter, RecordFilter, ReportEnvelope};

use crate::{ServerError, server::ServerState};

/// `GET /reports/income-statement`
///
/// The HTTP status mirrors the envelope's `statusCode`. Combining `month`
/// with `startDate`/`endDate` is rejected with 400 before any query runs.
pub async fn income_statement(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<(StatusCode, Json<ReportEnvelope<IncomeStatement>>), ServerError> {
    let period = PeriodFilter::from_parts(query.month.as_deref(), query.start_date, query.end_date)
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    let filter = RecordFilter::new(query.farm.as_deref(), period);

    let envelope = state.engine.income_statement(&filter).await;
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(envelope)))
}
