//! Query-string to engine filter conversions shared by the record endpoints.

use chrono::NaiveDate;
use engine::{PageRequest, PeriodFilter, RecordFilter};

use crate::ServerError;

/// Builds the farm/period filter. A month combined with a date bound is an
/// engine validation error.
pub(crate) fn record_filter(
    farm: Option<&str>,
    month: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<RecordFilter, ServerError> {
    let period = PeriodFilter::from_parts(month, start_date, end_date)?;
    Ok(RecordFilter::new(farm, period))
}

pub(crate) fn page_request(limit: Option<u64>, cursor: Option<String>) -> PageRequest {
    PageRequest {
        limit,
        cursor: cursor.filter(|cursor| !cursor.is_empty()),
    }
}
