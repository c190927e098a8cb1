use crate::{IncomeStatement, RecordFilter, ReportEnvelope, generate_income_statement};

use super::Engine;

impl Engine {
    /// Income statement for `filter`, wrapped in its status envelope.
    ///
    /// Storage failures never surface as `Err`; they produce a 500 envelope.
    pub async fn income_statement(&self, filter: &RecordFilter) -> ReportEnvelope<IncomeStatement> {
        tracing::debug!(farm = ?filter.farm, period = %filter.period.label(), "income statement requested");
        generate_income_statement(&self.database, filter).await
    }
}
