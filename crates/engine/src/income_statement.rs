//! Income statement aggregation.
//!
//! The statement is rebuilt from three aggregate queries on every call and
//! never stored:
//!
//! 1. the sum of sale amounts (gross revenue),
//! 2. expense costs grouped by head, restricted to [`COGS_HEADS`],
//! 3. expense costs grouped by head, restricted to [`OPEX_HEADS`].
//!
//! The queries are independent and run concurrently. Folding their results
//! into the fixed report shape is pure and lives in
//! [`IncomeStatement::from_parts`].

use std::future::Future;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::{
    COGS_HEADS, CostBucket, ExpenseHead, OPEX_HEADS, RecordFilter, ResultEngine, expenses,
    period::apply_record_filter,
    sales,
    util::{checked_difference, checked_sum},
};

pub const NOTE_PROFITABLE: &str = "Profitable";
pub const NOTE_LOSS: &str = "Loss";

const MESSAGE_OK: &str = "Income statement generated successfully";
const MESSAGE_FAILED: &str = "Failed to generate income statement";

/// Summed cost of one expense head, as returned by the store.
///
/// `head` is the raw stored value so that the fold, not the store, decides
/// what an unknown head means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadTotal {
    pub head: String,
    pub total: i64,
}

impl HeadTotal {
    pub fn new(head: impl Into<String>, total: i64) -> Self {
        Self {
            head: head.into(),
            total,
        }
    }
}

/// Read-only aggregate queries the statement is built from.
pub trait IncomeStore {
    /// Sum of sale amounts matching `filter`, 0 when nothing matches.
    fn revenue_total(&self, filter: &RecordFilter) -> impl Future<Output = ResultEngine<i64>> + Send;

    /// Expense costs matching `filter` with a head in `heads`, one row per
    /// head that has at least one record.
    fn expense_totals_by_head(
        &self,
        filter: &RecordFilter,
        heads: &[ExpenseHead],
    ) -> impl Future<Output = ResultEngine<Vec<HeadTotal>>> + Send;
}

/// Parses a stored head and keeps it only when it reports under `bucket`.
fn bucketed_head(raw: &str, bucket: CostBucket) -> Option<ExpenseHead> {
    ExpenseHead::try_from(raw)
        .ok()
        .filter(|head| head.bucket() == Some(bucket))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CogsBreakdown {
    pub feed: i64,
    pub medicine: i64,
    pub vaccine: i64,
    pub birds: i64,
    pub total: i64,
}

impl CogsBreakdown {
    /// Folds grouped sums into the named fields. `total` is the sum of every
    /// group received, mapped or not.
    pub fn fold(groups: &[HeadTotal]) -> ResultEngine<Self> {
        let mut cogs = Self::default();
        for group in groups {
            let slot = match bucketed_head(&group.head, CostBucket::Cogs) {
                Some(ExpenseHead::Feed) => Some(&mut cogs.feed),
                Some(ExpenseHead::Medicine) => Some(&mut cogs.medicine),
                Some(ExpenseHead::Vaccine) => Some(&mut cogs.vaccine),
                Some(ExpenseHead::Birds) => Some(&mut cogs.birds),
                _ => None,
            };
            match slot {
                Some(slot) => *slot = checked_sum(*slot, group.total, &group.head)?,
                None => {
                    tracing::warn!(head = %group.head, "expense head outside COGS in COGS group");
                }
            }
            cogs.total = checked_sum(cogs.total, group.total, "cost of goods sold")?;
        }
        Ok(cogs)
    }

    /// Sum of the named fields.
    pub fn subtotal(&self) -> i64 {
        self.feed + self.medicine + self.vaccine + self.birds
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingExpenses {
    pub salaries: i64,
    pub rent: i64,
    pub utilities: i64,
    pub power: i64,
    pub fuel: i64,
    pub logistics: i64,
    pub maintenance: i64,
    pub office: i64,
    pub security: i64,
    pub communication: i64,
    pub taxes: i64,
    pub miscellaneous: i64,
    pub total: i64,
}

impl OperatingExpenses {
    /// Folds grouped sums into the named fields. `total` is the sum of every
    /// group received, mapped or not.
    pub fn fold(groups: &[HeadTotal]) -> ResultEngine<Self> {
        let mut opex = Self::default();
        for group in groups {
            let slot = match bucketed_head(&group.head, CostBucket::Opex) {
                Some(ExpenseHead::Salaries) => Some(&mut opex.salaries),
                Some(ExpenseHead::Rent) => Some(&mut opex.rent),
                Some(ExpenseHead::Utilities) => Some(&mut opex.utilities),
                Some(ExpenseHead::Power) => Some(&mut opex.power),
                Some(ExpenseHead::Fuel) => Some(&mut opex.fuel),
                Some(ExpenseHead::Logistics) => Some(&mut opex.logistics),
                Some(ExpenseHead::Maintenance) => Some(&mut opex.maintenance),
                Some(ExpenseHead::Office) => Some(&mut opex.office),
                Some(ExpenseHead::Security) => Some(&mut opex.security),
                Some(ExpenseHead::Communication) => Some(&mut opex.communication),
                Some(ExpenseHead::Taxes) => Some(&mut opex.taxes),
                Some(ExpenseHead::Miscellaneous) => Some(&mut opex.miscellaneous),
                _ => None,
            };
            match slot {
                Some(slot) => *slot = checked_sum(*slot, group.total, &group.head)?,
                None => {
                    tracing::warn!(head = %group.head, "expense head outside OpEx in OpEx group");
                }
            }
            opex.total = checked_sum(opex.total, group.total, "operating expenses")?;
        }
        Ok(opex)
    }

    /// Sum of the named fields.
    pub fn subtotal(&self) -> i64 {
        self.salaries
            + self.rent
            + self.utilities
            + self.power
            + self.fuel
            + self.logistics
            + self.maintenance
            + self.office
            + self.security
            + self.communication
            + self.taxes
            + self.miscellaneous
    }
}

/// Derived income statement for one farm/period filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub period: String,
    pub gross_revenue: i64,
    /// Reserved for revenue sources other than egg sales; always 0 today.
    pub other_income: i64,
    pub total_revenue: i64,
    pub cogs: CogsBreakdown,
    pub operating_expenses: OperatingExpenses,
    pub total_expenses: i64,
    pub net_income: i64,
    pub note: String,
}

impl IncomeStatement {
    /// Assembles a statement from raw aggregate results.
    ///
    /// Fails when any total leaves the `i64` range.
    pub fn from_parts(
        period: String,
        gross_revenue: i64,
        cogs_groups: &[HeadTotal],
        opex_groups: &[HeadTotal],
    ) -> ResultEngine<Self> {
        let other_income = 0;
        let total_revenue = checked_sum(gross_revenue, other_income, "total revenue")?;
        let cogs = CogsBreakdown::fold(cogs_groups)?;
        let operating_expenses = OperatingExpenses::fold(opex_groups)?;
        let total_expenses = checked_sum(cogs.total, operating_expenses.total, "total expenses")?;
        let net_income = checked_difference(total_revenue, total_expenses, "net income")?;
        let note = if net_income >= 0 {
            NOTE_PROFITABLE
        } else {
            NOTE_LOSS
        };

        Ok(Self {
            period,
            gross_revenue,
            other_income,
            total_revenue,
            cogs,
            operating_expenses,
            total_expenses,
            net_income,
            note: note.to_string(),
        })
    }
}

/// `{statusCode, message, data}` result handed to the HTTP layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope<T> {
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ReportEnvelope<T> {
    fn ok(message: &str, data: T) -> Self {
        Self {
            status_code: 200,
            message: message.to_string(),
            data: Some(data),
        }
    }

    fn internal_error(message: &str) -> Self {
        Self {
            status_code: 500,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// Builds the income statement for `filter` from `store`.
///
/// Store failures and totals outside the `i64` range are logged and turned
/// into a 500 envelope without data.
pub async fn generate_income_statement<S>(
    store: &S,
    filter: &RecordFilter,
) -> ReportEnvelope<IncomeStatement>
where
    S: IncomeStore + Sync,
{
    match build_statement(store, filter).await {
        Ok(statement) => ReportEnvelope::ok(MESSAGE_OK, statement),
        Err(err) => {
            tracing::error!("failed to generate income statement: {err}");
            ReportEnvelope::internal_error(MESSAGE_FAILED)
        }
    }
}

async fn build_statement<S>(store: &S, filter: &RecordFilter) -> ResultEngine<IncomeStatement>
where
    S: IncomeStore + Sync,
{
    let (gross_revenue, cogs_groups, opex_groups) = tokio::try_join!(
        store.revenue_total(filter),
        store.expense_totals_by_head(filter, &COGS_HEADS),
        store.expense_totals_by_head(filter, &OPEX_HEADS),
    )?;

    IncomeStatement::from_parts(
        filter.period.label(),
        gross_revenue,
        &cogs_groups,
        &opex_groups,
    )
}

impl IncomeStore for DatabaseConnection {
    async fn revenue_total(&self, filter: &RecordFilter) -> ResultEngine<i64> {
        let total: Option<Option<i64>> = apply_record_filter(
            sales::Entity::find(),
            filter,
            sales::Column::Farm,
            sales::Column::Month,
            sales::Column::SaleDate,
        )
        .select_only()
        .column_as(sales::Column::Amount.sum(), "total")
        .into_tuple()
        .one(self)
        .await?;

        Ok(total.flatten().unwrap_or(0))
    }

    async fn expense_totals_by_head(
        &self,
        filter: &RecordFilter,
        heads: &[ExpenseHead],
    ) -> ResultEngine<Vec<HeadTotal>> {
        let heads: Vec<&'static str> = heads.iter().map(|head| head.as_str()).collect();
        let rows: Vec<(String, Option<i64>)> = apply_record_filter(
            expenses::Entity::find(),
            filter,
            expenses::Column::Farm,
            expenses::Column::Month,
            expenses::Column::ExpenseDate,
        )
        .filter(expenses::Column::Head.is_in(heads))
        .select_only()
        .column(expenses::Column::Head)
        .column_as(expenses::Column::Cost.sum(), "total")
        .group_by(expenses::Column::Head)
        .order_by_asc(expenses::Column::Head)
        .into_tuple()
        .all(self)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(head, total)| HeadTotal::new(head, total.unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sea_orm::DbErr;

    use super::*;
    use crate::{EngineError, MonthToken, PeriodFilter};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct SaleRow {
        farm: &'static str,
        date: NaiveDate,
        amount: i64,
    }

    struct ExpenseRow {
        farm: &'static str,
        head: ExpenseHead,
        date: NaiveDate,
        cost: i64,
    }

    #[derive(Default)]
    struct MemoryStore {
        sales: Vec<SaleRow>,
        expenses: Vec<ExpenseRow>,
    }

    impl MemoryStore {
        fn sale(mut self, farm: &'static str, date: NaiveDate, amount: i64) -> Self {
            self.sales.push(SaleRow { farm, date, amount });
            self
        }

        fn expense(
            mut self,
            farm: &'static str,
            head: ExpenseHead,
            date: NaiveDate,
            cost: i64,
        ) -> Self {
            self.expenses.push(ExpenseRow {
                farm,
                head,
                date,
                cost,
            });
            self
        }
    }

    impl IncomeStore for MemoryStore {
        async fn revenue_total(&self, filter: &RecordFilter) -> ResultEngine<i64> {
            Ok(self
                .sales
                .iter()
                .filter(|row| filter.matches(row.farm, MonthToken::from_date(row.date), row.date))
                .map(|row| row.amount)
                .sum())
        }

        async fn expense_totals_by_head(
            &self,
            filter: &RecordFilter,
            heads: &[ExpenseHead],
        ) -> ResultEngine<Vec<HeadTotal>> {
            let mut totals: std::collections::BTreeMap<ExpenseHead, i64> = Default::default();
            for row in &self.expenses {
                if heads.contains(&row.head)
                    && filter.matches(row.farm, MonthToken::from_date(row.date), row.date)
                {
                    *totals.entry(row.head).or_default() += row.cost;
                }
            }
            Ok(totals
                .into_iter()
                .map(|(head, total)| HeadTotal::new(head.as_str(), total))
                .collect())
        }
    }

    struct BrokenStore;

    impl IncomeStore for BrokenStore {
        async fn revenue_total(&self, _filter: &RecordFilter) -> ResultEngine<i64> {
            Ok(1_000)
        }

        async fn expense_totals_by_head(
            &self,
            _filter: &RecordFilter,
            _heads: &[ExpenseHead],
        ) -> ResultEngine<Vec<HeadTotal>> {
            Err(EngineError::Database(DbErr::Custom("connection reset".to_string())))
        }
    }

    fn assert_invariants(statement: &IncomeStatement) {
        assert_eq!(
            statement.total_revenue,
            statement.gross_revenue + statement.other_income
        );
        assert_eq!(statement.cogs.total, statement.cogs.subtotal());
        assert_eq!(
            statement.operating_expenses.total,
            statement.operating_expenses.subtotal()
        );
        assert_eq!(
            statement.total_expenses,
            statement.cogs.total + statement.operating_expenses.total
        );
        assert_eq!(
            statement.net_income,
            statement.total_revenue - statement.total_expenses
        );
        let expected_note = if statement.net_income >= 0 {
            NOTE_PROFITABLE
        } else {
            NOTE_LOSS
        };
        assert_eq!(statement.note, expected_note);
    }

    async fn statement(store: &MemoryStore, filter: &RecordFilter) -> IncomeStatement {
        let envelope = generate_income_statement(store, filter).await;
        assert_eq!(envelope.status_code, 200);
        let statement = envelope.data.unwrap();
        assert_invariants(&statement);
        statement
    }

    #[tokio::test]
    async fn empty_store_gives_zero_report() {
        let statement = statement(&MemoryStore::default(), &RecordFilter::default()).await;

        assert_eq!(statement.period, "All time");
        assert_eq!(statement.gross_revenue, 0);
        assert_eq!(statement.other_income, 0);
        assert_eq!(statement.total_revenue, 0);
        assert_eq!(statement.cogs, CogsBreakdown::default());
        assert_eq!(statement.operating_expenses, OperatingExpenses::default());
        assert_eq!(statement.total_expenses, 0);
        assert_eq!(statement.net_income, 0);
        assert_eq!(statement.note, "Profitable");
    }

    #[tokio::test]
    async fn one_record_per_head_lands_in_its_own_field() {
        let day = date(2026, 3, 10);
        let mut store = MemoryStore::default();
        // Distinct powers of two so any cross-contamination shows up.
        for (i, head) in COGS_HEADS.iter().chain(OPEX_HEADS.iter()).enumerate() {
            store = store.expense("North", *head, day, 1 << i);
        }
        let statement = statement(&store, &RecordFilter::default()).await;

        let cogs = &statement.cogs;
        assert_eq!(cogs.feed, 1);
        assert_eq!(cogs.medicine, 2);
        assert_eq!(cogs.vaccine, 4);
        assert_eq!(cogs.birds, 8);
        assert_eq!(cogs.total, 15);

        let opex = &statement.operating_expenses;
        assert_eq!(opex.salaries, 1 << 4);
        assert_eq!(opex.rent, 1 << 5);
        assert_eq!(opex.utilities, 1 << 6);
        assert_eq!(opex.power, 1 << 7);
        assert_eq!(opex.fuel, 1 << 8);
        assert_eq!(opex.logistics, 1 << 9);
        assert_eq!(opex.maintenance, 1 << 10);
        assert_eq!(opex.office, 1 << 11);
        assert_eq!(opex.security, 1 << 12);
        assert_eq!(opex.communication, 1 << 13);
        assert_eq!(opex.taxes, 1 << 14);
        assert_eq!(opex.miscellaneous, 1 << 15);
        assert_eq!(opex.total, (1 << 16) - (1 << 4));
    }

    #[tokio::test]
    async fn uncategorized_heads_are_left_out() {
        let day = date(2026, 3, 10);
        let store = MemoryStore::default()
            .expense("North", ExpenseHead::Feed, day, 500)
            .expense("North", ExpenseHead::Rent, day, 300)
            .expense("North", ExpenseHead::FurnitureFixtures, day, 10_000)
            .expense("North", ExpenseHead::ProfessionalFees, day, 20_000)
            .expense("North", ExpenseHead::Equipment, day, 40_000);

        let statement = statement(&store, &RecordFilter::default()).await;

        assert_eq!(statement.total_expenses, 800);
    }

    #[tokio::test]
    async fn worked_example() {
        let day = date(2025, 12, 15);
        let store = MemoryStore::default()
            .sale("North", day, 20_000_000)
            .sale("North", date(2025, 12, 20), 9_426_700)
            .expense("North", ExpenseHead::Feed, day, 12_500_000)
            .expense("North", ExpenseHead::Medicine, day, 850_000)
            .expense("North", ExpenseHead::Vaccine, day, 420_000)
            .expense("North", ExpenseHead::Birds, day, 6_000_000)
            .expense("North", ExpenseHead::Salaries, day, 2_400_000)
            .expense("North", ExpenseHead::Rent, day, 500_000)
            .expense("North", ExpenseHead::Utilities, day, 120_000)
            .expense("North", ExpenseHead::Power, day, 380_000)
            .expense("North", ExpenseHead::Fuel, day, 260_000)
            .expense("North", ExpenseHead::Logistics, day, 310_000)
            .expense("North", ExpenseHead::Maintenance, day, 150_000)
            .expense("North", ExpenseHead::Office, day, 45_000)
            .expense("North", ExpenseHead::Security, day, 180_000)
            .expense("North", ExpenseHead::Communication, day, 36_000)
            .expense("North", ExpenseHead::Taxes, day, 90_000)
            .expense("North", ExpenseHead::Miscellaneous, day, 75_000);

        let filter = RecordFilter::new(None, PeriodFilter::Month("Dec".parse().unwrap()));
        let statement = statement(&store, &filter).await;

        assert_eq!(statement.period, "Month: Dec");
        assert_eq!(statement.gross_revenue, 29_426_700);
        assert_eq!(statement.total_revenue, 29_426_700);
        assert_eq!(statement.cogs.total, 19_770_000);
        assert_eq!(statement.operating_expenses.total, 4_546_000);
        assert_eq!(statement.total_expenses, 24_316_000);
        assert_eq!(statement.net_income, 5_110_700);
        assert_eq!(statement.note, "Profitable");
    }

    #[tokio::test]
    async fn expenses_above_revenue_is_a_loss() {
        let day = date(2026, 1, 5);
        let store = MemoryStore::default()
            .sale("North", day, 1_000)
            .expense("North", ExpenseHead::Feed, day, 1_500);

        let statement = statement(&store, &RecordFilter::default()).await;

        assert_eq!(statement.net_income, -500);
        assert_eq!(statement.note, "Loss");
    }

    #[tokio::test]
    async fn month_token_only_matches_its_month() {
        let store = MemoryStore::default()
            .sale("North", date(2025, 12, 31), 700)
            .sale("North", date(2026, 1, 1), 300)
            .expense("North", ExpenseHead::Feed, date(2025, 12, 1), 100)
            .expense("North", ExpenseHead::Feed, date(2025, 11, 30), 50);

        let filter = RecordFilter::new(None, PeriodFilter::Month("Dec".parse().unwrap()));
        let statement = statement(&store, &filter).await;

        assert_eq!(statement.gross_revenue, 700);
        assert_eq!(statement.cogs.feed, 100);
    }

    #[tokio::test]
    async fn date_range_is_inclusive_and_per_table() {
        let store = MemoryStore::default()
            .sale("North", date(2025, 12, 31), 1)
            .sale("North", date(2026, 1, 1), 10)
            .sale("North", date(2026, 1, 31), 100)
            .sale("North", date(2026, 2, 1), 1_000)
            .expense("North", ExpenseHead::Rent, date(2026, 1, 31), 5)
            .expense("North", ExpenseHead::Rent, date(2026, 2, 1), 50);

        let filter = RecordFilter::new(
            None,
            PeriodFilter::Range {
                start: Some(date(2026, 1, 1)),
                end: Some(date(2026, 1, 31)),
            },
        );
        let statement = statement(&store, &filter).await;

        assert_eq!(statement.period, "From 2026-01-01 to 2026-01-31");
        assert_eq!(statement.gross_revenue, 110);
        assert_eq!(statement.operating_expenses.rent, 5);
    }

    #[tokio::test]
    async fn farm_filter_is_exact() {
        let day = date(2026, 1, 10);
        let store = MemoryStore::default()
            .sale("North", day, 100)
            .sale("South", day, 200)
            .expense("South", ExpenseHead::Feed, day, 20);

        let north = statement(&store, &RecordFilter::new(Some("North"), PeriodFilter::AllTime)).await;
        assert_eq!(north.gross_revenue, 100);
        assert_eq!(north.cogs.total, 0);

        let all = statement(&store, &RecordFilter::default()).await;
        assert_eq!(all.gross_revenue, 300);
        assert_eq!(all.cogs.total, 20);
    }

    #[tokio::test]
    async fn repeated_calls_serialize_identically() {
        let day = date(2026, 1, 10);
        let store = MemoryStore::default()
            .sale("North", day, 100)
            .expense("North", ExpenseHead::Power, day, 20);
        let filter = RecordFilter::default();

        let first = serde_json::to_string(&generate_income_statement(&store, &filter).await).unwrap();
        let second = serde_json::to_string(&generate_income_statement(&store, &filter).await).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn store_failure_gives_500_without_data() {
        let envelope = generate_income_statement(&BrokenStore, &RecordFilter::default()).await;

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Failed to generate income statement");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn json_uses_report_field_names() {
        let statement = IncomeStatement::from_parts("All time".to_string(), 10, &[], &[]).unwrap();
        let value = serde_json::to_value(ReportEnvelope::ok(MESSAGE_OK, statement)).unwrap();

        assert_eq!(value["statusCode"], 200);
        let data = &value["data"];
        for key in [
            "period",
            "grossRevenue",
            "otherIncome",
            "totalRevenue",
            "cogs",
            "operatingExpenses",
            "totalExpenses",
            "netIncome",
            "note",
        ] {
            assert!(data.get(key).is_some(), "missing {key}");
        }
        assert_eq!(data["cogs"]["total"], 0);
        assert_eq!(data["operatingExpenses"]["miscellaneous"], 0);
    }

    #[test]
    fn group_totals_count_even_when_unmapped() {
        let cogs =
            CogsBreakdown::fold(&[HeadTotal::new("feed", 10), HeadTotal::new("rent", 5)]).unwrap();
        assert_eq!(cogs.feed, 10);
        assert_eq!(cogs.total, 15);

        let opex =
            OperatingExpenses::fold(&[HeadTotal::new("power", 7), HeadTotal::new("bogus", 1)])
                .unwrap();
        assert_eq!(opex.power, 7);
        assert_eq!(opex.total, 8);

        assert_eq!(bucketed_head("rent", CostBucket::Opex), Some(ExpenseHead::Rent));
        assert_eq!(bucketed_head("rent", CostBucket::Cogs), None);
        assert_eq!(bucketed_head("equipment", CostBucket::Opex), None);
    }

    #[test]
    fn totals_out_of_range_are_errors() {
        let half = i64::MAX / 2 + 1;
        let err = IncomeStatement::from_parts(
            "All time".to_string(),
            0,
            &[HeadTotal::new("feed", half)],
            &[HeadTotal::new("rent", half)],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let cogs = [HeadTotal::new("feed", i64::MAX), HeadTotal::new("birds", 1)];
        assert!(CogsBreakdown::fold(&cogs).is_err());

        let loss = IncomeStatement::from_parts(
            "All time".to_string(),
            i64::MIN,
            &[HeadTotal::new("feed", 1)],
            &[],
        );
        assert!(loss.is_err());
    }

    #[tokio::test]
    async fn overflowing_expenses_give_500_without_data() {
        let day = date(2026, 1, 10);
        let half = i64::MAX / 2 + 1;
        let store = MemoryStore::default()
            .expense("North", ExpenseHead::Feed, day, half)
            .expense("North", ExpenseHead::Rent, day, half);

        let envelope = generate_income_statement(&store, &RecordFilter::default()).await;

        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.message, "Failed to generate income statement");
        assert!(envelope.data.is_none());
    }
}
