use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Actor, Engine, ExpenseHead, NewExpense, NewSale, NewUser, PeriodFilter, RecordFilter, Role,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, Actor) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    engine
        .bootstrap_user(NewUser {
            username: "ada".to_string(),
            password: "correct horse".to_string(),
            role: Role::Staff,
        })
        .await
        .unwrap();
    (engine, Actor::new("ada", Role::Staff))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn sale(engine: &Engine, actor: &Actor, farm: &str, day: NaiveDate, crates: i64, price: i64) {
    engine
        .create_sale(
            actor,
            NewSale {
                farm: farm.to_string(),
                customer: None,
                crates,
                price_per_crate: price,
                amount_paid: None,
                sale_date: day,
            },
        )
        .await
        .unwrap();
}

async fn expense(engine: &Engine, actor: &Actor, farm: &str, head: ExpenseHead, day: NaiveDate, cost: i64) {
    engine
        .create_expense(
            actor,
            NewExpense {
                farm: farm.to_string(),
                head,
                description: None,
                cost,
                expense_date: day,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_database_reports_zero_profit() {
    let (engine, _actor) = engine_with_db().await;

    let envelope = engine.income_statement(&RecordFilter::default()).await;

    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, "Income statement generated successfully");
    let statement = envelope.data.unwrap();
    assert_eq!(statement.period, "All time");
    assert_eq!(statement.gross_revenue, 0);
    assert_eq!(statement.total_expenses, 0);
    assert_eq!(statement.net_income, 0);
    assert_eq!(statement.note, "Profitable");
}

#[tokio::test]
async fn december_worked_example() {
    let (engine, ada) = engine_with_db().await;
    let dec = date(2025, 12, 12);

    // 8,407 crates at 3,500 = 29,424,500; one extra crate at 2,200.
    sale(&engine, &ada, "North", dec, 8_407, 3_500).await;
    sale(&engine, &ada, "North", date(2025, 12, 28), 1, 2_200).await;
    // Outside the month.
    sale(&engine, &ada, "North", date(2026, 1, 2), 100, 3_500).await;

    let costs = [
        (ExpenseHead::Feed, 12_500_000),
        (ExpenseHead::Medicine, 850_000),
        (ExpenseHead::Vaccine, 420_000),
        (ExpenseHead::Birds, 6_000_000),
        (ExpenseHead::Salaries, 2_400_000),
        (ExpenseHead::Rent, 500_000),
        (ExpenseHead::Utilities, 120_000),
        (ExpenseHead::Power, 380_000),
        (ExpenseHead::Fuel, 260_000),
        (ExpenseHead::Logistics, 310_000),
        (ExpenseHead::Maintenance, 150_000),
        (ExpenseHead::Office, 45_000),
        (ExpenseHead::Security, 180_000),
        (ExpenseHead::Communication, 36_000),
        (ExpenseHead::Taxes, 90_000),
        (ExpenseHead::Miscellaneous, 75_000),
    ];
    for (head, cost) in costs {
        expense(&engine, &ada, "North", head, dec, cost).await;
    }
    // Uncategorized heads never reach the totals.
    expense(&engine, &ada, "North", ExpenseHead::Equipment, dec, 9_999_999).await;

    let filter = RecordFilter::new(None, PeriodFilter::from_parts(Some("Dec"), None, None).unwrap());
    let statement = engine.income_statement(&filter).await.data.unwrap();

    assert_eq!(statement.period, "Month: Dec");
    assert_eq!(statement.gross_revenue, 29_426_700);
    assert_eq!(statement.other_income, 0);
    assert_eq!(statement.total_revenue, 29_426_700);
    assert_eq!(statement.cogs.feed, 12_500_000);
    assert_eq!(statement.cogs.total, 19_770_000);
    assert_eq!(statement.operating_expenses.salaries, 2_400_000);
    assert_eq!(statement.operating_expenses.total, 4_546_000);
    assert_eq!(statement.cogs.total, statement.cogs.subtotal());
    assert_eq!(
        statement.operating_expenses.total,
        statement.operating_expenses.subtotal()
    );
    assert_eq!(statement.total_expenses, 24_316_000);
    assert_eq!(statement.net_income, 5_110_700);
    assert_eq!(statement.note, "Profitable");
}

#[tokio::test]
async fn expenses_beyond_i64_give_500() {
    let (engine, ada) = engine_with_db().await;
    let half = i64::MAX / 2 + 1;
    expense(&engine, &ada, "North", ExpenseHead::Feed, date(2026, 1, 5), half).await;
    expense(&engine, &ada, "North", ExpenseHead::Rent, date(2026, 1, 6), half).await;

    let envelope = engine.income_statement(&RecordFilter::default()).await;

    assert_eq!(envelope.status_code, 500);
    assert_eq!(envelope.message, "Failed to generate income statement");
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn month_token_matches_exactly() {
    let (engine, ada) = engine_with_db().await;
    sale(&engine, &ada, "North", date(2025, 12, 31), 1, 1_000).await;
    sale(&engine, &ada, "North", date(2025, 11, 30), 1, 500).await;

    let dec = RecordFilter::new(None, PeriodFilter::from_parts(Some("Dec"), None, None).unwrap());
    assert_eq!(engine.income_statement(&dec).await.data.unwrap().gross_revenue, 1_000);

    assert!(PeriodFilter::from_parts(Some("dec"), None, None).is_err());
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let (engine, ada) = engine_with_db().await;
    sale(&engine, &ada, "North", date(2026, 1, 1), 1, 10).await;
    sale(&engine, &ada, "North", date(2026, 1, 31), 1, 100).await;
    sale(&engine, &ada, "North", date(2026, 2, 1), 1, 1_000).await;
    expense(&engine, &ada, "North", ExpenseHead::Fuel, date(2026, 1, 31), 7).await;
    expense(&engine, &ada, "North", ExpenseHead::Fuel, date(2026, 2, 1), 70).await;

    let filter = RecordFilter::new(
        None,
        PeriodFilter::from_parts(None, Some(date(2026, 1, 1)), Some(date(2026, 1, 31))).unwrap(),
    );
    let statement = engine.income_statement(&filter).await.data.unwrap();

    assert_eq!(statement.period, "From 2026-01-01 to 2026-01-31");
    assert_eq!(statement.gross_revenue, 110);
    assert_eq!(statement.operating_expenses.fuel, 7);
    assert_eq!(statement.net_income, 103);
}

#[tokio::test]
async fn farm_filter_uses_normalized_name() {
    let (engine, ada) = engine_with_db().await;
    sale(&engine, &ada, "  North ", date(2026, 1, 1), 2, 100).await;
    sale(&engine, &ada, "South", date(2026, 1, 1), 5, 100).await;
    expense(&engine, &ada, "South", ExpenseHead::Birds, date(2026, 1, 1), 900).await;

    let north = RecordFilter::new(Some("North"), PeriodFilter::AllTime);
    let statement = engine.income_statement(&north).await.data.unwrap();
    assert_eq!(statement.gross_revenue, 200);
    assert_eq!(statement.cogs.total, 0);

    let south = RecordFilter::new(Some("South"), PeriodFilter::AllTime);
    let statement = engine.income_statement(&south).await.data.unwrap();
    assert_eq!(statement.net_income, -400);
    assert_eq!(statement.note, "Loss");
}

#[tokio::test]
async fn repeated_reports_are_identical() {
    let (engine, ada) = engine_with_db().await;
    sale(&engine, &ada, "North", date(2026, 3, 3), 4, 250).await;
    expense(&engine, &ada, "North", ExpenseHead::Vaccine, date(2026, 3, 3), 300).await;

    let filter = RecordFilter::default();
    let first = serde_json::to_string(&engine.income_statement(&filter).await).unwrap();
    let second = serde_json::to_string(&engine.income_statement(&filter).await).unwrap();
    assert_eq!(first, second);
}
