use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, NewUser, Role};
use migration::MigratorTrait;

const ROOT: (&str, &str) = ("root", "root-password");
const ADA: (&str, &str) = ("ada", "ada-password");

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap();
    for ((username, password), role) in [(ROOT, Role::Admin), (ADA, Role::Staff)] {
        engine
            .bootstrap_user(NewUser {
                username: username.to_string(),
                password: password.to_string(),
                role,
            })
            .await
            .unwrap();
    }
    server::router(engine)
}

fn basic((username, password): (&str, &str)) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {token}")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    credentials: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(credentials) = credentials {
        builder = builder.header(header::AUTHORIZATION, basic(credentials));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_expense(app: &Router, who: (&str, &str), head: &str, cost: i64, date: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/expenses",
        Some(who),
        Some(json!({"farm": "North", "head": head, "cost": cost, "expenseDate": date})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn requests_without_valid_credentials_are_rejected() {
    let app = app().await;

    let request = Request::builder()
        .uri("/expenses")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let (status, _) = send(&app, Method::GET, "/expenses", Some(("root", "nope-nope")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/expenses", Some(ROOT), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn income_statement_over_http() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/sales",
        Some(ADA),
        Some(json!({"farm": "North", "crates": 10, "pricePerCrate": 3500, "saleDate": "2025-12-05"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    post_expense(&app, ADA, "feed", 20_000, "2025-12-06").await;
    post_expense(&app, ADA, "rent", 5_000, "2025-12-07").await;
    post_expense(&app, ADA, "equipment", 90_000, "2025-12-07").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/reports/income-statement?month=Dec&farm=North",
        Some(ADA),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "Income statement generated successfully");
    let data = &body["data"];
    assert_eq!(data["period"], "Month: Dec");
    assert_eq!(data["grossRevenue"], 35_000);
    assert_eq!(data["cogs"]["feed"], 20_000);
    assert_eq!(data["operatingExpenses"]["rent"], 5_000);
    assert_eq!(data["totalExpenses"], 25_000);
    assert_eq!(data["netIncome"], 10_000);
    assert_eq!(data["note"], "Profitable");
}

#[tokio::test]
async fn income_statement_rejects_month_with_dates() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/reports/income-statement?month=Dec&startDate=2025-12-01",
        Some(ADA),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_expense_input_is_422() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(ADA),
        Some(json!({"farm": "North", "head": "yachts", "cost": 10, "expenseDate": "2026-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(ADA),
        Some(json!({"farm": "North", "head": "feed", "cost": 0, "expenseDate": "2026-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, "/expenses?month=Jan&endDate=2026-01-31", Some(ADA), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ownership_is_enforced() {
    let app = app().await;
    let expense = post_expense(&app, ROOT, "fuel", 1_000, "2026-01-02").await;
    let uri = format!("/expenses/{}", expense["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PATCH, &uri, Some(ADA), Some(json!({"cost": 2_000}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(ADA), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(ROOT), Some(json!({"cost": 2_000}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 2_000);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(ROOT), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(ROOT), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expense_list_pages_with_cursor() {
    let app = app().await;
    for day in 1..=3 {
        post_expense(&app, ADA, "power", 100, &format!("2026-01-0{day}")).await;
    }

    let (status, first) = send(&app, Method::GET, "/expenses?limit=2", Some(ADA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["items"].as_array().unwrap().len(), 2);
    assert_eq!(first["items"][0]["expenseDate"], "2026-01-03");

    let cursor = first["nextCursor"].as_str().unwrap();
    let (status, second) = send(
        &app,
        Method::GET,
        &format!("/expenses?limit=2&cursor={cursor}"),
        Some(ADA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["items"].as_array().unwrap().len(), 1);
    assert_eq!(second["nextCursor"], Value::Null);

    let (status, _) = send(&app, Method::GET, "/expenses?cursor=garbage", Some(ADA), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, summary) = send(&app, Method::GET, "/expenses/summary?month=Jan", Some(ADA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalCost"], 300);
    assert_eq!(summary["byHead"][0]["name"], "power");
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/users", Some(ADA), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let new_user = json!({"username": "bola", "password": "bola-password", "role": "staff"});
    let (status, body) = send(&app, Method::POST, "/users", Some(ROOT), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "bola");
    assert_eq!(body["role"], "staff");
    assert!(body.get("passwordHash").is_none());

    let (status, _) = send(&app, Method::POST, "/users", Some(ROOT), Some(new_user)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/users/bola/password",
        Some(("bola", "bola-password")),
        Some(json!({"currentPassword": "bola-password", "newPassword": "fresh-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/sales", Some(("bola", "fresh-password")), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/users/root", Some(ROOT), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, "/users/bola", Some(ROOT), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn derived_record_fields_over_http() {
    let app = app().await;

    let (status, production) = send(
        &app,
        Method::POST,
        "/production",
        Some(ADA),
        Some(json!({"farm": "North", "productionDate": "2026-01-04", "eggsCollected": 640, "cracked": 29})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(production["goodEggs"], 611);
    assert_eq!(production["crates"], 20);
    assert_eq!(production["pieces"], 11);

    let (status, feed) = send(
        &app,
        Method::POST,
        "/feed",
        Some(ADA),
        Some(json!({"farm": "North", "feedType": "Layers Mash", "bags": 10, "unitPrice": 12000, "bagsUsed": 3, "purchaseDate": "2026-01-04"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(feed["totalCost"], 120_000);
    assert_eq!(feed["stockBalance"], 7);

    let (status, salary) = send(
        &app,
        Method::POST,
        "/salaries",
        Some(ROOT),
        Some(json!({"farm": "North", "staffName": "Chidi", "amount": 60000, "paidOn": "2026-01-28"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(salary["month"], "Jan");

    let (status, summary) = send(&app, Method::GET, "/salaries/summary?farm=North", Some(ADA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalAmount"], 60_000);
}
