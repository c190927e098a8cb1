use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{expenses, feed, production, reports, salaries, sales, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"farmbook\"")],
    )
        .into_response()
}

/// Authenticates the Basic credentials and stores the resulting
/// [`engine::Actor`] in the request extensions.
async fn auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(credentials)) = auth_header else {
        return unauthorized();
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return unauthorized();
    }

    let actor = match state
        .engine
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        Ok(Some(actor)) => actor,
        Ok(None) => {
            tracing::debug!(username = credentials.username(), "rejected credentials");
            return unauthorized();
        }
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    request.extensions_mut().insert(actor);
    next.run(request).await
}

/// Full API router with authentication applied to every route.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/summary", get(expenses::summary))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .patch(expenses::update)
                .delete(expenses::delete),
        )
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/summary", get(sales::summary))
        .route(
            "/sales/{id}",
            get(sales::get).patch(sales::update).delete(sales::delete),
        )
        .route("/production", get(production::list).post(production::create))
        .route("/production/summary", get(production::summary))
        .route(
            "/production/{id}",
            get(production::get)
                .patch(production::update)
                .delete(production::delete),
        )
        .route("/feed", get(feed::list).post(feed::create))
        .route("/feed/summary", get(feed::summary))
        .route(
            "/feed/{id}",
            get(feed::get).patch(feed::update).delete(feed::delete),
        )
        .route("/salaries", get(salaries::list).post(salaries::create))
        .route("/salaries/summary", get(salaries::summary))
        .route(
            "/salaries/{id}",
            get(salaries::get)
                .patch(salaries::update)
                .delete(salaries::delete),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/{username}", axum::routing::delete(users::delete))
        .route("/users/{username}/password", put(users::change_password))
        .route("/reports/income-statement", get(reports::income_statement))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
